//! Namespace registry
//!
//! Canonical prefixes, their synonyms, local identifier patterns and the
//! target type an identifier of that namespace denotes by default. Built once
//! at startup and shared by reference.

use crate::curie;
use crate::model::TargetType;
use chiro_common::{ChiroError, Result};
use regex::Regex;
use std::collections::BTreeMap;

struct NamespaceSpec {
    prefix: &'static str,
    synonyms: &'static [&'static str],
    pattern: &'static str,
    default_type: Option<TargetType>,
}

const BUILTIN: &[NamespaceSpec] = &[
    NamespaceSpec {
        prefix: "chebi",
        synonyms: &["chebiid"],
        pattern: r"^\d+$",
        default_type: Some(TargetType::Chemical),
    },
    NamespaceSpec {
        prefix: "complexportal",
        synonyms: &["cpx"],
        pattern: r"^CPX-\d+$",
        default_type: Some(TargetType::ProteinComplex),
    },
    NamespaceSpec {
        prefix: "doid",
        synonyms: &["do"],
        pattern: r"^\d+$",
        default_type: Some(TargetType::Phenotype),
    },
    NamespaceSpec {
        prefix: "drugbank",
        synonyms: &[],
        pattern: r"^DB\d{5}$",
        default_type: Some(TargetType::Chemical),
    },
    NamespaceSpec {
        prefix: "eccode",
        synonyms: &["ec-code", "ec_code", "ec", "intenz", "expasy"],
        pattern: r"^\d{1,2}(\.(\d{1,3}|-|n\d{1,3})){0,3}$",
        default_type: Some(TargetType::EnzymeClass),
    },
    NamespaceSpec {
        prefix: "efo",
        synonyms: &[],
        pattern: r"^\d{7}$",
        default_type: None,
    },
    NamespaceSpec {
        prefix: "fplx",
        synonyms: &["famplex"],
        pattern: r"^[a-zA-Z0-9][A-Za-z0-9_]+$",
        default_type: Some(TargetType::ProteinFamily),
    },
    NamespaceSpec {
        prefix: "go",
        synonyms: &["gobp", "gomf", "gocc"],
        pattern: r"^\d{7}$",
        default_type: None,
    },
    NamespaceSpec {
        prefix: "hgnc",
        synonyms: &["hgnc.id"],
        pattern: r"^\d{1,5}$",
        default_type: Some(TargetType::Protein),
    },
    NamespaceSpec {
        prefix: "hp",
        synonyms: &["hpo"],
        pattern: r"^\d{7}$",
        default_type: Some(TargetType::Phenotype),
    },
    NamespaceSpec {
        prefix: "interpro",
        synonyms: &["ipr"],
        pattern: r"^IPR\d{6}$",
        default_type: Some(TargetType::ProteinFamily),
    },
    NamespaceSpec {
        prefix: "kegg.pathway",
        synonyms: &["kegg_pathway"],
        pattern: r"^\w{2,4}\d{5}$",
        default_type: Some(TargetType::Pathway),
    },
    NamespaceSpec {
        prefix: "mesh",
        synonyms: &["msh"],
        pattern: r"^[CDM]\d{6,9}$",
        default_type: None,
    },
    NamespaceSpec {
        prefix: "mondo",
        synonyms: &[],
        pattern: r"^\d{7}$",
        default_type: Some(TargetType::Phenotype),
    },
    NamespaceSpec {
        prefix: "mp",
        synonyms: &[],
        pattern: r"^\d{7}$",
        default_type: Some(TargetType::Phenotype),
    },
    NamespaceSpec {
        prefix: "ncbitaxon",
        synonyms: &["taxonomy", "ncbi_taxid"],
        pattern: r"^\d+$",
        default_type: Some(TargetType::Organism),
    },
    NamespaceSpec {
        prefix: "pfam",
        synonyms: &[],
        pattern: r"^PF\d{5}$",
        default_type: Some(TargetType::ProteinFamily),
    },
    NamespaceSpec {
        prefix: "pr",
        synonyms: &["pro"],
        pattern: r"^(?:\d{9}|[OPQ][0-9][A-Z0-9]{3}[0-9](?:-\d+)?|[A-NR-Z][0-9](?:[A-Z][A-Z0-9]{2}[0-9]){1,2}(?:-\d+)?)$",
        default_type: Some(TargetType::Protein),
    },
    NamespaceSpec {
        prefix: "prosite",
        synonyms: &[],
        pattern: r"^PS\d{5}$",
        default_type: Some(TargetType::Protein),
    },
    NamespaceSpec {
        prefix: "pubchem.compound",
        synonyms: &["pubchem", "cid"],
        pattern: r"^\d+$",
        default_type: Some(TargetType::Chemical),
    },
    NamespaceSpec {
        prefix: "reactome",
        synonyms: &[],
        pattern: r"^R-[A-Z]{3}-\d+(-\d+)?(\.\d+)?$",
        default_type: Some(TargetType::Pathway),
    },
    NamespaceSpec {
        prefix: "uniprot",
        synonyms: &["uniprotkb", "swissprot", "sp", "up"],
        pattern: r"^(?:[OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9](?:[A-Z][A-Z0-9]{2}[0-9]){1,2})(?:-\d+)?$",
        default_type: Some(TargetType::Protein),
    },
    NamespaceSpec {
        prefix: "wikipathways",
        synonyms: &["wp"],
        pattern: r"^WP\d{1,5}(_r\d+)?$",
        default_type: Some(TargetType::Pathway),
    },
];

/// The canonical form of `prefix` under any registered spelling.
///
/// Needs no compiled registry, so identifier normalization can use it on
/// every key.
pub fn canonical_prefix(prefix: &str) -> Option<&'static str> {
    let prefix = prefix.trim();
    BUILTIN
        .iter()
        .find(|spec| {
            spec.prefix.eq_ignore_ascii_case(prefix)
                || spec.synonyms.iter().any(|s| s.eq_ignore_ascii_case(prefix))
        })
        .map(|spec| spec.prefix)
}

struct Entry {
    pattern: Regex,
    default_type: Option<TargetType>,
}

/// Prefix lookup, identifier validation and default target types
pub struct Registry {
    entries: BTreeMap<&'static str, Entry>,
}

impl Registry {
    /// Compile the built-in namespace table
    pub fn builtin() -> Result<Self> {
        let mut entries = BTreeMap::new();

        for spec in BUILTIN {
            let pattern = Regex::new(spec.pattern).map_err(|e| {
                ChiroError::config(format!("bad pattern for prefix {}: {}", spec.prefix, e))
            })?;
            entries.insert(
                spec.prefix,
                Entry {
                    pattern,
                    default_type: spec.default_type,
                },
            );
        }

        Ok(Self { entries })
    }

    /// The canonical form of `prefix`, if it is known under any spelling.
    pub fn normalize_prefix(&self, prefix: &str) -> Option<&'static str> {
        canonical_prefix(prefix)
    }

    /// Canonical prefix when known, otherwise the lower-cased input.
    pub fn canonical_or_lower(&self, prefix: &str) -> String {
        self.normalize_prefix(prefix)
            .map(str::to_string)
            .unwrap_or_else(|| prefix.trim().to_lowercase())
    }

    pub fn pattern(&self, prefix: &str) -> Option<&str> {
        self.entries.get(prefix).map(|entry| entry.pattern.as_str())
    }

    pub fn target_type_for(&self, prefix: &str) -> Option<TargetType> {
        self.normalize_prefix(prefix)
            .and_then(|canonical| self.entries.get(canonical))
            .and_then(|entry| entry.default_type)
    }

    /// Check that `prefix` is written in canonical form and that the
    /// normalized local identifier matches the namespace pattern.
    pub fn validate(&self, prefix: &str, identifier: &str) -> Result<()> {
        let canonical = self.normalize_prefix(prefix).ok_or_else(|| {
            ChiroError::invalid_identifier(prefix, identifier, "unknown prefix")
        })?;
        if canonical != prefix {
            return Err(ChiroError::invalid_identifier(
                prefix,
                identifier,
                format!("non-canonical prefix, should be '{}'", canonical),
            ));
        }
        let Some(entry) = self.entries.get(canonical) else {
            return Err(ChiroError::invalid_identifier(prefix, identifier, "unknown prefix"));
        };
        let local_id = curie::normalize(identifier, canonical);
        if !entry.pattern.is_match(&local_id) {
            return Err(ChiroError::invalid_identifier(
                prefix,
                identifier,
                format!("does not match pattern {}", entry.pattern.as_str()),
            ));
        }
        Ok(())
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}
