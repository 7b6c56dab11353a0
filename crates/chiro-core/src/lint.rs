//! Consistency checks over the curated store
//!
//! Each check collects every finding before returning so a curator can fix
//! them all in one pass.

use crate::model::{Relation, TargetType};
use crate::registry::Registry;
use crate::store::{RawRecord, XREFS_COLUMNS};
use chiro_common::{ChiroError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

/// Tabs on a well-formed data line
pub const EXPECTED_TABS: usize = XREFS_COLUMNS.len() - 1;

// ============================================================================
// Tab count
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabFinding {
    /// 1-based
    pub line: usize,
    pub tabs: usize,
    pub content: String,
}

impl fmt::Display for TabFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: expected {} tabs, found {} - {}",
            self.line, EXPECTED_TABS, self.tabs, self.content
        )
    }
}

/// Lines whose tab count differs from [`EXPECTED_TABS`]. Comment lines are
/// skipped; only line terminators are trimmed so trailing empty fields count.
pub fn check_tabs_in(content: &str) -> Vec<TabFinding> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.starts_with('#'))
        .filter_map(|(index, line)| {
            let line = line.trim_end_matches(['\r', '\n']);
            let tabs = line.matches('\t').count();
            (tabs != EXPECTED_TABS).then(|| TabFinding {
                line: index + 1,
                tabs,
                content: line.to_string(),
            })
        })
        .collect()
}

pub fn check_tabs(path: &Path) -> Result<Vec<TabFinding>> {
    let content = std::fs::read_to_string(path)?;
    Ok(check_tabs_in(&content))
}

// ============================================================================
// Single mappings
// ============================================================================

/// Rows that deserve a second, independent mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingCheck {
    ProteinOntology,
    GoComplex,
    MeshSource,
    MolecularFunction,
}

impl MappingCheck {
    pub const ALL: [MappingCheck; 4] = [
        MappingCheck::ProteinOntology,
        MappingCheck::GoComplex,
        MappingCheck::MeshSource,
        MappingCheck::MolecularFunction,
    ];

    pub fn matches(&self, relation: &Relation) -> bool {
        match self {
            MappingCheck::ProteinOntology => {
                relation.target.in_namespace("pr") && relation.target_type == TargetType::Protein
            },
            MappingCheck::GoComplex => {
                relation.target.in_namespace("go")
                    && relation.target_type == TargetType::ProteinComplex
            },
            MappingCheck::MeshSource => relation.source.in_namespace("mesh"),
            MappingCheck::MolecularFunction => {
                relation.target_type == TargetType::MolecularFunction
            },
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MappingCheck::ProteinOntology => "Some entries only mapped to Protein Ontology",
            MappingCheck::GoComplex => "Some complexes only mapped to Gene Ontology",
            MappingCheck::MeshSource => "Some roles only mapped to MeSH",
            MappingCheck::MolecularFunction => "Some roles only mapped to molecular function",
        }
    }
}

/// (target_db, target_id, target_name) to the sources mapped only to it
pub type SingleMappings = BTreeMap<(String, String, String), BTreeSet<String>>;

/// Sources that match `check` and have exactly one row in total
pub fn single_mappings(relations: &[Relation], check: MappingCheck) -> SingleMappings {
    let flagged: BTreeSet<_> = relations
        .iter()
        .filter(|relation| check.matches(relation))
        .map(|relation| &relation.source)
        .collect();

    let mut by_source: HashMap<_, Vec<&Relation>> = HashMap::new();
    for relation in relations.iter().filter(|r| flagged.contains(&r.source)) {
        by_source.entry(&relation.source).or_default().push(relation);
    }

    let mut findings = SingleMappings::new();
    for (source, rows) in by_source {
        if let [only] = rows.as_slice() {
            findings
                .entry((
                    only.target.namespace().to_string(),
                    only.target.local_id().to_string(),
                    only.target_name.clone(),
                ))
                .or_default()
                .insert(source.to_string());
        }
    }
    findings
}

/// One line per finding: `db:id ! name for role(s) a, b`
pub fn format_single_mappings(findings: &SingleMappings) -> Vec<String> {
    let width = findings
        .keys()
        .map(|(_, _, name)| name.chars().count())
        .max()
        .unwrap_or(0);
    findings
        .iter()
        .map(|((db, id, name), sources)| {
            let plural = if sources.len() == 1 { "" } else { "s" };
            let sources: Vec<_> = sources.iter().map(String::as_str).collect();
            format!(
                "{}:{} ! {:width$} for role{} {}",
                db,
                id,
                name,
                plural,
                sources.join(", "),
                width = width
            )
        })
        .collect()
}

// ============================================================================
// Identifiers
// ============================================================================

#[derive(Debug)]
pub struct IdentifierFinding {
    pub line: u64,
    /// "source" or "target"
    pub side: &'static str,
    pub error: ChiroError,
}

impl fmt::Display for IdentifierFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] {} {}", self.line, self.side, self.error)
    }
}

/// Validate source and target identifiers exactly as written. Rows with the
/// wrong shape are left to the tab check.
pub fn check_identifiers(records: &[RawRecord], registry: &Registry) -> Vec<IdentifierFinding> {
    let mut findings = Vec::new();
    for record in records {
        if record.fields.len() != XREFS_COLUMNS.len() {
            continue;
        }
        for (side, prefix, identifier) in [
            ("source", &record.fields[0], &record.fields[1]),
            ("target", &record.fields[5], &record.fields[6]),
        ] {
            if let Err(error) = registry.validate(prefix.trim(), identifier.trim()) {
                findings.push(IdentifierFinding {
                    line: record.line,
                    side,
                    error,
                });
            }
        }
    }
    findings
}

// ============================================================================
// Report
// ============================================================================

/// Findings of every check that ran
#[derive(Debug, Default)]
pub struct LintReport {
    pub tabs: Vec<TabFinding>,
    pub mappings: Vec<(MappingCheck, SingleMappings)>,
    pub identifiers: Vec<IdentifierFinding>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.tabs.is_empty()
            && self.identifiers.is_empty()
            && self.mappings.iter().all(|(_, findings)| findings.is_empty())
    }

    pub fn finding_count(&self) -> usize {
        self.tabs.len()
            + self.identifiers.len()
            + self
                .mappings
                .iter()
                .map(|(_, findings)| findings.len())
                .sum::<usize>()
    }

    /// Human-readable lines, grouped by check
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.tabs.is_empty() {
            lines.push("Document not clean.".to_string());
            lines.extend(self.tabs.iter().map(ToString::to_string));
        }
        for (check, findings) in &self.mappings {
            if !findings.is_empty() {
                lines.push(check.title().to_string());
                lines.extend(format_single_mappings(findings));
            }
        }
        if !self.identifiers.is_empty() {
            lines.push("Invalid identifiers".to_string());
            lines.extend(self.identifiers.iter().map(ToString::to_string));
        }
        lines
    }
}

/// Run every single-mapping check over `relations`
pub fn check_mappings(relations: &[Relation]) -> Vec<(MappingCheck, SingleMappings)> {
    MappingCheck::ALL
        .into_iter()
        .map(|check| (check, single_mappings(relations, check)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::curie::Curie;
    use crate::model::ModulationKind;

    fn relation(source: &str, target: &str, target_type: TargetType, name: &str) -> Relation {
        Relation::new(
            Curie::parse(source).unwrap(),
            "role",
            ModulationKind::Inhibitor,
            target_type,
            Curie::parse(target).unwrap(),
            name,
        )
    }

    #[test]
    fn test_tabs_reports_every_bad_line() {
        let good = "a\tb\tc\td\te\tf\tg\th";
        let short = "a\tb\tc\td\te\tf\tg";
        let content = format!("{good}\n# comment\n{short}\n{good}\r\n{short}\n");
        let findings = check_tabs_in(&content);
        let lines: Vec<_> = findings.iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![3, 5]);
        assert_eq!(findings[0].tabs, 6);
        assert!(findings[0].to_string().starts_with("line 3: expected 7 tabs, found 6"));
    }

    #[test]
    fn test_tabs_counts_trailing_empty_fields() {
        let findings = check_tabs_in("a\tb\tc\td\te\tf\tg\t\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_single_mappings_flags_lonely_sources() {
        let relations = vec![
            relation("chebi:1", "pr:000000001", TargetType::Protein, "P"),
            relation("chebi:2", "pr:000000001", TargetType::Protein, "P"),
            relation("chebi:2", "hgnc:5", TargetType::Protein, "G5"),
            relation("chebi:3", "pr:000000001", TargetType::Protein, "P"),
            relation("chebi:4", "hgnc:5", TargetType::Protein, "G5"),
        ];
        let findings = single_mappings(&relations, MappingCheck::ProteinOntology);
        assert_eq!(findings.len(), 1);
        let sources = &findings[&("pr".to_string(), "000000001".to_string(), "P".to_string())];
        assert_eq!(
            sources,
            &BTreeSet::from(["chebi:1".to_string(), "chebi:3".to_string()])
        );

        let lines = format_single_mappings(&findings);
        assert_eq!(lines, vec!["pr:000000001 ! P for roles chebi:1, chebi:3"]);
    }

    #[test]
    fn test_mapping_predicates() {
        let mesh = relation("mesh:D000001", "hgnc:5", TargetType::Protein, "G5");
        assert!(MappingCheck::MeshSource.matches(&mesh));
        let complex = relation("chebi:1", "go:0005737", TargetType::ProteinComplex, "C");
        assert!(MappingCheck::GoComplex.matches(&complex));
        assert!(!MappingCheck::ProteinOntology.matches(&complex));
        let activity = relation("chebi:1", "go:0004022", TargetType::MolecularFunction, "A");
        assert!(MappingCheck::MolecularFunction.matches(&activity));
    }

    #[test]
    fn test_check_identifiers_collects_all() {
        let registry = Registry::builtin().unwrap();
        let row = |line: u64, fields: [&str; 8]| RawRecord {
            line,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        };
        let records = vec![
            row(2, ["chebi", "1", "a", "inhibitor", "protein", "hgnc", "5", "G"]),
            row(3, ["ec-code", "1.1.1.1", "b", "inhibitor", "protein", "go", "8150", "G"]),
            row(4, ["chebi", "CHEBI:2", "c", "inhibitor", "protein", "uniprot", "P12345", "G"]),
        ];
        let findings = check_identifiers(&records, &registry);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line, 3);
        assert_eq!(findings[0].side, "source");
        assert!(findings[0].to_string().contains("should be 'eccode'"));
        assert_eq!(findings[1].side, "target");
        assert!(findings[1].to_string().contains("does not match pattern"));
    }

    #[test]
    fn test_report_is_clean() {
        let report = LintReport::default();
        assert!(report.is_clean());
        assert!(report.render().is_empty());

        let report = LintReport {
            tabs: check_tabs_in("a\tb\n"),
            ..LintReport::default()
        };
        assert!(!report.is_clean());
        assert_eq!(report.finding_count(), 1);
        assert_eq!(report.render()[0], "Document not clean.");
    }
}
