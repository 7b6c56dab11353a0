//! Role candidate selection
//!
//! Picks ontology terms that look like modulator roles ("... inhibitor",
//! "... agonist") and have not been curated yet. The result is a plain
//! vector; selection only reads the ontology, so running it twice gives the
//! same candidates.

use crate::config::ResourcePaths;
use crate::curie::Curie;
use crate::model::Relation;
use crate::ontology::OntologySource;
use crate::tsv;
use chiro_common::Result;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// A term whose name ends with one of the requested suffixes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoleCandidate {
    pub curie: Curie,
    pub name: String,
    pub suffix: String,
    /// The name without its suffix, sent to the grounding service
    pub search_text: String,
}

/// Return the first suffix `name` ends with, compared ASCII case-insensitively.
pub fn match_suffix<'s>(name: &str, suffixes: &[&'s str]) -> Option<&'s str> {
    suffixes.iter().copied().find(|suffix| strip_suffix(name, suffix).is_some())
}

fn strip_suffix<'n>(name: &'n str, suffix: &str) -> Option<&'n str> {
    let split = name.len().checked_sub(suffix.len())?;
    if !name.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = name.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

// ============================================================================
// Exclusions
// ============================================================================

/// Terms never proposed again
#[derive(Debug, Default, Clone)]
pub struct Exclusions {
    curated: BTreeSet<Curie>,
    irrelevant: BTreeSet<Curie>,
    blacklist: BTreeSet<Curie>,
    reclassified: BTreeSet<Curie>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources of already curated relations
    pub fn with_curated<'a>(mut self, relations: impl IntoIterator<Item = &'a Relation>) -> Self {
        self.curated
            .extend(relations.into_iter().map(|relation| relation.source.clone()));
        self
    }

    /// Irrelevant roles exclude their whole branch
    pub fn with_irrelevant(
        mut self,
        roots: impl IntoIterator<Item = Curie>,
        ontology: &dyn OntologySource,
    ) -> Self {
        for root in roots {
            self.irrelevant.extend(ontology.descendants(&root));
            self.irrelevant.insert(root);
        }
        self
    }

    pub fn with_blacklist(mut self, curies: impl IntoIterator<Item = Curie>) -> Self {
        self.blacklist.extend(curies);
        self
    }

    pub fn with_reclassified(mut self, curies: impl IntoIterator<Item = Curie>) -> Self {
        self.reclassified.extend(curies);
        self
    }

    /// Build from the curated set and the curation control files.
    /// Missing control files count as empty.
    pub fn load(
        paths: &ResourcePaths,
        curated: &[Relation],
        ontology: &dyn OntologySource,
    ) -> Result<Self> {
        let irrelevant = read_database_identifiers(&paths.irrelevant_roles)?;
        let blacklist = read_database_identifiers(&paths.blacklist)?;
        let reclassified = read_reclassified(&paths.reclassification)?;

        let exclusions = Self::new()
            .with_curated(curated)
            .with_irrelevant(irrelevant, ontology)
            .with_blacklist(blacklist)
            .with_reclassified(reclassified);

        info!(
            curated = exclusions.curated.len(),
            irrelevant = exclusions.irrelevant.len(),
            blacklist = exclusions.blacklist.len(),
            reclassified = exclusions.reclassified.len(),
            "Loaded candidate exclusions"
        );
        Ok(exclusions)
    }

    pub fn contains(&self, curie: &Curie) -> bool {
        self.curated.contains(curie)
            || self.irrelevant.contains(curie)
            || self.blacklist.contains(curie)
            || self.reclassified.contains(curie)
    }
}

/// `database, identifier, name` rows
fn read_database_identifiers(path: &Path) -> Result<Vec<Curie>> {
    if !path.exists() {
        debug!(path = %path.display(), "No exclusion file");
        return Ok(Vec::new());
    }
    let mut curies = Vec::new();
    let mut reader = tsv::reader(path)?;
    for record in reader.records() {
        let record = record?;
        let database = tsv::field(&record, 0);
        let identifier = tsv::field(&record, 1);
        if database.is_empty() || identifier.is_empty() {
            warn!(path = %path.display(), line = tsv::line_of(&record), "Skipping incomplete row");
            continue;
        }
        curies.push(Curie::new(database, identifier));
    }
    Ok(curies)
}

/// `chebi_id, ...` rows, only the first column is used
fn read_reclassified(path: &Path) -> Result<Vec<Curie>> {
    if !path.exists() {
        debug!(path = %path.display(), "No reclassification file");
        return Ok(Vec::new());
    }
    let mut curies = Vec::new();
    let mut reader = tsv::reader(path)?;
    for record in reader.records() {
        let record = record?;
        let identifier = tsv::field(&record, 0);
        if !identifier.is_empty() {
            curies.push(Curie::new("chebi", identifier));
        }
    }
    Ok(curies)
}

// ============================================================================
// Selector
// ============================================================================

pub struct CandidateSelector<'a> {
    ontology: &'a dyn OntologySource,
    exclusions: &'a Exclusions,
}

impl<'a> CandidateSelector<'a> {
    pub fn new(ontology: &'a dyn OntologySource, exclusions: &'a Exclusions) -> Self {
        Self {
            ontology,
            exclusions,
        }
    }

    /// `root` and everything below it
    pub fn branch(&self, root: &Curie) -> BTreeSet<Curie> {
        let mut branch = self.ontology.descendants(root);
        branch.insert(root.clone());
        branch
    }

    /// Descendants of the anchors minus every excluded branch, filtered by
    /// exclusions and suffixes.
    pub fn select_candidates(
        &self,
        anchors: &[Curie],
        exclude_branches: &[BTreeSet<Curie>],
        suffixes: &[&str],
    ) -> Vec<RoleCandidate> {
        let mut universe: BTreeSet<Curie> = anchors
            .iter()
            .flat_map(|anchor| self.ontology.descendants(anchor))
            .collect();
        for branch in exclude_branches {
            universe.retain(|curie| !branch.contains(curie));
        }
        debug!(
            anchors = anchors.len(),
            universe = universe.len(),
            "Computed candidate universe"
        );
        self.candidates_from(universe, suffixes)
    }

    /// Filter an explicit universe by exclusions and suffixes
    pub fn candidates_from(
        &self,
        universe: impl IntoIterator<Item = Curie>,
        suffixes: &[&str],
    ) -> Vec<RoleCandidate> {
        let mut candidates = Vec::new();
        for curie in universe {
            if self.exclusions.contains(&curie) {
                continue;
            }
            let Some(name) = self.ontology.name(&curie) else {
                warn!(curie = %curie, "Could not look up name, skipping");
                continue;
            };
            let Some(suffix) = match_suffix(name, suffixes) else {
                continue;
            };
            let search_text = strip_suffix(name, suffix).unwrap_or(name).trim().to_string();
            candidates.push(RoleCandidate {
                name: name.to_string(),
                suffix: suffix.to_string(),
                search_text,
                curie,
            });
        }
        candidates
    }
}
