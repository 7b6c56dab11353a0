//! Curation sheet generation
//!
//! Presets wire the candidate selector to a branch of the role ontology (or
//! to all of MeSH), ground the candidates and produce review rows.

use crate::curie::Curie;
use crate::grounding::{sort_suggestions, Grounder, GroundingAdapter, SuggestionRow};
use crate::model::ModulationKind;
use crate::ontology::OntologySource;
use crate::selector::{CandidateSelector, Exclusions, RoleCandidate};
use crate::store::XREFS_COLUMNS;
use chiro_common::{ChiroError, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use tracing::info;

pub const BIOLOGICAL_ROLE: &str = "24432";
pub const APPLICATION_ROLE: &str = "33232";
pub const INHIBITOR_ROLE: &str = "35222";
pub const PATHWAY_INHIBITOR_ROLE: &str = "76932";
pub const ENZYME_INHIBITOR_ROLE: &str = "23924";
pub const AGONIST_ROLE: &str = "48705";
pub const ANTAGONIST_ROLE: &str = "48706";
pub const INVERSE_AGONIST_ROLE: &str = "90847";
pub const BIOCHEMICAL_ROLE: &str = "52206";

/// Role-name suffixes in priority order, singulars then plurals
pub const DEFAULT_SUFFIXES: [&str; 20] = [
    "inhibitor",
    "deactivator",
    "activator",
    "antagonist",
    "inverse agonist",
    "agonist",
    "modulator",
    "suppressor",
    "drug",
    "agent",
    "inhibitors",
    "deactivators",
    "activators",
    "antagonists",
    "inverse agonists",
    "agonists",
    "modulators",
    "suppressors",
    "drugs",
    "agents",
];

/// MeSH descriptors that end like roles but are not
pub const MESH_BLACKLIST: [&str; 16] = [
    "D004791",    // Enzyme
    "D000074389", // Therapeutic Index, Drug
    "D000075203", // Contraindications, Drug
    "D000076742", // Synthetic Drugs
    "D000078742", // Substandard Drugs
    "D000078903", // Catalog, Drug
    "D004305",    // Dose-Response Relationship, Drug
    "D004366",    // Nonprescription Drugs
    "D007202",    // Indicators and Reagents
    "D007880",    // Legislation, Drug
    "D011355",    // Prodrugs
    "D013287",    // Street Drugs
    "D015198",    // Designer Drugs
    "D016147",    // Genes, Tumor Suppressor
    "D016153",    // Genes, Suppressor
    "D019155",    // Veterinary Drugs
];

// ============================================================================
// Modes
// ============================================================================

/// Which part of the role ontology a curation sheet covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurationMode {
    All,
    Inhibitor,
    PathwayInhibitor,
    Agonist,
    Antagonist,
    InverseAgonist,
    Activator,
    Mesh,
}

impl CurationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurationMode::All => "all",
            CurationMode::Inhibitor => "inhibitor",
            CurationMode::PathwayInhibitor => "pathway-inhibitor",
            CurationMode::Agonist => "agonist",
            CurationMode::Antagonist => "antagonist",
            CurationMode::InverseAgonist => "inverse-agonist",
            CurationMode::Activator => "activator",
            CurationMode::Mesh => "mesh",
        }
    }

    fn anchors(&self) -> &'static [&'static str] {
        match self {
            CurationMode::All => &[BIOLOGICAL_ROLE, APPLICATION_ROLE],
            CurationMode::Inhibitor => &[INHIBITOR_ROLE],
            CurationMode::PathwayInhibitor => &[PATHWAY_INHIBITOR_ROLE],
            CurationMode::Agonist => &[AGONIST_ROLE],
            CurationMode::Antagonist => &[ANTAGONIST_ROLE],
            CurationMode::InverseAgonist => &[INVERSE_AGONIST_ROLE],
            CurationMode::Activator => &[BIOCHEMICAL_ROLE],
            CurationMode::Mesh => &[],
        }
    }

    fn excluded_branches(&self) -> &'static [&'static str] {
        match self {
            CurationMode::Inhibitor => &[PATHWAY_INHIBITOR_ROLE, ENZYME_INHIBITOR_ROLE],
            _ => &[],
        }
    }

    pub fn suffixes(&self) -> &'static [&'static str] {
        match self {
            CurationMode::All | CurationMode::Mesh => &DEFAULT_SUFFIXES,
            CurationMode::Inhibitor | CurationMode::PathwayInhibitor => &["inhibitor"],
            CurationMode::Agonist => &["agonist"],
            CurationMode::Antagonist => &["antagonist"],
            CurationMode::InverseAgonist => &["inverse agonist"],
            CurationMode::Activator => &["activator"],
        }
    }

    /// Namespace the candidates come from
    pub fn namespace(&self) -> &'static str {
        match self {
            CurationMode::Mesh => "mesh",
            _ => "chebi",
        }
    }
}

impl FromStr for CurationMode {
    type Err = ChiroError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "all" => Ok(CurationMode::All),
            "inhibitor" => Ok(CurationMode::Inhibitor),
            "pathway-inhibitor" => Ok(CurationMode::PathwayInhibitor),
            "agonist" => Ok(CurationMode::Agonist),
            "antagonist" => Ok(CurationMode::Antagonist),
            "inverse-agonist" => Ok(CurationMode::InverseAgonist),
            "activator" => Ok(CurationMode::Activator),
            "mesh" => Ok(CurationMode::Mesh),
            _ => Err(ChiroError::unknown_vocabulary("curation mode", s)),
        }
    }
}

impl fmt::Display for CurationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The modulation label a suffix suggests. Generic suffixes keep their
/// singular form so the curator sees what matched.
pub fn provisional_label(suffix: &str) -> String {
    match ModulationKind::from_suffix(suffix) {
        Some(kind) => kind.as_str().to_string(),
        None => {
            let suffix = suffix.trim().to_lowercase();
            suffix.strip_suffix('s').unwrap_or(&suffix).to_string()
        },
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Candidates for a mode, before grounding
pub fn select_for_mode(
    mode: CurationMode,
    ontology: &dyn OntologySource,
    exclusions: Exclusions,
) -> Vec<RoleCandidate> {
    if mode == CurationMode::Mesh {
        let exclusions =
            exclusions.with_blacklist(MESH_BLACKLIST.iter().map(|id| Curie::new("mesh", id)));
        let selector = CandidateSelector::new(ontology, &exclusions);
        let mut candidates =
            selector.candidates_from(ontology.identifiers("mesh"), mode.suffixes());
        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        return candidates;
    }

    let selector = CandidateSelector::new(ontology, &exclusions);
    let anchors: Vec<Curie> = mode
        .anchors()
        .iter()
        .map(|id| Curie::new(mode.namespace(), id))
        .collect();
    let excluded: Vec<BTreeSet<Curie>> = mode
        .excluded_branches()
        .iter()
        .map(|id| selector.branch(&Curie::new(mode.namespace(), id)))
        .collect();

    let mut candidates = selector.select_candidates(&anchors, &excluded, mode.suffixes());
    if mode == CurationMode::PathwayInhibitor {
        // Enzyme inhibitors are proposed from their EC codes instead
        candidates.retain(|candidate| !candidate.name.starts_with("EC "));
    }
    candidates
}

/// Select, ground and label candidates for a mode
pub async fn run_curation(
    mode: CurationMode,
    ontology: &dyn OntologySource,
    exclusions: Exclusions,
    grounder: &dyn Grounder,
    show_missing: bool,
    concurrency: usize,
) -> Vec<SuggestionRow> {
    let candidates = select_for_mode(mode, ontology, exclusions);
    info!(mode = %mode, candidates = candidates.len(), "Selected role candidates");

    let adapter = GroundingAdapter::new(grounder, show_missing);
    let mut rows = adapter.ground_all(&candidates, concurrency).await;
    for row in &mut rows {
        row.modulation = provisional_label(&row.modulation);
    }
    sort_suggestions(&mut rows);
    info!(rows = rows.len(), "Built curation sheet");
    rows
}

/// Write a curation sheet with the relation table header
pub fn write_sheet<W: Write>(writer: W, rows: &[SuggestionRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);
    writer.write_record(XREFS_COLUMNS)?;
    for row in rows {
        writer.write_record(row.columns())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::grounding::{GroundedTerm, GroundingMatch};
    use crate::ontology::InMemoryOntology;
    use async_trait::async_trait;

    struct EchoGrounder;

    #[async_trait]
    impl Grounder for EchoGrounder {
        async fn ground(&self, text: &str) -> Result<Vec<GroundingMatch>> {
            Ok(vec![GroundingMatch {
                term: GroundedTerm {
                    db: "HGNC".to_string(),
                    id: "1".to_string(),
                    entry_name: text.to_uppercase(),
                },
                score: 0.9,
            }])
        }
    }

    fn chebi(id: &str) -> Curie {
        Curie::new("chebi", id)
    }

    fn ontology() -> InMemoryOntology {
        let mut ontology = InMemoryOntology::new();
        ontology
            .add_term(chebi(PATHWAY_INHIBITOR_ROLE), "pathway inhibitor")
            .add_term(chebi("10"), "EC 2.7.11.1 inhibitor")
            .add_term(chebi("11"), "mTOR inhibitor")
            .add_is_a(chebi("10"), chebi(PATHWAY_INHIBITOR_ROLE))
            .add_is_a(chebi("11"), chebi(PATHWAY_INHIBITOR_ROLE))
            .add_term(chebi(BIOLOGICAL_ROLE), "biological role")
            .add_term(chebi("20"), "antifungal agents")
            .add_term(chebi("21"), "dopamine inverse agonist")
            .add_is_a(chebi("20"), chebi(BIOLOGICAL_ROLE))
            .add_is_a(chebi("21"), chebi(BIOLOGICAL_ROLE))
            .add_term(Curie::new("mesh", "D011355"), "Prodrugs")
            .add_term(Curie::new("mesh", "D000001"), "Zinc Agents")
            .add_term(Curie::new("mesh", "D000002"), "Calcium Channel Agonists")
            .add_term(Curie::new("mesh", "D000003"), "Calcium");
        ontology
    }

    #[test]
    fn test_mode_round_trip() {
        for mode in [
            CurationMode::All,
            CurationMode::Inhibitor,
            CurationMode::PathwayInhibitor,
            CurationMode::Agonist,
            CurationMode::Antagonist,
            CurationMode::InverseAgonist,
            CurationMode::Activator,
            CurationMode::Mesh,
        ] {
            assert_eq!(mode.as_str().parse::<CurationMode>().unwrap(), mode);
        }
        assert!("everything".parse::<CurationMode>().is_err());
    }

    #[test]
    fn test_default_suffixes_are_singulars_then_plurals() {
        let (singulars, plurals) = DEFAULT_SUFFIXES.split_at(10);
        for (singular, plural) in singulars.iter().zip(plurals) {
            assert_eq!(format!("{}s", singular), *plural);
        }
        let inverse = DEFAULT_SUFFIXES.iter().position(|s| *s == "inverse agonist");
        let agonist = DEFAULT_SUFFIXES.iter().position(|s| *s == "agonist");
        assert!(inverse < agonist);
    }

    #[test]
    fn test_provisional_label() {
        assert_eq!(provisional_label("inhibitors"), "inhibitor");
        assert_eq!(provisional_label("deactivator"), "inhibitor");
        assert_eq!(provisional_label("inverse agonist"), "inverse_agonist");
        assert_eq!(provisional_label("agents"), "agent");
        assert_eq!(provisional_label("drug"), "drug");
    }

    #[test]
    fn test_pathway_mode_skips_enzyme_names() {
        let ontology = ontology();
        let candidates =
            select_for_mode(CurationMode::PathwayInhibitor, &ontology, Exclusions::new());
        let ids: Vec<_> = candidates.into_iter().map(|c| c.curie).collect();
        assert_eq!(ids, vec![chebi("11")]);
    }

    #[test]
    fn test_mesh_mode_uses_blacklist_and_sorts_by_name() {
        let ontology = ontology();
        let candidates = select_for_mode(CurationMode::Mesh, &ontology, Exclusions::new());
        let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Calcium Channel Agonists", "Zinc Agents"]);
        assert_eq!(candidates[0].suffix, "agonists");
    }

    #[tokio::test]
    async fn test_run_curation_labels_rows() {
        let ontology = ontology();
        let rows = run_curation(
            CurationMode::All,
            &ontology,
            Exclusions::new(),
            &EchoGrounder,
            false,
            2,
        )
        .await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source_name, "antifungal agents");
        assert_eq!(rows[0].modulation, "agent");
        assert_eq!(rows[0].target_name, "ANTIFUNGAL");
        assert_eq!(rows[1].modulation, "inverse_agonist");
        assert_eq!(rows[1].target_name, "DOPAMINE");
    }

    #[test]
    fn test_write_sheet_has_header() {
        let row = SuggestionRow {
            source_db: "chebi".to_string(),
            source_id: "1".to_string(),
            source_name: "x inhibitor".to_string(),
            modulation: "inhibitor".to_string(),
            target_type: "?".to_string(),
            target_db: "?".to_string(),
            target_id: "?".to_string(),
            target_name: "?".to_string(),
        };
        let mut buffer = Vec::new();
        write_sheet(&mut buffer, &[row]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), XREFS_COLUMNS.join("\t"));
        assert_eq!(lines.next().unwrap(), "chebi\t1\tx inhibitor\tinhibitor\t?\t?\t?\t?");
    }
}
