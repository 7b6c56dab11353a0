// Relation data model

use crate::curie::Curie;
use chiro_common::{ChiroError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Modulation
// ============================================================================

/// Effect direction of a modulation, used by the expression-graph export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Activating,
    Inhibiting,
    Neutral,
}

/// How a chemical acts on its target.
///
/// Variants are declared in the lexicographic order of their labels so that
/// the derived `Ord` matches string ordering of exported files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModulationKind {
    Activator,
    Agonist,
    Antagonist,
    Inhibitor,
    InverseAgonist,
    Modulator,
}

impl ModulationKind {
    pub const ALL: [ModulationKind; 6] = [
        ModulationKind::Activator,
        ModulationKind::Agonist,
        ModulationKind::Antagonist,
        ModulationKind::Inhibitor,
        ModulationKind::InverseAgonist,
        ModulationKind::Modulator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModulationKind::Activator => "activator",
            ModulationKind::Agonist => "agonist",
            ModulationKind::Antagonist => "antagonist",
            ModulationKind::Inhibitor => "inhibitor",
            ModulationKind::InverseAgonist => "inverse_agonist",
            ModulationKind::Modulator => "modulator",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            ModulationKind::Activator | ModulationKind::Agonist => Direction::Activating,
            ModulationKind::Antagonist
            | ModulationKind::Inhibitor
            | ModulationKind::InverseAgonist => Direction::Inhibiting,
            ModulationKind::Modulator => Direction::Neutral,
        }
    }

    /// Map a role-name suffix ("inhibitors", "deactivator", ...) to a modulation.
    ///
    /// Generic suffixes such as "drug" or "agent" carry no modulation.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let suffix = suffix.trim().to_lowercase();
        let singular = suffix.strip_suffix('s').unwrap_or(&suffix);
        match singular {
            "inhibitor" | "deactivator" | "suppressor" => Some(ModulationKind::Inhibitor),
            "activator" => Some(ModulationKind::Activator),
            "antagonist" => Some(ModulationKind::Antagonist),
            "inverse agonist" => Some(ModulationKind::InverseAgonist),
            "agonist" => Some(ModulationKind::Agonist),
            "modulator" => Some(ModulationKind::Modulator),
            _ => None,
        }
    }
}

impl FromStr for ModulationKind {
    type Err = ChiroError;

    fn from_str(s: &str) -> Result<Self> {
        let key = canonical_label(s);
        ModulationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| ChiroError::unknown_vocabulary("modulation", s))
    }
}

impl fmt::Display for ModulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Target Type
// ============================================================================

/// What kind of entity a relation's target denotes.
///
/// Declared in lexicographic label order, like [`ModulationKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    BiologicalProcess,
    Chemical,
    EnzymeClass,
    MolecularFunction,
    Organism,
    Pathway,
    Phenotype,
    Protein,
    ProteinComplex,
    ProteinFamily,
}

impl TargetType {
    pub const ALL: [TargetType; 10] = [
        TargetType::BiologicalProcess,
        TargetType::Chemical,
        TargetType::EnzymeClass,
        TargetType::MolecularFunction,
        TargetType::Organism,
        TargetType::Pathway,
        TargetType::Phenotype,
        TargetType::Protein,
        TargetType::ProteinComplex,
        TargetType::ProteinFamily,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::BiologicalProcess => "biological_process",
            TargetType::Chemical => "chemical",
            TargetType::EnzymeClass => "enzyme_class",
            TargetType::MolecularFunction => "molecular_function",
            TargetType::Organism => "organism",
            TargetType::Pathway => "pathway",
            TargetType::Phenotype => "phenotype",
            TargetType::Protein => "protein",
            TargetType::ProteinComplex => "protein_complex",
            TargetType::ProteinFamily => "protein_family",
        }
    }
}

impl FromStr for TargetType {
    type Err = ChiroError;

    fn from_str(s: &str) -> Result<Self> {
        let key = canonical_label(s);
        // Older curation sheets label GO activities as "activity".
        if key == "activity" {
            return Ok(TargetType::MolecularFunction);
        }
        TargetType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| ChiroError::unknown_vocabulary("target type", s))
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// "Inverse Agonist", "inverse-agonist" and "inverse_agonist" all become "inverse_agonist".
fn canonical_label(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

// ============================================================================
// Relation
// ============================================================================

/// A (chemical, modulation, target) triple with display names.
///
/// Field order is the full column order of the relation table, so the
/// derived `Ord` sorts rows the way they are written out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Relation {
    pub source: Curie,
    pub source_name: String,
    pub modulation: ModulationKind,
    pub target_type: TargetType,
    pub target: Curie,
    pub target_name: String,
}

impl Relation {
    pub fn new(
        source: Curie,
        source_name: impl Into<String>,
        modulation: ModulationKind,
        target_type: TargetType,
        target: Curie,
        target_name: impl Into<String>,
    ) -> Self {
        Self {
            source,
            source_name: source_name.into(),
            modulation,
            target_type,
            target,
            target_name: target_name.into(),
        }
    }

    /// Two relations with the same key are duplicates.
    pub fn identity(&self) -> (&Curie, ModulationKind, &Curie) {
        (&self.source, self.modulation, &self.target)
    }

    /// The 8 columns of the relation table, in order.
    pub fn columns(&self) -> [&str; 8] {
        [
            self.source.namespace(),
            self.source.local_id(),
            &self.source_name,
            self.modulation.as_str(),
            self.target_type.as_str(),
            self.target.namespace(),
            self.target.local_id(),
            &self.target_name,
        ]
    }
}

/// Sort by the full column tuple and collapse duplicates, keeping the first
/// relation of each (source, modulation, target) group.
pub fn deduplicate(mut relations: Vec<Relation>) -> Vec<Relation> {
    relations.sort();
    let mut seen = HashSet::new();
    relations.retain(|relation| {
        let (source, modulation, target) = relation.identity();
        seen.insert((source.clone(), modulation, target.clone()))
    });
    relations
}
