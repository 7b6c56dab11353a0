//! OBO flat-file export
//!
//! Each chemical becomes a `[Term]` stanza. Only (target_db, target_type,
//! modulation) combinations with a known Relation Ontology predicate produce
//! `relationship:` lines.

use crate::curie::Curie;
use crate::model::{ModulationKind, Relation, TargetType};
use chiro_common::{ChiroError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

pub const ONTOLOGY: &str = "crog";
pub const ONTOLOGY_NAME: &str = "Chemical Roles Graph";

/// A Relation Ontology predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Typedef {
    pub id: &'static str,
    pub name: &'static str,
}

const TYPEDEFS: &[(&str, TargetType, ModulationKind, Typedef)] = &[
    (
        "go",
        TargetType::BiologicalProcess,
        ModulationKind::Activator,
        Typedef {
            id: "RO:0002213",
            name: "positively regulates",
        },
    ),
    (
        "go",
        TargetType::BiologicalProcess,
        ModulationKind::Inhibitor,
        Typedef {
            id: "RO:0002212",
            name: "negatively regulates",
        },
    ),
];

pub fn typedef_for(relation: &Relation) -> Option<Typedef> {
    TYPEDEFS
        .iter()
        .find(|(db, target_type, modulation, _)| {
            relation.target.in_namespace(db)
                && relation.target_type == *target_type
                && relation.modulation == *modulation
        })
        .map(|(_, _, _, typedef)| *typedef)
}

fn reference(curie: &Curie) -> String {
    format!("{}:{}", curie.namespace().to_uppercase(), curie.local_id())
}

#[derive(Default)]
struct Stanza<'a> {
    name: &'a str,
    relationships: BTreeSet<(Typedef, String, &'a str)>,
}

/// Group relationships by source, warning once per unmapped key
fn collect_stanzas(relations: &[Relation]) -> BTreeMap<&Curie, Stanza<'_>> {
    let mut stanzas: BTreeMap<&Curie, Stanza<'_>> = BTreeMap::new();
    let mut unmapped = BTreeSet::new();

    for relation in relations {
        let stanza = stanzas.entry(&relation.source).or_default();
        stanza.name = &relation.source_name;
        match typedef_for(relation) {
            Some(typedef) => {
                stanza.relationships.insert((
                    typedef,
                    reference(&relation.target),
                    &relation.target_name,
                ));
            },
            None => {
                let key = (
                    relation.target.namespace(),
                    relation.target_type,
                    relation.modulation,
                );
                if unmapped.insert(key) {
                    let error = ChiroError::unknown_vocabulary(
                        "obo relationship",
                        format!("{} {} {}", key.0, key.1, key.2),
                    );
                    warn!(%error, "No OBO strategy, skipping");
                }
            },
        }
    }
    stanzas
}

/// Write `relations` as an OBO document to `out`
pub fn write_document<W: Write>(out: &mut W, relations: &[Relation]) -> Result<()> {
    writeln!(out, "format-version: 1.2")?;
    writeln!(out, "ontology: {}", ONTOLOGY)?;
    writeln!(out, "name: {}", ONTOLOGY_NAME)?;

    let stanzas = collect_stanzas(relations);
    let mut used = BTreeSet::new();
    for (source, stanza) in stanzas.iter().filter(|(_, s)| !s.relationships.is_empty()) {
        writeln!(out, "\n[Term]")?;
        writeln!(out, "id: {}", reference(source))?;
        writeln!(out, "name: {}", stanza.name)?;
        for (typedef, target, target_name) in &stanza.relationships {
            used.insert(*typedef);
            writeln!(out, "relationship: {} {} ! {}", typedef.id, target, target_name)?;
        }
    }

    for typedef in used {
        writeln!(out, "\n[Typedef]")?;
        writeln!(out, "id: {}", typedef.id)?;
        writeln!(out, "name: {}", typedef.name)?;
    }
    Ok(())
}

/// Render `relations` as an OBO document
pub fn render_obo(relations: &[Relation]) -> Result<String> {
    let mut buffer = Vec::new();
    write_document(&mut buffer, relations)?;
    String::from_utf8(buffer).map_err(|e| ChiroError::Parse(format!("OBO document: {}", e)))
}

pub fn write_obo(path: &Path, relations: &[Relation]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(path)?);
    write_document(&mut out, relations)?;
    out.flush()?;
    info!(path = %path.display(), "Wrote OBO export");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn relation(source: &str, modulation: ModulationKind, target_type: TargetType, target: &str) -> Relation {
        Relation::new(
            Curie::parse(source).unwrap(),
            "aspirin",
            modulation,
            target_type,
            Curie::parse(target).unwrap(),
            "inflammation",
        )
    }

    #[test]
    fn test_typedef_lookup() {
        let bp = relation("chebi:15365", ModulationKind::Inhibitor, TargetType::BiologicalProcess, "go:0006954");
        assert_eq!(typedef_for(&bp).unwrap().id, "RO:0002212");
        let protein = relation("chebi:15365", ModulationKind::Inhibitor, TargetType::Protein, "hgnc:9604");
        assert!(typedef_for(&protein).is_none());
    }

    #[test]
    fn test_render_skips_sources_without_relationships() {
        let relations = vec![
            relation("chebi:15365", ModulationKind::Inhibitor, TargetType::BiologicalProcess, "go:0006954"),
            relation("chebi:15365", ModulationKind::Inhibitor, TargetType::Protein, "hgnc:9604"),
            relation("chebi:2", ModulationKind::Inhibitor, TargetType::Protein, "hgnc:9605"),
        ];
        let text = render_obo(&relations).unwrap();
        assert!(text.contains("ontology: crog"));
        assert!(text.contains("id: CHEBI:15365"));
        assert!(text.contains("relationship: RO:0002212 GO:0006954 ! inflammation"));
        assert!(!text.contains("CHEBI:2\n"));
        assert_eq!(text.matches("[Term]").count(), 1);
        assert_eq!(text.matches("[Typedef]").count(), 1);
    }

    #[test]
    fn test_write_document_to_any_writer() {
        let relations = vec![relation(
            "chebi:15365",
            ModulationKind::Activator,
            TargetType::BiologicalProcess,
            "go:0006954",
        )];
        let mut out = Vec::new();
        write_document(&mut out, &relations).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("relationship: RO:0002213 GO:0006954 ! inflammation"));
        assert!(text.ends_with("name: positively regulates\n"));
    }

    #[test]
    fn test_write_obo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chiro.obo");
        write_obo(&path, &[]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("format-version: 1.2"));
        assert!(!text.contains("[Term]"));
    }
}
