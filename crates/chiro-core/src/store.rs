//! Curated relation store
//!
//! The hand-curated `xrefs.tsv` table. Loading refuses malformed rows: every
//! bad row is logged with its line and the load fails once all rows have been
//! read, so a curator sees the full list in one pass.

use crate::curie::Curie;
use crate::model::{ModulationKind, Relation, TargetType};
use crate::registry::Registry;
use crate::tsv;
use chiro_common::{ChiroError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Column header of every relation table
pub const XREFS_COLUMNS: [&str; 8] = [
    "source_db",
    "source_id",
    "source_name",
    "modulation",
    "target_type",
    "target_db",
    "target_id",
    "target_name",
];

/// A data row as written, for checks that must see the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub line: u64,
    pub fields: Vec<String>,
}

pub struct CuratedStore {
    path: PathBuf,
}

impl CuratedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every data row with its line number
    pub fn read_raw(&self) -> Result<Vec<RawRecord>> {
        let mut reader = tsv::reader(&self.path)?;
        let mut records = Vec::new();
        for record in reader.records() {
            let record = record?;
            records.push(RawRecord {
                line: tsv::line_of(&record),
                fields: record.iter().map(str::to_string).collect(),
            });
        }
        Ok(records)
    }

    /// Parse, canonicalize prefixes and return the store in persistence order.
    pub fn load(&self, registry: &Registry) -> Result<Vec<Relation>> {
        let mut relations = Vec::new();
        let mut failures = Vec::new();

        for raw in self.read_raw()? {
            match parse_record(&raw, registry) {
                Ok(relation) => relations.push(relation),
                Err(e) => {
                    error!(path = %self.path.display(), error = %e, "Malformed curated row");
                    failures.push(e);
                },
            }
        }

        if let Some(first) = failures.first() {
            let line = match first {
                ChiroError::MalformedRecord { line, .. } => *line,
                _ => 0,
            };
            return Err(ChiroError::malformed(
                line,
                format!(
                    "{} malformed row(s) in {}",
                    failures.len(),
                    self.path.display()
                ),
            ));
        }

        let relations = persistence_order(relations);
        info!(relations = relations.len(), path = %self.path.display(), "Loaded curated relations");
        Ok(relations)
    }

    /// Write relations in persistence order with the column header
    pub fn save(&self, relations: &[Relation]) -> Result<()> {
        let relations = persistence_order(relations.to_vec());
        let mut writer = tsv::writer(&self.path)?;
        writer.write_record(XREFS_COLUMNS)?;
        for relation in &relations {
            writer.write_record(relation.columns())?;
        }
        writer.flush()?;
        info!(relations = relations.len(), path = %self.path.display(), "Saved curated relations");
        Ok(())
    }

    /// Rewrite the file sorted and deduplicated
    pub fn sort_in_place(&self, registry: &Registry) -> Result<usize> {
        let relations = self.load(registry)?;
        self.save(&relations)?;
        Ok(relations.len())
    }
}

fn parse_record(raw: &RawRecord, registry: &Registry) -> Result<Relation> {
    let malformed = |reason: String| ChiroError::malformed(raw.line, reason);

    if raw.fields.len() != XREFS_COLUMNS.len() {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            XREFS_COLUMNS.len(),
            raw.fields.len()
        )));
    }
    let field = |index: usize| raw.fields[index].trim();

    for (index, column) in XREFS_COLUMNS.iter().enumerate() {
        if field(index).is_empty() {
            return Err(malformed(format!("empty {}", column)));
        }
    }

    let modulation: ModulationKind = field(3).parse().map_err(|e| malformed(format!("{}", e)))?;
    let target_type: TargetType = field(4).parse().map_err(|e| malformed(format!("{}", e)))?;

    Ok(Relation::new(
        Curie::new(registry.canonical_or_lower(field(0)), field(1)),
        field(2),
        modulation,
        target_type,
        Curie::new(registry.canonical_or_lower(field(5)), field(6)),
        field(7),
    ))
}

/// Sort by (source_db, source_name, modulation) then the full tuple, and
/// drop exact duplicates.
fn persistence_order(mut relations: Vec<Relation>) -> Vec<Relation> {
    relations.sort_by(|a, b| {
        (a.source.namespace(), &a.source_name, a.modulation)
            .cmp(&(b.source.namespace(), &b.source_name, b.modulation))
            .then_with(|| a.cmp(b))
    });
    let mut seen = HashSet::new();
    relations.retain(|relation| seen.insert(relation.clone()));
    relations
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    fn registry() -> Registry {
        Registry::builtin().unwrap()
    }

    fn store_with(content: &str) -> (tempfile::TempDir, CuratedStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xrefs.tsv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", XREFS_COLUMNS.join("\t")).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, CuratedStore::new(path))
    }

    #[test]
    fn test_load_canonicalizes_and_orders() {
        let (_dir, store) = store_with(
            "chebi\t2\tzeta inhibitor\tinhibitor\tprotein\thgnc\t5\tG5\n\
             chebi\tCHEBI:1\talpha inhibitor\tinhibitor\tprotein family\tFamPlex\tAKT\tAKT\n\
             chebi\t1\talpha inhibitor\tactivator\tprotein\thgnc\t6\tG6\n\
             chebi\t2\tzeta inhibitor\tinhibitor\tprotein\thgnc\t5\tG5\n",
        );
        let relations = store.load(&registry()).unwrap();
        assert_eq!(relations.len(), 3);
        assert_eq!(relations[0].modulation, ModulationKind::Activator);
        assert_eq!(relations[1].target, Curie::new("fplx", "AKT"));
        assert_eq!(relations[1].source, Curie::new("chebi", "1"));
        assert_eq!(relations[1].target_type, TargetType::ProteinFamily);
        assert_eq!(relations[2].source_name, "zeta inhibitor");
    }

    #[test]
    fn test_load_rejects_short_rows() {
        let (_dir, store) = store_with(
            "chebi\t1\tok inhibitor\tinhibitor\tprotein\thgnc\t5\tG5\n\
             chebi\t2\tbad inhibitor\tinhibitor\tprotein\thgnc\t5\n",
        );
        let err = store.load(&registry()).unwrap_err();
        assert!(matches!(err, ChiroError::MalformedRecord { .. }));
        assert!(err.to_string().contains("1 malformed row(s)"));
    }

    #[test]
    fn test_load_rejects_unknown_vocabulary() {
        let (_dir, store) =
            store_with("chebi\t1\tx enhancer\tenhancer\tprotein\thgnc\t5\tG5\n");
        let err = store.load(&registry()).unwrap_err();
        assert!(matches!(err, ChiroError::MalformedRecord { .. }));
    }

    #[test]
    fn test_save_then_load_preserves_rows() {
        let (_dir, store) = store_with(
            "mesh\tD000001\tZinc agents\tmodulator\tprotein\thgnc\t7\tG7\n\
             chebi\t1\talpha inhibitor\tinhibitor\tprotein\thgnc\t5\tG5\n",
        );
        let loaded = store.load(&registry()).unwrap();
        store.save(&loaded).unwrap();
        let reloaded = store.load(&registry()).unwrap();
        assert_eq!(loaded, reloaded);
        assert_eq!(reloaded[0].source.namespace(), "chebi");

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("source_db\tsource_id"));
    }

    #[test]
    fn test_read_raw_keeps_field_counts() {
        let (_dir, store) = store_with("a\tb\n");
        let raw = store.read_raw().unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].fields, vec!["a", "b"]);
        assert!(raw[0].line >= 2);
    }
}
