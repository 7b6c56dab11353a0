//! Relation counts as TSV tables and a markdown overview

use crate::model::Relation;
use crate::tsv;
use chiro_common::Result;
use chrono::{DateTime, Utc};
use comfy_table::{presets::ASCII_MARKDOWN, Table};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CURATED_PREFIX: &str = "curated_summary";
pub const INFERRED_PREFIX: &str = "inferred_summary";
pub const INDEX_FILE: &str = "index.md";

/// Relation counts grouped four ways
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    /// (source_db, modulation, target_type, target_db)
    pub by_group: BTreeMap<(String, String, String, String), usize>,
    pub by_modulation: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub by_namespace: BTreeMap<String, usize>,
}

impl Summary {
    pub fn from_relations(relations: &[Relation]) -> Self {
        let mut summary = Summary {
            total: relations.len(),
            ..Summary::default()
        };
        for relation in relations {
            let modulation = relation.modulation.as_str().to_string();
            let target_type = relation.target_type.as_str().to_string();
            let target_db = relation.target.namespace().to_string();
            *summary
                .by_group
                .entry((
                    relation.source.namespace().to_string(),
                    modulation.clone(),
                    target_type.clone(),
                    target_db.clone(),
                ))
                .or_default() += 1;
            *summary.by_modulation.entry(modulation).or_default() += 1;
            *summary.by_type.entry(target_type).or_default() += 1;
            *summary.by_namespace.entry(target_db).or_default() += 1;
        }
        summary
    }

    /// Write `{prefix}.tsv` and the three `{prefix}_by_*.tsv` tables
    pub fn write_tables(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        let grouped = dir.join(format!("{}.tsv", prefix));
        let mut writer = tsv::writer(&grouped)?;
        writer.write_record([
            "Source Database",
            "Modulation",
            "Target Type",
            "Target Database",
            "Count",
        ])?;
        for ((source_db, modulation, target_type, target_db), count) in &self.by_group {
            let count = count.to_string();
            writer.write_record([
                source_db.as_str(),
                modulation.as_str(),
                target_type.as_str(),
                target_db.as_str(),
                count.as_str(),
            ])?;
        }
        writer.flush()?;

        let mut paths = vec![grouped];
        for (suffix, header, counts) in [
            ("by_modulation", "Modulation", &self.by_modulation),
            ("by_type", "Target Type", &self.by_type),
            ("by_namespace", "Target Database", &self.by_namespace),
        ] {
            let path = dir.join(format!("{}_{}.tsv", prefix, suffix));
            write_counts(&path, header, counts)?;
            paths.push(path);
        }
        Ok(paths)
    }

    /// Markdown overview with one table per grouping
    pub fn render_markdown(&self, exported_at: DateTime<Utc>) -> String {
        let mut text = String::from("# Export Summary\n\n");
        text.push_str(&format!(
            "Exported {} relations on {}\n",
            self.total,
            exported_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        for (title, header, counts) in [
            ("Summary by Modulation", "modulation", &self.by_modulation),
            ("Summary by Type", "type", &self.by_type),
            ("Summary by Namespace", "namespace", &self.by_namespace),
        ] {
            text.push_str(&format!("\n## {}\n\n", title));
            text.push_str(&counts_table(header, counts).to_string());
            text.push('\n');
        }

        let mut table =
            markdown_table(vec!["source_db", "relation", "target_type", "target_db", "count"]);
        for ((source_db, modulation, target_type, target_db), count) in &self.by_group {
            table.add_row(vec![
                source_db.clone(),
                modulation.clone(),
                target_type.clone(),
                target_db.clone(),
                count.to_string(),
            ]);
        }
        text.push_str("\n## Summary\n\n");
        text.push_str(&table.to_string());
        text.push('\n');
        text
    }
}

fn markdown_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN).set_header(header);
    table
}

fn counts_table(header: &str, counts: &BTreeMap<String, usize>) -> Table {
    let mut table = markdown_table(vec![header, "count"]);
    for (key, count) in counts {
        table.add_row(vec![key.clone(), count.to_string()]);
    }
    table
}

fn write_counts(path: &Path, header: &str, counts: &BTreeMap<String, usize>) -> Result<()> {
    let mut writer = tsv::writer(path)?;
    writer.write_record([header, "Count"])?;
    for (key, count) in counts {
        writer.write_record([key.as_str(), count.to_string().as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Summaries of the curated and the inferred set, plus `index.md` for the
/// inferred set
pub fn write_summaries(
    dir: &Path,
    curated: &[Relation],
    inferred: &[Relation],
    exported_at: DateTime<Utc>,
) -> Result<Vec<PathBuf>> {
    let mut paths = Summary::from_relations(curated).write_tables(dir, CURATED_PREFIX)?;

    let summary = Summary::from_relations(inferred);
    paths.extend(summary.write_tables(dir, INFERRED_PREFIX)?);

    let index = dir.join(INDEX_FILE);
    std::fs::write(&index, summary.render_markdown(exported_at))?;
    paths.push(index);

    info!(files = paths.len(), dir = %dir.display(), "Wrote summaries");
    Ok(paths)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::curie::Curie;
    use crate::model::{ModulationKind, TargetType};
    use chrono::TimeZone;

    fn relations() -> Vec<Relation> {
        let row = |source: &str, modulation, target_type, target: &str| {
            Relation::new(
                Curie::parse(source).unwrap(),
                "s",
                modulation,
                target_type,
                Curie::parse(target).unwrap(),
                "t",
            )
        };
        vec![
            row("chebi:1", ModulationKind::Inhibitor, TargetType::Protein, "hgnc:5"),
            row("chebi:1", ModulationKind::Inhibitor, TargetType::Protein, "uniprot:P1"),
            row("chebi:2", ModulationKind::Agonist, TargetType::Protein, "uniprot:P1"),
            row("mesh:D000001", ModulationKind::Modulator, TargetType::Pathway, "reactome:R-HSA-1"),
        ]
    }

    #[test]
    fn test_counts() {
        let summary = Summary::from_relations(&relations());
        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_modulation["inhibitor"], 2);
        assert_eq!(summary.by_type["protein"], 3);
        assert_eq!(summary.by_namespace["uniprot"], 2);
        assert_eq!(
            summary.by_group[&(
                "chebi".to_string(),
                "inhibitor".to_string(),
                "protein".to_string(),
                "hgnc".to_string()
            )],
            1
        );
    }

    #[test]
    fn test_markdown_has_every_section() {
        let summary = Summary::from_relations(&relations());
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let text = summary.render_markdown(at);
        assert!(text.starts_with("# Export Summary"));
        assert!(text.contains("Exported 4 relations on 2024-01-02 03:04:05 UTC"));
        assert!(text.contains("## Summary by Modulation"));
        assert!(text.contains("## Summary by Namespace"));
        assert!(text.contains("| inhibitor"));
    }

    #[test]
    fn test_write_summaries() {
        let dir = tempfile::tempdir().unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let paths = write_summaries(dir.path(), &relations()[..1], &relations(), at).unwrap();
        assert_eq!(paths.len(), 9);
        let by_modulation =
            std::fs::read_to_string(dir.path().join("inferred_summary_by_modulation.tsv")).unwrap();
        assert_eq!(
            by_modulation.lines().collect::<Vec<_>>(),
            vec!["Modulation\tCount", "agonist\t1", "inhibitor\t2", "modulator\t1"]
        );
        assert!(dir.path().join(INDEX_FILE).exists());
        assert!(dir.path().join("curated_summary.tsv").exists());
    }
}
