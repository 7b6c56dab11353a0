//! Full and slim relation tables

use crate::model::Relation;
use crate::tsv;
use chiro_common::Result;
use std::path::Path;
use tracing::info;

pub const RELATIONS_FILE: &str = "relations.tsv";
pub const RELATIONS_SLIM_FILE: &str = "relations_slim.tsv";

/// Column order of the full export, which is also its sort order
pub const FULL_COLUMNS: [&str; 8] = [
    "modulation",
    "target_type",
    "source_db",
    "source_id",
    "source_name",
    "target_db",
    "target_id",
    "target_name",
];

pub const SLIM_COLUMNS: [&str; 5] =
    ["source_db", "source_id", "modulation", "target_db", "target_id"];

fn full_row(relation: &Relation) -> [&str; 8] {
    [
        relation.modulation.as_str(),
        relation.target_type.as_str(),
        relation.source.namespace(),
        relation.source.local_id(),
        &relation.source_name,
        relation.target.namespace(),
        relation.target.local_id(),
        &relation.target_name,
    ]
}

fn slim_row(relation: &Relation) -> [&str; 5] {
    [
        relation.source.namespace(),
        relation.source.local_id(),
        relation.modulation.as_str(),
        relation.target.namespace(),
        relation.target.local_id(),
    ]
}

fn write_rows<const N: usize>(
    path: &Path,
    header: [&str; N],
    mut rows: Vec<[&str; N]>,
) -> Result<usize> {
    rows.sort_unstable();
    rows.dedup();
    let mut writer = tsv::writer(path)?;
    writer.write_record(header)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    info!(rows = rows.len(), path = %path.display(), "Wrote relation table");
    Ok(rows.len())
}

/// Every column, sorted by modulation and target type first
pub fn write_full(path: &Path, relations: &[Relation]) -> Result<usize> {
    write_rows(path, FULL_COLUMNS, relations.iter().map(full_row).collect())
}

/// Identifier columns only
pub fn write_slim(path: &Path, relations: &[Relation]) -> Result<usize> {
    write_rows(path, SLIM_COLUMNS, relations.iter().map(slim_row).collect())
}
