//! `chiro export` command implementations

use super::load_curated;
use crate::error::Result;
use chiro_core::config::Config;
use chiro_core::export;
use chiro_core::propagation::{InferenceOptions, PropagationEngine};
use chiro_core::Relation;
use std::path::{Path, PathBuf};

/// Curated and propagated relations
fn propagate(config: &Config, use_sub_roles: bool) -> Result<(Vec<Relation>, Vec<Relation>)> {
    let (ctx, curated) = load_curated(&config.resources())?;
    let options = InferenceOptions {
        use_sub_roles: use_sub_roles || config.use_sub_roles,
        ..InferenceOptions::default()
    };
    let inferred = PropagationEngine::new(&ctx, options).run(&curated);
    Ok((curated, inferred))
}

fn resolve_output_dir(config: &Config, output_dir: Option<&PathBuf>) -> PathBuf {
    output_dir.cloned().unwrap_or_else(|| config.export_dir.clone())
}

/// Write the full and slim relation tables
pub fn tsv(config: &Config, output_dir: Option<&PathBuf>, use_sub_roles: bool) -> Result<()> {
    let dir = resolve_output_dir(config, output_dir);
    let (_, inferred) = propagate(config, use_sub_roles)?;

    let full = export::write_full(&dir.join(export::RELATIONS_FILE), &inferred)?;
    let slim = export::write_slim(&dir.join(export::RELATIONS_SLIM_FILE), &inferred)?;
    println!("Wrote {} relations ({} slim) to {}", full, slim, dir.display());
    Ok(())
}

/// Write count tables for the curated and inferred sets
pub fn summary(config: &Config, output_dir: Option<&PathBuf>, use_sub_roles: bool) -> Result<()> {
    let dir = resolve_output_dir(config, output_dir);
    let (curated, inferred) = propagate(config, use_sub_roles)?;

    let files = export::write_summaries(&dir, &curated, &inferred, chrono::Utc::now())?;
    println!("Wrote {} summary files to {}", files.len(), dir.display());
    Ok(())
}

pub fn bel(config: &Config, path: &Path) -> Result<()> {
    let (_, inferred) = propagate(config, false)?;
    let graph = export::write_bel(path, &inferred)?;
    println!(
        "Wrote BEL graph with {} nodes and {} edges to {}",
        graph.nodes.len(),
        graph.links.len(),
        path.display()
    );
    Ok(())
}

pub fn obo(config: &Config, path: &Path) -> Result<()> {
    let (_, inferred) = propagate(config, false)?;
    export::write_obo(path, &inferred)?;
    println!("Wrote OBO export to {}", path.display());
    Ok(())
}
