//! CLI command implementations
//!
//! Each subcommand group has its own module.

pub mod curate;
pub mod export;
pub mod lint;

use crate::error::{CliError, Result};
use chiro_core::config::ResourcePaths;
use chiro_core::context::InferenceContext;
use chiro_core::store::CuratedStore;
use chiro_core::Relation;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Fail with a pointer to the resource directory when `path` is missing
pub(crate) fn require(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::resource_not_found(path))
    }
}

/// The curated store, checked for existence first
pub(crate) fn store(paths: &ResourcePaths) -> Result<CuratedStore> {
    require(&paths.xrefs)?;
    Ok(CuratedStore::new(&paths.xrefs))
}

/// Full inference context and the curated relations it applies to
pub(crate) fn load_curated(paths: &ResourcePaths) -> Result<(InferenceContext, Vec<Relation>)> {
    let store = store(paths)?;
    let ctx = InferenceContext::load(paths)?;
    let curated = store.load(&ctx.registry)?;
    Ok((ctx, curated))
}

/// A file when `output` is set, stdout otherwise
pub(crate) fn sink(output: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        },
        None => Ok(Box::new(io::stdout().lock())),
    }
}
