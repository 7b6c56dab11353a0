//! `chiro curate` command implementations
//!
//! Sheets go to stdout unless `--output` is given, so progress and logs stay
//! on stderr.

use super::{require, sink, store};
use crate::error::Result;
use chiro_core::config::Config;
use chiro_core::context::InferenceContext;
use chiro_core::curate::{run_curation, write_sheet, CurationMode};
use chiro_core::enzymes::{propose_enzyme_modulators, write_proposals};
use chiro_core::grounding::GildaClient;
use chiro_core::ontology::InMemoryOntology;
use chiro_core::registry::Registry;
use chiro_core::selector::Exclusions;
use std::path::PathBuf;
use tracing::info;

/// Ground role candidates for `mode` and write a curation sheet
pub async fn run(
    config: &Config,
    mode: CurationMode,
    show_ungrounded: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let paths = config.resources();
    for path in [
        &paths.ontology_terms,
        &paths.ontology_is_a,
        &paths.ontology_relationships,
    ] {
        require(path)?;
    }

    let ontology = InMemoryOntology::load(
        &paths.ontology_terms,
        &paths.ontology_is_a,
        &paths.ontology_relationships,
    )?;
    let registry = Registry::builtin()?;
    let curated = store(&paths)?.load(&registry)?;
    let exclusions = Exclusions::load(&paths, &curated, &ontology)?;

    let client = GildaClient::new(&config.grounding.url, config.grounding.timeout_secs)?;
    info!(url = %config.grounding.url, mode = %mode, "Grounding role candidates");
    let rows = run_curation(
        mode,
        &ontology,
        exclusions,
        &client,
        show_ungrounded,
        config.grounding.concurrency,
    )
    .await;

    write_sheet(sink(output)?, &rows)?;
    info!(rows = rows.len(), "Wrote curation sheet");
    Ok(())
}

/// Propose enzyme-class and activity relations from role names
pub fn enzymes(config: &Config, output: Option<&PathBuf>) -> Result<()> {
    let paths = config.resources();
    require(&paths.ontology_terms)?;
    let ctx = InferenceContext::load(&paths)?;

    let proposals = propose_enzyme_modulators(&ctx);
    write_proposals(sink(output)?, &proposals)?;
    info!(rows = proposals.len(), "Wrote enzyme proposals");
    Ok(())
}
