//! Configuration management

use chiro_common::{ChiroError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default directory holding curation and ontology resources.
pub const DEFAULT_RESOURCES_DIR: &str = "resources";

/// Default directory exports are written to.
pub const DEFAULT_EXPORT_DIR: &str = "export";

/// Default grounding service base URL.
pub const DEFAULT_GROUNDING_URL: &str = "http://grounding.indra.bio";

/// Default grounding request timeout in seconds.
pub const DEFAULT_GROUNDING_TIMEOUT_SECS: u64 = 30;

/// Default number of grounding requests in flight.
pub const DEFAULT_GROUNDING_CONCURRENCY: usize = 1;

/// Sub-role widening is off unless requested.
pub const DEFAULT_USE_SUB_ROLES: bool = false;

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub resources_dir: PathBuf,
    pub export_dir: PathBuf,
    pub grounding: GroundingConfig,
    pub use_sub_roles: bool,
}

/// Grounding service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundingConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub concurrency: usize,
}

impl Config {
    /// Load configuration from `.env`, environment and defaults
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            resources_dir: std::env::var("CHIRO_RESOURCES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_RESOURCES_DIR)),
            export_dir: std::env::var("CHIRO_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EXPORT_DIR)),
            grounding: GroundingConfig {
                url: std::env::var("CHIRO_GROUNDING_URL")
                    .unwrap_or_else(|_| DEFAULT_GROUNDING_URL.to_string()),
                timeout_secs: std::env::var("CHIRO_GROUNDING_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_GROUNDING_TIMEOUT_SECS),
                concurrency: std::env::var("CHIRO_GROUNDING_CONCURRENCY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_GROUNDING_CONCURRENCY),
            },
            use_sub_roles: std::env::var("CHIRO_USE_SUB_ROLES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_USE_SUB_ROLES),
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.grounding.url.trim().is_empty() {
            return Err(ChiroError::config("Grounding URL cannot be empty"));
        }

        if self.grounding.timeout_secs == 0 {
            return Err(ChiroError::config("Grounding timeout must be greater than 0"));
        }

        if self.grounding.concurrency == 0 {
            return Err(ChiroError::config("Grounding concurrency must be greater than 0"));
        }

        if !self.resources_dir.is_dir() {
            tracing::warn!(
                path = %self.resources_dir.display(),
                "Resources directory does not exist"
            );
        }

        Ok(())
    }

    pub fn resources(&self) -> ResourcePaths {
        ResourcePaths::new(&self.resources_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resources_dir: PathBuf::from(DEFAULT_RESOURCES_DIR),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            grounding: GroundingConfig {
                url: DEFAULT_GROUNDING_URL.to_string(),
                timeout_secs: DEFAULT_GROUNDING_TIMEOUT_SECS,
                concurrency: DEFAULT_GROUNDING_CONCURRENCY,
            },
            use_sub_roles: DEFAULT_USE_SUB_ROLES,
        }
    }
}

// ============================================================================
// Resource Layout
// ============================================================================

/// Every input file, derived from the resources directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub xrefs: PathBuf,
    pub blacklist: PathBuf,
    pub irrelevant_roles: PathBuf,
    pub reclassification: PathBuf,
    pub ontology_terms: PathBuf,
    pub ontology_is_a: PathBuf,
    pub ontology_relationships: PathBuf,
    pub famplex_relations: PathBuf,
    pub famplex_symbols: PathBuf,
    pub hgnc_uniprot: PathBuf,
    pub uniprot_names: PathBuf,
    pub enzyme_hierarchy: PathBuf,
    pub ec2go: PathBuf,
}

impl ResourcePaths {
    pub fn new(root: &Path) -> Self {
        let ontology = root.join("ontology");
        let famplex = root.join("famplex");
        Self {
            xrefs: root.join("xrefs.tsv"),
            blacklist: root.join("blacklist.tsv"),
            irrelevant_roles: root.join("irrelevant_roles.tsv"),
            reclassification: root.join("reclassification.tsv"),
            ontology_terms: ontology.join("terms.tsv"),
            ontology_is_a: ontology.join("is_a.tsv"),
            ontology_relationships: ontology.join("relationships.tsv"),
            famplex_relations: famplex.join("relations.csv"),
            famplex_symbols: famplex.join("hgnc_symbol_map.csv"),
            hgnc_uniprot: root.join("hgnc_uniprot.tsv"),
            uniprot_names: root.join("uniprot_names.tsv"),
            enzyme_hierarchy: root.join("enzyme_hierarchy.tsv"),
            ec2go: root.join("ec2go.tsv"),
        }
    }
}
