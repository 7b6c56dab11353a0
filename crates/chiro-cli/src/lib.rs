//! Chemical Roles CLI Library
//!
//! Command-line interface for curating, checking and exporting chemical
//! modulation relations.
//!
//! # Overview
//!
//! - **Curation**: Propose relations for review (`chiro curate chebi|mesh|enzymes`)
//! - **Export**: Propagate the curated store and write artifacts (`chiro export ...`)
//! - **Linting**: Check and tidy the curated store (`chiro lint ...`)

pub mod commands;
pub mod error;

// Re-export commonly used types
pub use error::{CliError, Result};

use chiro_core::config::Config;
use chiro_core::curate::CurationMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// chiro - Chemical Roles curation and inference
#[derive(Parser, Debug)]
#[command(name = "chiro")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Resource directory holding the curated store and lookup tables
    #[arg(long, env = "CHIRO_RESOURCES_DIR", global = true)]
    pub resources: Option<PathBuf>,
}

impl Cli {
    /// Environment configuration with command-line overrides applied
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::load()?;
        if let Some(resources) = &self.resources {
            config.resources_dir = resources.clone();
        }
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate curation sheets
    Curate {
        #[command(subcommand)]
        command: CurateCommand,
    },

    /// Propagate the curated store and write exports
    Export {
        #[command(subcommand)]
        command: ExportCommand,
    },

    /// Check the curated store
    Lint {
        #[command(subcommand)]
        command: LintCommand,
    },
}

/// Curation subcommands
#[derive(Subcommand, Debug)]
pub enum CurateCommand {
    /// Ground ChEBI roles
    Chebi {
        /// Branch of the role ontology to cover
        #[arg(short, long, value_enum, default_value_t = ModeArg::All)]
        mode: ModeArg,

        /// Emit a placeholder row for roles without a grounding
        #[arg(long)]
        show_ungrounded: bool,

        /// Write the sheet here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Grounding service base URL
        #[arg(long, env = "CHIRO_GROUNDING_URL")]
        grounding_url: Option<String>,
    },

    /// Ground MeSH descriptors
    Mesh {
        /// Emit a placeholder row for descriptors without a grounding
        #[arg(long)]
        show_ungrounded: bool,

        /// Write the sheet here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Grounding service base URL
        #[arg(long, env = "CHIRO_GROUNDING_URL")]
        grounding_url: Option<String>,
    },

    /// Propose enzyme modulators from EC codes in role names
    Enzymes {
        /// Write the sheet here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// ChEBI curation presets
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    All,
    Inhibitor,
    PathwayInhibitor,
    Agonist,
    Antagonist,
    InverseAgonist,
    Activator,
}

impl From<ModeArg> for CurationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::All => CurationMode::All,
            ModeArg::Inhibitor => CurationMode::Inhibitor,
            ModeArg::PathwayInhibitor => CurationMode::PathwayInhibitor,
            ModeArg::Agonist => CurationMode::Agonist,
            ModeArg::Antagonist => CurationMode::Antagonist,
            ModeArg::InverseAgonist => CurationMode::InverseAgonist,
            ModeArg::Activator => CurationMode::Activator,
        }
    }
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommand {
    /// Full and slim relation tables
    Tsv {
        /// Output directory (defaults to CHIRO_EXPORT_DIR or ./export)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also propagate to bearers of sub-roles
        #[arg(long)]
        use_sub_roles: bool,
    },

    /// Count tables and a markdown overview
    Summary {
        /// Output directory (defaults to CHIRO_EXPORT_DIR or ./export)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Also propagate to bearers of sub-roles
        #[arg(long)]
        use_sub_roles: bool,
    },

    /// Node-link JSON graph, gzip-compressed when PATH ends in .gz
    Bel {
        path: PathBuf,
    },

    /// OBO flat file
    Obo {
        path: PathBuf,
    },
}

/// Lint subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCommand {
    /// Every line has the right number of tabs
    Tabs,

    /// Report sources with a single weak mapping
    Mappings,

    /// Every identifier is canonical and well-formed
    Validate,

    /// Rewrite the store sorted and deduplicated
    Sort,

    /// Sort, then run every check
    All,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_curate_mode() {
        let cli = Cli::parse_from(["chiro", "curate", "chebi", "--mode", "inverse-agonist"]);
        match cli.command {
            Commands::Curate {
                command: CurateCommand::Chebi { mode, .. },
            } => assert_eq!(CurationMode::from(mode), CurationMode::InverseAgonist),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_export_flags() {
        let cli = Cli::parse_from([
            "chiro",
            "--resources",
            "/data",
            "export",
            "tsv",
            "--use-sub-roles",
            "-o",
            "out",
        ]);
        assert_eq!(cli.resources, Some(PathBuf::from("/data")));
        match cli.command {
            Commands::Export {
                command:
                    ExportCommand::Tsv {
                        output_dir,
                        use_sub_roles,
                    },
            } => {
                assert!(use_sub_roles);
                assert_eq!(output_dir, Some(PathBuf::from("out")));
            },
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_lint() {
        let cli = Cli::parse_from(["chiro", "lint", "all"]);
        assert!(matches!(
            cli.command,
            Commands::Lint {
                command: LintCommand::All
            }
        ));
    }
}
