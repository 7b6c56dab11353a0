//! chiro CLI - Main entry point

use chiro_cli::commands;
use chiro_cli::{Cli, Commands, CurateCommand, ExportCommand};
use chiro_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use chiro_core::curate::CurationMode;
use clap::Parser;
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; verbose raises the level, environment variables win
    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .output(LogOutput::Console)
        .build();
    let log_config = log_config.clone().with_env_overrides().unwrap_or(log_config);

    // The CLI works without logging
    let _guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        },
    };

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> chiro_cli::Result<()> {
    let config = cli.config()?;

    match &cli.command {
        Commands::Curate { command } => match command {
            CurateCommand::Chebi {
                mode,
                show_ungrounded,
                output,
                grounding_url,
            } => {
                let config = with_grounding_url(config, grounding_url);
                commands::curate::run(&config, (*mode).into(), *show_ungrounded, output.as_ref())
                    .await
            },
            CurateCommand::Mesh {
                show_ungrounded,
                output,
                grounding_url,
            } => {
                let config = with_grounding_url(config, grounding_url);
                commands::curate::run(&config, CurationMode::Mesh, *show_ungrounded, output.as_ref())
                    .await
            },
            CurateCommand::Enzymes { output } => commands::curate::enzymes(&config, output.as_ref()),
        },

        Commands::Export { command } => match command {
            ExportCommand::Tsv {
                output_dir,
                use_sub_roles,
            } => commands::export::tsv(&config, output_dir.as_ref(), *use_sub_roles),
            ExportCommand::Summary {
                output_dir,
                use_sub_roles,
            } => commands::export::summary(&config, output_dir.as_ref(), *use_sub_roles),
            ExportCommand::Bel { path } => commands::export::bel(&config, path),
            ExportCommand::Obo { path } => commands::export::obo(&config, path),
        },

        Commands::Lint { command } => commands::lint::run(&config, *command),
    }
}

fn with_grounding_url(
    mut config: chiro_core::config::Config,
    url: &Option<String>,
) -> chiro_core::config::Config {
    if let Some(url) = url {
        config.grounding.url = url.clone();
    }
    config
}
