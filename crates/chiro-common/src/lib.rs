//! Chemical Roles Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the chiro workspace.
//!
//! - **Error Handling**: [`ChiroError`] and the crate-wide [`Result`] alias
//! - **Logging**: tracing subscriber setup driven by [`logging::LogConfig`]
//!
//! # Example
//!
//! ```no_run
//! use chiro_common::logging::{init_logging, LogConfig};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     info!("Curation run started");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

pub use error::{ChiroError, Result};
