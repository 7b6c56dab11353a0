//! Chemical Roles Core Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Curation, inference and export of chemical modulation relations.
//!
//! # Overview
//!
//! - **Identifiers**: [`curie`] normalization and the prefix [`registry`]
//! - **Curation**: candidate [`selector`], [`grounding`] service client and
//!   the [`curate`] presets that tie them together
//! - **Store**: the hand-curated [`store`] file and its [`lint`] checks
//! - **Inference**: the two-stage [`propagation`] engine over an
//!   [`context::InferenceContext`]
//! - **Export**: relation tables, summaries, OBO and BEL in [`export`]
//!
//! # Example
//!
//! ```no_run
//! use chiro_core::config::Config;
//! use chiro_core::context::InferenceContext;
//! use chiro_core::propagation::{InferenceOptions, PropagationEngine};
//! use chiro_core::store::CuratedStore;
//!
//! fn infer() -> chiro_core::Result<()> {
//!     let config = Config::load()?;
//!     let paths = config.resources();
//!     let ctx = InferenceContext::load(&paths)?;
//!     let curated = CuratedStore::new(&paths.xrefs).load(&ctx.registry)?;
//!     let inferred = PropagationEngine::new(&ctx, InferenceOptions::default()).run(&curated);
//!     println!("{} relations", inferred.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod crosswalk;
pub mod curate;
pub mod curie;
pub mod enzymes;
pub mod export;
pub mod grounding;
pub mod lint;
pub mod model;
pub mod ontology;
pub mod progress;
pub mod propagation;
pub mod registry;
pub mod selector;
pub mod store;
pub mod tsv;

pub use chiro_common::{ChiroError, Result};
pub use curie::Curie;
pub use model::{ModulationKind, Relation, TargetType};
