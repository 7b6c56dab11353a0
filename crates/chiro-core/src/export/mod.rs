//! Exporters for the propagated relation set

pub mod bel;
pub mod obo;
pub mod summary;
pub mod tsv;

pub use bel::{write_bel, BelGraph};
pub use obo::{render_obo, write_obo};
pub use summary::{write_summaries, Summary};
pub use tsv::{write_full, write_slim, RELATIONS_FILE, RELATIONS_SLIM_FILE};
