//! Grounding service client and curation-sheet rows
//!
//! Candidates are sent to a Gilda-compatible service (`POST {url}/ground`
//! with `{"text": ...}`). Matches become review rows for a curator; they are
//! never read back by the propagation engine.

use crate::curie::Curie;
use crate::progress;
use crate::selector::RoleCandidate;
use async_trait::async_trait;
use chiro_common::{ChiroError, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Placeholder for fields a curator has to fill in
pub const PLACEHOLDER: &str = "?";

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct GroundRequest<'a> {
    text: &'a str,
}

/// One ranked match returned by the service
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroundingMatch {
    pub term: GroundedTerm,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroundedTerm {
    pub db: String,
    /// May carry its own namespace prefix
    pub id: String,
    pub entry_name: String,
}

impl GroundedTerm {
    pub fn curie(&self) -> Curie {
        Curie::new(&self.db, &self.id)
    }
}

// ============================================================================
// Client
// ============================================================================

/// Anything that turns free text into ranked matches
#[async_trait]
pub trait Grounder: Send + Sync {
    async fn ground(&self, text: &str) -> Result<Vec<GroundingMatch>>;
}

/// HTTP client for the grounding service
pub struct GildaClient {
    client: Client,
    base_url: String,
}

impl GildaClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ChiroError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn ground_url(&self) -> String {
        format!("{}/ground", self.base_url)
    }
}

#[async_trait]
impl Grounder for GildaClient {
    async fn ground(&self, text: &str) -> Result<Vec<GroundingMatch>> {
        let response = self
            .client
            .post(self.ground_url())
            .json(&GroundRequest { text })
            .send()
            .await
            .map_err(|e| ChiroError::Grounding(format!("request for '{}' failed: {}", text, e)))?
            .error_for_status()
            .map_err(|e| ChiroError::Grounding(format!("request for '{}' failed: {}", text, e)))?;

        response
            .json()
            .await
            .map_err(|e| ChiroError::Grounding(format!("bad response for '{}': {}", text, e)))
    }
}

// ============================================================================
// Curation sheet
// ============================================================================

/// One row of a curation sheet, in relation column order.
///
/// `modulation` holds the provisional label and `target_type` is left for
/// the curator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionRow {
    pub source_db: String,
    pub source_id: String,
    pub source_name: String,
    pub modulation: String,
    pub target_type: String,
    pub target_db: String,
    pub target_id: String,
    pub target_name: String,
}

impl SuggestionRow {
    pub fn columns(&self) -> [&str; 8] {
        [
            &self.source_db,
            &self.source_id,
            &self.source_name,
            &self.modulation,
            &self.target_type,
            &self.target_db,
            &self.target_id,
            &self.target_name,
        ]
    }

    fn sort_key(&self) -> (&str, &str, &str, &str, &str) {
        (
            &self.source_db,
            &self.source_name,
            &self.source_id,
            &self.target_db,
            &self.target_id,
        )
    }
}

/// Sort rows the way curation sheets are written
pub fn sort_suggestions(rows: &mut [SuggestionRow]) {
    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// Turns candidates into curation-sheet rows
pub struct GroundingAdapter<'a> {
    grounder: &'a dyn Grounder,
    show_missing: bool,
}

impl<'a> GroundingAdapter<'a> {
    pub fn new(grounder: &'a dyn Grounder, show_missing: bool) -> Self {
        Self {
            grounder,
            show_missing,
        }
    }

    /// Ground one candidate. Self-matches are dropped; an ungrounded
    /// candidate yields a single placeholder row when `show_missing` is set.
    pub async fn ground(&self, candidate: &RoleCandidate) -> Result<Vec<SuggestionRow>> {
        let matches = self.grounder.ground(&candidate.search_text).await?;
        Ok(self.rows_for(candidate, &matches))
    }

    fn rows_for(&self, candidate: &RoleCandidate, matches: &[GroundingMatch]) -> Vec<SuggestionRow> {
        let modulation = if candidate.suffix.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            candidate.suffix.clone()
        };
        let row = |target_db: &str, target_id: &str, target_name: &str| SuggestionRow {
            source_db: candidate.curie.namespace().to_string(),
            source_id: candidate.curie.local_id().to_string(),
            source_name: candidate.name.clone(),
            modulation: modulation.clone(),
            target_type: PLACEHOLDER.to_string(),
            target_db: target_db.to_string(),
            target_id: target_id.to_string(),
            target_name: target_name.to_string(),
        };

        if matches.is_empty() {
            debug!(curie = %candidate.curie, text = %candidate.search_text, "No grounding");
            return if self.show_missing {
                vec![row(PLACEHOLDER, PLACEHOLDER, PLACEHOLDER)]
            } else {
                Vec::new()
            };
        }

        matches
            .iter()
            .filter_map(|m| {
                let target = m.term.curie();
                if target == candidate.curie {
                    return None;
                }
                Some(row(target.namespace(), target.local_id(), &m.term.entry_name))
            })
            .collect()
    }

    /// Ground every candidate with up to `concurrency` requests in flight.
    ///
    /// A failed request is logged and its candidate skipped. Rows come back
    /// sorted regardless of completion order.
    pub async fn ground_all(
        &self,
        candidates: &[RoleCandidate],
        concurrency: usize,
    ) -> Vec<SuggestionRow> {
        let pb = progress::create_progress_bar(candidates.len() as u64, "Grounding candidates");
        let results: Vec<_> = stream::iter(candidates)
            .map(|candidate| {
                let pb = pb.clone();
                async move {
                    let result = self.ground(candidate).await;
                    pb.inc(1);
                    (candidate, result)
                }
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;
        pb.finish_and_clear();

        let mut rows = Vec::new();
        for (candidate, result) in results {
            match result {
                Ok(mut candidate_rows) => rows.append(&mut candidate_rows),
                Err(e) => warn!(curie = %candidate.curie, error = %e, "Grounding failed, skipping"),
            }
        }
        sort_suggestions(&mut rows);
        rows
    }
}
