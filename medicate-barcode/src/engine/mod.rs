//! Candidate ranking engine
//!
//! Pure, synchronous pipeline run once per resolve request:
//!
//! ```text
//! raw results ──► normalizer (per item) ──► scorer (per item) ──► consensus
//!                                                                  │
//!                                   best name + confidence + top-5 ◄┘
//! ```
//!
//! No I/O and no shared mutable state: the heuristic tables are constants
//! and the compiled regexes are immutable statics, so concurrent requests
//! can run the engine without coordination.

use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod consensus;
pub mod normalizer;
pub mod scorer;
pub mod tables;

pub use consensus::{aggregate, rank_groups, ConfidenceLevel, RankedGroup};
pub use normalizer::normalize;
pub use scorer::score;

/// One search-result record
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawCandidate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// A candidate with its normalized name and plausibility score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: RawCandidate,
    /// Normalized product name (never empty)
    pub cleaned: String,
    /// Lowercase host of the result link
    pub hostname: String,
    /// Unbounded plausibility score; higher is better
    pub score: f64,
}

/// Ranked alternative reported alongside the winner
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub name: String,
    pub score: f64,
    pub sample_url: Option<String>,
}

/// Winning product name for one candidate list
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub name: String,
    /// One of 0.60, 0.80, 0.90, 0.96, 0.97
    pub confidence: f64,
    #[serde(skip)]
    pub level: ConfidenceLevel,
    pub sample_url: Option<String>,
    /// Up to five groups, best first
    pub candidates: Vec<CandidateSummary>,
}

/// Normalize and score every candidate, dropping those whose title cleans
/// down to nothing.
pub fn score_all(candidates: &[RawCandidate]) -> Vec<ScoredCandidate> {
    candidates
        .iter()
        .filter_map(|c| score(c, &normalize(&c.title)))
        .collect()
}

/// Run the full pipeline
///
/// Returns `None` when the list is empty or no title survives normalization.
pub fn resolve(candidates: &[RawCandidate]) -> Option<Resolution> {
    let scored = score_all(candidates);
    debug!(
        input = candidates.len(),
        usable = scored.len(),
        "Candidates scored"
    );
    aggregate(&scored)
}
