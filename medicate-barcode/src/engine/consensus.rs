//! Consensus Aggregator
//!
//! Groups scored candidates by normalized name (case-insensitive), ranks the
//! groups and derives a confidence level from how clearly the winner leads.
//!
//! # Ranking
//! `final_score = total_score / count + count * 3`
//!
//! The mean rewards quality, the count term rewards the same name showing up
//! across independent results. Sorting is stable, so on exact ties the group
//! encountered first stays ahead.

use std::collections::HashMap;

use tracing::debug;

use super::tables::{MAX_ALTERNATIVES, REPETITION_BONUS};
use super::{CandidateSummary, Resolution, ScoredCandidate};

/// Discrete confidence levels
///
/// Not a probability: a coarse measure of how far the winning group is
/// ahead of its runner-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    /// Lead of 20 points or more (0.97)
    Decisive,
    /// Only one group survived (0.96)
    Uncontested,
    /// Lead in 10..20 (0.90)
    Strong,
    /// Lead in 5..10 (0.80)
    Moderate,
    /// Lead below 5 (0.60)
    Contested,
}

impl ConfidenceLevel {
    /// Level for the gap between the best and second-best group.
    /// `None` means there was no second group.
    pub fn from_gap(gap: Option<f64>) -> Self {
        match gap {
            None => ConfidenceLevel::Uncontested,
            Some(diff) if diff >= 20.0 => ConfidenceLevel::Decisive,
            Some(diff) if diff >= 10.0 => ConfidenceLevel::Strong,
            Some(diff) if diff >= 5.0 => ConfidenceLevel::Moderate,
            Some(_) => ConfidenceLevel::Contested,
        }
    }

    /// Numeric confidence reported to clients
    pub fn value(&self) -> f64 {
        match self {
            ConfidenceLevel::Decisive => 0.97,
            ConfidenceLevel::Uncontested => 0.96,
            ConfidenceLevel::Strong => 0.90,
            ConfidenceLevel::Moderate => 0.80,
            ConfidenceLevel::Contested => 0.60,
        }
    }
}

/// A group of candidates sharing one normalized name, with its ranking score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedGroup {
    /// Display name (casing of the first member seen)
    pub name: String,
    /// Sum of member scores
    pub total_score: f64,
    /// Number of members
    pub count: usize,
    /// Highest individual member score
    pub best_score: f64,
    /// Link of the highest-scoring member (first one on ties); `None` if empty
    pub sample_url: Option<String>,
    /// `total_score / count + count * 3`
    pub final_score: f64,
}

impl RankedGroup {
    fn summary(&self) -> CandidateSummary {
        CandidateSummary {
            name: self.name.clone(),
            score: self.final_score,
            sample_url: self.sample_url.clone(),
        }
    }
}

struct Group<'a> {
    name: &'a str,
    total_score: f64,
    count: usize,
    best: &'a ScoredCandidate,
}

/// Group candidates and sort the groups by final score (descending, stable)
pub fn rank_groups(candidates: &[ScoredCandidate]) -> Vec<RankedGroup> {
    let mut groups: Vec<Group<'_>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        let key = candidate.cleaned.to_lowercase();
        match index.get(&key).copied() {
            Some(i) => {
                let group = &mut groups[i];
                group.total_score += candidate.score;
                group.count += 1;
                // Strictly greater: the first max-score member keeps precedence
                if candidate.score > group.best.score {
                    group.best = candidate;
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push(Group {
                    name: &candidate.cleaned,
                    total_score: candidate.score,
                    count: 1,
                    best: candidate,
                });
            }
        }
    }

    let mut ranked: Vec<RankedGroup> = groups
        .into_iter()
        .map(|g| {
            let final_score = g.total_score / g.count as f64 + g.count as f64 * REPETITION_BONUS;
            let link = &g.best.candidate.link;
            RankedGroup {
                name: g.name.to_string(),
                total_score: g.total_score,
                count: g.count,
                best_score: g.best.score,
                sample_url: (!link.is_empty()).then(|| link.clone()),
                final_score,
            }
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
    ranked
}

/// Pick the winning name with a confidence level
///
/// Returns `None` when there are no candidates.
pub fn aggregate(candidates: &[ScoredCandidate]) -> Option<Resolution> {
    let ranked = rank_groups(candidates);
    let best = ranked.first()?;

    let gap = ranked.get(1).map(|second| best.final_score - second.final_score);
    let level = ConfidenceLevel::from_gap(gap);

    debug!(
        groups = ranked.len(),
        best = %best.name,
        best_score = best.final_score,
        gap = ?gap,
        confidence = level.value(),
        "Consensus reached"
    );

    Some(Resolution {
        name: best.name.clone(),
        confidence: level.value(),
        level,
        sample_url: best.sample_url.clone(),
        candidates: ranked
            .iter()
            .take(MAX_ALTERNATIVES)
            .map(RankedGroup::summary)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RawCandidate;

    fn scored(name: &str, link: &str, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            candidate: RawCandidate {
                title: name.to_string(),
                link: link.to_string(),
                snippet: String::new(),
            },
            cleaned: name.to_string(),
            hostname: String::new(),
            score,
        }
    }

    #[test]
    fn test_empty_input_yields_none() {
        assert!(aggregate(&[]).is_none());
        assert!(rank_groups(&[]).is_empty());
    }

    #[test]
    fn test_single_candidate_is_uncontested() {
        let resolution = aggregate(&[scored("Panadol", "https://a.vn/1", -12.0)]).unwrap();
        assert_eq!(resolution.name, "Panadol");
        assert_eq!(resolution.confidence, 0.96);
        assert_eq!(resolution.level, ConfidenceLevel::Uncontested);
        assert_eq!(resolution.sample_url.as_deref(), Some("https://a.vn/1"));
        assert_eq!(resolution.candidates.len(), 1);
    }

    #[test]
    fn test_repetition_bonus_wins() {
        let candidates = vec![
            scored("Panadol Extra", "https://a.vn/1", 50.0),
            scored("Panadol Extra 500mg", "https://c.vn/1", 45.0),
            scored("Panadol Extra", "https://b.vn/1", 40.0),
        ];
        let ranked = rank_groups(&candidates);
        assert_eq!(ranked[0].name, "Panadol Extra");
        assert_eq!(ranked[0].final_score, 51.0);
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[1].final_score, 48.0);

        let resolution = aggregate(&candidates).unwrap();
        assert_eq!(resolution.name, "Panadol Extra");
        assert_eq!(resolution.sample_url.as_deref(), Some("https://a.vn/1"));
        assert_eq!(resolution.level, ConfidenceLevel::Contested);
    }

    #[test]
    fn test_grouping_is_case_insensitive_and_keeps_first_casing() {
        let candidates = vec![
            scored("BERBERIN 100mg", "https://a.vn", 10.0),
            scored("Berberin 100mg", "https://b.vn", 30.0),
        ];
        let ranked = rank_groups(&candidates);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "BERBERIN 100mg");
        assert_eq!(ranked[0].sample_url.as_deref(), Some("https://b.vn"));
        assert_eq!(ranked[0].best_score, 30.0);
    }

    #[test]
    fn test_first_max_member_keeps_precedence() {
        let candidates = vec![
            scored("Gofen", "https://first.vn", 20.0),
            scored("Gofen", "https://second.vn", 20.0),
        ];
        let ranked = rank_groups(&candidates);
        assert_eq!(ranked[0].sample_url.as_deref(), Some("https://first.vn"));
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let candidates = vec![
            scored("Alpha", "", 10.0),
            scored("Beta", "", 10.0),
            scored("Gamma", "", 10.0),
        ];
        let names: Vec<_> = rank_groups(&candidates)
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_empty_link_gives_no_sample_url() {
        let resolution = aggregate(&[scored("Oresol", "", 5.0)]).unwrap();
        assert!(resolution.sample_url.is_none());
        assert!(resolution.candidates[0].sample_url.is_none());
    }

    #[test]
    fn test_alternatives_capped_at_five() {
        let candidates: Vec<_> = (0..8)
            .map(|i| scored(&format!("Product {}", i), "", i as f64))
            .collect();
        let resolution = aggregate(&candidates).unwrap();
        assert_eq!(resolution.candidates.len(), 5);
        assert_eq!(resolution.name, "Product 7");
        assert!(resolution
            .candidates
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_confidence_boundaries() {
        let cases = [
            (20.0, 0.97),
            (19.99, 0.90),
            (10.0, 0.90),
            (9.99, 0.80),
            (5.0, 0.80),
            (4.99, 0.60),
        ];
        for (gap, expected) in cases {
            assert_eq!(
                ConfidenceLevel::from_gap(Some(gap)).value(),
                expected,
                "gap {}",
                gap
            );
        }
        assert_eq!(ConfidenceLevel::from_gap(None).value(), 0.96);
    }

    #[test]
    fn test_confidence_boundaries_through_aggregate() {
        let cases = [
            (40.0, 0.97),
            (39.99, 0.90),
            (30.0, 0.90),
            (29.99, 0.80),
            (25.0, 0.80),
            (24.99, 0.60),
        ];
        for (top, expected) in cases {
            let candidates = vec![scored("Top", "", top), scored("Runner", "", 20.0)];
            let resolution = aggregate(&candidates).unwrap();
            assert_eq!(resolution.name, "Top");
            assert_eq!(resolution.confidence, expected, "top score {}", top);
        }
    }
}
