//! Candidate ranking: memory filter plus a recency/size trade-off score.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::candidate::ModelCandidate;

/// Fraction of the memory budget a candidate may occupy. The remainder
/// absorbs KV cache, activations and runtime overhead.
pub const MEMORY_SAFETY_MARGIN: f64 = 0.9;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Policy weighting between inference speed (small models) and output
/// quality (large, recent models).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeoffMode {
    Speed,
    Balanced,
    Quality,
}

impl TradeoffMode {
    /// Weight of the recency term in the score; the size term gets the
    /// complement.
    pub fn recency_weight(self) -> f64 {
        match self {
            Self::Speed => 0.0,
            Self::Balanced => 0.5,
            Self::Quality => 1.0,
        }
    }
}

impl FromStr for TradeoffMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "speed" => Ok(Self::Speed),
            "balanced" => Ok(Self::Balanced),
            "quality" => Ok(Self::Quality),
            other => Err(format!("unknown trade-off mode: {other}")),
        }
    }
}

impl std::fmt::Display for TradeoffMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Speed => "speed",
            Self::Balanced => "balanced",
            Self::Quality => "quality",
        };
        write!(f, "{s}")
    }
}

/// Whether a candidate fits a memory budget, with the safety margin
/// applied. Strict: a candidate exactly at the margin is excluded.
pub fn fits_budget(candidate: &ModelCandidate, budget_mb: f64) -> bool {
    candidate.estimated_memory_mb < budget_mb * MEMORY_SAFETY_MARGIN
}

/// Score a candidate for one trade-off mode. Higher is better.
///
/// `score = w * (1/age_days) + (1-w) * (1/params_b)` where `age_days`
/// saturates at a minimum of one day. A candidate with no last-modified
/// timestamp contributes nothing to the recency term.
pub fn score(candidate: &ModelCandidate, mode: TradeoffMode, now_ms: i64) -> f64 {
    let w = mode.recency_weight();
    let recency = match candidate.last_modified_ms {
        Some(modified) => {
            let age_days = ((now_ms - modified) as f64 / MS_PER_DAY).max(1.0);
            1.0 / age_days
        }
        None => 0.0,
    };
    w * recency + (1.0 - w) * (1.0 / candidate.params_b)
}

/// Filter candidates to the memory budget and sort best-first for the
/// given mode. Consumed once per session; the result is rebuilt from a
/// fresh catalog snapshot on reselection.
pub fn rank(
    candidates: Vec<ModelCandidate>,
    budget_mb: f64,
    mode: TradeoffMode,
    now_ms: i64,
) -> Vec<ModelCandidate> {
    let mut survivors: Vec<ModelCandidate> = candidates
        .into_iter()
        .filter(|c| fits_budget(c, budget_mb))
        .collect();
    survivors.sort_by(|a, b| {
        score(b, mode, now_ms)
            .partial_cmp(&score(a, mode, now_ms))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    survivors
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn candidate(id: &str, params_b: f64, age_days: i64) -> ModelCandidate {
        ModelCandidate::new(id, params_b, Some(NOW - age_days * 86_400_000))
    }

    #[test]
    fn memory_filter_boundary_is_exclusive() {
        // budget 1000 => cutoff 900; a candidate exactly at the cutoff is out
        let mut c = ModelCandidate::new("exact", 2.0, None);
        c.estimated_memory_mb = 900.0;
        assert!(!fits_budget(&c, 1000.0));

        c.estimated_memory_mb = 899.0;
        assert!(fits_budget(&c, 1000.0));
    }

    #[test]
    fn qwen_7b_fits_6000_not_5000() {
        let c = ModelCandidate::new("Qwen2.5-7B-Instruct-q4f16_1-MLC", 7.0, None);
        assert!(fits_budget(&c, 6000.0)); // 4900 < 5400
        assert!(!fits_budget(&c, 5000.0)); // 4900 >= 4500
    }

    #[test]
    fn speed_mode_prefers_smaller_models() {
        let small = candidate("small-3B", 3.0, 10);
        let large = candidate("large-8B", 8.0, 10);
        assert!(score(&small, TradeoffMode::Speed, NOW) > score(&large, TradeoffMode::Speed, NOW));
    }

    #[test]
    fn quality_mode_ignores_size_at_equal_recency() {
        // Equal recency: quality score depends only on the recency term,
        // so the larger model never ranks below the smaller one.
        let small = candidate("small-3B", 3.0, 10);
        let large = candidate("large-8B", 8.0, 10);
        let s = score(&small, TradeoffMode::Quality, NOW);
        let l = score(&large, TradeoffMode::Quality, NOW);
        assert!((s - l).abs() < 1e-12);
    }

    #[test]
    fn quality_mode_prefers_recent_models() {
        let fresh = candidate("fresh-8B", 8.0, 2);
        let stale = candidate("stale-8B", 8.0, 200);
        assert!(
            score(&fresh, TradeoffMode::Quality, NOW) > score(&stale, TradeoffMode::Quality, NOW)
        );
    }

    #[test]
    fn age_saturates_at_one_day() {
        let future = ModelCandidate::new("future", 8.0, Some(NOW + 86_400_000));
        let today = ModelCandidate::new("today", 8.0, Some(NOW));
        assert_eq!(
            score(&future, TradeoffMode::Quality, NOW),
            score(&today, TradeoffMode::Quality, NOW)
        );
    }

    #[test]
    fn rank_filters_then_sorts() {
        let candidates = vec![
            candidate("huge-70B", 70.0, 5),  // 49000 MB, dropped
            candidate("mid-8B", 8.0, 5),     // 5600 MB
            candidate("small-3B", 3.0, 5),   // 2100 MB
        ];
        let ranked = rank(candidates, 8192.0, TradeoffMode::Speed, NOW);
        let ids: Vec<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["small-3B", "mid-8B"]);
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("speed".parse::<TradeoffMode>().unwrap(), TradeoffMode::Speed);
        assert_eq!("Quality".parse::<TradeoffMode>().unwrap(), TradeoffMode::Quality);
        assert!("turbo".parse::<TradeoffMode>().is_err());
        assert_eq!(TradeoffMode::Balanced.to_string(), "balanced");
    }
}
