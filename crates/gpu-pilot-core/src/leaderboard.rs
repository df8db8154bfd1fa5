//! Quality-score enrichment from a bundled benchmark leaderboard.
//!
//! Matching is best-effort and optional: selection works without scores,
//! and enrichment only ever annotates candidates, never removes them.

use std::sync::OnceLock;

use regex::Regex;

use crate::candidate::ModelCandidate;
use crate::rank::TradeoffMode;

/// Aggregate leaderboard score for a known base model.
#[derive(Debug, Clone, Copy)]
pub struct LeaderboardEntry {
    pub model: &'static str,
    pub score: f64,
    pub params_b: f64,
}

/// Snapshot of aggregate scores for models commonly published for this
/// runtime, spanning large to tiny.
pub const LEADERBOARD: &[LeaderboardEntry] = &[
    LeaderboardEntry { model: "Llama-3.1-70B-Instruct", score: 85.0, params_b: 70.0 },
    LeaderboardEntry { model: "Qwen2.5-72B-Instruct", score: 84.0, params_b: 72.0 },
    LeaderboardEntry { model: "Qwen2.5-32B-Instruct", score: 83.0, params_b: 32.0 },
    LeaderboardEntry { model: "Qwen2.5-14B-Instruct", score: 81.0, params_b: 14.0 },
    LeaderboardEntry { model: "gemma-2-27b-it", score: 80.0, params_b: 27.0 },
    LeaderboardEntry { model: "Yi-1.5-34B-Chat", score: 79.0, params_b: 34.0 },
    LeaderboardEntry { model: "Llama-3.1-8B-Instruct", score: 78.0, params_b: 8.0 },
    LeaderboardEntry { model: "Qwen2.5-7B-Instruct", score: 75.0, params_b: 7.0 },
    LeaderboardEntry { model: "gemma-2-9b-it", score: 74.0, params_b: 9.0 },
    LeaderboardEntry { model: "Llama-3-8B-Instruct", score: 72.0, params_b: 8.0 },
    LeaderboardEntry { model: "Yi-1.5-9B-Chat", score: 71.0, params_b: 9.0 },
    LeaderboardEntry { model: "Qwen2.5-3B-Instruct", score: 68.0, params_b: 3.0 },
    LeaderboardEntry { model: "Phi-3-mini-4k-instruct", score: 65.0, params_b: 3.8 },
    LeaderboardEntry { model: "Qwen2.5-1.5B-Instruct", score: 62.0, params_b: 1.5 },
    LeaderboardEntry { model: "TinyLlama-1.1B-Chat-v1.0", score: 45.0, params_b: 1.1 },
];

/// Minimum aggregate score considered acceptable per trade-off mode.
pub fn quality_threshold(mode: TradeoffMode) -> f64 {
    match mode {
        TradeoffMode::Speed => 50.0,
        TradeoffMode::Balanced => 60.0,
        TradeoffMode::Quality => 70.0,
    }
}

/// Strip the runtime packaging suffixes from a catalog model id to recover
/// the base model name, e.g. "Llama-3.1-8B-Instruct-q4f16_1-MLC" →
/// "Llama-3.1-8B-Instruct".
pub fn base_model_name(id: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"-q\d+f\d+_\d+-MLC$").expect("quant suffix regex"));

    let name = id.rsplit('/').next().unwrap_or(id);
    let name = re.replace(name, "");
    for suffix in ["-MLC", "-GGUF", "-AWQ", "-GPTQ"] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    name.into_owned()
}

fn fold(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | '.'))
        .collect()
}

/// Find a leaderboard score for a catalog id: exact base-name match first,
/// then a punctuation-insensitive containment match.
pub fn quality_score_for(id: &str) -> Option<f64> {
    let base = base_model_name(id);
    if let Some(entry) = LEADERBOARD.iter().find(|e| e.model == base) {
        return Some(entry.score);
    }
    let folded = fold(&base);
    LEADERBOARD
        .iter()
        .find(|e| {
            let fe = fold(e.model);
            fe.contains(&folded) || folded.contains(&fe)
        })
        .map(|e| e.score)
}

/// Annotate candidates with leaderboard scores where known.
pub fn enrich(candidates: &mut [ModelCandidate]) {
    for c in candidates.iter_mut() {
        if c.quality_score.is_none() {
            c.quality_score = quality_score_for(&c.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_runtime_suffixes() {
        assert_eq!(
            base_model_name("Llama-3.1-8B-Instruct-q4f16_1-MLC"),
            "Llama-3.1-8B-Instruct"
        );
        assert_eq!(base_model_name("gemma-2-9b-it-MLC"), "gemma-2-9b-it");
        assert_eq!(base_model_name("Llama-3-8B-Instruct-GGUF"), "Llama-3-8B-Instruct");
        assert_eq!(
            base_model_name("mlc-ai/Phi-3-mini-4k-instruct-q4f16_1-MLC"),
            "Phi-3-mini-4k-instruct"
        );
        assert_eq!(base_model_name("plain-model"), "plain-model");
    }

    #[test]
    fn score_by_exact_base_name() {
        assert_eq!(
            quality_score_for("Qwen2.5-7B-Instruct-q4f16_1-MLC"),
            Some(75.0)
        );
    }

    #[test]
    fn score_by_fuzzy_match() {
        // Case and punctuation differences still match.
        assert_eq!(quality_score_for("phi-3-Mini-4K-Instruct-q4f16_1-MLC"), Some(65.0));
        assert_eq!(quality_score_for("unknown-model-7B-q4f16_1-MLC"), None);
    }

    #[test]
    fn enrich_annotates_without_removing() {
        let mut candidates = vec![
            ModelCandidate::new("Qwen2.5-7B-Instruct-q4f16_1-MLC", 7.0, None),
            ModelCandidate::new("totally-unknown-5B-q4f16_1-MLC", 5.0, None),
        ];
        enrich(&mut candidates);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].quality_score, Some(75.0));
        assert_eq!(candidates[1].quality_score, None);
    }

    #[test]
    fn thresholds_rise_with_quality_demand() {
        assert!(quality_threshold(TradeoffMode::Speed) < quality_threshold(TradeoffMode::Balanced));
        assert!(
            quality_threshold(TradeoffMode::Balanced) < quality_threshold(TradeoffMode::Quality)
        );
    }
}
