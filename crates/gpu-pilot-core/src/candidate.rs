//! Downloadable model artifacts considered for selection.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Estimated MB of GPU memory per billion parameters for 4-bit quantized
/// weights. A rough, tunable heuristic, not a protocol invariant.
pub const MB_PER_BILLION_PARAMS: f64 = 700.0;

/// Quantization-format tag expected in catalog model ids for this runtime.
pub const QUANT_TAG: &str = "q4f16_1";

/// Library suffix expected on catalog model ids.
pub const LIBRARY_SUFFIX: &str = "-MLC";

/// A model artifact from the catalog, alive for one selection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCandidate {
    pub id: String,
    /// Parameter count in billions, parsed from the id.
    pub params_b: f64,
    /// `params_b * 700`, the 4-bit weight footprint heuristic.
    pub estimated_memory_mb: f64,
    /// Catalog last-modified timestamp in epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_ms: Option<i64>,
    /// Leaderboard quality score, when enrichment found one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
}

impl ModelCandidate {
    pub fn new(id: impl Into<String>, params_b: f64, last_modified_ms: Option<i64>) -> Self {
        Self {
            id: id.into(),
            params_b,
            estimated_memory_mb: params_b * MB_PER_BILLION_PARAMS,
            last_modified_ms,
            quality_score: None,
        }
    }

    /// Whether an id carries the quantization and library tags this runtime
    /// can load.
    pub fn is_runtime_compatible(id: &str) -> bool {
        id.ends_with(LIBRARY_SUFFIX) && id.contains(QUANT_TAG)
    }

    /// Parse the parameter count from a model id: the first decimal number
    /// immediately followed by `B`, e.g. "7" from
    /// "Qwen2.5-7B-Instruct-q4f16_1-MLC". Zero or absent parses are `None`.
    pub fn parse_params_b(id: &str) -> Option<f64> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"([\d.]+)B").expect("param count regex"));
        let caps = re.captures(id)?;
        let params: f64 = caps[1].parse().ok()?;
        if params > 0.0 {
            Some(params)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_params_basic() {
        assert_eq!(
            ModelCandidate::parse_params_b("Qwen2.5-7B-Instruct-q4f16_1-MLC"),
            Some(7.0)
        );
        assert_eq!(
            ModelCandidate::parse_params_b("Llama-3-8B-Instruct-q4f16_1-MLC"),
            Some(8.0)
        );
        assert_eq!(
            ModelCandidate::parse_params_b("Qwen2.5-1.5B-Instruct-q4f16_1-MLC"),
            Some(1.5)
        );
    }

    #[test]
    fn parse_params_rejects_missing_or_zero() {
        assert_eq!(ModelCandidate::parse_params_b("gemma-2-it-q4f16_1-MLC"), None);
        assert_eq!(ModelCandidate::parse_params_b("model-0B-q4f16_1-MLC"), None);
        assert_eq!(ModelCandidate::parse_params_b(""), None);
    }

    #[test]
    fn estimated_memory_follows_heuristic() {
        let c = ModelCandidate::new("Qwen2.5-7B-Instruct-q4f16_1-MLC", 7.0, None);
        assert!((c.estimated_memory_mb - 4900.0).abs() < f64::EPSILON);

        let c = ModelCandidate::new("Phi-3-mini-4k-instruct-q4f16_1-MLC", 3.8, None);
        assert!((c.estimated_memory_mb - 2660.0).abs() < 1e-9);
    }

    #[test]
    fn runtime_tag_filter() {
        assert!(ModelCandidate::is_runtime_compatible(
            "Llama-3-8B-Instruct-q4f16_1-MLC"
        ));
        assert!(!ModelCandidate::is_runtime_compatible(
            "Llama-3-8B-Instruct-q4f16_1"
        ));
        assert!(!ModelCandidate::is_runtime_compatible(
            "Llama-3-8B-Instruct-q4f32_1-MLC"
        ));
        assert!(!ModelCandidate::is_runtime_compatible("Llama-3-8B-GGUF"));
    }
}
