//! Selection policy: resolve the GPU, rank the catalog against its memory
//! budget, emit the best candidate. The one condition surfaced upward is
//! "nothing fits"; every other failure degrades to a fallback inside the
//! core.

use crate::candidate::ModelCandidate;
use crate::database::GpuDatabase;
use crate::error::{PilotError, Result};
use crate::profile::CapabilityProfile;
use crate::rank::{rank, TradeoffMode};
use crate::resolve::resolve_or_estimate;

/// Known-good models used when the catalog is unreachable or yields
/// nothing usable. Footprints follow the same 700 MB/B heuristic.
#[derive(Debug, Clone, Copy)]
pub struct FallbackModel {
    pub id: &'static str,
    pub params_b: f64,
    pub memory_mb: f64,
}

pub const FALLBACK_MODELS: &[FallbackModel] = &[
    FallbackModel {
        id: "Llama-3-8B-Instruct-q4f16_1-MLC",
        params_b: 8.0,
        memory_mb: 5600.0,
    },
    FallbackModel {
        id: "Phi-3-mini-4k-instruct-q4f16_1-MLC",
        params_b: 3.8,
        memory_mb: 2660.0,
    },
    FallbackModel {
        id: "gemma-2-9b-it-q4f16_1-MLC",
        params_b: 9.0,
        memory_mb: 6300.0,
    },
];

impl FallbackModel {
    pub fn to_candidate(&self) -> ModelCandidate {
        let mut c = ModelCandidate::new(self.id, self.params_b, None);
        c.estimated_memory_mb = self.memory_mb;
        c
    }
}

pub fn fallback_candidates() -> Vec<ModelCandidate> {
    FALLBACK_MODELS.iter().map(FallbackModel::to_candidate).collect()
}

/// Outcome of one selection pass.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Selection {
    /// Identifier to hand to the inference engine.
    pub chosen: String,
    /// Full ranked list, best first. `chosen` is the head.
    pub ranked: Vec<ModelCandidate>,
    /// The resolved (or synthesized) GPU profile the budget came from.
    pub profile: CapabilityProfile,
    /// Memory budget in MB used for filtering.
    pub budget_mb: u32,
}

/// Pick the best model for a GPU from an already-fetched candidate list.
///
/// Resolution cannot fail for a non-empty GPU name; an empty name or an
/// empty ranking (after the fallback list is tried) is reported as
/// [`PilotError::InsufficientCapability`].
pub fn select(
    db: &GpuDatabase,
    gpu_name: &str,
    tier: u8,
    mode: TradeoffMode,
    candidates: Vec<ModelCandidate>,
    now_ms: i64,
) -> Result<Selection> {
    let profile = resolve_or_estimate(db, gpu_name, tier).ok_or_else(|| {
        tracing::warn!("no GPU name available, cannot estimate a memory budget");
        PilotError::InsufficientCapability
    })?;
    let budget_mb = profile
        .budget_mb()
        .ok_or(PilotError::InsufficientCapability)?;

    let mut ranked = rank(candidates, budget_mb as f64, mode, now_ms);
    if ranked.is_empty() {
        tracing::warn!(budget_mb, "no catalog candidate fits, trying fallback models");
        ranked = rank(fallback_candidates(), budget_mb as f64, mode, now_ms);
    }

    let Some(best) = ranked.first() else {
        return Err(PilotError::InsufficientCapability);
    };
    tracing::debug!(chosen = %best.id, budget_mb, %mode, "model selected");

    Ok(Selection {
        chosen: best.id.clone(),
        ranked,
        profile,
        budget_mb,
    })
}

/// Fetch the catalog and select in one step, stamping the current time.
/// Network failure degrades to the fallback list rather than erroring.
#[cfg(feature = "network")]
pub async fn auto_select(
    client: &crate::catalog::CatalogClient,
    db: &GpuDatabase,
    gpu_name: &str,
    tier: u8,
    mode: TradeoffMode,
    author: &str,
    limit: u32,
) -> Result<Selection> {
    let candidates = match client.fetch_models(author, limit).await {
        Ok(raw) => crate::catalog::parse_candidates(&raw),
        Err(err) => {
            tracing::warn!(%err, "catalog fetch failed, using fallback models");
            Vec::new()
        }
    };
    let now_ms = chrono::Utc::now().timestamp_millis();
    select(db, gpu_name, tier, mode, candidates, now_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_footprints_follow_heuristic() {
        for fm in FALLBACK_MODELS {
            let expected = fm.params_b * crate::candidate::MB_PER_BILLION_PARAMS;
            assert!(
                (fm.memory_mb - expected).abs() < 1e-6,
                "{}: {} != {}",
                fm.id,
                fm.memory_mb,
                expected
            );
        }
    }

    #[test]
    fn fallback_spans_small_and_medium_sizes() {
        assert_eq!(FALLBACK_MODELS.len(), 3);
        assert!(FALLBACK_MODELS.iter().any(|m| m.params_b < 4.0));
        assert!(FALLBACK_MODELS.iter().any(|m| m.params_b >= 8.0));
    }
}
