use wasm_bindgen::prelude::*;

use gpu_pilot_core::candidate::{ModelCandidate, MB_PER_BILLION_PARAMS};
use gpu_pilot_core::catalog;
use gpu_pilot_core::database::GpuDatabase;
use gpu_pilot_core::leaderboard;
use gpu_pilot_core::rank::{self, TradeoffMode};
use gpu_pilot_core::resolve;
use gpu_pilot_core::select;

fn parse_mode(s: &str) -> Option<TradeoffMode> {
    s.parse().ok()
}

fn database_from_js(db: JsValue) -> Option<GpuDatabase> {
    let entries: std::collections::BTreeMap<String, gpu_pilot_core::CapabilityProfile> =
        serde_wasm_bindgen::from_value(db).ok()?;
    Some(GpuDatabase::from_entries(entries))
}

// ---------------------------------------------------------------------------
// Reference database
// ---------------------------------------------------------------------------

/// The bundled reference database as a JSON string, for hosts that want to
/// parse and cache it themselves.
#[wasm_bindgen]
pub fn bundled_database_json() -> Option<String> {
    GpuDatabase::load_bundled().ok()?.to_json().ok()
}

// ---------------------------------------------------------------------------
// GPU resolution
// ---------------------------------------------------------------------------

/// Look up a GPU by fuzzy name match. `db` is an object of
/// normalized-name → profile. Returns the profile or null.
#[wasm_bindgen]
pub fn lookup_gpu(db: JsValue, gpu_name: &str) -> JsValue {
    let Some(db) = database_from_js(db) else {
        return JsValue::NULL;
    };
    match resolve::resolve(&db, gpu_name) {
        Some(profile) => serde_wasm_bindgen::to_value(profile).unwrap_or(JsValue::NULL),
        None => JsValue::NULL,
    }
}

/// Resolve a GPU, estimating a profile from name cues and the hardware
/// tier when the database has no match. Null only for an empty name.
#[wasm_bindgen]
pub fn resolve_or_estimate(db: JsValue, gpu_name: &str, tier: u8) -> JsValue {
    let Some(db) = database_from_js(db) else {
        return JsValue::NULL;
    };
    match resolve::resolve_or_estimate(&db, gpu_name, tier) {
        Some(profile) => serde_wasm_bindgen::to_value(&profile).unwrap_or(JsValue::NULL),
        None => JsValue::NULL,
    }
}

// ---------------------------------------------------------------------------
// Catalog parsing and ranking
// ---------------------------------------------------------------------------

/// Parse a raw catalog listing (array of HF API model objects) into
/// candidates, dropping incompatible entries.
#[wasm_bindgen]
pub fn parse_catalog(raw: JsValue) -> JsValue {
    let raw: Vec<serde_json::Value> = match serde_wasm_bindgen::from_value(raw) {
        Ok(v) => v,
        Err(_) => return JsValue::NULL,
    };
    let candidates = catalog::parse_candidates(&raw);
    serde_wasm_bindgen::to_value(&candidates).unwrap_or(JsValue::NULL)
}

/// Filter candidates to a memory budget and sort best-first.
/// `now_ms` is injected so the host controls the clock.
#[wasm_bindgen]
pub fn rank_candidates(candidates: JsValue, budget_mb: f64, mode: &str, now_ms: f64) -> JsValue {
    let candidates: Vec<ModelCandidate> = match serde_wasm_bindgen::from_value(candidates) {
        Ok(c) => c,
        Err(_) => return JsValue::NULL,
    };
    let Some(mode) = parse_mode(mode) else {
        return JsValue::NULL;
    };
    let ranked = rank::rank(candidates, budget_mb, mode, now_ms as i64);
    serde_wasm_bindgen::to_value(&ranked).unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Full selection pass: resolve the GPU, rank the candidates against its
/// budget, fall back to the constant list. Returns a Selection object or
/// null when nothing fits (insufficient VRAM/memory).
#[wasm_bindgen]
pub fn select_model(
    db: JsValue,
    gpu_name: &str,
    tier: u8,
    mode: &str,
    candidates: JsValue,
    now_ms: f64,
) -> JsValue {
    let Some(db) = database_from_js(db) else {
        return JsValue::NULL;
    };
    let Some(mode) = parse_mode(mode) else {
        return JsValue::NULL;
    };
    let candidates: Vec<ModelCandidate> =
        serde_wasm_bindgen::from_value(candidates).unwrap_or_default();
    match select::select(&db, gpu_name, tier, mode, candidates, now_ms as i64) {
        Ok(selection) => serde_wasm_bindgen::to_value(&selection).unwrap_or(JsValue::NULL),
        Err(_) => JsValue::NULL,
    }
}

/// The constant fallback models used when the catalog is unreachable.
#[wasm_bindgen]
pub fn fallback_models() -> JsValue {
    let candidates = select::fallback_candidates();
    serde_wasm_bindgen::to_value(&candidates).unwrap_or(JsValue::NULL)
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

/// Estimated memory footprint in MB for a parameter count in billions.
#[wasm_bindgen]
pub fn estimated_memory_mb(params_b: f64) -> f64 {
    params_b * MB_PER_BILLION_PARAMS
}

/// Leaderboard quality score for a catalog model id, or null.
#[wasm_bindgen]
pub fn quality_score(model_id: &str) -> JsValue {
    match leaderboard::quality_score_for(model_id) {
        Some(score) => JsValue::from_f64(score),
        None => JsValue::NULL,
    }
}
