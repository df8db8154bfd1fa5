//! GPU resolution: fuzzy lookup against the reference database with a
//! heuristic estimation fallback.
//!
//! The pure lookup path can miss; the estimate path cannot. Once a non-empty
//! name and a hardware tier are available, the caller is guaranteed a
//! capability profile with a numeric memory budget.

use crate::corpus::{detect_platform_from_name, detect_vendor};
use crate::database::GpuDatabase;
use crate::normalize::{normalize, variations};
use crate::profile::{CapabilityProfile, GpuMemory, Performance, PlatformClass};

/// FPS reported for synthesized profiles, matching the corpus default.
const ESTIMATED_FPS: u32 = 30;

/// Look up a GPU in the reference database.
///
/// Exact matches on any name variation are tried first, in variation order.
/// Failing that, a partial pass scans every database key for a substring
/// relation in either direction and keeps the longest overlap; ties fall
/// back to database iteration order.
pub fn resolve<'a>(db: &'a GpuDatabase, raw_name: &str) -> Option<&'a CapabilityProfile> {
    if raw_name.trim().is_empty() {
        return None;
    }

    let vars = variations(raw_name);

    for v in &vars {
        if let Some(profile) = db.get(v) {
            tracing::debug!(gpu = %raw_name, matched = %v, "exact database hit");
            return Some(profile);
        }
    }

    let mut best: Option<(usize, &str, &CapabilityProfile)> = None;
    for (key, profile) in db.iter() {
        for v in &vars {
            if key.contains(v.as_str()) || v.contains(key) {
                let overlap = key.len().min(v.len());
                if best.map_or(true, |(len, _, _)| overlap > len) {
                    best = Some((overlap, key, profile));
                }
            }
        }
    }
    if let Some((_, key, profile)) = best {
        tracing::debug!(gpu = %raw_name, matched = %key, "partial database hit");
        return Some(profile);
    }

    tracing::debug!(gpu = %raw_name, "no database match");
    None
}

/// Memory estimate in MB from platform class and performance tier, used
/// when the database has no entry for a GPU.
pub fn estimate_memory_mb(platform: PlatformClass, tier: u8) -> u32 {
    match platform {
        PlatformClass::Mobile => match tier {
            3.. => 8192,
            2 => 6144,
            1 => 4096,
            0 => 2048,
        },
        PlatformClass::Integrated => match tier {
            2.. => 4096,
            1 => 2048,
            0 => 1024,
        },
        PlatformClass::Desktop => match tier {
            3.. => 12288,
            2 => 8192,
            1 => 6144,
            0 => 4096,
        },
    }
}

/// Resolve a GPU, synthesizing a profile from substring cues and the
/// tier-based memory table when the database has no match.
///
/// Returns `None` only for an empty name, since estimation needs something to
/// infer from. Never fails otherwise.
pub fn resolve_or_estimate(
    db: &GpuDatabase,
    raw_name: &str,
    tier: u8,
) -> Option<CapabilityProfile> {
    if raw_name.trim().is_empty() {
        return None;
    }
    if let Some(profile) = resolve(db, raw_name) {
        return Some(profile.clone());
    }

    let name = normalize(raw_name);
    let vendor = detect_vendor(&name);
    let platform = detect_platform_from_name(&name);
    let tier = tier.min(3);
    let budget = estimate_memory_mb(platform, tier);
    let memory = match platform {
        PlatformClass::Desktop => GpuMemory {
            vram: Some(budget),
            unified: None,
            kind: None,
        },
        _ => GpuMemory {
            vram: None,
            unified: Some(budget),
            kind: None,
        },
    };
    tracing::debug!(gpu = %raw_name, %vendor, %platform, tier, budget, "synthesized profile");

    Some(CapabilityProfile {
        vendor,
        platform,
        memory,
        performance: Performance {
            tier,
            fps: ESTIMATED_FPS,
        },
        architecture: None,
        year: None,
    })
}
