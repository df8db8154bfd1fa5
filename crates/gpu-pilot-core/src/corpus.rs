//! Reference database construction from a benchmark corpus.
//!
//! The corpus is a set of JSON files in the detect-gpu layout: each file is
//! an array whose first element is a version marker and whose remaining
//! elements are `[name, model, searchTerms, tier, benchmarks]` tuples, where
//! `benchmarks` is a list of `[width, height, fps, device?]` samples. Files
//! whose name starts with `m-` hold mobile GPUs.
//!
//! Heuristic inference (vendor, platform, memory, architecture, year) is
//! expressed as ordered first-match-wins rule tables so the rules stay data
//! rather than branching code.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::database::GpuDatabase;
use crate::error::{PilotError, Result};
use crate::normalize::canonical_key;
use crate::profile::{CapabilityProfile, GpuMemory, Performance, PlatformClass, Vendor};

/// One usable entry from a corpus file.
#[derive(Debug, Clone)]
pub struct CorpusEntry {
    pub name: String,
    pub tier: u8,
    /// FPS readings, the third element of each benchmark sample.
    pub fps_samples: Vec<f64>,
}

/// Names shorter than this are treated as placeholders and dropped.
const MIN_NAME_LEN: usize = 3;

/// Sentinel marker for unidentified adapters in the corpus.
const UNKNOWN_MARKER: &str = "???";

// ── Inference rule tables ────────────────────────────────────────────

/// Ordered vendor keyword rules; the first rule with any matching keyword
/// wins.
const VENDOR_RULES: &[(&[&str], Vendor)] = &[
    (&["nvidia", "geforce", "rtx", "gtx", "quadro", "tesla"], Vendor::Nvidia),
    (&["amd", "radeon", "rx", "ati", "firepro"], Vendor::Amd),
    (&["intel", "arc", "iris", "uhd", "hd graphics"], Vendor::Intel),
    (
        &["apple", "m1", "m2", "m3", "m4", "a1", "a15", "a16", "a17"],
        Vendor::Apple,
    ),
    (&["adreno"], Vendor::Qualcomm),
    (&["mali"], Vendor::Arm),
    (&["powervr"], Vendor::Imagination),
    (&["samsung", "xclipse"], Vendor::Samsung),
];

const MOBILE_KEYWORDS: &[&str] = &[
    "mobile", "adreno", "mali", "powervr", "apple a1", "samsung", "xclipse",
];

const INTEGRATED_KEYWORDS: &[&str] = &["iris", "uhd", "hd graphics", "integrated"];

/// Ordered `(keyword, architecture)` rules per vendor.
const NVIDIA_ARCH: &[(&str, &str)] = &[
    ("rtx 40", "Ada Lovelace"),
    ("rtx 30", "Ampere"),
    ("rtx 20", "Turing"),
    ("gtx 16", "Turing"),
    ("gtx 10", "Pascal"),
    ("gtx 9", "Maxwell"),
];

const AMD_ARCH: &[(&str, &str)] = &[
    ("rx 7", "RDNA 3"),
    ("rx 6", "RDNA 2"),
    ("rx 5", "RDNA"),
    ("vega", "Vega"),
];

const INTEL_ARCH: &[(&str, &str)] = &[("arc", "Xe HPG"), ("iris", "Xe LP"), ("uhd", "Gen 9-12")];

const APPLE_ARCH: &[(&str, &str)] = &[
    ("m4", "Apple Silicon M4"),
    ("m3", "Apple Silicon M3"),
    ("m2", "Apple Silicon M2"),
    ("m1", "Apple Silicon M1"),
    ("a17", "Apple A17"),
    ("a16", "Apple A16"),
    ("a15", "Apple A15"),
];

const QUALCOMM_ARCH: &[(&str, &str)] = &[
    ("adreno 7", "Adreno 700"),
    ("adreno 6", "Adreno 600"),
    ("adreno 5", "Adreno 500"),
];

const ARM_ARCH: &[(&str, &str)] = &[
    ("mali g7", "Valhall"),
    ("mali g5", "Bifrost"),
    ("mali g3", "Bifrost"),
];

/// Ordered `(keyword, release year)` rules per vendor.
const YEAR_RULES: &[(Vendor, &[(&str, u16)])] = &[
    (
        Vendor::Nvidia,
        &[
            ("rtx 40", 2022),
            ("rtx 30", 2020),
            ("rtx 20", 2018),
            ("gtx 16", 2019),
            ("gtx 10", 2016),
        ],
    ),
    (Vendor::Amd, &[("rx 7", 2022), ("rx 6", 2020), ("rx 5", 2019)]),
    (
        Vendor::Apple,
        &[
            ("m4", 2024),
            ("m3", 2023),
            ("m2", 2022),
            ("m1", 2020),
            ("a17", 2023),
            ("a16", 2022),
            ("a15", 2021),
        ],
    ),
];

fn first_match<'a>(name: &str, rules: &'a [(&str, &str)]) -> Option<&'a str> {
    rules
        .iter()
        .find(|(kw, _)| name.contains(kw))
        .map(|(_, v)| *v)
}

/// Infer the vendor from keyword cues in a (normalized) GPU name.
pub fn detect_vendor(name: &str) -> Vendor {
    for (keywords, vendor) in VENDOR_RULES {
        if keywords.iter().any(|kw| name.contains(kw)) {
            return *vendor;
        }
    }
    Vendor::Unknown
}

/// Infer the platform class from name keywords alone.
pub fn detect_platform_from_name(name: &str) -> PlatformClass {
    if MOBILE_KEYWORDS.iter().any(|kw| name.contains(kw)) {
        return PlatformClass::Mobile;
    }
    if INTEGRATED_KEYWORDS.iter().any(|kw| name.contains(kw))
        || (name.contains("vega") && name.contains("graphics"))
    {
        return PlatformClass::Integrated;
    }
    PlatformClass::Desktop
}

/// Infer the platform class. The corpus filename convention is primary:
/// an `m-` prefix forces mobile classification.
pub fn detect_platform(name: &str, file_name: &str) -> PlatformClass {
    if file_name.starts_with("m-") {
        return PlatformClass::Mobile;
    }
    detect_platform_from_name(name)
}

fn memory_size_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*(gb|mb)").expect("memory size regex"))
}

/// Estimate memory for a corpus entry. An explicit `<N> GB|MB` in the name
/// wins; otherwise a nested `(vendor, platform, tier)` table applies, with
/// generation-aware sub-rules for NVIDIA and AMD desktop parts.
pub fn estimate_memory(
    vendor: Vendor,
    platform: PlatformClass,
    tier: u8,
    name: &str,
) -> GpuMemory {
    if let Some(caps) = memory_size_re().captures(name) {
        let amount: u32 = caps[1].parse().unwrap_or(0);
        if amount > 0 {
            let mb = if caps[2].eq_ignore_ascii_case("gb") {
                amount * 1024
            } else {
                amount
            };
            return match platform {
                PlatformClass::Mobile => GpuMemory::unified_mb(mb, "LPDDR5"),
                PlatformClass::Integrated => GpuMemory::unified_mb(mb, "DDR4"),
                PlatformClass::Desktop => GpuMemory::vram_mb(mb, "GDDR6"),
            };
        }
    }

    match platform {
        PlatformClass::Mobile => mobile_memory(vendor, tier),
        PlatformClass::Integrated => match tier {
            2.. => GpuMemory::unified_mb(4096, "DDR4/DDR5"),
            1 => GpuMemory::unified_mb(2048, "DDR4/DDR5"),
            0 => GpuMemory::unified_mb(1024, "DDR4"),
        },
        PlatformClass::Desktop => desktop_memory(vendor, tier, name),
    }
}

fn mobile_memory(vendor: Vendor, tier: u8) -> GpuMemory {
    match vendor {
        Vendor::Apple => match tier {
            3.. => GpuMemory::unified_mb(16384, "Unified"),
            2 => GpuMemory::unified_mb(8192, "Unified"),
            1 => GpuMemory::unified_mb(6144, "Unified"),
            0 => GpuMemory::unified_mb(4096, "Unified"),
        },
        Vendor::Qualcomm => match tier {
            3.. => GpuMemory::unified_mb(12288, "LPDDR5"),
            2 => GpuMemory::unified_mb(8192, "LPDDR5"),
            1 => GpuMemory::unified_mb(6144, "LPDDR4X"),
            0 => GpuMemory::unified_mb(4096, "LPDDR4X"),
        },
        _ => match tier {
            3.. => GpuMemory::unified_mb(8192, "LPDDR5"),
            2 => GpuMemory::unified_mb(6144, "LPDDR5"),
            1 => GpuMemory::unified_mb(4096, "LPDDR4X"),
            0 => GpuMemory::unified_mb(2048, "LPDDR4"),
        },
    }
}

fn desktop_memory(vendor: Vendor, tier: u8, name: &str) -> GpuMemory {
    match vendor {
        Vendor::Nvidia => {
            if name.contains("rtx 40") {
                match tier {
                    3.. => {
                        let mb = if name.contains("4090") {
                            24576
                        } else if name.contains("4080") {
                            16384
                        } else {
                            12288
                        };
                        GpuMemory::vram_mb(mb, "GDDR6X")
                    }
                    2 => GpuMemory::vram_mb(8192, "GDDR6"),
                    _ => GpuMemory::vram_mb(6144, "GDDR6"),
                }
            } else if name.contains("rtx 30") {
                match tier {
                    3.. => {
                        let mb = if name.contains("3090") {
                            24576
                        } else if name.contains("3080") {
                            10240
                        } else {
                            8192
                        };
                        GpuMemory::vram_mb(mb, "GDDR6X")
                    }
                    2 => {
                        let mb = if name.contains("3060") { 12288 } else { 8192 };
                        GpuMemory::vram_mb(mb, "GDDR6")
                    }
                    _ => GpuMemory::vram_mb(6144, "GDDR6"),
                }
            } else {
                match tier {
                    3.. => GpuMemory::vram_mb(11264, "GDDR5X"),
                    2 => GpuMemory::vram_mb(8192, "GDDR5"),
                    1 => GpuMemory::vram_mb(6144, "GDDR5"),
                    0 => GpuMemory::vram_mb(4096, "GDDR5"),
                }
            }
        }
        Vendor::Amd => {
            if name.contains("rx 7") {
                match tier {
                    3.. => {
                        let mb = if name.contains("7900 xtx") {
                            24576
                        } else if name.contains("7900 xt") {
                            20480
                        } else {
                            16384
                        };
                        GpuMemory::vram_mb(mb, "GDDR6")
                    }
                    2 => GpuMemory::vram_mb(12288, "GDDR6"),
                    _ => GpuMemory::vram_mb(8192, "GDDR6"),
                }
            } else if name.contains("rx 6") {
                match tier {
                    3.. => GpuMemory::vram_mb(16384, "GDDR6"),
                    2 => {
                        let mb = if name.contains("6600") { 8192 } else { 12288 };
                        GpuMemory::vram_mb(mb, "GDDR6")
                    }
                    _ => GpuMemory::vram_mb(8192, "GDDR6"),
                }
            } else {
                match tier {
                    3.. => GpuMemory::vram_mb(8192, "GDDR5"),
                    2 => GpuMemory::vram_mb(6144, "GDDR5"),
                    1 => GpuMemory::vram_mb(4096, "GDDR5"),
                    0 => GpuMemory::vram_mb(2048, "GDDR5"),
                }
            }
        }
        Vendor::Intel => match tier {
            2.. => {
                let mb = if name.contains("a770") { 16384 } else { 8192 };
                GpuMemory::vram_mb(mb, "GDDR6")
            }
            1 => GpuMemory::vram_mb(6144, "GDDR6"),
            0 => GpuMemory::vram_mb(4096, "GDDR6"),
        },
        _ => match tier {
            3.. => GpuMemory::vram_mb(12288, "GDDR6"),
            2 => GpuMemory::vram_mb(8192, "GDDR6"),
            1 => GpuMemory::vram_mb(6144, "GDDR5"),
            0 => GpuMemory::vram_mb(4096, "GDDR5"),
        },
    }
}

/// Infer a human-readable architecture label.
pub fn detect_architecture(vendor: Vendor, name: &str) -> Option<String> {
    let label = match vendor {
        Vendor::Nvidia => first_match(name, NVIDIA_ARCH).unwrap_or("NVIDIA GPU"),
        Vendor::Amd => first_match(name, AMD_ARCH).unwrap_or("AMD GPU"),
        Vendor::Intel => first_match(name, INTEL_ARCH).unwrap_or("Intel GPU"),
        Vendor::Apple => first_match(name, APPLE_ARCH).unwrap_or("Apple GPU"),
        Vendor::Qualcomm => first_match(name, QUALCOMM_ARCH).unwrap_or("Adreno GPU"),
        Vendor::Arm => first_match(name, ARM_ARCH).unwrap_or("Mali GPU"),
        _ => return None,
    };
    Some(label.to_string())
}

/// Infer a release year where generation keywords allow it.
pub fn estimate_year(vendor: Vendor, name: &str) -> Option<u16> {
    YEAR_RULES
        .iter()
        .find(|(v, _)| *v == vendor)
        .and_then(|(_, rules)| rules.iter().find(|(kw, _)| name.contains(kw)))
        .map(|(_, year)| *year)
}

/// Mean of the FPS samples, rounded; 30 when there are none.
pub fn average_fps(samples: &[f64]) -> u32 {
    if samples.is_empty() {
        return 30;
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    mean.round() as u32
}

/// Parse one corpus file. Malformed rows are skipped rather than failing
/// the whole file; a top-level shape mismatch is an error.
pub fn parse_corpus_file(json: &str) -> Result<Vec<CorpusEntry>> {
    let data: Value = serde_json::from_str(json)?;
    let rows = data
        .as_array()
        .ok_or_else(|| PilotError::Other("corpus file is not an array".into()))?;

    let mut entries = Vec::new();
    // First element is the format version marker.
    for row in rows.iter().skip(1) {
        let Some(tuple) = row.as_array() else { continue };
        if tuple.len() < 5 {
            continue;
        }
        let Some(name) = tuple[0].as_str() else { continue };
        let tier = tuple[3].as_u64().unwrap_or(1) as u8;
        let fps_samples = tuple[4]
            .as_array()
            .map(|samples| {
                samples
                    .iter()
                    .filter_map(|s| s.as_array())
                    .filter_map(|s| s.get(2))
                    .filter_map(|v| v.as_f64())
                    .collect()
            })
            .unwrap_or_default();
        entries.push(CorpusEntry {
            name: name.to_string(),
            tier,
            fps_samples,
        });
    }
    Ok(entries)
}

/// Build a capability profile for one corpus entry.
pub fn profile_for(entry: &CorpusEntry, file_name: &str) -> CapabilityProfile {
    let name = canonical_key(&entry.name);
    let vendor = detect_vendor(&name);
    let platform = detect_platform(&name, file_name);
    let tier = entry.tier.min(3);
    CapabilityProfile {
        vendor,
        platform,
        memory: estimate_memory(vendor, platform, tier, &name),
        performance: Performance {
            tier,
            fps: average_fps(&entry.fps_samples),
        },
        architecture: detect_architecture(vendor, &name),
        year: estimate_year(vendor, &name),
    }
}

/// Build the reference database from `(file_name, contents)` pairs.
/// Placeholder names are dropped; duplicate normalized names keep the
/// first-seen profile.
pub fn build_database(files: &[(String, String)]) -> Result<GpuDatabase> {
    let mut db = GpuDatabase::new();
    for (file_name, contents) in files {
        let entries = parse_corpus_file(contents)?;
        let mut kept = 0usize;
        for entry in &entries {
            if entry.name.len() < MIN_NAME_LEN || entry.name.contains(UNKNOWN_MARKER) {
                continue;
            }
            let key = canonical_key(&entry.name);
            if db.insert(key, profile_for(entry, file_name)) {
                kept += 1;
            }
        }
        tracing::debug!(file = %file_name, total = entries.len(), kept, "processed corpus file");
    }
    Ok(db)
}
