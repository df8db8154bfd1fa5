//! GPU name normalization and variation generation.
//!
//! Platform adapter strings are noisy: "NVIDIA GeForce RTX 4090", "ANGLE
//! (Apple, Apple M3 Pro, ...)", "Radeon RX 7900 XTX (AMD)". Lookup works on
//! a canonical lowercase form plus a set of plausible alternate spellings
//! probed against the reference database.

/// Vendor tokens stripped from the front of a name during normalization.
const VENDOR_PREFIXES: &[&str] = &["nvidia", "amd", "intel", "apple", "qualcomm", "arm"];

/// Generic trailing tokens that carry no identity.
const GENERIC_SUFFIXES: &[&str] = &["graphics", "gpu", "processor"];

/// Vendors re-prefixed onto the normalized form when generating variations.
const VARIATION_VENDORS: &[&str] = &["nvidia", "amd", "intel", "apple"];

/// Normalize a raw GPU name: lowercase, trim, drop brackets, collapse
/// whitespace, strip leading vendor tokens and trailing generic suffixes.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(raw: &str) -> String {
    let mut s = raw.to_lowercase();
    s.retain(|c| !matches!(c, '(' | ')' | '[' | ']'));

    let mut words: Vec<&str> = s.split_whitespace().collect();
    while words.len() > 1 && VENDOR_PREFIXES.contains(&words[0]) {
        words.remove(0);
    }
    while words.len() > 1 && GENERIC_SUFFIXES.contains(words.last().unwrap()) {
        words.pop();
    }
    words.join(" ")
}

/// Normalization used to key the reference database at construction time:
/// lowercase, brackets dropped, `-` and `/` folded into spaces, whitespace
/// collapsed. Vendor prefixes are kept here because database keys carry them when the
/// benchmark corpus does.
pub fn canonical_key(raw: &str) -> String {
    let mut s = raw.to_lowercase();
    s.retain(|c| !matches!(c, '(' | ')' | '[' | ']'));
    let s = s.replace(['-', '/'], " ");
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Generate the ordered, deduplicated list of name variations to probe
/// against the database. The normalized form always comes first; the raw
/// lowercased form second; then vendor-prefixed and vendor-specific forms.
///
/// Empty input yields an empty list.
pub fn variations(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let normalized = normalize(raw);
    let mut out: Vec<String> = Vec::new();
    let push = |v: String, out: &mut Vec<String>| {
        if !v.is_empty() && !out.contains(&v) {
            out.push(v);
        }
    };

    push(normalized.clone(), &mut out);
    push(raw.trim().to_lowercase(), &mut out);

    for vendor in VARIATION_VENDORS {
        if !normalized.contains(vendor) {
            push(format!("{vendor} {normalized}"), &mut out);
        }
    }

    if normalized.contains("geforce") {
        push(normalized.replacen("geforce ", "", 1), &mut out);
        push(format!("nvidia {normalized}"), &mut out);
    }
    if normalized.contains("radeon") {
        push(normalized.replacen("radeon ", "", 1), &mut out);
        push(format!("amd {normalized}"), &mut out);
    }
    if normalized.contains("arc") {
        push(format!("intel {normalized}"), &mut out);
    }
    if is_apple_silicon(&normalized) {
        let bare = normalized.replacen("apple ", "", 1);
        push(bare.clone(), &mut out);
        push(format!("apple {bare}"), &mut out);
    }

    out
}

fn is_apple_silicon(name: &str) -> bool {
    name.contains("apple")
        || name.contains("m1")
        || name.contains("m2")
        || name.contains("m3")
        || name.contains("m4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_vendor_and_suffix() {
        assert_eq!(normalize("NVIDIA GeForce RTX 4090"), "geforce rtx 4090");
        assert_eq!(normalize("Intel Iris Xe Graphics"), "iris xe");
        assert_eq!(normalize("Apple M3 Pro GPU"), "m3 pro");
        assert_eq!(normalize("  AMD Radeon   RX 7900 XTX "), "radeon rx 7900 xtx");
    }

    #[test]
    fn normalize_drops_brackets() {
        assert_eq!(normalize("Radeon RX 580 (POLARIS10)"), "radeon rx 580 polaris10");
        assert_eq!(normalize("[discrete] GeForce GTX 1080"), "discrete geforce gtx 1080");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "NVIDIA GeForce RTX 4090",
            "(nvidia) RTX 3080",
            "Apple Apple M2 Max",
            "Intel UHD Graphics 630",
            "adreno 740",
            "",
            "   ",
            "gpu",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn normalize_keeps_lone_vendor_word() {
        // A single-token name is never stripped to nothing.
        assert_eq!(normalize("nvidia"), "nvidia");
        assert_eq!(normalize("graphics"), "graphics");
    }

    #[test]
    fn canonical_key_folds_separators() {
        assert_eq!(canonical_key("Mali-G78"), "mali g78");
        assert_eq!(canonical_key("Radeon RX 560 / 560X"), "radeon rx 560 560x");
        assert_eq!(canonical_key("GeForce GTX 1060 (6GB)"), "geforce gtx 1060 6gb");
    }

    #[test]
    fn variations_start_with_normalized_form() {
        let vars = variations("NVIDIA GeForce RTX 4090");
        assert_eq!(vars[0], "geforce rtx 4090");
        assert!(vars.contains(&"nvidia geforce rtx 4090".to_string()));
        assert!(vars.contains(&"rtx 4090".to_string()));
    }

    #[test]
    fn variations_apple_silicon_forms() {
        let vars = variations("Apple M3");
        assert_eq!(vars[0], "m3");
        assert!(vars.contains(&"apple m3".to_string()));
    }

    #[test]
    fn variations_radeon_forms() {
        let vars = variations("AMD Radeon RX 7900 XTX");
        assert!(vars.contains(&"rx 7900 xtx".to_string()));
        assert!(vars.contains(&"amd radeon rx 7900 xtx".to_string()));
    }

    #[test]
    fn variations_empty_input() {
        assert!(variations("").is_empty());
        assert!(variations("   ").is_empty());
    }

    #[test]
    fn variations_deduplicated() {
        let vars = variations("rtx 4090");
        let mut sorted = vars.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), vars.len(), "duplicates in {vars:?}");
    }
}
