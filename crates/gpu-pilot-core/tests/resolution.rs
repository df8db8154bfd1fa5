use gpu_pilot_core::database::GpuDatabase;
use gpu_pilot_core::normalize::normalize;
use gpu_pilot_core::profile::{PlatformClass, Vendor};
use gpu_pilot_core::resolve::{resolve, resolve_or_estimate};

fn db() -> GpuDatabase {
    GpuDatabase::load_bundled().expect("bundled database")
}

#[test]
fn rtx_4090_resolves_to_full_profile() {
    let db = db();
    let p = resolve(&db, "NVIDIA GeForce RTX 4090").expect("should resolve");
    assert_eq!(p.vendor, Vendor::Nvidia);
    assert_eq!(p.platform, PlatformClass::Desktop);
    assert_eq!(p.memory.vram, Some(24576));
    assert_eq!(p.architecture.as_deref(), Some("Ada Lovelace"));
}

#[test]
fn exact_hit_returns_stored_profile_verbatim() {
    let db = db();
    let resolved = resolve(&db, "NVIDIA GeForce RTX 4090").unwrap();
    let stored = db.get("geforce rtx 4090").unwrap();
    assert_eq!(resolved, stored);
}

#[test]
fn lookup_works_across_vendors() {
    let db = db();

    let p = resolve(&db, "AMD Radeon RX 7900 XTX").unwrap();
    assert_eq!(p.vendor, Vendor::Amd);
    assert_eq!(p.memory.vram, Some(24576));

    let p = resolve(&db, "Intel Arc A770").unwrap();
    assert_eq!(p.vendor, Vendor::Intel);
    assert_eq!(p.memory.vram, Some(16384));

    let p = resolve(&db, "Apple M3").unwrap();
    assert_eq!(p.vendor, Vendor::Apple);
    assert_eq!(p.platform, PlatformClass::Mobile);
    assert_eq!(p.memory.unified, Some(16384));

    let p = resolve(&db, "Adreno 740").unwrap();
    assert_eq!(p.vendor, Vendor::Qualcomm);
    assert_eq!(p.memory.unified, Some(12288));
}

#[test]
fn partial_match_covers_unlisted_variants() {
    let db = db();
    // "RTX 3080 Ti" has no database entry of its own; the partial pass
    // should land on the plain 3080.
    let p = resolve(&db, "NVIDIA GeForce RTX 3080 Ti").expect("partial match");
    assert_eq!(p.memory.vram, Some(10240));
}

#[test]
fn empty_name_is_a_lookup_miss() {
    let db = db();
    assert!(resolve(&db, "").is_none());
    assert!(resolve_or_estimate(&db, "", 3).is_none());
}

#[test]
fn resolve_or_estimate_is_total_for_nonempty_names() {
    let db = db();
    let names = [
        "NVIDIA GeForce RTX 4090",
        "Some Future GPU 9999",
        "Adreno 999",
        "Mystery Iris Variant",
        "x",
        "GPU (ANGLE)",
    ];
    for name in names {
        for tier in 0..=3u8 {
            let p = resolve_or_estimate(&db, name, tier)
                .unwrap_or_else(|| panic!("no profile for {name:?} tier {tier}"));
            assert!(
                p.memory.is_well_formed(),
                "{name:?} tier {tier}: exactly one memory field expected"
            );
            assert!(p.budget_mb().unwrap() > 0);
        }
    }
}

#[test]
fn estimated_profiles_match_tier_table() {
    let db = GpuDatabase::new(); // force the estimation path
    let p = resolve_or_estimate(&db, "Unknown Discrete Card", 3).unwrap();
    assert_eq!(p.memory.vram, Some(12288));

    let p = resolve_or_estimate(&db, "unknown mobile chip", 2).unwrap();
    assert_eq!(p.platform, PlatformClass::Mobile);
    assert_eq!(p.memory.unified, Some(6144));

    let p = resolve_or_estimate(&db, "some integrated thing", 0).unwrap();
    assert_eq!(p.platform, PlatformClass::Integrated);
    assert_eq!(p.memory.unified, Some(1024));
}

#[test]
fn normalization_is_idempotent_over_database_keys() {
    let db = db();
    for key in db.keys() {
        let once = normalize(key);
        assert_eq!(normalize(&once), once, "not idempotent for key {key:?}");
    }
}
