use gpu_pilot_core::corpus::{build_database, profile_for, parse_corpus_file};
use gpu_pilot_core::database::GpuDatabase;
use gpu_pilot_core::profile::{PlatformClass, Vendor};

fn file(entries: &str) -> String {
    format!("[1,{entries}]")
}

#[test]
fn builds_rtx_4090_per_estimation_tables() {
    let corpus = file(
        r#"["NVIDIA GeForce RTX 4090","rtx 4090","rtx,4090",3,
            [[1920,1080,152],[2560,1440,144],[3840,2160,120]]]"#,
    );
    let db = build_database(&[("d-nvidia.json".into(), corpus)]).unwrap();

    let p = db.get("nvidia geforce rtx 4090").expect("entry keyed by canonical name");
    assert_eq!(p.vendor, Vendor::Nvidia);
    assert_eq!(p.platform, PlatformClass::Desktop);
    assert_eq!(p.memory.vram, Some(24576));
    assert_eq!(p.memory.kind.as_deref(), Some("GDDR6X"));
    assert_eq!(p.performance.tier, 3);
    assert_eq!(p.performance.fps, 139); // mean(152,144,120) rounded
    assert_eq!(p.architecture.as_deref(), Some("Ada Lovelace"));
    assert_eq!(p.year, Some(2022));
}

#[test]
fn mobile_file_prefix_wins_over_name_cues() {
    let corpus = file(r#"["Apple M2","m2","apple,m2",2,[[1170,2532,75]]]"#);
    let db = build_database(&[("m-apple.json".into(), corpus)]).unwrap();
    let p = db.get("apple m2").unwrap();
    assert_eq!(p.platform, PlatformClass::Mobile);
    assert_eq!(p.memory.unified, Some(8192));
    assert_eq!(p.memory.kind.as_deref(), Some("Unified"));
}

#[test]
fn duplicate_normalized_names_keep_first_profile() {
    // Same GPU appears in two files with different tiers; the first file
    // processed wins.
    let first = file(r#"["Radeon RX 6600","rx 6600","rx,6600",2,[[1920,1080,70]]]"#);
    let second = file(r#"["radeon rx 6600","rx 6600","rx,6600",0,[]]"#);
    let db = build_database(&[
        ("d-amd.json".into(), first),
        ("d-amd-extra.json".into(), second),
    ])
    .unwrap();

    assert_eq!(db.len(), 1);
    let p = db.get("radeon rx 6600").unwrap();
    assert_eq!(p.performance.tier, 2);
    assert_eq!(p.memory.vram, Some(8192));
    assert_eq!(p.performance.fps, 70);
}

#[test]
fn placeholder_and_short_names_are_dropped() {
    let corpus = file(
        r#"["Generic ??? Adapter","","",2,[]],
           ["gp","","",2,[]],
           ["GeForce GTX 1660 Super","","",2,[[1920,1080,66]]]"#,
    );
    let db = build_database(&[("d-nvidia.json".into(), corpus)]).unwrap();
    assert_eq!(db.len(), 1);
    assert!(db.get("geforce gtx 1660 super").is_some());
}

#[test]
fn profile_for_matches_bundled_artifact_values() {
    // The bundled artifact was produced by these same rules; spot-check a
    // few entries to keep them from drifting apart.
    let bundled = GpuDatabase::load_bundled().unwrap();
    let corpus = file(
        r#"["GeForce RTX 3080","","",3,[]],
           ["Radeon RX 7900 XTX","","",3,[]],
           ["Adreno 740","","",3,[]]"#,
    );
    let entries = parse_corpus_file(&corpus).unwrap();

    for entry in &entries {
        let key = gpu_pilot_core::normalize::canonical_key(&entry.name);
        let rebuilt = profile_for(entry, "d-any.json");
        let stored = bundled.get(&key).unwrap_or_else(|| panic!("{key} missing"));
        assert_eq!(rebuilt.vendor, stored.vendor, "{key}");
        assert_eq!(rebuilt.platform, stored.platform, "{key}");
        assert_eq!(rebuilt.memory.vram, stored.memory.vram, "{key}");
        assert_eq!(rebuilt.memory.unified, stored.memory.unified, "{key}");
        assert_eq!(rebuilt.architecture, stored.architecture, "{key}");
        assert_eq!(rebuilt.year, stored.year, "{key}");
    }
}
