use std::fs;
use std::path::Path;
use tempfile::tempdir;
use toolcat::core::error::CatalogError;
use toolcat::core::migration::{self, UpgradeOutcome};
use toolcat::core::record::ToolDraft;
use toolcat::core::repository::{CsvRepository, Repository};
use toolcat::core::schemas::Schema;
use toolcat::core::store::Catalog;
use toolcat::core::time;
use toolcat::core::validate::{self, UploaderMode, ValidationRules};

const LEGACY_CSV: &str = "Serial_Number,Name,Category,Uploaded_By,Date_Time,Purpose\n\
1,Midjourney,Image Generation,Omar,2025-02-01 09:00:00,Campaign visuals\n\
2,Jasper,Content Creation,Rayna,2025-02-03 15:30:00,Blog outlines\n";

fn open_catalog(path: &Path) -> Catalog {
    Catalog::open(
        CsvRepository::new(path, Schema::canonical()),
        ValidationRules::default(),
    )
}

fn claude() -> ToolDraft {
    ToolDraft::new(
        "Claude",
        "https://claude.ai",
        "Chatbots",
        "Rayna",
        "Draft marketing copy",
    )
}

#[test]
fn opening_creates_header_only_file() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("nested").join("tools.csv");

    let catalog = open_catalog(&path);
    assert_eq!(catalog.init_outcome(), Some(&UpgradeOutcome::Created));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Serial_Number,Name,Tool_Link,Category,Uploaded_By,Date_Time,Purpose\n"
    );
    assert!(catalog.load().is_empty());
}

#[test]
fn claude_into_empty_store() {
    let tmp = tempdir().expect("tempdir");
    let catalog = open_catalog(&tmp.path().join("tools.csv"));

    assert!(catalog.append(&claude()));
    let records = catalog.load();
    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.serial_number, Some(1));
    assert_eq!(r.name, "Claude");
    assert_eq!(r.tool_link, "https://claude.ai");
    assert_eq!(r.category, "Chatbots");
    assert_eq!(r.uploaded_by, "Rayna");
    assert_eq!(r.purpose, "Draft marketing copy");
}

#[test]
fn append_assigns_next_serial_and_current_time() {
    let tmp = tempdir().expect("tempdir");
    let catalog = open_catalog(&tmp.path().join("tools.csv"));
    assert!(catalog.append(&claude()));

    let expected_serial = catalog.next_serial().unwrap();
    let before = time::now_local();
    let stored = catalog
        .submit(&ToolDraft::new(
            "  Canva  ",
            "",
            "Design Tools",
            " Omar ",
            "  Social media banners ",
        ))
        .expect("append");
    let after = time::now_local();

    let records = catalog.load();
    let first = &records[0];
    assert_eq!(first, &stored);
    assert_eq!(first.serial_number, Some(expected_serial));
    assert_eq!(expected_serial, 2);
    let ts = first.date_time.expect("timestamp");
    assert!(before <= ts && ts <= after);

    assert_eq!(first.name, "Canva");
    assert_eq!(first.uploaded_by, "Omar");
    assert_eq!(first.purpose, "Social media banners");
    assert_eq!(first.tool_link, "");
}

#[test]
fn invalid_link_is_rejected_and_nothing_is_stored() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    let catalog = open_catalog(&path);
    let before = fs::read(&path).unwrap();

    let mut draft = claude();
    draft.tool_link = "ftp://bad".to_string();
    assert_eq!(
        catalog.validate(&draft),
        vec!["Tool link: must be a valid URL (http:// or https://).".to_string()]
    );

    let err = catalog.submit(&draft).unwrap_err();
    assert_eq!(err.messages(), [validate::MSG_TOOL_LINK.to_string()]);
    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(catalog.load().is_empty());
}

#[test]
fn round_trip_of_n_records() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    let catalog = open_catalog(&path);

    let drafts: Vec<ToolDraft> = (0..5)
        .map(|i| {
            ToolDraft::new(
                format!("Tool {}", i),
                format!("https://tool{}.example.com", i),
                "Analytics",
                "Rayna",
                format!("Purpose, with \"quotes\" and commas #{}", i),
            )
        })
        .collect();
    for d in &drafts {
        assert!(catalog.append(d));
    }

    // A fresh catalog forces a real read from disk.
    let records = open_catalog(&path).load();
    assert_eq!(records.len(), 5);
    for d in &drafts {
        let found = records.iter().find(|r| r.name == d.name).expect("record");
        assert_eq!(found.tool_link, d.tool_link);
        assert_eq!(found.category, d.category);
        assert_eq!(found.uploaded_by, d.uploaded_by);
        assert_eq!(found.purpose, d.purpose);
    }
    let mut serials: Vec<u64> = records.iter().filter_map(|r| r.serial_number).collect();
    serials.sort_unstable();
    assert_eq!(serials, vec![1, 2, 3, 4, 5]);
}

#[test]
fn shuffled_columns_load_and_rewrite_in_canonical_order() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    fs::write(
        &path,
        "Purpose,Date_Time,Name,Serial_Number,Uploaded_By,Tool_Link,Category\n\
         Campaign visuals,2025-02-01 09:00:00,Midjourney,4,Omar,https://midjourney.com,Image Generation\n",
    )
    .unwrap();

    let catalog = open_catalog(&path);
    let records = catalog.load();
    assert_eq!(records[0].serial_number, Some(4));
    assert_eq!(records[0].tool_link, "https://midjourney.com");

    assert!(catalog.append(&claude()));
    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("Serial_Number,Name,Tool_Link,Category,Uploaded_By,Date_Time,Purpose")
    );
    assert!(lines.next().unwrap().starts_with("5,Claude,https://claude.ai,Chatbots,Rayna,"));
    assert_eq!(
        lines.next(),
        Some("4,Midjourney,https://midjourney.com,Image Generation,Omar,2025-02-01 09:00:00,Campaign visuals")
    );
}

#[test]
fn legacy_file_gains_empty_tool_link() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    fs::write(&path, LEGACY_CSV).unwrap();

    let catalog = open_catalog(&path);
    assert_eq!(
        catalog.init_outcome(),
        Some(&UpgradeOutcome::Upgraded(vec!["Add Tool_Link column after Name"]))
    );

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with(
        "Serial_Number,Name,Tool_Link,Category,Uploaded_By,Date_Time,Purpose\n\
         1,Midjourney,,Image Generation,Omar,2025-02-01 09:00:00,Campaign visuals\n"
    ));

    let records = catalog.load();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.tool_link.is_empty()));
    // Newest first.
    assert_eq!(records[0].name, "Jasper");
}

#[test]
fn upgrade_twice_is_byte_identical() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    fs::write(&path, LEGACY_CSV).unwrap();

    let first = migration::upgrade_file(&path, &Schema::canonical()).unwrap();
    assert!(matches!(first, UpgradeOutcome::Upgraded(_)));
    let after_first = fs::read(&path).unwrap();

    let second = migration::upgrade_file(&path, &Schema::canonical()).unwrap();
    assert_eq!(second, UpgradeOutcome::UpToDate);
    assert_eq!(fs::read(&path).unwrap(), after_first);
}

#[test]
fn zero_byte_file_is_reinitialized() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    fs::write(&path, "").unwrap();

    let catalog = open_catalog(&path);
    assert_eq!(catalog.init_outcome(), Some(&UpgradeOutcome::Created));
    assert!(fs::read_to_string(&path).unwrap().starts_with("Serial_Number,"));
    assert!(catalog.append(&claude()));
    assert_eq!(catalog.load()[0].serial_number, Some(1));
}

#[test]
fn legacy_serials_and_timestamps_become_unknown() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    fs::write(
        &path,
        "Serial_Number,Name,Tool_Link,Category,Uploaded_By,Date_Time,Purpose\n\
         2.0,Jasper,,Content Creation,Rayna,2025-02-03 15:30:00,Blog outlines\n\
         abc,Copy.ai,,Content Creation,Rayna,not a date,Ad variations\n\
         5,Canva,,Design Tools,Omar,2025-01-01 10:00:00,Banners\n",
    )
    .unwrap();

    let catalog = open_catalog(&path);
    let records = catalog.load();
    assert_eq!(records.len(), 3);
    let last = records.last().unwrap();
    assert_eq!(last.name, "Copy.ai");
    assert_eq!(last.serial_number, None);
    assert_eq!(last.date_time, None);
    assert_eq!(records[0].serial_number, Some(2));

    assert_eq!(catalog.next_serial().unwrap(), 6);
    let stored = catalog.submit(&claude()).unwrap();
    assert_eq!(stored.serial_number, Some(6));
}

#[test]
fn duplicate_names_are_separate_entries() {
    let tmp = tempdir().expect("tempdir");
    let catalog = open_catalog(&tmp.path().join("tools.csv"));
    assert!(catalog.append(&claude()));
    assert!(catalog.append(&claude()));
    let records = catalog.load();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].serial_number, Some(2));
    assert_eq!(records[1].serial_number, Some(1));
}

#[test]
fn cache_serves_repeat_reads_and_drops_after_append() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    let catalog = open_catalog(&path);

    let _ = catalog.load();
    let _ = catalog.load();
    let stats = catalog.cache_stats();
    assert_eq!(stats.populations, 1);
    assert_eq!(stats.hits, 1);

    // Edits made behind the catalog's back are not seen until invalidation.
    fs::write(&path, LEGACY_CSV).unwrap();
    assert!(catalog.load().is_empty());

    assert!(catalog.append(&claude()));
    assert_eq!(catalog.cache_stats().invalidations, 1);
    let records = catalog.load();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].name, "Claude");
    assert_eq!(records[0].serial_number, Some(3));
}

#[test]
fn unreadable_file_loads_empty() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    fs::write(&path, b"Serial_Number,Name\n1,\xff\xfe\n").unwrap();

    let catalog = open_catalog(&path);
    assert!(catalog.try_load().is_err());
    assert!(catalog.load().is_empty());
    assert_eq!(catalog.cache_stats().populations, 0);
}

#[test]
fn failed_append_returns_false_and_keeps_cache() {
    let tmp = tempdir().expect("tempdir");
    let blocker = tmp.path().join("not-a-dir");
    fs::write(&blocker, "x").unwrap();
    let path = blocker.join("tools.csv");

    let catalog = open_catalog(&path);
    assert!(catalog.init_outcome().is_none());
    assert!(catalog.load().is_empty());
    assert!(!catalog.append(&claude()));
    assert_eq!(catalog.cache_stats().invalidations, 0);

    match catalog.try_append(&claude()) {
        Err(CatalogError::PersistenceError(_)) => {}
        other => panic!("expected persistence error, got {:?}", other),
    }
}

#[test]
fn catalog_without_tool_link_column() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    fs::write(&path, LEGACY_CSV).unwrap();

    let catalog = Catalog::open(
        CsvRepository::new(&path, Schema::without_tool_link()),
        ValidationRules::default(),
    );
    assert_eq!(catalog.init_outcome(), Some(&UpgradeOutcome::UpToDate));
    let mut draft = claude();
    draft.tool_link = String::new();
    assert!(catalog.append(&draft));

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("Serial_Number,Name,Category,Uploaded_By,Date_Time,Purpose\n3,Claude,Chatbots,"));
}

#[test]
fn roster_mode_rejects_unknown_contributor() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    let rules = ValidationRules {
        uploader: UploaderMode::Roster(vec!["Omar".to_string()]),
        ..ValidationRules::default()
    };
    let catalog = Catalog::open(CsvRepository::new(&path, Schema::canonical()), rules);

    let err = catalog.submit(&claude()).unwrap_err();
    assert_eq!(err.messages(), [validate::MSG_UPLOADER_ROSTER.to_string()]);

    let mut draft = claude();
    draft.uploaded_by = "Omar".to_string();
    assert!(catalog.submit(&draft).is_ok());
}

#[test]
fn repository_is_usable_without_the_catalog() {
    let tmp = tempdir().expect("tempdir");
    let repo = CsvRepository::new(tmp.path().join("tools.csv"), Schema::canonical());
    assert_eq!(repo.initialize().unwrap(), UpgradeOutcome::Created);
    let stored = repo.append(&claude()).unwrap();
    assert_eq!(repo.load().unwrap(), vec![stored]);
}

#[test]
fn append_keeps_legacy_cells_and_extra_columns_verbatim() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    fs::write(
        &path,
        "Serial_Number,Name,Tool_Link,Category,Uploaded_By,Date_Time,Purpose,Notes\n\
         A-12,Copy.ai,,Content Creation,Rayna,March 3rd 2024,Ad variations,keep me\n\
         3,Jasper,,Content Creation,Rayna,2025-03-14 09:26:53.123456,Blog outlines,\n",
    )
    .unwrap();

    let catalog = open_catalog(&path);
    let records = catalog.load();
    assert_eq!(records[1].name, "Copy.ai");
    assert_eq!(records[1].serial_number, None);
    assert_eq!(records[1].date_time, None);

    let stored = catalog.submit(&claude()).unwrap();
    assert_eq!(stored.serial_number, Some(4));

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "Serial_Number,Name,Tool_Link,Category,Uploaded_By,Date_Time,Purpose,Notes"
    );
    assert!(lines[1].starts_with("4,Claude,https://claude.ai,Chatbots,Rayna,"));
    assert!(lines[1].ends_with(",Draft marketing copy,"));
    assert_eq!(
        lines[2],
        "3,Jasper,,Content Creation,Rayna,2025-03-14 09:26:53.123456,Blog outlines,"
    );
    assert_eq!(
        lines[3],
        "A-12,Copy.ai,,Content Creation,Rayna,March 3rd 2024,Ad variations,keep me"
    );

    // The unknowns stay unknown after the rewrite.
    let reloaded = catalog.load();
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded[2].serial_number, None);
    assert_eq!(reloaded[2].date_time, None);
}

#[test]
fn exhausted_serials_fail_the_append() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    let seeded = "Serial_Number,Name,Tool_Link,Category,Uploaded_By,Date_Time,Purpose\n\
                  18446744073709551615,Jasper,,Content Creation,Rayna,2025-02-03 15:30:00,Blog outlines\n";
    fs::write(&path, seeded).unwrap();

    let catalog = open_catalog(&path);
    assert!(catalog.next_serial().is_err());
    match catalog.submit(&claude()) {
        Err(CatalogError::PersistenceError(_)) => {}
        other => panic!("expected persistence error, got {:?}", other),
    }
    assert!(!catalog.append(&claude()));
    assert_eq!(fs::read_to_string(&path).unwrap(), seeded);
    assert_eq!(catalog.load().len(), 1);
}

#[test]
fn load_upgrades_in_memory_when_rewrite_fails() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("tools.csv");
    fs::write(&path, LEGACY_CSV).unwrap();
    // A directory on the staging name makes every rewrite fail.
    fs::create_dir(tmp.path().join("tools.csv.tmp")).unwrap();

    let catalog = open_catalog(&path);
    assert!(catalog.init_outcome().is_none());

    let records = catalog.try_load().expect("in-memory upgrade");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Jasper");
    assert!(records.iter().all(|r| r.tool_link.is_empty()));
    assert_eq!(
        catalog.schema().header(),
        vec![
            "Serial_Number",
            "Name",
            "Tool_Link",
            "Category",
            "Uploaded_By",
            "Date_Time",
            "Purpose"
        ]
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), LEGACY_CSV);
}
