use std::fs;

use zhammer_core::{Action, EntryKind, Invocation, Table, ZhammerError, selection};

const EXAMPLE: &str = include_str!("../../resources/ztab.example");

#[test]
fn example_ztab_parses() {
    let table = Table::parse_str(EXAMPLE).unwrap();

    let defaults = table.defaults().unwrap();
    assert_eq!(defaults.valid_options().value("devices"), Some("4"));
    assert!(!defaults.valid_options().contains("swappiness"));

    let swap1 = table.get("1").unwrap();
    assert_eq!(swap1.kind(), EntryKind::Swap);
    assert_eq!(swap1.size_bytes().unwrap().unwrap(), 512 * 1024 * 1024);
    assert_eq!(swap1.valid_options().value("swappiness"), Some("80"));
    assert_eq!(swap1.valid_options().value("pri"), Some("100"));

    let cache = table.get("cache0").unwrap();
    assert_eq!(cache.kind(), EntryKind::ZfsCache);
    assert!(!cache.valid_options().contains("swappiness"));

    assert!(table.get("log0").unwrap().is_noauto());
}

#[test]
fn example_batch_order() {
    let table = Table::parse_str(EXAMPLE).unwrap();

    let online = selection::resolve_keys(&table, &Invocation::all(Action::Online, None)).unwrap();
    assert_eq!(online, vec!["DEFAULTS", "0", "1", "2", "3"]);

    let offline =
        selection::resolve_keys(&table, &Invocation::all(Action::Offline, Some("swap".into())))
            .unwrap();
    assert_eq!(offline, vec!["3", "2", "1", "0"]);
}

#[test]
fn loads_from_disk() {
    let path = std::env::temp_dir().join(format!("zhammer-ztab-{}", std::process::id()));
    fs::write(&path, EXAMPLE).unwrap();

    let table = Table::load(&path).unwrap();
    assert!(table.contains_key("swap0"));
    let _ = fs::remove_file(&path);
}

#[test]
fn unreadable_ztab_is_reported() {
    let err = Table::load(std::path::Path::new("/nonexistent/zhammer/ztab")).unwrap_err();
    assert!(matches!(err, ZhammerError::ZtabIo { .. }));
    assert_eq!(err.exit_code(), 2);
}
