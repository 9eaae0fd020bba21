// tests/ledger_persistence.rs
use newswatch::ledger::{fingerprint, SentLedger, DEFAULT_RETENTION_SECS};

#[test]
fn missing_file_loads_as_empty_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let ledger = SentLedger::load(&path).unwrap();
    assert!(ledger.sent.is_empty());
}

#[test]
fn malformed_file_is_a_hard_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(SentLedger::load(&path).is_err());
}

#[test]
fn persist_then_load_round_trips_the_wire_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut ledger = SentLedger::default();
    let fp = fingerprint("https://example.com/article");
    ledger.mark_sent(fp.clone(), 1_700_000_000);
    ledger.persist(&path).unwrap();

    // wire format: {"sent": {"<fp>": <epoch>}}
    let raw = std::fs::read_to_string(&path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(v["sent"][&fp], serde_json::json!(1_700_000_000u64));

    let reloaded = SentLedger::load(&path).unwrap();
    assert!(reloaded.was_sent(&fp));

    // atomic replace leaves no temp residue
    let residue: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("tmp"))
        .collect();
    assert!(residue.is_empty());
}

#[test]
fn persist_replaces_previous_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut first = SentLedger::default();
    first.mark_sent("aaa".into(), 100);
    first.persist(&path).unwrap();

    let mut second = SentLedger::load(&path).unwrap();
    second.sweep_expired(100 + DEFAULT_RETENTION_SECS + 1, DEFAULT_RETENTION_SECS);
    assert!(!second.was_sent("aaa"));
    second.mark_sent("bbb".into(), 200);
    second.persist(&path).unwrap();

    let third = SentLedger::load(&path).unwrap();
    assert!(!third.was_sent("aaa"));
    assert!(third.was_sent("bbb"));
}
