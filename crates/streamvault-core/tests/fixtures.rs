//! Decode the recorded stream deliveries under `fixtures/streams/`.

use streamvault_core::{decode_event, EventKind, ScalarValue, StreamPayload};

fn load_payload(name: &str) -> StreamPayload {
    let mut p = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.pop();
    p.pop();
    p.push("fixtures/streams");
    p.push(name);
    let raw = std::fs::read_to_string(&p)
        .unwrap_or_else(|e| panic!("cannot read fixture {}: {e}", p.display()));
    serde_json::from_str(&raw).unwrap_or_else(|e| panic!("bad fixture {name}: {e}"))
}

#[test]
fn mixed_delivery_kinds() {
    let payload = load_payload("status_history_mixed.json");
    let kinds: Vec<_> = payload.records.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        [
            EventKind::Insert,
            EventKind::Modify,
            EventKind::Remove,
            EventKind::Insert
        ]
    );
}

#[test]
fn insert_decodes_with_typed_values() {
    let payload = load_payload("status_history_mixed.json");
    let rec = decode_event(&payload.records[0]).unwrap().unwrap();

    assert_eq!(rec.get("GeoId"), Some(&ScalarValue::Int(1207)));
    assert_eq!(rec.get("Status"), Some(&ScalarValue::Str("ACTIVE".into())));
    assert_eq!(rec.get("HotWater"), Some(&ScalarValue::Bool(true)));
    assert_eq!(rec.get("Temperature"), Some(&ScalarValue::Decimal(71.5)));
    assert!(rec.get("Incidents").is_none());
    assert!(rec.get("Notes").is_none());
}

#[test]
fn modify_zero_point_zero_is_decimal() {
    let payload = load_payload("status_history_mixed.json");
    let rec = decode_event(&payload.records[1]).unwrap().unwrap();
    assert_eq!(rec.get("Temperature"), Some(&ScalarValue::Decimal(0.0)));
}

#[test]
fn remove_only_decodes_to_nothing() {
    let payload = load_payload("remove_only.json");
    for event in &payload.records {
        assert!(decode_event(event).unwrap().is_none());
    }
}
