use quadrant_core::{Quadrant, RawRecord, Record, TimePeriod};
use serde_json::json;

#[test]
fn record_serializes_with_snake_case_quadrant() {
    let raw = RawRecord::new("Buy milk", "Buy milk\n\n#DoNow\n#today", "Inbox");
    let record = Record::from_raw(&raw, Some(Quadrant::DoNow));

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["quadrant"], json!("do_now"));
    assert_eq!(value["structured_tags"], json!(["#today"]));
    assert_eq!(value["id"], json!(raw.id.to_string()));
    assert_eq!(value["revision"], json!(0));
}

#[test]
fn unassigned_quadrant_is_null_and_parses_back() {
    let raw = RawRecord::new("n", "plain", "Inbox");
    let record = Record::from_raw(&raw, None);

    let text = serde_json::to_string(&record).unwrap();
    assert!(text.contains("\"quadrant\":null"));
    let parsed: Record = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn to_raw_keeps_store_identity() {
    let mut raw = RawRecord::new("t", "#Bin", "Inbox");
    raw.revision = 7;
    raw.last_modified_ms = 1_700_000_000_000;
    raw.completed = true;

    let back = Record::from_raw(&raw, Some(Quadrant::Bin)).to_raw();
    assert_eq!(back, raw);
}

#[test]
fn time_period_wire_names() {
    assert_eq!(
        serde_json::to_value(TimePeriod::ThisQuarter).unwrap(),
        json!("this_quarter")
    );
    let parsed: Quadrant = serde_json::from_value(json!("bin")).unwrap();
    assert_eq!(parsed, Quadrant::Bin);
}
