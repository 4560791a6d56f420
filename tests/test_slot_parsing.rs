use std::collections::BTreeSet;

use timetable::algorithm::{is_conflict, parse_slots, OccupancyMap};
use timetable::models::SlotToken;
use timetable::ScheduleIndex;

fn tok(s: &str) -> SlotToken {
    s.parse().unwrap()
}

fn as_pairs(enc: &str) -> Vec<(String, String)> {
    parse_slots(enc).into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[test]
fn test_parse_one_group_per_slot() {
    assert_eq!(
        as_pairs("M1-R101,M2-R102"),
        vec![("M1".to_string(), "R101".to_string()), ("M2".to_string(), "R102".to_string())]
    );
}

#[test]
fn test_parse_slot_run_shares_classroom() {
    assert_eq!(
        as_pairs("T12-R205"),
        vec![("T1".to_string(), "R205".to_string()), ("T2".to_string(), "R205".to_string())]
    );
}

#[test]
fn test_parse_several_days_in_one_group() {
    let m = parse_slots("M4W34-ED117");
    assert_eq!(m.len(), 3);
    assert!(m.values().all(|c| c == "ED117"));
}

#[test]
fn test_parse_without_classroom() {
    let m = parse_slots("Syz");
    assert_eq!(m.get(&tok("Sy")).map(String::as_str), Some(""));
    assert_eq!(m.get(&tok("Sz")).map(String::as_str), Some(""));
}

#[test]
fn test_parse_duplicate_slot_last_group_wins() {
    // el mismo bloque en dos grupos: se queda la sala del último
    let m = parse_slots("M1-R101,M1-R999");
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&tok("M1")).map(String::as_str), Some("R999"));
}

#[test]
fn test_fixture_time_matches_time_classroom() {
    let idx = ScheduleIndex::load("tests/fixtures/111-2_data.json").expect("fixture debe cargar");
    assert!(idx.inconsistent_records().is_empty());
    for c in idx.records() {
        let from_encoding: BTreeSet<SlotToken> = parse_slots(&c.time_classroom).into_keys().collect();
        let listed: BTreeSet<SlotToken> = c.time.iter().copied().collect();
        assert_eq!(from_encoding, listed, "curso {}", c.id);
    }
}

#[test]
fn test_inconsistent_record_is_reported_not_rejected() {
    let idx = ScheduleIndex::from_json_str(
        r#"{"7": {"id": "7", "time": ["M1", "M2"], "time-classroom": "M1-R1"}}"#,
    )
    .unwrap();
    assert_eq!(idx.inconsistent_records(), vec!["7"]);
    assert!(idx.get("7").is_some());
}

#[test]
fn test_is_conflict_on_shared_token() {
    let occ = OccupancyMap::new();
    assert!(!is_conflict(&[tok("M1")], &occ));

    let idx = ScheduleIndex::from_json_str(
        r#"{"1": {"time": ["M1", "M2"], "time-classroom": "M12-A"}}"#,
    )
    .unwrap();
    let mut tt = timetable::Timetable::new(
        std::sync::Arc::new(idx),
        timetable::models::AcademicTerm::new(111, 2),
        timetable::storage::MemoryStore::new(),
    );
    tt.select("1").unwrap();
    assert!(is_conflict(&[tok("M3"), tok("M2")], tt.occupancy()));
    assert!(!is_conflict(&[tok("M3"), tok("T2")], tt.occupancy()));
}
