use std::sync::Arc;

use timetable::models::AcademicTerm;
use timetable::storage::{MemoryStore, SnapshotStore, SqliteStore, KEY_SELECTED, KEY_SEMESTER, KEY_YEAR};
use timetable::{ScheduleIndex, Timetable, TimetableError, Totals};

const TERM: AcademicTerm = AcademicTerm { year: 111, semester: 2 };

fn index() -> Arc<ScheduleIndex> {
    Arc::new(ScheduleIndex::load("tests/fixtures/111-2_data.json").expect("fixture debe cargar"))
}

fn small_index() -> Arc<ScheduleIndex> {
    let json = r#"{
        "A": {"name": "Curso A", "credit": "3.0", "hours": 3, "time": ["M1", "M2"], "time-classroom": "M12-R1"},
        "B": {"name": "Curso B", "credit": 2, "hours": 2, "time": ["M2", "M3"], "time-classroom": "M23-R2"},
        "C": {"name": "Curso C", "hours": 1, "time": ["T1"], "time-classroom": "T1-R3"}
    }"#;
    Arc::new(ScheduleIndex::from_json_str(json).unwrap())
}

#[test]
fn test_conflicting_select_is_rejected() {
    let mut tt = Timetable::new(small_index(), TERM, MemoryStore::new());
    tt.select("A").unwrap();
    match tt.select("B") {
        Err(TimetableError::Conflict { course_id, slots, holders }) => {
            assert_eq!(course_id, "B");
            assert_eq!(slots, vec!["M2"]);
            assert_eq!(holders, vec!["A"]);
        }
        other => panic!("se esperaba choque, se obtuvo {:?}", other.map(|_| ())),
    }
    // nada cambió
    assert!(!tt.is_selected("B"));
    assert_eq!(tt.occupancy().len(), 2);
    assert_eq!(tt.totals().credits, 3.0);
}

#[test]
fn test_credit_text_and_missing_credit() {
    let mut tt = Timetable::new(small_index(), TERM, MemoryStore::new());
    tt.select("A").unwrap();
    assert_eq!(tt.totals().credits, 3.0);
    let totals = tt.select("C").unwrap();
    // "C" no tiene créditos: suma 0
    assert_eq!(totals.credits, 3.0);
    assert_eq!(totals.hours, 4.0);
}

#[test]
fn test_select_then_deselect_restores_state() {
    let mut tt = Timetable::new(index(), TERM, MemoryStore::new());
    tt.select("1102").unwrap();
    tt.select("1104").unwrap();

    let selection = tt.selection().clone();
    let occupancy = tt.occupancy().clone();
    let totals = tt.totals();

    for id in ["1101", "1103", "998"] {
        if tt.select(id).is_ok() {
            tt.deselect(id).unwrap();
        }
        assert_eq!(tt.selection(), &selection);
        assert_eq!(tt.occupancy(), &occupancy);
        assert_eq!(tt.totals(), totals);
    }
}

#[test]
fn test_no_slot_shared_after_any_sequence() {
    let mut tt = Timetable::new(index(), TERM, MemoryStore::new());
    let ops = ["1101", "1103", "998", "1102", "1101", "1104", "1105", "998", "1103", "1101"];
    for id in ops {
        let _ = tt.toggle(id);
        let chosen = tt.selected_records();
        for (i, a) in chosen.iter().enumerate() {
            for b in chosen.iter().skip(i + 1) {
                assert!(
                    !a.time.iter().any(|s| b.time.contains(s)),
                    "{} y {} comparten bloque",
                    a.id,
                    b.id
                );
            }
        }
        let slots: usize = chosen.iter().map(|c| c.time.len()).sum();
        assert_eq!(slots, tt.occupancy().len());
    }
}

#[test]
fn test_unknown_and_not_selected() {
    let mut tt = Timetable::new(index(), TERM, MemoryStore::new());
    assert!(matches!(tt.select("0000"), Err(TimetableError::UnknownCourse(_))));
    assert!(matches!(tt.deselect("1101"), Err(TimetableError::NotSelected(_))));
    assert!(matches!(tt.preview("0000"), Err(TimetableError::UnknownCourse(_))));
}

#[test]
fn test_failed_save_leaves_state_untouched() {
    let mut tt = Timetable::new(index(), TERM, MemoryStore::new());
    tt.select("1101").unwrap();
    tt.store_mut().fail_writes = true;

    assert!(matches!(tt.select("1102"), Err(TimetableError::StoreUnavailable(_))));
    assert!(!tt.is_selected("1102"));
    assert_eq!(tt.occupancy().len(), 4);

    assert!(tt.deselect("1101").is_err());
    assert!(tt.is_selected("1101"));
    assert_eq!(tt.totals().credits, 4.0);
}

#[test]
fn test_each_transition_is_persisted() {
    let mut tt = Timetable::new(index(), TERM, MemoryStore::new());
    tt.select("1101").unwrap();
    tt.select("1102").unwrap();
    assert_eq!(tt.store().get(KEY_SELECTED), Some(r#"{"1101":true,"1102":true}"#));
    assert_eq!(tt.store().get(KEY_YEAR), Some("111"));
    assert_eq!(tt.store().get(KEY_SEMESTER), Some("2"));
    tt.deselect("1101").unwrap();
    assert_eq!(tt.store().get(KEY_SELECTED), Some(r#"{"1102":true}"#));
}

#[test]
fn test_open_restores_same_term() {
    let store = MemoryStore::with_entries([
        (KEY_SELECTED, r#"{"1101":true,"1102":true}"#),
        (KEY_YEAR, "111"),
        (KEY_SEMESTER, "2"),
    ]);
    let tt = Timetable::open(index(), TERM, store).unwrap();
    assert!(tt.is_selected("1101"));
    assert!(tt.is_selected("1102"));
    assert_eq!(tt.totals(), Totals { credits: 7.0, hours: 7.0 });
    assert_eq!(tt.occupancy().len(), 7);
}

#[test]
fn test_open_discards_other_term() {
    let store = MemoryStore::with_entries([
        (KEY_SELECTED, r#"{"1101":true}"#),
        (KEY_YEAR, "111"),
        (KEY_SEMESTER, "1"),
    ]);
    let tt = Timetable::open(index(), TERM, store).unwrap();
    assert!(tt.selection().is_empty());
    assert!(tt.occupancy().is_empty());
}

#[test]
fn test_open_ignores_corrupt_snapshot() {
    let store = MemoryStore::with_entries([(KEY_SELECTED, "{\"1101\":"), (KEY_YEAR, "111"), (KEY_SEMESTER, "2")]);
    let tt = Timetable::open(index(), TERM, store).unwrap();
    assert!(tt.selection().is_empty());
}

#[test]
fn test_open_skips_unknown_and_clashing_ids() {
    // 1101 (M3 M4 R3 R4) y 1103 (M4 W3 W4) chocan en M4: se queda el primero en orden
    let store = MemoryStore::with_entries([
        (KEY_SELECTED, r#"{"1101":true,"1103":true,"4242":true,"1104":false}"#),
        (KEY_YEAR, "111"),
        (KEY_SEMESTER, "2"),
    ]);
    let tt = Timetable::open(index(), TERM, store).unwrap();
    let ids: Vec<&str> = tt.selection().iter().collect();
    assert_eq!(ids, vec!["1101"]);
}

#[test]
fn test_sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("estado").join("timetable.db");
    {
        let mut tt = Timetable::open(index(), TERM, SqliteStore::open(&db).unwrap()).unwrap();
        tt.select("998").unwrap();
        tt.select("1104").unwrap();
    }
    let tt = Timetable::open(index(), TERM, SqliteStore::open(&db).unwrap()).unwrap();
    let ids: Vec<&str> = tt.selection().iter().collect();
    assert_eq!(ids, vec!["1104", "998"]);

    // otro período: la misma base no aporta nada
    let other = Timetable::open(index(), AcademicTerm::new(112, 1), SqliteStore::open(&db).unwrap()).unwrap();
    assert!(other.selection().is_empty());
}

#[test]
fn test_garbage_db_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("timetable.db");
    let garbage: Vec<u8> = (0..100u8).map(|b| b.wrapping_mul(37).wrapping_add(11)).collect();
    std::fs::write(&db, &garbage).unwrap();

    let mut tt = Timetable::open(index(), TERM, SqliteStore::open(&db).unwrap()).unwrap();
    assert!(tt.selection().is_empty());
    tt.select("1102").unwrap();

    let tt = Timetable::open(index(), TERM, SqliteStore::open(&db).unwrap()).unwrap();
    assert!(tt.is_selected("1102"));
}

#[test]
fn test_sqlite_null_selection_is_empty() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.put(KEY_SELECTED, "null").unwrap();
    store.put(KEY_YEAR, "111").unwrap();
    store.put(KEY_SEMESTER, "2").unwrap();
    assert!(store.load().unwrap().selection_for(TERM).is_empty());
}

#[test]
fn test_grid_cells_carry_classroom() {
    let mut tt = Timetable::new(index(), TERM, MemoryStore::new());
    tt.select("1102").unwrap();
    tt.select("1105").unwrap();
    let grid = tt.grid();
    assert_eq!(grid.export_file_name, "111-2_timetable.png");
    assert_eq!(grid.rows.len(), 16);
    assert_eq!(grid.occupied_cells(), 5);
    let t5 = grid.cell(&"T5".parse().unwrap()).unwrap();
    assert_eq!((t5.course_id.as_str(), t5.classroom.as_str()), ("1102", "EC115"));
    let f5 = grid.cell(&"F5".parse().unwrap()).unwrap();
    assert_eq!(f5.classroom, "EC022");
    let sy = grid.cell(&"Sy".parse().unwrap()).unwrap();
    assert_eq!(sy.classroom, "");
    assert!(grid.cell(&"M1".parse().unwrap()).is_none());
}
