use bird_archer::config::{GameConfig, Preset};
use bird_archer::entities::LeaderboardEntry;
use bird_archer::error::StoreError;
use bird_archer::leaderboard::*;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn scores(board: &Leaderboard) -> Vec<u32> {
    board.entries().iter().map(|e| e.score).collect()
}

fn entry(name: &str, score: u32) -> LeaderboardEntry {
    LeaderboardEntry::new(name, score)
}

/// Storage whose writes always fail.
struct BrokenStorage;

impl Storage for BrokenStorage {
    fn load(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn save(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
    }
}

// ── Leaderboard ───────────────────────────────────────────────────────────────

#[test]
fn records_sort_descending() {
    let mut board = Leaderboard::new(5);
    for s in [10, 50, 30] {
        board.record(entry("p", s));
    }
    assert_eq!(scores(&board), vec![50, 30, 10]);
}

#[test]
fn record_truncates_to_cap() {
    let mut board = Leaderboard::new(5);
    for s in [1, 2, 3, 4, 5, 6, 7] {
        board.record(entry("p", s));
    }
    assert_eq!(scores(&board), vec![7, 6, 5, 4, 3]);
}

#[test]
fn record_returns_rank_or_none() {
    let mut board = Leaderboard::new(3);
    assert_eq!(board.record(entry("a", 20)), Some(0));
    assert_eq!(board.record(entry("b", 30)), Some(0));
    assert_eq!(board.record(entry("c", 25)), Some(1));
    assert_eq!(board.record(entry("d", 5)), None); // fell off the end
    assert_eq!(board.len(), 3);
}

#[test]
fn ties_keep_older_entry_first() {
    let mut board = Leaderboard::new(5);
    board.record(entry("first", 10));
    assert_eq!(board.record(entry("second", 10)), Some(1));
    let names: Vec<&str> = board.entries().iter().map(|e| e.display_name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn tie_at_the_cap_is_dropped() {
    let mut board = Leaderboard::new(2);
    board.record(entry("a", 10));
    board.record(entry("b", 10));
    assert_eq!(board.record(entry("c", 10)), None);
    assert!(board.entries().iter().all(|e| e.display_name != "c"));
}

#[test]
fn invariants_hold_for_random_sequences() {
    let mut rng = StdRng::seed_from_u64(7);
    for cap in [1, 5, 10] {
        let mut board = Leaderboard::new(cap);
        for _ in 0..300 {
            board.record(entry("p", rng.gen_range(0..1000)));
            assert!(board.len() <= cap);
            assert!(scores(&board).windows(2).all(|w| w[0] >= w[1]));
        }
    }
}

#[test]
fn new_board_records_up_to_its_cap() {
    let mut board = Leaderboard::new(1);
    assert_eq!(board.cap(), 1);
    assert_eq!(board.record(entry("a", 0)), Some(0));
    assert_eq!(board.len(), 1);
}

#[test]
fn from_entries_normalizes() {
    let raw = (0..8).map(|s| entry("p", s)).collect();
    let board = Leaderboard::from_entries(raw, 5);
    assert_eq!(scores(&board), vec![7, 6, 5, 4, 3]);
}

#[test]
fn rank_labels() {
    assert_eq!(rank_label(0), "🥇");
    assert_eq!(rank_label(1), "🥈");
    assert_eq!(rank_label(2), "🥉");
    assert_eq!(rank_label(3), "4");
    assert_eq!(rank_label(9), "10");
}

// ── LeaderboardStore ──────────────────────────────────────────────────────────

#[test]
fn store_starts_empty_on_first_run() {
    let store = LeaderboardStore::open(MemoryStorage::new(), 5);
    assert!(store.board().is_empty());
}

#[test]
fn store_persists_every_record() {
    let mut store = LeaderboardStore::open(MemoryStorage::new(), 5);
    store.record(entry("robin", 10));
    store.record(entry("wren", 50));

    let json = store.storage().get(STORAGE_KEY).unwrap();
    let persisted: Vec<LeaderboardEntry> = serde_json::from_str(json).unwrap();
    assert_eq!(persisted, vec![entry("wren", 50), entry("robin", 10)]);
}

#[test]
fn store_reopens_what_was_persisted() {
    let mut store = LeaderboardStore::open(MemoryStorage::new(), 5);
    store.record(entry("robin", 10));
    store.record(entry("wren", 50));
    let storage = store.storage().clone();

    let reopened = LeaderboardStore::open(storage, 5);
    assert_eq!(scores(reopened.board()), vec![50, 10]);
}

#[test]
fn corrupt_data_loads_as_empty() {
    let mut storage = MemoryStorage::new();
    storage.insert(STORAGE_KEY, "{ this is not a leaderboard");
    let mut store = LeaderboardStore::open(storage, 5);
    assert!(store.board().is_empty());
    assert!(store.load().is_empty());

    // Recording afterwards overwrites the corrupt value.
    store.record(entry("robin", 3));
    let reopened = LeaderboardStore::open(store.storage().clone(), 5);
    assert_eq!(scores(reopened.board()), vec![3]);
}

#[test]
fn oversized_persisted_data_is_truncated_on_load() {
    let mut storage = MemoryStorage::new();
    let raw: Vec<LeaderboardEntry> = (0..12).map(|s| entry("p", s)).collect();
    storage.insert(STORAGE_KEY, &serde_json::to_string(&raw).unwrap());
    let store = LeaderboardStore::open(storage, 10);
    assert_eq!(store.board().len(), 10);
    assert_eq!(scores(store.board())[0], 11);
}

#[test]
fn reopening_with_the_configured_cap_keeps_every_entry() {
    let config = GameConfig::for_preset(Preset::Standard)
        .with_overrides(r#"{ "leaderboard_cap": 12 }"#)
        .unwrap();
    let mut store = LeaderboardStore::open(MemoryStorage::new(), config.leaderboard_cap);
    for s in 0..12 {
        store.record(entry("p", s));
    }

    let reopened = LeaderboardStore::open(store.storage().clone(), config.leaderboard_cap);
    assert_eq!(reopened.board().len(), 12);
    let preset_cap = GameConfig::for_preset(Preset::Standard).leaderboard_cap;
    let truncated = LeaderboardStore::open(store.storage().clone(), preset_cap);
    assert_eq!(truncated.board().len(), 10);
}

#[test]
fn failed_persist_keeps_in_memory_board() {
    let mut store = LeaderboardStore::open(BrokenStorage, 5);
    assert_eq!(store.record(entry("robin", 10)), Some(0));
    assert_eq!(scores(store.board()), vec![10]);
}

// ── FileStorage ───────────────────────────────────────────────────────────────

#[test]
fn file_storage_missing_key_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    assert!(storage.load(STORAGE_KEY).unwrap().is_none());
}

#[test]
fn file_storage_round_trip_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("leaderboards").join("casual");

    let mut store = LeaderboardStore::open(FileStorage::new(&nested), 5);
    for s in [10, 50, 30] {
        store.record(entry("p", s));
    }
    assert!(nested.join("leaderboard.json").exists());

    let reopened = LeaderboardStore::open(FileStorage::new(&nested), 5);
    assert_eq!(scores(reopened.board()), vec![50, 30, 10]);
}
