//! Capped, score-sorted, persisted list of past runs.
//!
//! `Leaderboard` is the in-memory collection and owns the ordering and
//! truncation rules.  `LeaderboardStore` pairs it with a `Storage` backend
//! that keeps the list under one fixed key.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::entities::LeaderboardEntry;
use crate::error::StoreError;

/// Key the leaderboard is stored under.
pub const STORAGE_KEY: &str = "leaderboard";

// ── In-memory collection ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    cap: usize,
}

impl Leaderboard {
    pub fn new(cap: usize) -> Self {
        Leaderboard {
            entries: Vec::new(),
            cap,
        }
    }

    /// Sort and truncate arbitrary (possibly hand-edited) entries.
    pub fn from_entries(entries: Vec<LeaderboardEntry>, cap: usize) -> Self {
        let mut board = Leaderboard { entries, cap };
        board.normalize();
        board
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert, re-sort descending and truncate.  Returns the 0-based rank of
    /// the new entry, or `None` if it fell off the end.  Ties keep the older
    /// entry ahead.
    pub fn record(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        // Entries are kept sorted, and the stable sort below places the new
        // entry after every existing one with an equal or higher score.
        let rank = self.entries.iter().filter(|e| e.score >= entry.score).count();
        self.entries.push(entry);
        self.normalize();
        (rank < self.cap).then_some(rank)
    }

    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(self.cap);
    }
}

/// Medal for the top three, 1-based rank number otherwise.
pub fn rank_label(rank: usize) -> String {
    match rank {
        0 => "🥇".to_string(),
        1 => "🥈".to_string(),
        2 => "🥉".to_string(),
        n => (n + 1).to_string(),
    }
}

// ── Storage backends ──────────────────────────────────────────────────────────

/// Key/value persistence for serialized state.
pub trait Storage {
    /// `Ok(None)` when nothing has been stored under `key` yet.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.insert(key, value);
        Ok(())
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// The persisted leaderboard.  The in-memory copy stays authoritative when
/// the backend fails; failures are logged, never surfaced to the run.
#[derive(Debug)]
pub struct LeaderboardStore<S: Storage> {
    storage: S,
    board: Leaderboard,
}

impl<S: Storage> LeaderboardStore<S> {
    /// Open the store, reading whatever is already persisted.
    pub fn open(storage: S, cap: usize) -> Self {
        let board = read_board(&storage, cap);
        LeaderboardStore { storage, board }
    }

    /// Re-read the persisted collection; empty if missing or corrupt.
    pub fn load(&mut self) -> &Leaderboard {
        self.board = read_board(&self.storage, self.board.cap());
        &self.board
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Insert, sort, truncate and persist.  Returns the new entry's rank.
    pub fn record(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self.board.record(entry);
        if let Err(e) = self.persist() {
            log::warn!("could not persist leaderboard: {e}");
        }
        rank
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self.board.entries())?;
        self.storage.save(STORAGE_KEY, &json)
    }
}

fn read_board<S: Storage>(storage: &S, cap: usize) -> Leaderboard {
    let raw = match storage.load(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Leaderboard::new(cap),
        Err(e) => {
            log::warn!("could not read leaderboard, starting empty: {e}");
            return Leaderboard::new(cap);
        }
    };
    match serde_json::from_str::<Vec<LeaderboardEntry>>(&raw) {
        Ok(entries) => Leaderboard::from_entries(entries, cap),
        Err(e) => {
            log::warn!("leaderboard data is corrupt, starting empty: {e}");
            Leaderboard::new(cap)
        }
    }
}
