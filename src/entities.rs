//! All game entity types — pure data, no logic.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Menu shown, nothing live.
    Idle,
    Running,
    /// Terminal for the run; the leaderboard has already been updated.
    GameOver,
}

/// A point in play-field coordinates (fractional columns / rows).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ── Targets ───────────────────────────────────────────────────────────────────

/// A bird flying right-to-left across the field.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub pos: Point,
    /// Row the bird was spawned on; the bob oscillates around it.
    pub base_y: f32,
    /// Hit radius in cells.
    pub radius: f32,
    /// Columns travelled per frame.
    pub speed: f32,
    /// Special birds restore a life instead of scoring.
    pub special: bool,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// An arrow travelling from the launch point to where the player clicked.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub origin: Point,
    pub destination: Point,
    pub pos: Point,
    /// Cells travelled per frame.
    pub speed: f32,
    /// Set on the frame the arrow reaches its destination.
    pub arrived: bool,
}

impl Projectile {
    pub fn launch(origin: Point, destination: Point, speed: f32) -> Self {
        Projectile {
            origin,
            destination,
            pos: origin,
            speed,
            arrived: false,
        }
    }
}

// ── Score & lives ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stats {
    pub score: u32,
    pub lives: u32,
    pub max_lives: u32,
}

impl Stats {
    pub fn fresh(max_lives: u32) -> Self {
        Stats {
            score: 0,
            lives: max_lives,
            max_lives,
        }
    }
}

/// Everything alive during one frame of a run.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub targets: Vec<Target>,
    pub projectiles: Vec<Projectile>,
    pub stats: Stats,
    pub width: u16,
    pub height: u16,
}

// ── Gameplay events ───────────────────────────────────────────────────────────

/// Something noteworthy that happened while advancing a run.  Front ends use
/// these for feedback messages; tests use them to observe the core.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Spawned { special: bool },
    /// A special hit at full lives has `life_restored == false`.
    Hit { special: bool, life_restored: bool },
    /// A bird crossed the far edge unhit and cost a life.
    Escaped { lives_left: u32 },
    /// A tap found no bird and cost a life.
    Missed { lives_left: u32 },
    /// `rank` is the 0-based leaderboard position, if the score made the list.
    GameOver { score: u32, rank: Option<usize> },
}

// ── Leaderboard ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub display_name: String,
    pub score: u32,
}

impl LeaderboardEntry {
    pub fn new(display_name: impl Into<String>, score: u32) -> Self {
        LeaderboardEntry {
            display_name: display_name.into(),
            score,
        }
    }
}
