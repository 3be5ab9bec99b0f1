//! Gameplay tuning: named presets plus a validated, serde-loadable config.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preset {
    /// Bobbing birds, frequent special ducks, one point per hit, top 5.
    Casual,
    Standard,
    /// Rare special ducks.
    Arcade,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Casual, Preset::Standard, Preset::Arcade];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Casual => "Casual",
            Preset::Standard => "Standard",
            Preset::Arcade => "Arcade",
        }
    }

    /// Directory name for this preset's leaderboard; scores are not comparable
    /// across presets.
    pub fn slug(self) -> &'static str {
        match self {
            Preset::Casual => "casual",
            Preset::Standard => "standard",
            Preset::Arcade => "arcade",
        }
    }
}

/// How a tap turns into a shot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotModel {
    /// The tap resolves on the spot: a bird under it is hit, empty sky costs
    /// a life.
    #[default]
    Instant,
    /// An arrow flies from the archer to the tap point and hits whatever it
    /// meets on the way.  Landing on empty sky costs nothing.
    Travel,
}

// ── Preset tables ─────────────────────────────────────────────────────────────

fn special_chance(preset: Preset) -> f64 {
    match preset {
        Preset::Casual => 0.20,
        Preset::Standard => 0.15,
        Preset::Arcade => 0.10,
    }
}

fn points_per_hit(preset: Preset) -> u32 {
    match preset {
        Preset::Casual => 1,
        Preset::Standard | Preset::Arcade => 10,
    }
}

fn leaderboard_cap(preset: Preset) -> usize {
    match preset {
        Preset::Casual => 5,
        Preset::Standard | Preset::Arcade => 10,
    }
}

fn bob_amplitude(preset: Preset) -> f32 {
    match preset {
        Preset::Casual => 0.5,
        Preset::Standard | Preset::Arcade => 0.0,
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub spawn_interval_ms: u64,
    /// Frame-loop period (≈30 FPS).
    pub frame_interval_ms: u64,
    /// Probability that a spawned bird is special.
    pub special_chance: f64,
    pub points_per_hit: u32,
    pub max_lives: u32,
    pub leaderboard_cap: usize,
    pub target_radius: f32,
    /// Bird speed range in columns per frame, `[speed_min, speed_max)`.
    pub speed_min: f32,
    pub speed_max: f32,
    pub shot_model: ShotModel,
    /// Arrow speed in cells per frame (`ShotModel::Travel` only).
    pub projectile_speed: f32,
    /// Rows kept free above the spawn band (HUD and border).
    pub top_margin: f32,
    /// Rows kept free below the spawn band (archer).
    pub bottom_margin: f32,
    /// How far past the left edge a bird must fly before it counts as escaped.
    pub expire_margin: f32,
    /// Vertical bob in rows; zero disables it.
    pub bob_amplitude: f32,
    /// Bob angular frequency in radians per second.
    pub bob_frequency: f32,
    /// Name recorded when no player identity is available.
    pub default_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::for_preset(Preset::Casual)
    }
}

impl GameConfig {
    pub fn for_preset(preset: Preset) -> Self {
        GameConfig {
            spawn_interval_ms: 1500,
            frame_interval_ms: 33,
            special_chance: special_chance(preset),
            points_per_hit: points_per_hit(preset),
            max_lives: 3,
            leaderboard_cap: leaderboard_cap(preset),
            target_radius: 1.5,
            speed_min: 0.3,
            speed_max: 0.8,
            shot_model: ShotModel::Instant,
            projectile_speed: 2.5,
            top_margin: 3.0,
            bottom_margin: 5.0,
            expire_margin: 3.0,
            bob_amplitude: bob_amplitude(preset),
            bob_frequency: 10.0,
            default_name: "YOU".to_string(),
        }
    }

    /// Parse a (possibly partial) JSON override.  Missing fields take the
    /// Casual defaults; the result is validated.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay the keys of a JSON object onto this config, so a user file
    /// only needs the fields it changes.  The result is validated.
    pub fn with_overrides(&self, json: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(self)?;
        if let (Some(base), Some(patch)) = (merged.as_object_mut(), overrides.as_object()) {
            for (key, value) in patch {
                base.insert(key.clone(), value.clone());
            }
        }
        let config: GameConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Reject values that would panic the RNG or make a run unplayable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lives == 0 {
            return Err(ConfigError::Invalid("max_lives must be at least 1".into()));
        }
        if self.leaderboard_cap == 0 {
            return Err(ConfigError::Invalid("leaderboard_cap must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.special_chance) {
            return Err(ConfigError::Invalid(format!(
                "special_chance {} is outside [0, 1]",
                self.special_chance
            )));
        }
        if self.spawn_interval_ms == 0 || self.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid("timer intervals must be non-zero".into()));
        }
        if !(self.speed_min > 0.0 && self.speed_min < self.speed_max) {
            return Err(ConfigError::Invalid(format!(
                "speed range [{}, {}) is empty",
                self.speed_min, self.speed_max
            )));
        }
        if self.projectile_speed <= 0.0 || self.target_radius <= 0.0 {
            return Err(ConfigError::Invalid(
                "projectile_speed and target_radius must be positive".into(),
            ));
        }
        if self.top_margin < 0.0 || self.bottom_margin < 0.0 || self.expire_margin < 0.0 {
            return Err(ConfigError::Invalid("margins must not be negative".into()));
        }
        Ok(())
    }

    /// Check that the field leaves a non-empty vertical band to spawn in.
    pub fn validate_field(&self, height: u16) -> Result<(), ConfigError> {
        if self.top_margin >= height as f32 - self.bottom_margin {
            return Err(ConfigError::FieldTooSmall { height });
        }
        Ok(())
    }
}
