use bird_archer::config::*;
use bird_archer::error::ConfigError;

use std::time::Duration;

#[test]
fn presets_carry_their_tables() {
    let casual = GameConfig::for_preset(Preset::Casual);
    assert_eq!(casual.special_chance, 0.20);
    assert_eq!(casual.points_per_hit, 1);
    assert_eq!(casual.leaderboard_cap, 5);
    assert!(casual.bob_amplitude > 0.0);

    let standard = GameConfig::for_preset(Preset::Standard);
    assert_eq!(standard.special_chance, 0.15);
    assert_eq!(standard.points_per_hit, 10);
    assert_eq!(standard.leaderboard_cap, 10);
    assert_eq!(standard.bob_amplitude, 0.0);

    let arcade = GameConfig::for_preset(Preset::Arcade);
    assert_eq!(arcade.special_chance, 0.10);
}

#[test]
fn every_preset_validates() {
    for preset in Preset::ALL {
        GameConfig::for_preset(preset).validate().unwrap();
    }
}

#[test]
fn default_timing() {
    let c = GameConfig::default();
    assert_eq!(c.spawn_interval(), Duration::from_millis(1500));
    assert_eq!(c.frame_interval(), Duration::from_millis(33));
    assert_eq!(c.max_lives, 3);
    assert_eq!(c.default_name, "YOU");
}

#[test]
fn validate_rejects_bad_values() {
    let base = GameConfig::default();
    let bad = [
        GameConfig { max_lives: 0, ..base.clone() },
        GameConfig { leaderboard_cap: 0, ..base.clone() },
        GameConfig { special_chance: 1.5, ..base.clone() },
        GameConfig { special_chance: -0.1, ..base.clone() },
        GameConfig { spawn_interval_ms: 0, ..base.clone() },
        GameConfig { speed_min: 1.0, speed_max: 1.0, ..base.clone() },
        GameConfig { projectile_speed: 0.0, ..base.clone() },
        GameConfig { top_margin: -1.0, ..base.clone() },
    ];
    for config in bad {
        assert!(
            matches!(config.validate(), Err(ConfigError::Invalid(_))),
            "accepted {config:?}"
        );
    }
}

#[test]
fn validate_field_needs_a_spawn_band() {
    let c = GameConfig::default(); // margins 3 + 5
    assert!(c.validate_field(20).is_ok());
    assert!(matches!(
        c.validate_field(8),
        Err(ConfigError::FieldTooSmall { height: 8 })
    ));
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let c = GameConfig::from_json_str(r#"{ "max_lives": 5 }"#).unwrap();
    assert_eq!(c.max_lives, 5);
    assert_eq!(c.points_per_hit, GameConfig::default().points_per_hit);
}

#[test]
fn overrides_apply_on_top_of_preset() {
    let arcade = GameConfig::for_preset(Preset::Arcade);
    let c = arcade
        .with_overrides(r#"{ "spawn_interval_ms": 1000, "default_name": "archer" }"#)
        .unwrap();
    assert_eq!(c.spawn_interval_ms, 1000);
    assert_eq!(c.default_name, "archer");
    assert_eq!(c.special_chance, 0.10);
    assert_eq!(c.points_per_hit, 10);
}

#[test]
fn overrides_are_validated() {
    let err = GameConfig::default()
        .with_overrides(r#"{ "special_chance": 2.0 }"#)
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = GameConfig::default().with_overrides("not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn shots_resolve_instantly_unless_configured() {
    for preset in Preset::ALL {
        assert_eq!(GameConfig::for_preset(preset).shot_model, ShotModel::Instant);
    }
    let travel = GameConfig::default()
        .with_overrides(r#"{ "shot_model": "travel" }"#)
        .unwrap();
    assert_eq!(travel.shot_model, ShotModel::Travel);
    assert!(GameConfig::default()
        .with_overrides(r#"{ "shot_model": "homing" }"#)
        .is_err());
}
