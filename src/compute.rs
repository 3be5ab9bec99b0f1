//! Pure game-logic functions.
//!
//! Every public function takes immutable references to the current `Field`
//! (or a single entity) plus the `GameConfig`, and returns brand-new values.
//! Side effects are limited to the injected RNG.  Entities are never removed
//! from a collection while it is being walked: each step builds the live set
//! for the next frame instead.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Field, GameEvent, Point, Projectile, Stats, Target};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build an empty field with full lives.
pub fn init_field(config: &GameConfig, width: u16, height: u16) -> Field {
    Field {
        targets: Vec::new(),
        projectiles: Vec::new(),
        stats: Stats::fresh(config.max_lives),
        width,
        height,
    }
}

/// Where arrows are launched from: the archer, bottom centre of the field.
pub fn launch_point(width: u16, height: u16) -> Point {
    Point::new((width / 2) as f32, height.saturating_sub(4) as f32)
}

// ── Spawner ──────────────────────────────────────────────────────────────────

/// Create one bird at the right edge with a random row, speed and kind.
///
/// The caller must have checked `GameConfig::validate_field` for `height`.
pub fn spawn_target(config: &GameConfig, width: u16, height: u16, rng: &mut impl Rng) -> Target {
    let y = rng.gen_range(config.top_margin..(height as f32 - config.bottom_margin));
    let speed = rng.gen_range(config.speed_min..config.speed_max);
    let special = rng.gen_bool(config.special_chance);
    Target {
        pos: Point::new(width as f32, y),
        base_y: y,
        radius: config.target_radius,
        speed,
        special,
    }
}

pub fn spawn(field: &Field, config: &GameConfig, rng: &mut impl Rng) -> (Field, Target) {
    let target = spawn_target(config, field.width, field.height, rng);
    let mut targets = field.targets.clone();
    targets.push(target.clone());
    (
        Field {
            targets,
            ..field.clone()
        },
        target,
    )
}

// ── Input ────────────────────────────────────────────────────────────────────

/// Launch an arrow from the archer toward `at`.
pub fn shoot(field: &Field, config: &GameConfig, at: Point) -> Field {
    let origin = launch_point(field.width, field.height);
    let mut projectiles = field.projectiles.clone();
    projectiles.push(Projectile::launch(origin, at, config.projectile_speed));
    Field {
        projectiles,
        ..field.clone()
    }
}

/// Resolve a tap on the spot.  The first live bird (collection order) whose
/// radius contains `at` is hit and removed; a tap on empty sky costs a life.
pub fn strike(field: &Field, config: &GameConfig, at: Point) -> (Field, GameEvent) {
    let hit = field
        .targets
        .iter()
        .position(|t| at.distance(&t.pos) < t.radius);

    let Some(ti) = hit else {
        let stats = lose_life(&field.stats);
        return (
            Field {
                stats,
                ..field.clone()
            },
            GameEvent::Missed {
                lives_left: stats.lives,
            },
        );
    };

    let target = &field.targets[ti];
    let stats = apply_hit(&field.stats, target, config);
    let event = GameEvent::Hit {
        special: target.special,
        life_restored: stats.lives > field.stats.lives,
    };
    let targets = field
        .targets
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != ti)
        .map(|(_, t)| t.clone())
        .collect();
    (
        Field {
            targets,
            stats,
            ..field.clone()
        },
        event,
    )
}

// ── Entity motion ────────────────────────────────────────────────────────────

/// Fly one frame to the left; bob around the spawn row when enabled.
/// `elapsed_secs` is the run clock, so every bird bobs in phase.
pub fn advance_target(target: &Target, config: &GameConfig, elapsed_secs: f32) -> Target {
    let y = if config.bob_amplitude > 0.0 {
        target.base_y + (elapsed_secs * config.bob_frequency).sin() * config.bob_amplitude
    } else {
        target.base_y
    };
    Target {
        pos: Point::new(target.pos.x - target.speed, y),
        ..target.clone()
    }
}

pub fn is_escaped(target: &Target, config: &GameConfig) -> bool {
    target.pos.x < -config.expire_margin
}

/// Move one frame toward the destination.  When the remaining distance fits
/// in one step (including a zero-length shot) the arrow snaps onto the
/// destination instead of normalizing the direction.
pub fn advance_projectile(projectile: &Projectile) -> Projectile {
    if projectile.arrived {
        return projectile.clone();
    }
    let remaining = projectile.pos.distance(&projectile.destination);
    if remaining <= projectile.speed {
        return Projectile {
            pos: projectile.destination,
            arrived: true,
            ..projectile.clone()
        };
    }
    let k = projectile.speed / remaining;
    let pos = Point::new(
        projectile.pos.x + (projectile.destination.x - projectile.pos.x) * k,
        projectile.pos.y + (projectile.destination.y - projectile.pos.y) * k,
    );
    Projectile {
        pos,
        ..projectile.clone()
    }
}

// ── Collision detection ──────────────────────────────────────────────────────

/// Next-frame live sets after resolving hits, plus the birds that were hit.
#[derive(Clone, Debug, PartialEq)]
pub struct Collisions {
    pub projectiles: Vec<Projectile>,
    pub targets: Vec<Target>,
    pub hits: Vec<Target>,
}

/// All-pairs check: a hit is a distance strictly below the bird's radius.
///
/// Each arrow resolves at most the first live bird in range (collection
/// order), and each bird can be consumed only once.  Other overlaps stay live
/// and are retried next frame.
pub fn resolve_collisions(projectiles: &[Projectile], targets: &[Target]) -> Collisions {
    let mut consumed = vec![false; targets.len()];
    let mut live_projectiles = Vec::with_capacity(projectiles.len());
    let mut hits = Vec::new();

    for projectile in projectiles {
        let hit = (0..targets.len()).find(|&ti| {
            !consumed[ti] && projectile.pos.distance(&targets[ti].pos) < targets[ti].radius
        });
        match hit {
            Some(ti) => {
                consumed[ti] = true;
                hits.push(targets[ti].clone());
            }
            None => live_projectiles.push(projectile.clone()),
        }
    }

    let live_targets = targets
        .iter()
        .zip(&consumed)
        .filter(|(_, gone)| !**gone)
        .map(|(t, _)| t.clone())
        .collect();

    Collisions {
        projectiles: live_projectiles,
        targets: live_targets,
        hits,
    }
}

// ── Score & lives ────────────────────────────────────────────────────────────

/// Special birds restore a life (clamped); normal birds score.  Never costs a
/// life.
pub fn apply_hit(stats: &Stats, target: &Target, config: &GameConfig) -> Stats {
    if target.special {
        Stats {
            lives: (stats.lives + 1).min(stats.max_lives),
            ..*stats
        }
    } else {
        Stats {
            score: stats.score + config.points_per_hit,
            ..*stats
        }
    }
}

pub fn lose_life(stats: &Stats) -> Stats {
    Stats {
        lives: stats.lives.saturating_sub(1),
        ..*stats
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the field by one frame.
///
/// Order: move arrows, move birds, resolve hits (an arrow landing on a bird
/// this frame still counts), drop arrows that arrived, then drop escaped
/// birds, each costing a life until none are left.
pub fn tick(field: &Field, config: &GameConfig, elapsed_secs: f32) -> (Field, Vec<GameEvent>) {
    let mut events = Vec::new();

    // ── 1. Motion ────────────────────────────────────────────────────────────
    let projectiles: Vec<Projectile> = field.projectiles.iter().map(advance_projectile).collect();
    let targets: Vec<Target> = field
        .targets
        .iter()
        .map(|t| advance_target(t, config, elapsed_secs))
        .collect();

    // ── 2. Hits ──────────────────────────────────────────────────────────────
    let collisions = resolve_collisions(&projectiles, &targets);
    let mut stats = field.stats;
    for target in &collisions.hits {
        let next = apply_hit(&stats, target, config);
        events.push(GameEvent::Hit {
            special: target.special,
            life_restored: next.lives > stats.lives,
        });
        stats = next;
    }

    // ── 3. Arrows that landed on empty sky ───────────────────────────────────
    let projectiles: Vec<Projectile> = collisions
        .projectiles
        .into_iter()
        .filter(|p| !p.arrived)
        .collect();

    // ── 4. Escaped birds ─────────────────────────────────────────────────────
    let (escaped, targets): (Vec<Target>, Vec<Target>) = collisions
        .targets
        .into_iter()
        .partition(|t| is_escaped(t, config));
    for _ in &escaped {
        if stats.lives == 0 {
            break;
        }
        stats = lose_life(&stats);
        events.push(GameEvent::Escaped {
            lives_left: stats.lives,
        });
    }

    (
        Field {
            targets,
            projectiles,
            stats,
            ..field.clone()
        },
        events,
    )
}
