//! Session controller: owns one run's field, timers and leaderboard, and moves
//! between `Idle`, `Running` and `GameOver`.
//!
//! Time is injected.  `advance` receives the wall-clock time that passed and
//! fires the spawn timer and the frame loop in deadline order, so tests can
//! replay minutes of play in microseconds with a seeded RNG.

use std::time::Duration;

use rand::Rng;

use crate::compute;
use crate::config::{GameConfig, ShotModel};
use crate::entities::{Field, GameEvent, LeaderboardEntry, Phase, Point, Projectile, Stats, Target};
use crate::error::ConfigError;
use crate::identity::Identity;
use crate::leaderboard::{Leaderboard, LeaderboardStore, Storage};
use crate::timer::Ticker;

/// Read-only snapshot handed to the renderer once per frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub targets: &'a [Target],
    pub projectiles: &'a [Projectile],
    pub stats: Stats,
    pub phase: Phase,
    /// Where the archer stands.
    pub launch: Point,
    pub width: u16,
    pub height: u16,
}

/// Render collaborator.  The core knows nothing about pixels or terminals.
pub trait FrameSink {
    type Error;

    fn render_frame(&mut self, view: &FrameView<'_>) -> Result<(), Self::Error>;
}

/// Outcome of the last finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunResult {
    pub display_name: String,
    pub score: u32,
    /// 0-based leaderboard position, if the score made the list.
    pub rank: Option<usize>,
}

pub struct Session<S: Storage, I: Identity> {
    config: GameConfig,
    phase: Phase,
    field: Field,
    /// Time since the run started; drives the bob.
    clock: Duration,
    spawn_timer: Option<Ticker>,
    frame_loop: Option<Ticker>,
    store: LeaderboardStore<S>,
    identity: I,
    last_result: Option<RunResult>,
}

impl<S: Storage, I: Identity> Session<S, I> {
    /// Build an idle session for a `width`×`height` field.
    pub fn new(
        config: GameConfig,
        width: u16,
        height: u16,
        storage: S,
        identity: I,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.validate_field(height)?;
        let store = LeaderboardStore::open(storage, config.leaderboard_cap);
        Ok(Session {
            field: compute::init_field(&config, width, height),
            config,
            phase: Phase::Idle,
            clock: Duration::ZERO,
            spawn_timer: None,
            frame_loop: None,
            store,
            identity,
            last_result: None,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> Stats {
        self.field.stats
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        self.store.board()
    }

    pub fn store(&self) -> &LeaderboardStore<S> {
        &self.store
    }

    pub fn last_result(&self) -> Option<&RunResult> {
        self.last_result.as_ref()
    }

    /// Number of armed scheduled tasks (spawn timer + frame loop).
    pub fn active_tasks(&self) -> usize {
        self.spawn_timer.iter().count() + self.frame_loop.iter().count()
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            targets: &self.field.targets,
            projectiles: &self.field.projectiles,
            stats: self.field.stats,
            phase: self.phase,
            launch: compute::launch_point(self.field.width, self.field.height),
            width: self.field.width,
            height: self.field.height,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// `Idle`/`GameOver` → `Running`.  Ignored while a run is in progress.
    pub fn start(&mut self) {
        if self.phase == Phase::Running {
            log::debug!("start ignored: run already in progress");
            return;
        }
        self.teardown();
        self.field = compute::init_field(&self.config, self.field.width, self.field.height);
        self.clock = Duration::ZERO;
        self.spawn_timer = Some(Ticker::new(self.config.spawn_interval()));
        self.frame_loop = Some(Ticker::new(self.config.frame_interval()));
        self.phase = Phase::Running;
        log::info!(
            "run started ({}x{}, {} lives)",
            self.field.width,
            self.field.height,
            self.config.max_lives
        );
    }

    /// Start over, abandoning any run in progress without recording it.
    pub fn restart(&mut self) {
        self.teardown();
        self.phase = Phase::Idle;
        self.start();
    }

    /// Back to the menu.  A run in progress is abandoned without recording.
    pub fn go_home(&mut self) {
        if self.phase == Phase::Running {
            log::info!("run abandoned at score {}", self.field.stats.score);
        }
        self.teardown();
        self.phase = Phase::Idle;
    }

    /// Adopt a new field size between runs.  Ignored while a run is in
    /// progress so live birds never end up outside the field.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), ConfigError> {
        if self.phase == Phase::Running {
            return Ok(());
        }
        self.config.validate_field(height)?;
        self.field.width = width;
        self.field.height = height;
        Ok(())
    }

    /// Re-read the persisted leaderboard (menu display).
    pub fn reload_leaderboard(&mut self) -> &Leaderboard {
        self.store.load()
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// A tap at `(x, y)`.  Returns `None` when no run is in progress.
    ///
    /// With `ShotModel::Instant` the tap is resolved immediately and the
    /// returned events say what happened, including a `GameOver` when a
    /// miss costs the last life.  With `ShotModel::Travel` it launches an
    /// arrow and reports nothing until the arrow lands.
    pub fn tap(&mut self, x: f32, y: f32) -> Option<Vec<GameEvent>> {
        if self.phase != Phase::Running {
            return None;
        }
        let at = Point::new(x, y);
        match self.config.shot_model {
            ShotModel::Travel => {
                self.field = compute::shoot(&self.field, &self.config, at);
                Some(Vec::new())
            }
            ShotModel::Instant => {
                let (field, event) = compute::strike(&self.field, &self.config, at);
                self.field = field;
                log::debug!("{event:?}");
                let mut events = vec![event];
                if self.field.stats.lives == 0 {
                    events.push(self.finish_run());
                }
                Some(events)
            }
        }
    }

    // ── Time ─────────────────────────────────────────────────────────────────

    /// Let `elapsed` pass, firing spawn and frame ticks as their deadlines
    /// come up (spawn first on a shared deadline).  `sink` renders once per
    /// frame tick.  Time left over after the run ends is discarded.
    pub fn advance<R: Rng, F: FrameSink>(
        &mut self,
        elapsed: Duration,
        rng: &mut R,
        sink: &mut F,
    ) -> Result<Vec<GameEvent>, F::Error> {
        let mut events = Vec::new();
        let mut budget = elapsed;

        while self.phase == Phase::Running {
            let next = self
                .spawn_timer
                .iter()
                .chain(self.frame_loop.iter())
                .map(Ticker::until_next)
                .min();
            let Some(next) = next else { break };
            let step = next.min(budget);

            self.clock += step;
            budget -= step;
            let spawn_due = self.spawn_timer.as_mut().is_some_and(|t| t.consume(step));
            let frame_due = self.frame_loop.as_mut().is_some_and(|t| t.consume(step));

            if spawn_due {
                self.on_spawn(rng, &mut events);
            }
            if frame_due {
                self.on_frame(sink, &mut events)?;
            }
            if !spawn_due && !frame_due {
                // Budget exhausted before the next deadline.
                break;
            }
        }

        Ok(events)
    }

    fn on_spawn<R: Rng>(&mut self, rng: &mut R, events: &mut Vec<GameEvent>) {
        if self.phase != Phase::Running {
            return;
        }
        let (field, target) = compute::spawn(&self.field, &self.config, rng);
        self.field = field;
        log::debug!(
            "spawned {} bird at y={:.1} speed={:.2}",
            if target.special { "special" } else { "normal" },
            target.pos.y,
            target.speed
        );
        events.push(GameEvent::Spawned {
            special: target.special,
        });
    }

    fn on_frame<F: FrameSink>(
        &mut self,
        sink: &mut F,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), F::Error> {
        if self.phase != Phase::Running {
            return Ok(());
        }
        let (field, frame_events) =
            compute::tick(&self.field, &self.config, self.clock.as_secs_f32());
        self.field = field;
        for event in &frame_events {
            log::debug!("{event:?}");
        }
        events.extend(frame_events);

        if self.field.stats.lives == 0 {
            events.push(self.finish_run());
        }
        sink.render_frame(&self.view())
    }

    /// `Running` → `GameOver`: stop both timers, drop what is still flying and
    /// record the score.
    fn finish_run(&mut self) -> GameEvent {
        self.teardown();
        self.phase = Phase::GameOver;

        let score = self.field.stats.score;
        let display_name = self
            .identity
            .display_name()
            .unwrap_or_else(|| self.config.default_name.clone());
        let rank = self
            .store
            .record(LeaderboardEntry::new(display_name.clone(), score));
        log::info!("game over: {display_name} scored {score} (rank {rank:?})");

        self.last_result = Some(RunResult {
            display_name,
            score,
            rank,
        });
        GameEvent::GameOver { score, rank }
    }

    /// Cancel both scheduled tasks and clear live entities.
    fn teardown(&mut self) {
        self.spawn_timer = None;
        self.frame_loop = None;
        self.field.targets.clear();
        self.field.projectiles.clear();
    }
}
