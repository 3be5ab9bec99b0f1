mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    style::Color,
    terminal, ExecutableCommand,
};
use directories::ProjectDirs;
use rand::thread_rng;

use bird_archer::config::{GameConfig, Preset};
use bird_archer::entities::{GameEvent, Phase};
use bird_archer::identity::EnvIdentity;
use bird_archer::leaderboard::{FileStorage, LeaderboardStore};
use bird_archer::session::{FrameSink, Session};

use display::TerminalSink;

/// Pace of the outer loop; the session's own frame timer decides when a
/// frame actually ticks.
const FRAME: Duration = Duration::from_millis(16);

// ── Paths, config & logging ───────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "bird_archer")
}

fn data_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn leaderboard_dir(preset: Preset) -> PathBuf {
    data_dir().join("leaderboards").join(preset.slug())
}

/// Preset defaults, overlaid with `config.json` from the config dir if present.
fn load_config(preset: Preset) -> GameConfig {
    let base = GameConfig::for_preset(preset);
    let Some(path) = project_dirs().map(|d| d.config_dir().join("config.json")) else {
        return base;
    };
    let Ok(json) = std::fs::read_to_string(&path) else {
        return base;
    };
    match base.with_overrides(&json) {
        Ok(config) => {
            log::info!("applied config overrides from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("ignoring {}: {e}", path.display());
            base
        }
    }
}

/// Logs go to a file: the terminal is busy showing the game.
fn init_logging(dir: &Path) {
    if std::fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join("bird_archer.log")) else {
        return;
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Preset),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    shown: Preset,
    notice: Option<&str>,
) -> std::io::Result<MenuResult> {
    let store = LeaderboardStore::open(
        FileStorage::new(leaderboard_dir(shown)),
        load_config(shown).leaderboard_cap,
    );
    display::draw_menu(out, shown, store.board().entries(), notice)?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. })) => match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(Preset::Casual)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(Preset::Standard)),
                KeyCode::Char('3') => return Ok(MenuResult::Start(Preset::Arcade)),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(Event::Resize(..)) => {
                display::draw_menu(out, shown, store.board().entries(), notice)?;
            }
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Mouse clicks become taps at the clicked cell; the session resolves them
/// as shots.  Wall-clock time between iterations is fed to the session,
/// which fires its spawn timer and frame loop on their own schedules.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session<FileStorage, EnvIdentity>,
    preset: Preset,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();
    let mut sink = TerminalSink::new(out, preset);

    session.start();
    sink.render_frame(&session.view())?;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let mut events = Vec::new();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    if let Some(tap_events) = session.tap(column as f32, row as f32) {
                        events.extend(tap_events);
                    }
                }
                Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            session.go_home();
                            return Ok(true);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            session.go_home();
                            return Ok(true);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') => {
                            session.go_home();
                            return Ok(false);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if session.phase() == Phase::GameOver =>
                        {
                            sink.flash = None;
                            session.restart();
                            last = Instant::now();
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let now = Instant::now();
        events.extend(session.advance(now - last, &mut rng, &mut sink)?);
        last = now;

        for event in &events {
            match event {
                GameEvent::Hit { special: true, life_restored: true } => {
                    sink.show("+1 LIFE!", Color::Magenta)
                }
                GameEvent::Hit { special: true, life_restored: false } => {
                    sink.show("FULL HEALTH", Color::Magenta)
                }
                GameEvent::Hit { special: false, .. } => sink.show("HIT!", Color::Yellow),
                GameEvent::Escaped { .. } => sink.show("ESCAPED!", Color::Red),
                GameEvent::Missed { .. } => sink.show("MISSED!", Color::Red),
                _ => {}
            }
        }

        if session.phase() == Phase::GameOver {
            sink.game_over(&session.view(), session.last_result())?;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    init_logging(&data_dir());
    log::info!("bird archer starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("terminal error: {e}");
    }
    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut shown = Preset::Casual;
    let mut notice: Option<String> = None;

    loop {
        match show_menu(out, rx, shown, notice.as_deref())? {
            MenuResult::Quit => break,
            MenuResult::Start(preset) => {
                shown = preset;
                notice = None;
                let (width, height) = terminal::size()?;
                let config = load_config(preset);
                let mut session = match Session::new(
                    config,
                    width,
                    height,
                    FileStorage::new(leaderboard_dir(preset)),
                    EnvIdentity,
                ) {
                    Ok(session) => session,
                    Err(e) => {
                        log::warn!("cannot start {}: {e}", preset.label());
                        notice = Some(format!("Cannot start {}: {e}", preset.label()));
                        continue;
                    }
                };
                if game_loop(out, &mut session, preset, rx)? {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
