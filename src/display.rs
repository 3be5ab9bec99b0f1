//! Rendering layer — all terminal I/O lives here.
//!
//! `TerminalSink` is the session's frame renderer; the menu and game-over
//! screens are drawn by the free functions below.  No game logic is
//! performed; this module only translates state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use bird_archer::config::Preset;
use bird_archer::entities::{LeaderboardEntry, Point, Projectile, Target};
use bird_archer::leaderboard::rank_label;
use bird_archer::session::{FrameSink, FrameView, RunResult};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_ARCHER: Color = Color::White;
const C_BIRD: Color = Color::Green;
const C_BIRD_SPECIAL: Color = Color::Magenta;
const C_ARROW: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Frames a feedback message ("+1 LIFE!") stays on screen.
pub const FLASH_FRAMES: u32 = 24;

/// A short centred message shown for a few frames.
pub struct Flash {
    pub text: &'static str,
    pub color: Color,
    pub frames: u32,
}

// ── Frame sink ────────────────────────────────────────────────────────────────

pub struct TerminalSink<'a, W: Write> {
    out: &'a mut W,
    preset: Preset,
    pub flash: Option<Flash>,
}

impl<'a, W: Write> TerminalSink<'a, W> {
    pub fn new(out: &'a mut W, preset: Preset) -> Self {
        TerminalSink {
            out,
            preset,
            flash: None,
        }
    }

    pub fn show(&mut self, text: &'static str, color: Color) {
        self.flash = Some(Flash {
            text,
            color,
            frames: FLASH_FRAMES,
        });
    }

    /// Draw the game-over overlay on top of the last frame.
    pub fn game_over(&mut self, view: &FrameView<'_>, result: Option<&RunResult>) -> std::io::Result<()> {
        render(self.out, view, self.preset, None)?;
        draw_game_over(self.out, view, result)?;
        self.out.flush()
    }
}

impl<W: Write> FrameSink for TerminalSink<'_, W> {
    type Error = std::io::Error;

    fn render_frame(&mut self, view: &FrameView<'_>) -> std::io::Result<()> {
        render(self.out, view, self.preset, self.flash.as_ref())?;
        if let Some(flash) = &mut self.flash {
            flash.frames = flash.frames.saturating_sub(1);
            if flash.frames == 0 {
                self.flash = None;
            }
        }
        Ok(())
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    view: &FrameView<'_>,
    preset: Preset,
    flash: Option<&Flash>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, view, preset)?;

    for target in view.targets {
        draw_bird(out, target, view)?;
    }
    for projectile in view.projectiles {
        draw_arrow(out, projectile, view)?;
    }

    draw_archer(out, view)?;
    draw_controls_hint(out, view)?;

    if let Some(flash) = flash {
        draw_centred(out, view, view.height / 2, flash.text, flash.color)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &FrameView<'_>) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, view: &FrameView<'_>, preset: Preset) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", view.stats.score)))?;

    // Preset — centre
    let preset_str = format!("[ {} ]", preset.label().to_uppercase());
    let px = (view.width / 2).saturating_sub(preset_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(px, 0))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(&preset_str))?;

    // Lives — right, lost lives shown hollow
    let lost = view.stats.max_lives.saturating_sub(view.stats.lives);
    let lives_str = format!(
        "Lives:{}{}",
        "♥".repeat(view.stats.lives as usize),
        "♡".repeat(lost as usize)
    );
    let rx = view
        .width
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Terminal cell for a field point, if it lies inside the border.
fn cell(p: Point, view: &FrameView<'_>) -> Option<(u16, u16)> {
    let x = p.x.round();
    let y = p.y.round();
    let inside = x >= 1.0
        && x < view.width as f32 - 1.0
        && y >= 2.0
        && y < view.height as f32 - 2.0;
    inside.then_some((x as u16, y as u16))
}

fn draw_archer<W: Write>(out: &mut W, view: &FrameView<'_>) -> std::io::Result<()> {
    // Sprite (2 rows, 3 cols):
    //   ▲       ← row y      (arrow tip)
    //  /|\      ← row y+1    (bow + archer)
    let Some((x, y)) = cell(view.launch, view) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_ARCHER))?;
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(Print("▲"))?;

    if y + 1 < view.height.saturating_sub(2) {
        out.queue(cursor::MoveTo(x.saturating_sub(1).max(1), y + 1))?;
        out.queue(Print("/|\\"))?;
    }
    Ok(())
}

fn draw_bird<W: Write>(out: &mut W, bird: &Target, view: &FrameView<'_>) -> std::io::Result<()> {
    // Centred on the bird, beak pointing left (direction of flight):
    //   <v~   normal
    //   <@~   special duck
    let Some((x, y)) = cell(bird.pos, view) else {
        return Ok(());
    };
    let (sprite, color) = if bird.special {
        ("<@~", C_BIRD_SPECIAL)
    } else {
        ("<v~", C_BIRD)
    };
    // Trim the sprite where it would overlap the side walls.
    let first: usize = if x == 1 { 1 } else { 0 };
    let last: usize = if x + 1 >= view.width.saturating_sub(1) { 2 } else { 3 };
    let last = last.max(first);
    out.queue(cursor::MoveTo(x - 1 + first as u16, y))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(&sprite[first..last]))?;
    Ok(())
}

fn draw_arrow<W: Write>(
    out: &mut W,
    arrow: &Projectile,
    view: &FrameView<'_>,
) -> std::io::Result<()> {
    let Some((x, y)) = cell(arrow.pos, view) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(C_ARROW))?;
    out.queue(Print("•"))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &FrameView<'_>) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("CLICK : Shoot   H : Menu   Q : Quit"))?;
    Ok(())
}

fn draw_centred<W: Write>(
    out: &mut W,
    view: &FrameView<'_>,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (view.width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    view: &FrameView<'_>,
    result: Option<&RunResult>,
) -> std::io::Result<()> {
    let score = result.map_or(view.stats.score, |r| r.score);
    let score_line = format!("Final Score: {:>6}", score);
    let rank_line = match result.and_then(|r| r.rank) {
        Some(rank) => format!("★ Leaderboard #{} ★", rank + 1),
        None => "Not on the leaderboard".to_string(),
    };

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        (&rank_line, Color::DarkGrey),
        ("R - Play Again  H - Menu  Q - Quit", Color::White),
    ];

    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        draw_centred(out, view, start_row + i as u16, msg, *color)?;
    }
    out.queue(style::ResetColor)?;
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

/// Title, preset choices and the leaderboard of `shown`.
pub fn draw_menu<W: Write>(
    out: &mut W,
    shown: Preset,
    entries: &[LeaderboardEntry],
    notice: Option<&str>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let top = (height / 2).saturating_sub(9);

    let title = "»  BIRD  ARCHER  «";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        top,
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(14), top + 2))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select mode:"))?;

    let descriptions = [
        (Color::Green, "Bobbing birds, frequent ducks"),
        (Color::Yellow, "Straight flight, 10 pts a bird"),
        (Color::Red, "Rare ducks, no second chances"),
    ];
    for (i, (preset, (color, desc))) in Preset::ALL.iter().zip(descriptions).enumerate() {
        let row = top + 3 + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", i + 1)))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(format!("{:<9}", preset.label())))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" — {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), top + 7))?;
    out.queue(style::SetForegroundColor(Color::Magenta))?;
    out.queue(Print("<@~"))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(" special duck — hit it for +1 life"))?;

    // Leaderboard
    out.queue(cursor::MoveTo(cx.saturating_sub(14), top + 9))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(format!("Leaderboard — {}", shown.label())))?;
    if entries.is_empty() {
        out.queue(cursor::MoveTo(cx.saturating_sub(14), top + 10))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print("No scores yet"))?;
    }
    for (rank, entry) in entries.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(14), top + 10 + rank as u16))?;
        out.queue(style::SetForegroundColor(if rank < 3 {
            Color::Yellow
        } else {
            Color::White
        }))?;
        out.queue(Print(format!(
            "{:>3}  {:<16} {:>6}",
            rank_label(rank),
            entry.display_name,
            entry.score
        )))?;
    }

    out.queue(cursor::MoveTo(
        cx.saturating_sub(14),
        top + 11 + entries.len().max(1) as u16,
    ))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("CLICK : Shoot   H : Menu   Q : Quit"))?;

    // Why the last start failed, if it did
    if let Some(notice) = notice {
        out.queue(cursor::MoveTo(
            cx.saturating_sub(14),
            top + 13 + entries.len().max(1) as u16,
        ))?;
        out.queue(style::SetForegroundColor(Color::Red))?;
        out.queue(Print(notice))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}
