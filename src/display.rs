/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.  The shooter's continuous playfield is
/// scaled onto the terminal cell grid.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::board::{Board, Mark, Outcome, BOARD_SIZE};
use crate::entities::{DropKind, GameStatus, MonsterKind, Phase, World};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_POINTS: Color = Color::Yellow;
const C_HUD_TIMER: Color = Color::White;
const C_HUD_INTERMISSION: Color = Color::Cyan;
const C_HEALTH_OK: Color = Color::Green;
const C_HEALTH_LOW: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HIT: Color = Color::Red;
const C_SHOT: Color = Color::Cyan;
const C_MULTIPLIER: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;
const C_PANEL: Color = Color::Green;

/// Health fraction below which the bar turns red.
const LOW_HEALTH: f32 = 0.2;

fn monster_color(kind: MonsterKind) -> Color {
    match kind {
        MonsterKind::Ogre => Color::Red,
        MonsterKind::Goblin => Color::Green,
        MonsterKind::Troll => Color::DarkGreen,
        MonsterKind::Dragon => Color::Magenta,
        MonsterKind::Invader => Color::Cyan,
        MonsterKind::Bat => Color::DarkGrey,
    }
}

fn monster_glyph(kind: MonsterKind) -> &'static str {
    match kind {
        MonsterKind::Ogre => "◆",
        MonsterKind::Goblin => "ω",
        MonsterKind::Troll => "Ψ",
        MonsterKind::Dragon => "§",
        MonsterKind::Invader => "¥",
        MonsterKind::Bat => "Λ",
    }
}

fn drop_glyph(kind: DropKind) -> (&'static str, Color) {
    match kind {
        DropKind::Damage => ("†", Color::Red),
        DropKind::Resistance => ("■", Color::Blue),
        DropKind::Health => ("♥", Color::Magenta),
        DropKind::PointsMultiplier => ("★", Color::Yellow),
    }
}

// ── Playfield scaling ─────────────────────────────────────────────────────────

/// Map a continuous world coordinate into the playfield cell rectangle
/// (cols 1..cols-1, rows 2..rows-2), clamped so edge spawns stay visible.
fn to_cell(world: &World, x: f32, y: f32, cols: u16, rows: u16) -> (u16, u16) {
    let inner_w = cols.saturating_sub(2) as f32;
    let inner_h = rows.saturating_sub(4) as f32;
    let cx = 1.0 + (x / world.width).clamp(0.0, 1.0) * (inner_w - 1.0).max(1.0);
    let cy = 2.0 + (y / world.height).clamp(0.0, 1.0) * (inner_h - 1.0).max(1.0);
    (cx as u16, cy as u16)
}

// ── Shooter frame ─────────────────────────────────────────────────────────────

/// Render one complete shooter frame.
pub fn render_shooter<W: Write>(
    out: &mut W,
    world: &World,
    show_upgrades: bool,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, cols, rows)?;
    draw_hud(out, world, cols)?;

    for drop in &world.drops {
        let (cx, cy) = to_cell(world, drop.x, drop.y, cols, rows);
        let (glyph, color) = drop_glyph(drop.kind);
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }

    for enemy in world.enemies.iter().filter(|e| e.alive) {
        let (cx, cy) = to_cell(world, enemy.x, enemy.y, cols, rows);
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(style::SetForegroundColor(monster_color(enemy.kind)))?;
        out.queue(Print(monster_glyph(enemy.kind)))?;
    }

    for shot in &world.shots {
        let (cx, cy) = to_cell(world, shot.x, shot.y, cols, rows);
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(style::SetForegroundColor(C_SHOT))?;
        out.queue(Print("•"))?;
    }

    draw_player(out, world, cols, rows)?;

    if show_upgrades {
        draw_upgrade_panel(out, world)?;
    }

    draw_controls_hint(
        out,
        rows,
        "WASD/←↑↓→ : Move   SPACE : Fire   1/2/3 : Buy   U : Upgrades   R : Restart   Q : Quit",
    )?;

    if world.status == GameStatus::GameOver {
        draw_game_over(out, world, cols, rows)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, world: &World, cols: u16) -> std::io::Result<()> {
    // Health bar — left
    let frac = (world.player.health / world.player.max_health).clamp(0.0, 1.0);
    let filled = (frac * 10.0).round() as usize;
    let bar: String = "█".repeat(filled) + &"·".repeat(10 - filled);
    let color = if frac <= LOW_HEALTH { C_HEALTH_LOW } else { C_HEALTH_OK };
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(format!("HP {} {:>3.0}", bar, world.player.health.max(0.0))))?;

    // Round & phase countdown — centre
    let timer_str = match world.phase {
        Phase::Active => format!("Round {}  —  {}s", world.round, world.time_left),
        Phase::Intermission => format!("Round {}  —  next in {}s", world.round, world.time_left),
    };
    let tx = (cols / 2).saturating_sub(timer_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(match world.phase {
        Phase::Active => C_HUD_TIMER,
        Phase::Intermission => C_HUD_INTERMISSION,
    }))?;
    out.queue(Print(&timer_str))?;

    // Points (and multiplier) — right
    let points_text = if world.player.points_multiplier > 1 {
        format!("Points: {} x{}", world.player.points, world.player.points_multiplier)
    } else {
        format!("Points: {}", world.player.points)
    };
    let rx = cols.saturating_sub(points_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(if world.player.points_multiplier > 1 {
        C_MULTIPLIER
    } else {
        C_HUD_POINTS
    }))?;
    out.queue(Print(&points_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, world: &World, cols: u16, rows: u16) -> std::io::Result<()> {
    let (cx, cy) = to_cell(world, world.player.x, world.player.y, cols, rows);
    out.queue(cursor::MoveTo(cx, cy))?;
    out.queue(style::SetForegroundColor(if world.taking_damage {
        C_PLAYER_HIT
    } else {
        C_PLAYER
    }))?;
    out.queue(Print("@"))?;
    Ok(())
}

// ── Upgrade panel (toggleable overlay, no core effect) ───────────────────────

fn draw_upgrade_panel<W: Write>(out: &mut W, world: &World) -> std::io::Result<()> {
    let p = &world.player;
    let lines = [
        "╔═ Upgrades ═══════════════════╗".to_string(),
        format!("║ [1] Damage     lvl {:<2} 100 pt ║", p.damage_level),
        format!("║ [2] Health     max {:<3} 30 pt ║", p.max_health as u32),
        format!("║ [3] Resistance lvl {:<2} 200 pt ║", p.resistance_level),
        "╚══════════════════════════════╝".to_string(),
    ];
    out.queue(style::SetForegroundColor(C_PANEL))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(2, 2 + i as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16, hint: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, world: &World, cols: u16, rows: u16) -> std::io::Result<()> {
    let points_line = format!("Points: {}   Round: {}", world.player.points, world.round);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&points_line,           Color::Yellow),
        ("R - Restart  Q - Quit", Color::White),
    ];

    let cx = cols / 2;
    let start_row = (rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}

// ── Tic-tac-toe frame ─────────────────────────────────────────────────────────

fn mark_str(cell: Option<Mark>) -> (&'static str, Color) {
    match cell {
        Some(Mark::X) => ("X", Color::Red),
        Some(Mark::O) => ("O", Color::Blue),
        None => ("·", Color::DarkGrey),
    }
}

/// Render one complete board frame, with a cursor highlight on the cell the
/// player would mark next.
pub fn render_board<W: Write>(
    out: &mut W,
    board: &Board,
    cursor_index: usize,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let cx = cols / 2;
    let grid_w = (BOARD_SIZE * 4 - 1) as u16;
    let left = cx.saturating_sub(grid_w / 2);
    let top = (rows / 2).saturating_sub(BOARD_SIZE as u16);

    // Turn & timer
    let header = match board.outcome {
        None => format!(
            "{} to play — {}s left",
            if board.current == Mark::X { "X" } else { "O" },
            board.time_left
        ),
        Some(Outcome::Win(m)) => {
            format!("{} wins!", if m == Mark::X { "X" } else { "O" })
        }
        Some(Outcome::Draw) => "Draw!".to_string(),
    };
    out.queue(cursor::MoveTo(
        cx.saturating_sub(header.chars().count() as u16 / 2),
        top.saturating_sub(3),
    ))?;
    out.queue(style::SetForegroundColor(match board.outcome {
        None if board.current == Mark::X => Color::Red,
        None => Color::Blue,
        Some(_) => Color::Yellow,
    }))?;
    out.queue(Print(&header))?;

    // Score line
    let score = format!(
        "X: {}   O: {}   Draws: {}",
        board.score.x, board.score.o, board.score.draws
    );
    out.queue(cursor::MoveTo(
        cx.saturating_sub(score.chars().count() as u16 / 2),
        top.saturating_sub(2),
    ))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(&score))?;

    // Grid
    for row in 0..BOARD_SIZE {
        let y = top + (row as u16) * 2;
        for col in 0..BOARD_SIZE {
            let index = row * BOARD_SIZE + col;
            let x = left + (col as u16) * 4;
            let (glyph, color) = mark_str(board.cells[index]);
            out.queue(cursor::MoveTo(x, y))?;
            if index == cursor_index && board.outcome.is_none() {
                out.queue(style::SetForegroundColor(Color::Yellow))?;
                out.queue(Print(format!("[{}]", glyph)))?;
            } else {
                out.queue(style::SetForegroundColor(color))?;
                out.queue(Print(format!(" {} ", glyph)))?;
            }
            if col + 1 < BOARD_SIZE {
                out.queue(style::SetForegroundColor(C_BORDER))?;
                out.queue(cursor::MoveTo(x + 3, y))?;
                out.queue(Print("│"))?;
            }
        }
        if row + 1 < BOARD_SIZE {
            out.queue(cursor::MoveTo(left, y + 1))?;
            out.queue(style::SetForegroundColor(C_BORDER))?;
            out.queue(Print("───┼───┼───┼───┼───"))?;
        }
    }

    draw_controls_hint(
        out,
        rows,
        "←↑↓→ : Select   ENTER/SPACE : Mark   R : Rematch   Q : Back",
    )?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}
