use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use monster_arena::board::{self, Board, BOARD_SIZE};
use monster_arena::compute::{
    fire, init_world, purchase_upgrade, restart, step_movement, tick, tick_round_timer,
};
use monster_arena::display;
use monster_arena::entities::{GameStatus, Held, UpgradeKind, World};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS, = one sim tick

/// Logical playfield dimensions — the simulation runs in these continuous
/// units regardless of terminal size; the display layer scales.
const WORLD_WIDTH: f32 = 800.0;
const WORLD_HEIGHT: f32 = 480.0;

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// Min frames between shots while Space is held.
/// 15 frames @ 60 FPS = 4 shots/sec.
const FIRE_COOLDOWN: u32 = 15;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Shooter,
    TicTacToe,
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  MONSTER  ARENA  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select a game:"))?;

    let options: &[(&str, &str, Color, &str)] = &[
        ("1", "Monster Arena  ", Color::Red,  "Survive the rounds, buy upgrades"),
        ("2", "Tic-Tac-Toe 5×5", Color::Blue, "Four in a row, timed turns"),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(12), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<16}", label)))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" — {}", desc)))?;
    }

    // Drop legend for the shooter
    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 2))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Drops (walk over them):"))?;

    let drop_info: &[(&str, Color, &str)] = &[
        ("†", Color::Red,     " Damage      — hit harder"),
        ("■", Color::Blue,    " Resistance  — take less"),
        ("♥", Color::Magenta, " Health      — +20 max HP"),
        ("★", Color::Yellow,  " Multiplier  — 2x points"),
    ];
    for (i, (sym, color, desc)) in drop_info.iter().enumerate() {
        let row = cy + 3 + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(12), row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(*desc))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 8))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Q : Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Shooter),
                KeyCode::Char('2') => return Ok(MenuResult::TicTacToe),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Shooter loop ──────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we derive the four held-direction flags
/// (and the fire key) from the keys still "fresh" within `HOLD_WINDOW`
/// frames, so any combination can be held at once with no interference.
///
/// Cadences: the movement step and one 16 ms simulation tick run every
/// frame; the round timer fires once per elapsed wall-clock second.
fn shooter_loop<W: Write>(
    out: &mut W,
    world: &mut World,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut fire_cooldown: u32 = 0;
    let mut frame: u64 = 0;
    let mut show_upgrades = false;
    let mut last_second = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                // Press: record key + handle one-shot actions
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(false);
                        }
                        KeyCode::Char('c')
                            if modifiers.contains(KeyModifiers::CONTROL) =>
                        {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            *world = restart(world, &mut rng);
                        }
                        KeyCode::Char('u') | KeyCode::Char('U') => {
                            show_upgrades = !show_upgrades;
                        }
                        KeyCode::Char('1') => {
                            *world = purchase_upgrade(world, UpgradeKind::Damage);
                        }
                        KeyCode::Char('2') => {
                            *world = purchase_upgrade(world, UpgradeKind::Health);
                        }
                        KeyCode::Char('3') => {
                            *world = purchase_upgrade(world, UpgradeKind::Resistance);
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Apply held-key actions every frame ────────────────────────────────
        if world.status == GameStatus::Playing {
            let held = Held {
                up: any_held(
                    &key_frame,
                    &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')],
                    frame,
                ),
                down: any_held(
                    &key_frame,
                    &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')],
                    frame,
                ),
                left: any_held(
                    &key_frame,
                    &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                    frame,
                ),
                right: any_held(
                    &key_frame,
                    &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                    frame,
                ),
            };
            *world = step_movement(world, &held);

            // Firing — throttled so holding Space gives a steady rate
            if fire_cooldown == 0 && is_held(&key_frame, &KeyCode::Char(' '), frame) {
                *world = fire(world);
                fire_cooldown = FIRE_COOLDOWN;
            }
        }
        fire_cooldown = fire_cooldown.saturating_sub(1);

        // ── Fixed-cadence simulation ──────────────────────────────────────────
        *world = tick(world, &mut rng);

        if last_second.elapsed() >= Duration::from_secs(1) {
            *world = tick_round_timer(world, &mut rng);
            last_second += Duration::from_secs(1);
        }

        let (cols, rows) = terminal::size()?;
        display::render_shooter(out, world, show_upgrades, cols, rows)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Tic-tac-toe loop ──────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
fn board_loop<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<bool> {
    let mut b = Board::new();
    let mut cursor_index: usize = BOARD_SIZE * BOARD_SIZE / 2; // centre cell
    let mut last_second = Instant::now();

    loop {
        let frame_start = Instant::now();

        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            if kind == KeyEventKind::Release {
                continue;
            }
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(false),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(true);
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    b = board::reset(&b);
                    last_second = Instant::now();
                }
                KeyCode::Up => cursor_index = cursor_index.saturating_sub(BOARD_SIZE),
                KeyCode::Down => {
                    if cursor_index + BOARD_SIZE < BOARD_SIZE * BOARD_SIZE {
                        cursor_index += BOARD_SIZE;
                    }
                }
                KeyCode::Left => {
                    if cursor_index % BOARD_SIZE > 0 {
                        cursor_index -= 1;
                    }
                }
                KeyCode::Right => {
                    if cursor_index % BOARD_SIZE < BOARD_SIZE - 1 {
                        cursor_index += 1;
                    }
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    b = board::play(&b, cursor_index);
                }
                _ => {}
            }
        }

        if last_second.elapsed() >= Duration::from_secs(1) {
            b = board::tick_timer(&b);
            last_second += Duration::from_secs(1);
        }

        let (cols, rows) = terminal::size()?;
        display::render_board(out, &b, cursor_index, cols, rows)?;

        let elapsed = frame_start.elapsed();
        let frame = Duration::from_millis(33);
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loops never have to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    loop {
        let quit = match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Shooter => {
                let mut rng = thread_rng();
                let mut world = init_world(WORLD_WIDTH, WORLD_HEIGHT, &mut rng);
                shooter_loop(out, &mut world, rx)?
            }
            MenuResult::TicTacToe => board_loop(out, rx)?,
        };
        if quit {
            break;
        }
        // Otherwise loop back to the menu
    }
    Ok(())
}
