mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_raiders::config::{GameConfig, RunConfig};
use space_raiders::entities::{InputState, Sfx};
use space_raiders::game::{Action, Game};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "space_raiders")]
#[command(about = "Terminal Space Invaders: clear the 5x5 alien grid before they wear down your hull")]
struct Cli {
    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// RNG seed for a reproducible round (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Starting spaceship health
    #[arg(long, default_value_t = 3)]
    health: u32,
    /// Master sound-effect volume (0.0 - 1.0); 0 keeps the bell silent
    #[arg(long, default_value_t = 1.0)]
    volume: f32,
    /// Disable the sound-effect bell entirely
    #[arg(long)]
    mute: bool,
    /// Write logs here instead of stderr (stderr is hidden by the alternate screen)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms at
/// 60 FPS) is always refreshed before expiry.
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

/// Key-down events that are actions rather than held controls.
fn action_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    match code {
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Cancel),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Cancel),
        _ => None,
    }
}

// ── Sound ─────────────────────────────────────────────────────────────────────

/// The terminal bell is the only speaker available.
fn play_sounds<W: Write>(out: &mut W, sounds: &[Sfx], run: &RunConfig) -> std::io::Result<()> {
    if run.mute {
        return Ok(());
    }
    if sounds.iter().any(|s| s.volume() * run.volume > 0.0) {
        out.write_all(b"\x07")?;
    }
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until a cancel action arrives.
///
/// Input model: instead of acting on each key event individually, we keep a
/// `key_frame` map recording the frame of the last press/repeat event for
/// every key.  Each frame the keys still "fresh" (within `HOLD_WINDOW`) make
/// up the held `InputState`, so Space + Left can be held together.
/// Terminals with keyboard enhancement also send `Release`, which drops the
/// key immediately.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    run: &RunConfig,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut rng = match run.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame_time = run.frame_duration();
    let clock = Instant::now();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    while !game.should_quit() {
        let frame_start = Instant::now();
        let now = clock.elapsed().as_millis() as u64;
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    if let Some(action) = action_for(code, modifiers) {
                        game.handle(action, now, &mut rng);
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }
        if game.should_quit() {
            break;
        }

        // ── Held controls, sampled once per tick ──────────────────────────────
        let input = InputState {
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
            fire: is_held(&key_frame, &KeyCode::Char(' '), frame),
        };

        game.tick(&input, now, &mut rng);
        play_sounds(out, &game.take_sounds(), run)?;
        display::render(out, game)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let run = RunConfig {
        fps: cli.fps,
        seed: cli.seed,
        volume: cli.volume,
        mute: cli.mute,
    }
    .validate()?;
    let config = GameConfig::default().with_health(cli.health)?;
    info!("starting at {} fps, seed {:?}", run.fps, run.seed);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    if !keyboard_enhanced {
        warn!("no keyboard enhancement, held keys expire after {HOLD_WINDOW} frames");
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let mut game = Game::new(config);
    let result = game_loop(&mut out, &mut game, &run, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("bye");
    result
}
