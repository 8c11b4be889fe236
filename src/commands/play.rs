//! Play subcommand handler
//!
//! Drives a [`Player`] on the system clock and redraws the reconstructed text
//! in the alternate screen until the user quits.

use anyhow::{Context, Result};
use crossterm::{cursor, event, execute, terminal};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tsr::config::PlaybackConfig;
use tsr::document::MarkerPosition;
use tsr::player::input::{handle_event, InputResult};
use tsr::player::render::{self, Layout};
use tsr::player::{Clock, SystemClock};
use tsr::{Config, Document, Player};

/// Upper bound on how long the loop blocks waiting for input.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Replay `file` in the terminal.
#[cfg(not(tarpaulin_include))]
pub fn handle(file: &Path, speed: Option<f64>, looping: bool) -> Result<()> {
    let doc = Document::parse(file)?;
    let settings = playback_settings(Config::load()?.playback, speed, looping)?;

    if doc.events.is_empty() {
        println!("Nothing to play: {} has no events", file.display());
        return Ok(());
    }

    let mut player = Player::with_config(&doc, SystemClock::new(), &settings)?;
    let markers = doc.markers();

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst))
            .context("Failed to install Ctrl+C handler")?;
    }

    let mut stdout = io::stdout();
    let guard = TerminalGuard::enter(&mut stdout)?;
    player.play();
    let result = run_loop(&mut stdout, &mut player, &markers, &interrupted);
    drop(guard);

    tracing::info!(
        time_ms = player.engine().current_time(),
        status = %player.engine().status(),
        "playback ended"
    );
    result
}

/// Merge command-line overrides into the configured playback settings.
pub fn playback_settings(
    mut settings: PlaybackConfig,
    speed: Option<f64>,
    looping: bool,
) -> Result<PlaybackConfig> {
    if let Some(speed) = speed {
        settings.speed = speed;
    }
    settings.looping |= looping;
    settings.validate()?;
    Ok(settings)
}

#[cfg(not(tarpaulin_include))]
fn run_loop<C: Clock>(
    stdout: &mut io::Stdout,
    player: &mut Player<C>,
    markers: &[MarkerPosition],
    interrupted: &AtomicBool,
) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut layout = Layout::new(cols, rows);

    while !interrupted.load(Ordering::SeqCst) {
        player.tick();
        draw(stdout, player, markers, &layout)?;

        let wait = player
            .next_deadline()
            .map_or(FRAME_INTERVAL, |deadline| deadline.min(FRAME_INTERVAL));
        if event::poll(wait)? {
            let input = event::read()?;
            if handle_event(input, player, markers, &mut layout) == InputResult::Quit {
                break;
            }
        }
    }
    Ok(())
}

fn draw<C: Clock, W: Write>(
    out: &mut W,
    player: &Player<C>,
    markers: &[MarkerPosition],
    layout: &Layout,
) -> Result<()> {
    let engine = player.engine();
    render::render_text_state(out, layout.cols, 0, layout.text_rows(), &player.state())?;
    render::render_separator_line(out, layout.cols, layout.separator_row())?;
    render::render_progress_bar(
        out,
        layout.cols,
        layout.progress_row(),
        engine.current_time(),
        engine.duration(),
        markers,
    )?;
    render::render_status_bar(
        out,
        layout.cols,
        layout.status_row(),
        engine.status(),
        engine.speed(),
        engine.looping(),
        markers.len(),
    )?;
    out.flush()?;
    Ok(())
}

/// Raw mode and alternate screen for the lifetime of the guard.
struct TerminalGuard;

impl TerminalGuard {
    #[cfg(not(tarpaulin_include))]
    fn enter(stdout: &mut io::Stdout) -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            cursor::Show,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}
