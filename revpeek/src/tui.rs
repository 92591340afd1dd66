//! Terminal lifecycle management for revpeek.
//!
//! The TUI owns stdout: raw mode, alternate screen, and mouse capture are
//! enabled on entry and must be undone at every exit path. Mouse capture is
//! not optional here — the annotation gutter is click-driven, so a terminal
//! without capture makes revpeek pointless. Diagnostics go to the log file
//! (see `main.rs`), never to the captured terminal.

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::{stdout, BufWriter, Stdout};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

/// The terminal type used by revpeek — `CrosstermBackend` over buffered
/// stdout. `BufWriter` batches escape sequences into fewer write(2) calls,
/// which keeps the 30 FPS render loop flicker-free.
pub type Tui = Terminal<CrosstermBackend<BufWriter<Stdout>>>;

/// Puts the terminal into TUI mode.
///
/// Enables raw mode, enters the alternate screen, and turns on mouse
/// capture. Call [`restore_tui`] at every exit path.
///
/// # Errors
///
/// Any failure from `enable_raw_mode`, `execute!`, or `Terminal::new`.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut writer = BufWriter::new(stdout());
    enable_raw_mode()?;
    execute!(writer, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(writer))
}

/// Puts the terminal back the way the shell expects it.
///
/// Disables raw mode, leaves the alternate screen, and releases mouse
/// capture. Idempotent; must run at every exit path including the panic
/// hook, because ratatui does not auto-restore the terminal on `Drop`.
///
/// # Errors
///
/// Any failure from `disable_raw_mode` or `execute!`. The panic hook
/// ignores the error (best-effort cleanup only).
pub fn restore_tui() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before the panic message
/// prints.
///
/// Must run **before** [`init_tui`]. Chains onto any previously installed
/// hook so the default panic printer still fires once the terminal is
/// usable again. Without this, a panic leaves the shell in raw mode with
/// mouse capture on, and the message is invisible until the user types
/// `reset`.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_tui();
        previous(info);
    }));
}

/// Registers a SIGTERM handler backed by an `AtomicBool` flag.
///
/// The returned flag flips to `true` when the process receives SIGTERM; the
/// main event loop polls it on a heartbeat.
///
/// # Panics
///
/// Panics if the OS refuses to register the handler, which is fatal at
/// initialisation, not a recoverable condition.
pub fn register_sigterm() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    register(SIGTERM, Arc::clone(&flag)).expect("Failed to register SIGTERM handler");
    flag
}
