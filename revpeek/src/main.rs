//! revpeek — inline pull-request review comments in the terminal.
//!
//! Entry point for the `revpeek` binary. Wires together the terminal
//! lifecycle (`tui`), unified event bus (`event`), application state
//! (`app`), rendering (`ui`), theme system (`theme`), the review loader
//! thread (`review`), and the in-process host callout service (`callout`)
//! on top of the `revpeek-core` seams.
//!
//! # Startup sequence (order matters)
//!
//! 1. Load theme from XDG config (read-only, so safe before terminal init).
//! 2. Initialise file logging — stdout belongs to the TUI from step 5 on.
//! 3. `install_panic_hook()` — innermost hook restores the terminal before
//!    the panic message prints.
//! 4. `register_sigterm()` — returns `Arc<AtomicBool>` polled in the loop.
//! 5. `init_tui()` — alternate screen, raw mode, mouse capture.
//! 6. Event channel + `spawn_event_task()`.
//! 7. Review loader thread — sends its first payload without being asked,
//!    so there is no separate "initial load" state to manage.
//! 8. Host service registration — the callout service must exist before the
//!    first loader payload triggers the announcement.
//!
//! The event loop exits only via `break`, never via `?`, so `restore_tui()`
//! is always reached. The panic hook covers unexpected panics.

mod app;
mod callout;
mod event;
mod review;
mod theme;
mod tui;
mod ui;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tracing::error;
use tracing_subscriber::EnvFilter;

use revpeek_core::host::HostServices;
use revpeek_core::peek::{PeekResultFactory, ReviewCommentPeekFactory};

use crate::review::loader::review_worker_loop;

/// Returns the path to the revpeek config file.
///
/// Prefers `$XDG_CONFIG_HOME/revpeek/config.toml`; falls back to
/// `~/.config/revpeek/config.toml` when the env var is absent.
fn config_path() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(std::path::PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| std::path::PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| std::path::PathBuf::from(".config"));
    base.join("revpeek").join("config.toml")
}

/// Loads the theme name from the config file.
///
/// Returns the default theme name if the file does not exist, cannot be
/// parsed, or has no `theme` key. Never panics — config errors are soft
/// failures printed to stderr before the terminal is captured.
fn load_theme_name() -> String {
    let path = config_path();
    let raw = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(_) => return "catppuccin-mocha".to_owned(),
    };
    let table: toml::Table = match toml::from_str(&raw) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("revpeek: config parse error in {:?}: {}", path, e);
            return "catppuccin-mocha".to_owned();
        }
    };
    table
        .get("theme")
        .and_then(|v| v.as_str())
        .unwrap_or("catppuccin-mocha")
        .to_owned()
}

/// Initialises tracing to a log file under `.revpeek/`.
///
/// The TUI owns stdout and stderr once the alternate screen is entered, so
/// diagnostics must go elsewhere. `RUST_LOG` overrides the default `info`
/// filter.
fn init_logging() -> std::io::Result<()> {
    std::fs::create_dir_all(".revpeek")?;
    let file = std::fs::File::create(".revpeek/revpeek.log")?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Step 1: theme from config — read-only, safe before terminal init.
    let theme = theme::Theme::from_name(&load_theme_name());
    let mut state = app::AppState::default();

    // Step 2: file logging, before stdout is captured.
    init_logging()?;

    // Step 3: panic hook installed first — innermost hook restores terminal.
    tui::install_panic_hook();

    // Step 4: SIGTERM flag — polled in the 50ms heartbeat arm below.
    let term_flag = tui::register_sigterm();

    // Step 5: enter alternate screen, raw mode, mouse capture.
    let mut terminal = tui::init_tui()?;

    // Step 6: event channel and background event task.
    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;
    state.event_tx = Some(handler.tx.clone());

    // Step 7: review loader thread. It pushes an initial payload on its own.
    let (review_tx, review_rx) = crossbeam_channel::unbounded();
    {
        let event_tx = handler.tx.clone();
        std::thread::spawn(move || {
            review_worker_loop(".".to_owned(), ".revpeek/review.toml".to_owned(), review_rx, event_tx)
        });
    }
    state.review_tx = Some(review_tx);

    // Step 8: host services. revpeek is its own host — the callout service
    // the bridge locates is backed by the event bus.
    let mut host_services = HostServices::new();
    callout::register(&mut host_services, handler.tx.clone());

    let peek_factory = ReviewCommentPeekFactory;

    // Event loop — exits only via `break`, so `restore_tui()` is always
    // reached after the loop.
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: SIGTERM gets checked at least every 50ms even when
            // no terminal events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event::AppEvent::Render) => {
                        // Exactly one draw() call per Render event.
                        terminal.draw(|frame| ui::render(frame, &mut state, &theme))?;
                    }
                    Some(event::AppEvent::Key(key)) => {
                        match ui::keybindings::handle_key(key, &mut state) {
                            ui::keybindings::KeyAction::Quit => break 'event_loop,
                            ui::keybindings::KeyAction::Continue => {}
                        }
                    }
                    Some(event::AppEvent::Mouse(mouse)) => {
                        ui::keybindings::handle_mouse(mouse, &mut state);
                    }
                    Some(event::AppEvent::Resize(_, _)) => {
                        // Handled by ratatui on the next Render: frame.area()
                        // returns the new size and the layout follows.
                    }
                    Some(event::AppEvent::Tick) => {
                        state.tick();
                    }
                    Some(event::AppEvent::ReviewResult(payload)) => {
                        state.apply_review_result(*payload);
                        if !state.announced {
                            state.announced = true;
                            // Bridge faults propagate to here, the top of the
                            // UI event pipeline; containment means logging.
                            if let Err(e) = callout::announce_review(
                                &host_services,
                                state.total_comments,
                                state.files.len(),
                                state.gutter_anchor(),
                            ) {
                                error!(error = %e, "review announcement failed");
                            }
                        }
                    }
                    Some(event::AppEvent::PeekRequested(descriptor)) => {
                        // Phase two of the peek protocol: materialize the
                        // result for descriptors routed to our relationship.
                        if descriptor.relationship() == peek_factory.relationship() {
                            let anchor_line = state.buffer.resolve(&descriptor.anchor());
                            let result = peek_factory.materialize(&descriptor);
                            state.open_peek(result, anchor_line);
                        }
                    }
                    Some(event::AppEvent::Callout(notice)) => {
                        state.show_callout(notice);
                    }
                    Some(event::AppEvent::Quit) | None => break 'event_loop,
                }
                // Check SIGTERM after every event too, so quit latency is at
                // most one event cycle rather than 50ms.
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    // Dispose any open peek session before teardown, then restore the
    // terminal at the single exit point of the loop.
    state.close_peek();
    tui::restore_tui()?;
    Ok(())
}
