//! Event bus for revpeek.
//!
//! All user input, timer ticks, loader results, peek-session requests, and
//! host callout requests are normalised into a single `AppEvent` enum and
//! sent over a tokio unbounded MPSC channel. The main loop receives from
//! this channel and dispatches accordingly.
//!
//! Two independent intervals drive the render and logic cycles: the render
//! interval (33 ms ≈ 30 FPS) triggers a `terminal.draw()` call, the tick
//! interval (250 ms) drives state updates such as callout-toast expiry.
//!
//! The bus is also where the core's preview-broker seam lands:
//! [`EventPreviewBroker`] turns a submitted peek descriptor into a
//! `PeekRequested` event, so materialization happens on the main loop with
//! no shared mutable state between the two phases.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use revpeek_core::peek::{PeekSessionDescriptor, PreviewBroker};

use crate::callout::CalloutNotice;
use crate::review::types::ReviewLoadPayload;

/// Everything the main loop can receive, from any producer.
///
/// `#[non_exhaustive]` so later variants (e.g. review-file watching) do not
/// break exhaustive match arms in existing handlers.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A terminal key press. Only `KeyEventKind::Press` arrives here;
    /// [`spawn_event_task`] filters release and repeat so Windows, which
    /// synthesises both press and release per keystroke, does not
    /// double-fire.
    Key(KeyEvent),
    /// A mouse event from the terminal (click, release, scroll, move).
    Mouse(MouseEvent),
    /// New terminal size in (columns, rows).
    Resize(u16, u16),
    /// Logic tick for state updates (250 ms).
    Tick,
    /// Render tick; each one becomes a single `terminal.draw()` call.
    Render,
    /// Result from the review loader thread.
    ReviewResult(Box<ReviewLoadPayload>),
    /// A peek session was submitted to the broker and awaits
    /// materialization on the main loop.
    PeekRequested(Box<PeekSessionDescriptor>),
    /// The in-process host callout service wants a toast displayed.
    Callout(CalloutNotice),
    /// Shut down cleanly (from the `q` key or SIGTERM).
    Quit,
}

/// Both ends of the unified event channel.
///
/// The sender (`tx`) is cloned into every producer, including the preview
/// broker; the receiver (`rx`) belongs to the main event loop.
pub struct EventHandler {
    /// Send half. Clone one per producer.
    pub tx: mpsc::UnboundedSender<AppEvent>,
    /// Receive half, owned by the main loop.
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// Opens a fresh unbounded channel.
    ///
    /// Unbounded is appropriate: producers (terminal events, timers, one
    /// loader thread) generate events at a bounded rate and the main loop
    /// always keeps up.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Preview-broker implementation over the event bus.
///
/// Phase one of the peek protocol: accept the immutable descriptor and
/// schedule it. The main loop performs phase two (materialization) when the
/// `PeekRequested` event drains. Send errors are ignored — a dropped
/// receiver means the application is shutting down and the session is moot.
#[derive(Clone)]
pub struct EventPreviewBroker {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventPreviewBroker {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl PreviewBroker for EventPreviewBroker {
    fn request_session(&self, descriptor: PeekSessionDescriptor) {
        let _ = self.tx.send(AppEvent::PeekRequested(Box::new(descriptor)));
    }
}

/// Spawns the background tokio task feeding the unified channel.
///
/// Runs until the receiver is dropped. Two independent
/// `tokio::time::interval` timers drive the render and logic cycles;
/// crossterm input arrives through an `EventStream`.
///
/// The `.fuse()` on the input future matters: a terminated crossterm stream
/// must not leave `tokio::select!` polling a completed future. Send failures
/// are ignored, since a gone receiver just means the application is shutting
/// down.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut logic = interval(Duration::from_millis(250));
        let mut render = interval(Duration::from_millis(33));
        let mut input = EventStream::new();

        loop {
            let logic_tick = logic.tick();
            let render_tick = render.tick();
            let next_input = input.next().fuse();

            tokio::select! {
                _ = logic_tick => {
                    let _ = tx.send(AppEvent::Tick);
                }
                _ = render_tick => {
                    let _ = tx.send(AppEvent::Render);
                }
                event = next_input => {
                    match event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            let _ = tx.send(AppEvent::Key(key));
                        }
                        Some(Ok(Event::Mouse(mouse))) => {
                            let _ = tx.send(AppEvent::Mouse(mouse));
                        }
                        Some(Ok(Event::Resize(w, h))) => {
                            let _ = tx.send(AppEvent::Resize(w, h));
                        }
                        _ => {}
                    }
                }
            }
        }
    });
}
