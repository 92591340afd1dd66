//! Key and mouse dispatch for revpeek.
//!
//! Translates raw crossterm events into `AppState` mutations and returns a
//! `KeyAction` telling the event loop whether to continue or quit. Key
//! dispatch branches first on `state.mode` so Normal, Peek, and HelpOverlay
//! have isolated handlers.
//!
//! The pointer-up path is the annotation-resolution entry point: a click in
//! the source pane's gutter runs the core resolver, and a hit submits a
//! peek session through the event-bus broker. A resolver miss leaves the
//! event unhandled, so it falls through to the click-to-focus handler —
//! exactly the cross-handler contract the handled flag encodes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use revpeek_core::resolve::{open_comment_peek, resolve_pointer, PointerEvent};

use crate::app::{AppState, Mode, PanelFocus, GUTTER_WIDTH, SOURCE_VIEWPORT};
use crate::event::EventPreviewBroker;

/// Control-flow signal returned from the dispatchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Continue the event loop normally.
    Continue,
    /// Exit cleanly.
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Peek => handle_peek(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

/// Handles a key event in Normal mode.
fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }

    match key.code {
        // Panel focus
        KeyCode::Tab | KeyCode::Char('H') | KeyCode::Char('L') => {
            state.focus = state.focus.toggled();
            KeyAction::Continue
        }

        // File list
        KeyCode::Enter | KeyCode::Char('l') if state.focus == PanelFocus::Files => {
            state.open_selected_file();
            KeyAction::Continue
        }
        KeyCode::Char('{') => {
            state.file_list_state.scroll_up_by(1);
            KeyAction::Continue
        }
        KeyCode::Char('}') => {
            state.file_list_state.scroll_down_by(1);
            KeyAction::Continue
        }

        // Annotation navigation in the source pane
        KeyCode::Char('[') => {
            state.prev_annotated_line();
            KeyAction::Continue
        }
        KeyCode::Char(']') => {
            state.next_annotated_line();
            KeyAction::Continue
        }

        // Callout toast
        KeyCode::Char('x') => {
            state.dismiss_callout();
            KeyAction::Continue
        }

        // Help overlay
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }

        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,

        _ => KeyAction::Continue,
    }
}

/// Handles scroll-related keys in Normal mode: j / k / g / G and Ctrl
/// combos. Returns `Some` when the key was consumed.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') => {
            state.scroll_down(1);
            Some(KeyAction::Continue)
        }
        KeyCode::Char('k') => {
            state.scroll_up(1);
            Some(KeyAction::Continue)
        }
        KeyCode::Char('g') => {
            state.scroll_top();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('G') => {
            state.scroll_bottom();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('d') if ctrl => {
            state.half_page_down();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('u') if ctrl => {
            state.half_page_up();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('f') if ctrl => {
            state.full_page_down();
            Some(KeyAction::Continue)
        }
        KeyCode::Char('b') if ctrl => {
            state.full_page_up();
            Some(KeyAction::Continue)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Peek mode
// ---------------------------------------------------------------------------

/// Handles a key event while a peek session is open.
///
/// `j`/`k` move the comment selection, Enter navigates the source pane to
/// the selected comment, and Esc or `q` disposes the session.
fn handle_peek(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.peek_select_next();
            KeyAction::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.peek_select_prev();
            KeyAction::Continue
        }
        KeyCode::Enter => {
            state.navigate_to_selected();
            KeyAction::Continue
        }
        KeyCode::Esc | KeyCode::Char('q') => {
            state.close_peek();
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// HelpOverlay mode
// ---------------------------------------------------------------------------

/// Handles a key event while the help overlay is visible.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') => {
            state.help_scroll = state.help_scroll.saturating_add(1);
            KeyAction::Continue
        }
        KeyCode::Char('k') => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
            KeyAction::Continue
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Handles a mouse event: gutter clicks open peek sessions, other clicks
/// set focus, and the scroll wheel scrolls the focused panel by 3 lines.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Up(MouseButton::Left) => {
            handle_pointer_up(mouse.column, mouse.row, state)
        }
        MouseEventKind::ScrollUp => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_sub(3);
            } else {
                state.scroll_up(3);
            }
            KeyAction::Continue
        }
        MouseEventKind::ScrollDown => {
            if state.mode == Mode::HelpOverlay {
                state.help_scroll = state.help_scroll.saturating_add(3);
            } else {
                state.scroll_down(3);
            }
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

/// Pointer-up dispatch: annotation resolution first, focus second.
fn handle_pointer_up(col: u16, row: u16, state: &mut AppState) -> KeyAction {
    // A click anywhere while a peek session is open dismisses it.
    if state.peek.is_some() {
        state.close_peek();
        return KeyAction::Continue;
    }

    if in_gutter(col, row, state) {
        let mut event = PointerEvent::at_row(row - state.source_inner.y);
        let hit = resolve_pointer(&mut event, &state.source_geometry(), &state.review);
        if let (Some(hit), Some(tx)) = (hit, &state.event_tx) {
            let broker = EventPreviewBroker::new(tx.clone());
            let _ = open_comment_peek(&hit, &state.buffer, &state.review, &broker, SOURCE_VIEWPORT);
        }
        if event.is_handled() {
            // Consumed by the annotation path; no other handler sees it.
            return KeyAction::Continue;
        }
    }

    // Unhandled clicks fall through to click-to-focus.
    let pos = Position { x: col, y: row };
    if state.file_list_rect.width > 0 && state.file_list_rect.contains(pos) {
        state.focus = PanelFocus::Files;
    } else if state.source_rect.contains(pos) {
        state.focus = PanelFocus::Source;
    }
    KeyAction::Continue
}

/// True when the click landed in the source pane's annotation gutter.
fn in_gutter(col: u16, row: u16, state: &AppState) -> bool {
    let inner = state.source_inner;
    inner.contains(Position { x: col, y: row }) && col < inner.x + GUTTER_WIDTH
}
