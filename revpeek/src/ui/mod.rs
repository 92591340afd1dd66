//! UI rendering module for revpeek.
//!
//! Module root for `ui/`. Re-exports `render()` as the single entry point
//! called by the event loop's `terminal.draw()` closure. Layout arithmetic
//! lives in `layout.rs`; the file list, annotated source pane, peek popup,
//! and help overlay each have their own renderer.

mod layout;
pub mod file_tree;
pub mod help;
pub mod keybindings;
pub mod peek_view;
pub mod source_view;

use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_bar};

/// Renders one complete frame: panels, status bar, peek popup, callout
/// toast, and (topmost) the help overlay.
///
/// Called exactly once per `AppEvent::Render` inside `terminal.draw()` —
/// never anywhere else. Panel rects and viewport heights are written back
/// into `state` so the *next* event cycle can hit-test pointer positions
/// and compute page-scroll distances; the one-frame lag is imperceptible.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [files, source, status_bar] = compute_layout(frame);

    // Cache geometry BEFORE rendering panels so pointer events between
    // frames resolve against what is actually on screen.
    state.file_list_rect = files;
    state.source_rect = source;
    state.source_inner = inner_rect(source);
    state.file_list_viewport_height = inner_rect(files).height;

    let focus = state.focus;

    if files.width > 0 {
        file_tree::render_file_list(frame, files, focus, state, theme);
    }

    source_view::render_source(frame, source, focus, state, theme);

    render_status_bar(frame, status_bar, state, theme);

    // Peek popup sits above the panels, anchored near its document line.
    peek_view::render_peek(frame, state, theme);

    // Callout toast sits above everything except the help overlay.
    render_callout(frame, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}

/// Renders the callout toast in the bottom-right corner, one row above the
/// status bar.
fn render_callout(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let Some(toast) = &state.callout else { return };

    let text = if toast.notice.permanently_dismissible {
        format!(" {}: {}  [x] ", toast.notice.title, toast.notice.message)
    } else {
        format!(" {}: {} ", toast.notice.title, toast.notice.message)
    };
    let width = (text.len() as u16).min(frame.area().width);
    if width == 0 || frame.area().height < 2 {
        return;
    }

    let area = ratatui::layout::Rect {
        x: frame.area().width - width,
        y: frame.area().height - 2,
        width,
        height: 1,
    };
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::raw(text)))
            .style(Style::default().bg(theme.callout_bg).fg(theme.callout_fg)),
        area,
    );
}
