//! Two-panel layout engine for revpeek.
//!
//! Pure layout arithmetic — no mutable application state lives here. Called
//! inside `terminal.draw()` on every render so each frame reflects the
//! current terminal size.
//!
//! At `>= 90` columns the file list occupies a fixed 30-column strip on the
//! left and the annotated source fills the rest. Below 90 columns the file
//! list collapses and the source pane takes the full width.

use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
    Frame,
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Returns `[files, source, status_bar]` panel `Rect`s for the current
/// frame. The slices are valid only for the current draw closure — never
/// store them across frames (rects are cached in `AppState` each render
/// precisely because of that).
pub fn compute_layout(frame: &Frame) -> [Rect; 3] {
    let [main_area, status_bar] =
        frame.area().layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let horizontal = if frame.area().width >= 90 {
        Layout::horizontal([Constraint::Length(30), Constraint::Fill(1)])
    } else {
        Layout::horizontal([Constraint::Length(0), Constraint::Fill(1)])
    };
    let [files, source] = main_area.layout(&horizontal);

    [files, source, status_bar]
}

/// The inner `Rect` of a panel after removing the 1-cell border on each
/// side. Cached in `AppState` so pointer rows and page-scroll distances are
/// available at event time.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel. Focused panels get a thick border
/// in the active border color.
pub fn panel_block<'a>(title: &'a str, is_focused: bool, theme: &'a Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered().title(title).border_type(border_type).border_style(border_style)
}

/// Renders the 1-row status bar: mode indicator, current file, comment
/// count, and a loading marker while the loader is busy.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Peek => (" PEEK ", theme.status_mode_peek),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default().fg(mode_fg).add_modifier(Modifier::BOLD),
    )];
    if let Some(file) = &state.file {
        spans.push(Span::raw(format!(" {file} ")));
    }
    if state.total_comments > 0 {
        spans.push(Span::styled(
            format!(" {} comments ", state.total_comments),
            Style::default().fg(theme.file_badge),
        ));
    }
    if state.loading {
        spans.push(Span::raw(" loading… "));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
