//! Annotated source pane renderer.
//!
//! Renders the main panel with an annotation gutter: a right-aligned line
//! number, a marker glyph on lines that carry review comments, and the
//! syntect-highlighted code. Uses a List widget with manual virtual
//! scrolling — only `lines[scroll..scroll+viewport]` are materialized per
//! frame, so large files render at full frame rate.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Glyph shown in the gutter next to an annotated line.
const MARKER_GLYPH: &str = "●";

/// Renders the source pane with its annotation gutter.
///
/// If no file is loaded, shows a placeholder explaining how to supply a
/// review. The gutter is rebuilt per frame from `state.review`, so a
/// freshly loaded comment set shows up on the next render with no extra
/// bookkeeping.
pub fn render_source(
    frame: &mut Frame,
    area: ratatui::layout::Rect,
    focus: PanelFocus,
    state: &AppState,
    theme: &Theme,
) {
    let is_focused = focus == PanelFocus::Source;
    let title = match &state.file {
        Some(file) => format!("Source — {file}"),
        None => "Source".to_owned(),
    };
    let block = panel_block(&title, is_focused, theme);
    let inner = inner_rect(area);
    let viewport_height = inner.height as usize;

    frame.render_widget(block, area);

    if state.source_lines.is_empty() {
        let msg = if state.loading {
            "Loading review…"
        } else {
            "No reviewed files. Put comments in .revpeek/review.toml."
        };
        let placeholder =
            ListItem::new(Line::styled(msg, Style::default().fg(theme.source_text)));
        frame.render_widget(List::new(vec![placeholder]), inner);
        return;
    }

    let total = state.source_lines.len();
    let visible_start = state.source_scroll.min(total.saturating_sub(1));
    let visible_end = (visible_start + viewport_height).min(total);

    let items: Vec<ListItem> = state.source_lines[visible_start..visible_end]
        .iter()
        .enumerate()
        .map(|(offset, code)| {
            let line_no = visible_start + offset;
            let mut spans = gutter_spans(line_no as u32, state, theme);
            spans.extend(code.spans.iter().cloned());
            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

/// Builds the gutter spans for one line: 4-digit line number, marker glyph
/// or space, separator.
fn gutter_spans(line: u32, state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    let number = Span::styled(
        format!("{:>4}", line + 1),
        Style::default().fg(theme.gutter_line_no),
    );
    let marker = if state.review.is_annotated(line) {
        Span::styled(
            MARKER_GLYPH,
            Style::default().fg(theme.gutter_marker).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw(" ")
    };
    vec![number, marker, Span::raw(" ")]
}
