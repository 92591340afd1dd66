//! Peek popup renderer.
//!
//! Draws the materialized peek session as a modal popup anchored near the
//! resolved document line: `Clear` to erase the background, a bordered
//! block titled from the result's display info, and one entry per comment
//! (author line + body) with a selection highlight. The popup prefers the
//! space below the anchor line and flips above it when the viewport bottom
//! is too close.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, List, ListItem},
    Frame,
};

use crate::app::{ActivePeek, AppState};
use crate::theme::Theme;

/// Rows each comment occupies in the popup (author + body).
const ROWS_PER_COMMENT: u16 = 2;

/// Renders the active peek session, if any.
pub fn render_peek(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let Some(peek) = &state.peek else { return };
    let Some(area) = popup_area(peek, state) else { return };

    frame.render_widget(Clear, area);

    let info = peek.result.display_info();
    let title = format!(" {} — {} comment(s) ", info.title, peek.result.comments().len());
    let block = Block::bordered()
        .title(title)
        .border_style(Style::default().fg(theme.peek_border));
    let inner = area.inner(ratatui::layout::Margin { vertical: 1, horizontal: 1 });
    frame.render_widget(block, area);

    let items: Vec<ListItem> = peek
        .result
        .comments()
        .iter()
        .enumerate()
        .map(|(idx, comment)| {
            let selected = idx == peek.selected;
            let author_style = if selected {
                Style::default().fg(theme.peek_selected).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.peek_author)
            };
            let marker = if selected { "▸ " } else { "  " };
            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(format!("@{}", comment.author), author_style),
                ]),
                Line::from(format!("    {}", comment.body)),
            ])
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

/// Computes the popup rect near the anchor line, or `None` when the source
/// pane is too small to host a popup at all.
fn popup_area(peek: &ActivePeek, state: &AppState) -> Option<Rect> {
    let viewport = state.source_inner;
    if viewport.width < 20 || viewport.height < 4 {
        return None;
    }

    let comments = peek.result.comments().len() as u16;
    let height = (comments * ROWS_PER_COMMENT + 2).min(viewport.height);
    let width = viewport.width.saturating_sub(4).max(20).min(viewport.width);
    let x = viewport.x + (viewport.width - width) / 2;

    // Row of the anchor line inside the viewport; clamp when the anchor has
    // scrolled out of view.
    let anchor_row = (peek.anchor_line as usize)
        .saturating_sub(state.source_scroll)
        .min(viewport.height.saturating_sub(1) as usize) as u16;

    let below = viewport.y + anchor_row + 1;
    let y = if below + height <= viewport.y + viewport.height {
        below
    } else {
        (viewport.y + anchor_row).saturating_sub(height).max(viewport.y)
    };

    Some(Rect { x, y, width, height })
}
