//! Reviewed-file list renderer.
//!
//! Renders the left panel from `AppState.files`: each entry shows the
//! repository-relative path and a comment-count badge. When the review
//! names no files, shows a placeholder matching the loading state.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the file-list panel.
///
/// Uses `render_stateful_widget` so the `ListState` selection highlight is
/// applied. The file count is shown in the panel title (e.g. "Files (3)").
pub fn render_file_list(
    frame: &mut Frame,
    area: ratatui::layout::Rect,
    focus: PanelFocus,
    state: &mut AppState,
    theme: &Theme,
) {
    let is_focused = focus == PanelFocus::Files;
    let title = if state.files.is_empty() {
        "Files".to_owned()
    } else {
        format!("Files ({})", state.files.len())
    };
    let block = panel_block(&title, is_focused, theme);

    let items: Vec<ListItem> = if state.files.is_empty() {
        let msg = if state.loading { "Loading…" } else { "No files" };
        vec![ListItem::new(Line::raw(msg))]
    } else {
        state
            .files
            .iter()
            .map(|f| {
                let current = state.file.as_deref() == Some(f.path.as_str());
                let path_style = if current {
                    Style::default().fg(theme.file_path).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.file_path)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(f.path.clone(), path_style),
                    Span::styled(
                        format!("  ● {}", f.comment_count),
                        Style::default().fg(theme.file_badge),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(list, area, &mut state.file_list_state);
}
