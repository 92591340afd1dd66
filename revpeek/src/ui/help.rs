//! Help overlay renderer for revpeek.
//!
//! Draws a centred modal box over the panel layout using ratatui's `Clear`
//! widget to erase the background first. The overlay renders inside the
//! same `terminal.draw()` closure as all other surfaces.

use ratatui::{
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal.
///
/// Skipped entirely on terminals narrower than 60 columns — a zero-height
/// overlay rect would panic inside ratatui.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  — j/k scroll, ? or Esc to dismiss ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

/// All keybinding descriptions, grouped by section.
fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Navigation"),
        Line::from("  j / k         Scroll down / up one line"),
        Line::from("  g / G         Jump to top / bottom"),
        Line::from("  Ctrl-d / u    Scroll half page down / up"),
        Line::from("  Ctrl-f / b    Scroll full page down / up"),
        Line::from("  Tab, H / L    Toggle panel focus"),
        Line::from(""),
        Line::from("Files"),
        Line::from("  { / }         Previous / next file"),
        Line::from("  Enter / l     Open the selected file"),
        Line::from(""),
        Line::from("Review"),
        Line::from("  [ / ]         Previous / next commented line"),
        Line::from("  Mouse click   Click a gutter marker to peek its comments"),
        Line::from("  x             Dismiss the callout toast"),
        Line::from(""),
        Line::from("Peek popup"),
        Line::from("  j / k         Select comment"),
        Line::from("  Enter         Jump to the selected comment's line"),
        Line::from("  Esc / q       Close the popup"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit"),
    ])
}
