//! Color theme system for revpeek.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI
//! surface revpeek renders: panel borders, the annotation gutter, the peek
//! popup, the callout toast, and the status bar. Two built-in themes are
//! provided:
//!
//! - `dark` — ANSI 16 colors only, safe on 256-color SSH sessions.
//! - `catppuccin-mocha` — RGB truecolor palette, the default.

use ratatui::style::Color;

/// All color values used across revpeek's UI surfaces.
///
/// Callers use fields directly inside `Style::default().fg(theme.field)`.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border of the panel that has keyboard focus.
    pub border_active: Color,
    /// Border of every other panel.
    pub border_inactive: Color,

    // Source pane
    /// Gutter glyph marking a line that carries review comments.
    pub gutter_marker: Color,
    /// Gutter line numbers.
    pub gutter_line_no: Color,
    /// Plain source text when syntax highlighting supplies no color.
    pub source_text: Color,

    // File list
    /// File path text.
    pub file_path: Color,
    /// Comment-count badge next to a file.
    pub file_badge: Color,

    // Peek popup
    /// Popup border.
    pub peek_border: Color,
    /// Comment author names inside the popup.
    pub peek_author: Color,
    /// Selection highlight for the focused comment.
    pub peek_selected: Color,

    // Callout toast
    /// Toast background.
    pub callout_bg: Color,
    /// Toast text.
    pub callout_fg: Color,

    // Status bar
    /// Status bar background.
    pub status_bar_bg: Color,
    /// Status bar text.
    pub status_bar_fg: Color,
    /// Mode indicator color in NORMAL mode.
    pub status_mode_normal: Color,
    /// Mode indicator color while a peek session is open.
    pub status_mode_peek: Color,
}

impl Theme {
    /// The built-in dark theme using ANSI 16 colors.
    ///
    /// Works on all terminals: 16-color, 256-color, and truecolor.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            gutter_marker: Color::Yellow,
            gutter_line_no: Color::DarkGray,
            source_text: Color::Reset,

            file_path: Color::Reset,
            file_badge: Color::Yellow,

            peek_border: Color::Cyan,
            peek_author: Color::Green,
            peek_selected: Color::Cyan,

            callout_bg: Color::DarkGray,
            callout_fg: Color::White,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_peek: Color::Yellow,
        }
    }

    /// The Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Colors degrade to the nearest ANSI 256 approximation on non-truecolor
    /// terminals; use `dark()` over SSH when fidelity matters.
    ///
    /// Palette values from the Mocha variant at
    /// <https://github.com/catppuccin/catppuccin>.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161);    // #a6e3a1
        let yellow = Color::Rgb(249, 226, 175);   // #f9e2af
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90);    // #45475a
        let text = Color::Rgb(205, 214, 244);     // #cdd6f4
        let peach = Color::Rgb(250, 179, 135);    // #fab387

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            gutter_marker: peach,
            gutter_line_no: overlay1,
            source_text: text,

            file_path: text,
            file_badge: peach,

            peek_border: lavender,
            peek_author: green,
            peek_selected: lavender,

            callout_bg: surface1,
            callout_fg: text,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_peek: yellow,
        }
    }

    /// Looks up a built-in theme by its config-file name.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never
    /// prevents startup.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                eprintln!("revpeek: unknown theme '{}', falling back to 'dark'", other);
                Self::dark()
            }
        }
    }
}
