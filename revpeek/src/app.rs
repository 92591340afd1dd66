//! Central application state for revpeek.
//!
//! This module owns all mutable UI state: mode, panel focus, scroll offsets,
//! cached panel geometry, the loaded review payload, the active peek
//! session, and the callout toast. No rendering logic lives here — `app.rs`
//! is pure state read by the render module and mutated by the keybinding
//! dispatcher and event-loop arms.

use std::cell::Cell;

use crossbeam_channel::Sender;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;

use revpeek_core::buffer::SourceBuffer;
use revpeek_core::host::callout::AnchorRegion;
use revpeek_core::model::ReviewComment;
use revpeek_core::peek::{CommentNavigator, PeekResult, ViewportId};
use revpeek_core::resolve::ViewportGeometry;
use revpeek_core::review::ReviewSet;

use crate::callout::CalloutNotice;
use crate::event::AppEvent;
use crate::review::types::{ReviewLoadPayload, ReviewRequest, ReviewedFile};

/// The single source viewport this application renders into.
pub const SOURCE_VIEWPORT: ViewportId = ViewportId(0);

/// Width of the annotation gutter: 4-digit line number, marker glyph,
/// separator space.
pub const GUTTER_WIDTH: u16 = 6;

/// How many 250 ms ticks a callout toast stays visible.
const CALLOUT_TICKS: u8 = 20;

/// UI mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal vim-style navigation mode (default).
    #[default]
    Normal,
    /// A peek session is open; keys drive the popup.
    Peek,
    /// Full-screen help overlay is shown above all panels.
    HelpOverlay,
}

/// Which panel currently has keyboard focus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel listing the reviewed files.
    #[default]
    Files,
    /// Main panel showing the annotated source.
    Source,
}

impl PanelFocus {
    /// The other panel. Two panels, so next and previous coincide.
    pub fn toggled(self) -> Self {
        match self {
            PanelFocus::Files => PanelFocus::Source,
            PanelFocus::Source => PanelFocus::Files,
        }
    }
}

/// A materialized peek session being displayed.
#[derive(Debug)]
pub struct ActivePeek {
    /// The result carrying the ordered comments; disposed on close.
    pub result: PeekResult,
    /// Document line the popup is anchored under (tracking point already
    /// resolved at materialization time).
    pub anchor_line: u32,
    /// Index of the currently selected comment.
    pub selected: usize,
}

/// A callout toast with tick-based expiry.
#[derive(Debug)]
pub struct CalloutToast {
    pub notice: CalloutNotice,
    pub ticks_left: u8,
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    /// Current mode governing which keybindings are active.
    pub mode: Mode,
    /// Which panel currently receives keyboard scroll/navigation events.
    pub focus: PanelFocus,

    /// Stateful list widget backing the file-list panel.
    pub file_list_state: ListState,
    /// Vertical scroll offset for the source pane.
    pub source_scroll: usize,
    /// Scroll offset for the help overlay.
    pub help_scroll: u16,

    /// Inner height of the file-list panel, cached after each render.
    pub file_list_viewport_height: u16,
    /// Outer rects of the two panels, cached for click-to-focus hit tests.
    pub file_list_rect: Rect,
    pub source_rect: Rect,
    /// Inner rect of the source panel (borders stripped) — the coordinate
    /// space pointer rows are resolved in.
    pub source_inner: Rect,

    /// Path of the file currently shown, `None` before the first load.
    pub file: Option<String>,
    /// The core source buffer the peek flow anchors tracking points in.
    pub buffer: SourceBuffer,
    /// Pre-highlighted source lines from the loader.
    pub source_lines: Vec<Line<'static>>,
    /// Comments for the current file (tag source + comment provider).
    pub review: ReviewSet,
    /// Every file the review names.
    pub files: Vec<ReviewedFile>,
    /// Total comment count across the review.
    pub total_comments: usize,
    /// True while the loader is working (spinner in the status bar).
    pub loading: bool,
    /// The startup callout has been requested.
    pub announced: bool,

    /// The open peek session, if any.
    pub peek: Option<ActivePeek>,
    /// The visible callout toast, if any.
    pub callout: Option<CalloutToast>,

    /// Send half of the loader channel; `None` only in tests.
    pub review_tx: Option<Sender<ReviewRequest>>,
    /// Send half of the event bus, for the preview broker; `None` only in
    /// tests.
    pub event_tx: Option<UnboundedSender<AppEvent>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            focus: PanelFocus::default(),
            file_list_state: ListState::default(),
            source_scroll: 0,
            help_scroll: 0,
            file_list_viewport_height: 0,
            file_list_rect: Rect::default(),
            source_rect: Rect::default(),
            source_inner: Rect::default(),
            file: None,
            buffer: SourceBuffer::default(),
            source_lines: Vec::new(),
            review: ReviewSet::new(),
            files: Vec::new(),
            total_comments: 0,
            loading: true,
            announced: false,
            peek: None,
            callout: None,
            review_tx: None,
            event_tx: None,
        }
    }
}

impl AppState {
    /// Geometry of the source viewport for the core resolver.
    ///
    /// A zero-sized `source_inner` (first frame, or mid-teardown) yields a
    /// zero geometry, which the resolver treats as a miss.
    pub fn source_geometry(&self) -> ViewportGeometry {
        ViewportGeometry {
            top_line: self.source_scroll as u32,
            height: self.source_inner.height,
            total_lines: self.buffer.line_count(),
        }
    }

    /// The gutter column's region, used as the callout anchor element.
    pub fn gutter_anchor(&self) -> AnchorRegion {
        AnchorRegion {
            x: self.source_inner.x,
            y: self.source_inner.y,
            width: GUTTER_WIDTH.min(self.source_inner.width),
            height: self.source_inner.height,
        }
    }

    /// Applies a loader payload: new file content, comments, and file list.
    ///
    /// Scroll resets only when the shown file actually changed, so a reload
    /// of the same file keeps the reading position.
    pub fn apply_review_result(&mut self, payload: ReviewLoadPayload) {
        let file_changed = self.file != payload.file;
        self.file = payload.file;
        self.buffer = SourceBuffer::from_lines(payload.raw_lines);
        self.source_lines = payload.highlighted_lines;
        self.review = payload.review;
        self.files = payload.files;
        self.total_comments = payload.total_comments;
        self.loading = false;
        if file_changed {
            self.source_scroll = 0;
        }
        if self.file_list_state.selected().is_none() && !self.files.is_empty() {
            self.file_list_state.select(Some(0));
        }
    }

    // -----------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------

    /// Scrolls the focused panel down by `lines` rows.
    pub fn scroll_down(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Files => self.file_list_state.scroll_down_by(lines),
            PanelFocus::Source => {
                let max = self.source_lines.len().saturating_sub(1);
                self.source_scroll = (self.source_scroll + lines as usize).min(max);
            }
        }
    }

    /// Scrolls the focused panel up by `lines` rows.
    pub fn scroll_up(&mut self, lines: u16) {
        match self.focus {
            PanelFocus::Files => self.file_list_state.scroll_up_by(lines),
            PanelFocus::Source => {
                self.source_scroll = self.source_scroll.saturating_sub(lines as usize);
            }
        }
    }

    /// Scrolls the focused panel to the top.
    pub fn scroll_top(&mut self) {
        match self.focus {
            PanelFocus::Files => self.file_list_state.select_first(),
            PanelFocus::Source => self.source_scroll = 0,
        }
    }

    /// Scrolls the focused panel to the bottom.
    pub fn scroll_bottom(&mut self) {
        match self.focus {
            PanelFocus::Files => self.file_list_state.select_last(),
            PanelFocus::Source => {
                self.source_scroll = self.source_lines.len().saturating_sub(1);
            }
        }
    }

    /// Scrolls the focused panel down by half its visible height.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.focused_viewport_height() / 2).max(1));
    }

    /// Scrolls the focused panel up by half its visible height.
    pub fn half_page_up(&mut self) {
        self.scroll_up((self.focused_viewport_height() / 2).max(1));
    }

    /// Scrolls the focused panel down by one page.
    pub fn full_page_down(&mut self) {
        self.scroll_down(self.focused_viewport_height().max(1));
    }

    /// Scrolls the focused panel up by one page.
    pub fn full_page_up(&mut self) {
        self.scroll_up(self.focused_viewport_height().max(1));
    }

    fn focused_viewport_height(&self) -> u16 {
        match self.focus {
            PanelFocus::Files => self.file_list_viewport_height,
            PanelFocus::Source => self.source_inner.height,
        }
    }

    /// Centers the source pane on `line`.
    pub fn scroll_source_to(&mut self, line: u32) {
        let half = (self.source_inner.height / 2) as u32;
        self.source_scroll = line.saturating_sub(half) as usize;
    }

    // -----------------------------------------------------------------
    // File list
    // -----------------------------------------------------------------

    /// Loads the file currently selected in the file list.
    pub fn open_selected_file(&mut self) {
        let Some(idx) = self.file_list_state.selected() else { return };
        let Some(file) = self.files.get(idx) else { return };
        if let Some(tx) = &self.review_tx {
            let _ = tx.send(ReviewRequest::LoadFile(file.path.clone()));
            self.loading = true;
        }
        self.focus = PanelFocus::Source;
    }

    /// Jumps the source pane to the next annotated line after the current
    /// scroll position (wraps to the first).
    pub fn next_annotated_line(&mut self) {
        let current = self.source_scroll as u32;
        let next = self
            .review
            .annotated_lines()
            .find(|&l| l > current)
            .or_else(|| self.review.annotated_lines().next());
        if let Some(line) = next {
            self.source_scroll = line as usize;
        }
    }

    /// Jumps the source pane to the previous annotated line before the
    /// current scroll position (wraps to the last).
    pub fn prev_annotated_line(&mut self) {
        let current = self.source_scroll as u32;
        let prev = self
            .review
            .annotated_lines()
            .filter(|&l| l < current)
            .last()
            .or_else(|| self.review.annotated_lines().last());
        if let Some(line) = prev {
            self.source_scroll = line as usize;
        }
    }

    // -----------------------------------------------------------------
    // Peek session
    // -----------------------------------------------------------------

    /// Installs a materialized peek result and switches to Peek mode.
    pub fn open_peek(&mut self, result: PeekResult, anchor_line: u32) {
        // Replacing an existing session disposes it first.
        self.close_peek();
        self.peek = Some(ActivePeek { result, anchor_line, selected: 0 });
        self.mode = Mode::Peek;
    }

    /// Disposes and removes the active peek session, if any.
    pub fn close_peek(&mut self) {
        if let Some(mut peek) = self.peek.take() {
            peek.result.dispose();
        }
        if self.mode == Mode::Peek {
            self.mode = Mode::Normal;
        }
    }

    /// Moves the peek selection down one comment.
    pub fn peek_select_next(&mut self) {
        if let Some(peek) = &mut self.peek {
            let last = peek.result.comments().len().saturating_sub(1);
            peek.selected = (peek.selected + 1).min(last);
        }
    }

    /// Moves the peek selection up one comment.
    pub fn peek_select_prev(&mut self) {
        if let Some(peek) = &mut self.peek {
            peek.selected = peek.selected.saturating_sub(1);
        }
    }

    /// Navigates the source pane to the selected comment and closes the
    /// session. The jump target travels through the core's navigator seam.
    pub fn navigate_to_selected(&mut self) {
        let target = {
            let Some(peek) = &self.peek else { return };
            let Some(comment) = peek.result.comments().get(peek.selected) else { return };
            let navigator = ScrollNavigator::default();
            peek.result.navigate_to(comment, &navigator);
            navigator.take_target()
        };
        if let Some(line) = target {
            self.scroll_source_to(line);
        }
        self.close_peek();
    }

    // -----------------------------------------------------------------
    // Callout toast
    // -----------------------------------------------------------------

    /// Displays a callout toast for the standard duration.
    pub fn show_callout(&mut self, notice: CalloutNotice) {
        self.callout = Some(CalloutToast { notice, ticks_left: CALLOUT_TICKS });
    }

    /// Dismisses the visible toast, if any.
    pub fn dismiss_callout(&mut self) {
        self.callout = None;
    }

    /// One 250 ms logic tick: ages the callout toast.
    pub fn tick(&mut self) {
        if let Some(toast) = &mut self.callout {
            toast.ticks_left = toast.ticks_left.saturating_sub(1);
            if toast.ticks_left == 0 {
                self.callout = None;
            }
        }
    }
}

/// Navigator that records the requested target line.
///
/// `navigate_to` takes `&self`, so the target travels out through a `Cell`;
/// the caller applies the scroll after the forwarding call returns.
#[derive(Default)]
struct ScrollNavigator {
    target: Cell<Option<u32>>,
}

impl ScrollNavigator {
    fn take_target(&self) -> Option<u32> {
        self.target.take()
    }
}

impl CommentNavigator for ScrollNavigator {
    fn navigate_to(&self, comment: &ReviewComment) {
        self.target.set(Some(comment.line));
    }
}
