//! Pointer-to-annotation resolution.
//!
//! Converts a pointer-up row inside a viewport into a document line, asks
//! the tag source whether that line carries annotations, and on a hit runs
//! the peek flow: tracking anchor at the start of the line, comments from
//! the provider, descriptor to the broker. This is a best-effort UI
//! affordance — every failure mode is a silent miss, never a panic.

use tracing::debug;

use crate::buffer::SourceBuffer;
use crate::model::{AnnotationMarker, LineSpan};
use crate::peek::{PeekSessionDescriptor, PreviewBroker, ViewportId};
use crate::review::{AnnotationTagSource, ReviewCommentProvider};

/// A pointer-up event in viewport-local coordinates.
///
/// `y` is the row relative to the top of the viewport's text area, already
/// corrected for any margin chrome above it. The handled flag is the
/// cross-handler contract: once set, no later handler may process the same
/// click.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    y: u16,
    handled: bool,
}

impl PointerEvent {
    pub fn at_row(y: u16) -> Self {
        Self { y, handled: false }
    }

    pub fn y(&self) -> u16 {
        self.y
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Marks the event consumed. Idempotent.
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }
}

/// Where the viewport currently sits over the document.
///
/// `top_line` is the first visible document line (the vertical scroll
/// position), `height` the number of visible rows, `total_lines` the
/// document length. A torn-down viewport reports zero for all three.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportGeometry {
    pub top_line: u32,
    pub height: u16,
    pub total_lines: u32,
}

impl ViewportGeometry {
    /// Translates a viewport-local row to a document line, or `None` when
    /// the row is below the rendered text (past the viewport height or past
    /// the last document line).
    pub fn line_at_row(&self, y: u16) -> Option<u32> {
        if y >= self.height {
            return None;
        }
        let line = self.top_line + y as u32;
        (line < self.total_lines).then_some(line)
    }
}

/// A resolved click: the document line and the first marker found on it.
#[derive(Debug, Clone)]
pub struct PointerHit {
    pub line: u32,
    pub marker: AnnotationMarker,
}

/// Resolves a pointer-up event against the viewport and tag source.
///
/// Returns the first marker (document order) on the clicked line and marks
/// the event handled. Rows that map to no rendered line, or lines with no
/// markers, return `None` and leave the event unhandled so other handlers
/// may process the click.
pub fn resolve_pointer(
    event: &mut PointerEvent,
    geometry: &ViewportGeometry,
    tags: &dyn AnnotationTagSource,
) -> Option<PointerHit> {
    let Some(line) = geometry.line_at_row(event.y()) else {
        debug!(y = event.y(), "pointer row maps to no rendered line");
        return None;
    };

    let marker = tags.markers_in(LineSpan::single(line)).into_iter().next()?;
    event.mark_handled();
    Some(PointerHit { line, marker })
}

/// Runs the peek flow for a resolved hit.
///
/// Anchors the session at the *start* of the hit line — not the click point —
/// via a tracking point, so the preview re-anchors to a stable location even
/// if the buffer is edited before the broker materializes the session. The
/// broker owns everything after submission.
///
/// Returns the submitted descriptor, or `None` when the provider reported no
/// comments for the marker (the zero-comment invariant is enforced here, not
/// in the broker).
pub fn open_comment_peek(
    hit: &PointerHit,
    buffer: &SourceBuffer,
    provider: &dyn ReviewCommentProvider,
    broker: &dyn PreviewBroker,
    viewport: ViewportId,
) -> Option<PeekSessionDescriptor> {
    let anchor = buffer.create_tracking_point(hit.line);
    let comments = provider.comments_for(&hit.marker);
    let descriptor = PeekSessionDescriptor::new(viewport, anchor, comments)?;
    broker.request_session(descriptor.clone());
    Some(descriptor)
}
