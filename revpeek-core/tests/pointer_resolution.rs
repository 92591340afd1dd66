//! Pointer-to-annotation resolution, end to end.
//!
//! Exercises: line_at_row translation, marker lookup, the handled-flag
//! contract, and the full click-to-descriptor flow against an in-memory
//! review set.

use std::sync::Mutex;

use revpeek_core::buffer::SourceBuffer;
use revpeek_core::model::ReviewComment;
use revpeek_core::peek::{PeekSessionDescriptor, PreviewBroker, ViewportId};
use revpeek_core::resolve::{open_comment_peek, resolve_pointer, PointerEvent, ViewportGeometry};
use revpeek_core::review::ReviewSet;

/// Broker fake that records every submitted descriptor.
#[derive(Default)]
struct CapturingBroker {
    sessions: Mutex<Vec<PeekSessionDescriptor>>,
}

impl PreviewBroker for CapturingBroker {
    fn request_session(&self, descriptor: PeekSessionDescriptor) {
        self.sessions.lock().unwrap().push(descriptor);
    }
}

fn ten_line_buffer() -> SourceBuffer {
    SourceBuffer::from_lines((0..10).map(|i| format!("line {i}")).collect())
}

fn geometry_for(buffer: &SourceBuffer) -> ViewportGeometry {
    ViewportGeometry { top_line: 0, height: 20, total_lines: buffer.line_count() }
}

#[test]
fn click_below_last_line_is_a_silent_miss() {
    let review = ReviewSet::new();
    let geometry = ViewportGeometry { top_line: 0, height: 20, total_lines: 10 };

    let mut event = PointerEvent::at_row(15);
    let hit = resolve_pointer(&mut event, &geometry, &review);

    assert!(hit.is_none(), "row past the last line should resolve to nothing");
    assert!(!event.is_handled(), "a miss must leave the event unhandled");
}

#[test]
fn click_past_viewport_height_is_a_silent_miss() {
    let review = ReviewSet::new();
    let geometry = ViewportGeometry { top_line: 0, height: 5, total_lines: 100 };

    let mut event = PointerEvent::at_row(5);
    assert!(resolve_pointer(&mut event, &geometry, &review).is_none());
    assert!(!event.is_handled());
}

#[test]
fn click_on_unannotated_line_leaves_event_unhandled() {
    let mut review = ReviewSet::new();
    review.push(ReviewComment::new("alice", "fix typo", 4));
    let geometry = ViewportGeometry { top_line: 0, height: 20, total_lines: 10 };

    let mut event = PointerEvent::at_row(2);
    let hit = resolve_pointer(&mut event, &geometry, &review);

    assert!(hit.is_none(), "line 2 carries no marker");
    assert!(!event.is_handled(), "other handlers should still see this click");
}

#[test]
fn click_on_annotated_line_returns_one_marker_and_handles_event() {
    let mut review = ReviewSet::new();
    review.push(ReviewComment::new("alice", "fix typo", 4));
    review.push(ReviewComment::new("bob", "needs test", 4));
    let geometry = ViewportGeometry { top_line: 0, height: 20, total_lines: 10 };

    let mut event = PointerEvent::at_row(4);
    let hit = resolve_pointer(&mut event, &geometry, &review)
        .expect("line 4 carries a marker");

    assert_eq!(hit.line, 4);
    assert!(event.is_handled(), "a hit must mark the event handled");
}

#[test]
fn scrolled_viewport_translates_rows_to_document_lines() {
    let mut review = ReviewSet::new();
    review.push(ReviewComment::new("alice", "fix typo", 7));
    let geometry = ViewportGeometry { top_line: 6, height: 20, total_lines: 10 };

    // Row 1 of a viewport scrolled to line 6 is document line 7.
    let mut event = PointerEvent::at_row(1);
    let hit = resolve_pointer(&mut event, &geometry, &review)
        .expect("scroll translation should land on line 7");
    assert_eq!(hit.line, 7);
}

#[test]
fn torn_down_viewport_resolves_to_nothing() {
    let mut review = ReviewSet::new();
    review.push(ReviewComment::new("alice", "fix typo", 0));

    // A viewport mid-teardown reports zero geometry; the resolver must treat
    // that as a miss rather than fault.
    let mut event = PointerEvent::at_row(0);
    assert!(resolve_pointer(&mut event, &ViewportGeometry::default(), &review).is_none());
    assert!(!event.is_handled());
}

#[test]
fn click_on_line_four_opens_peek_with_both_comments_in_order() {
    let buffer = ten_line_buffer();
    let mut review = ReviewSet::new();
    review.push(ReviewComment::new("alice", "fix typo", 4));
    review.push(ReviewComment::new("bob", "needs test", 4));
    let broker = CapturingBroker::default();
    let viewport = ViewportId(1);

    let mut event = PointerEvent::at_row(4);
    let hit = resolve_pointer(&mut event, &geometry_for(&buffer), &review)
        .expect("line 4 should resolve to its marker");
    let descriptor = open_comment_peek(&hit, &buffer, &review, &broker, viewport)
        .expect("two comments should open a session");

    assert!(event.is_handled());
    assert_eq!(buffer.resolve(&descriptor.anchor()), 4, "anchored at line 4's start");
    let bodies: Vec<&str> = descriptor.comments().iter().map(|c| c.body.as_str()).collect();
    assert_eq!(bodies, ["fix typo", "needs test"], "provider order preserved");

    let sessions = broker.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1, "exactly one session submitted to the broker");
    assert_eq!(sessions[0].viewport(), viewport);
}

#[test]
fn click_below_last_line_submits_nothing() {
    let buffer = ten_line_buffer();
    let mut review = ReviewSet::new();
    review.push(ReviewComment::new("alice", "fix typo", 4));
    let broker = CapturingBroker::default();
    let geometry = geometry_for(&buffer);

    let mut event = PointerEvent::at_row(12);
    assert!(resolve_pointer(&mut event, &geometry, &review).is_none());
    assert!(!event.is_handled(), "event stays unhandled below the last line");
    assert!(broker.sessions.lock().unwrap().is_empty(), "no descriptor produced");
}

#[test]
fn anchor_re_anchors_across_an_edit_before_materialization() {
    let mut buffer = ten_line_buffer();
    let mut review = ReviewSet::new();
    review.push(ReviewComment::new("alice", "fix typo", 4));
    let broker = CapturingBroker::default();

    let mut event = PointerEvent::at_row(4);
    let hit = resolve_pointer(&mut event, &geometry_for(&buffer), &review).unwrap();
    let descriptor =
        open_comment_peek(&hit, &buffer, &review, &broker, ViewportId(1)).unwrap();

    // Two lines inserted above the anchor between request and materialization.
    buffer.splice(0, 0, vec!["// new".into(), "// lines".into()]);

    assert_eq!(
        buffer.resolve(&descriptor.anchor()),
        6,
        "tracking anchor should follow the line down"
    );
}
