//! Peek descriptor, relationship, and result lifecycle.
//!
//! Exercises: comment-order preservation through descriptor and result, the
//! non-empty invariant, idempotent disposal with exactly one notification,
//! relationship-name stability across calls and threads, and navigation
//! forwarding.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use revpeek_core::buffer::SourceBuffer;
use revpeek_core::model::ReviewComment;
use revpeek_core::peek::{
    CommentNavigator, PeekRelationship, PeekResultFactory, PeekSessionDescriptor,
    ReviewCommentPeekFactory, ViewportId,
};

fn descriptor_with(comments: Vec<ReviewComment>) -> Option<PeekSessionDescriptor> {
    let buffer = SourceBuffer::from_lines(vec!["fn main() {}".into()]);
    PeekSessionDescriptor::new(ViewportId(1), buffer.create_tracking_point(0), comments)
}

#[test]
fn descriptor_refuses_an_empty_comment_list() {
    assert!(
        descriptor_with(Vec::new()).is_none(),
        "a session must never open for a position with zero comments"
    );
}

#[test]
fn descriptor_preserves_single_comment() {
    let descriptor = descriptor_with(vec![ReviewComment::new("alice", "fix typo", 0)]).unwrap();
    assert_eq!(descriptor.comments().len(), 1);
    assert_eq!(descriptor.comments()[0].body, "fix typo");
}

#[test]
fn descriptor_and_result_preserve_ten_comment_order() {
    let comments: Vec<ReviewComment> =
        (0..10).map(|i| ReviewComment::new("alice", format!("remark {i}"), 3)).collect();
    let expected: Vec<String> = comments.iter().map(|c| c.body.clone()).collect();

    let descriptor = descriptor_with(comments).unwrap();
    let result = ReviewCommentPeekFactory.materialize(&descriptor);

    let got: Vec<String> = result.comments().iter().map(|c| c.body.clone()).collect();
    assert_eq!(got, expected, "order must survive descriptor and materialization");
}

#[test]
fn materialization_is_a_pure_function_of_the_descriptor() {
    let descriptor = descriptor_with(vec![
        ReviewComment::new("alice", "fix typo", 0),
        ReviewComment::new("bob", "needs test", 0),
    ])
    .unwrap();

    let first = ReviewCommentPeekFactory.materialize(&descriptor);
    let second = ReviewCommentPeekFactory.materialize(&descriptor);
    assert_eq!(first.comments(), second.comments(), "same descriptor, same result");
    assert!(first.can_navigate_to());
    assert_eq!(first.display_info().title, "Review");
}

#[test]
fn disposal_fires_exactly_one_notification() {
    let descriptor = descriptor_with(vec![ReviewComment::new("alice", "fix typo", 0)]).unwrap();
    let mut result = ReviewCommentPeekFactory.materialize(&descriptor);

    let fired = Arc::new(AtomicUsize::new(0));
    let observer = Arc::clone(&fired);
    result.subscribe_disposed(move || {
        observer.fetch_add(1, Ordering::SeqCst);
    });

    result.dispose();
    result.dispose();

    assert_eq!(fired.load(Ordering::SeqCst), 1, "second dispose must be a no-op");
    assert!(result.is_disposed());
    assert!(result.comments().is_empty(), "disposal releases the comment list");
}

#[test]
fn disposal_without_subscribers_or_comments_does_not_fault() {
    let descriptor = descriptor_with(vec![ReviewComment::new("alice", "fix typo", 0)]).unwrap();
    let mut result = ReviewCommentPeekFactory.materialize(&descriptor);
    result.dispose();
    result.dispose();
}

#[test]
fn subscribing_after_disposal_fires_immediately() {
    let descriptor = descriptor_with(vec![ReviewComment::new("alice", "fix typo", 0)]).unwrap();
    let mut result = ReviewCommentPeekFactory.materialize(&descriptor);
    result.dispose();

    let fired = Arc::new(AtomicUsize::new(0));
    let observer = Arc::clone(&fired);
    result.subscribe_disposed(move || {
        observer.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn relationship_name_is_stable_within_a_process() {
    let first = PeekRelationship::instance().name();
    let second = PeekRelationship::instance().name();
    assert_eq!(first, second);
    assert!(std::ptr::eq(PeekRelationship::instance(), PeekRelationship::instance()));
}

#[test]
fn relationship_reads_agree_across_threads() {
    // UI and broker threads both read the singleton without synchronization.
    let names: Vec<&'static str> = (0..8)
        .map(|_| std::thread::spawn(|| PeekRelationship::instance().name()))
        .collect::<Vec<_>>()
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();
    assert!(names.iter().all(|n| *n == names[0]));
}

#[test]
fn factory_registers_under_the_relationship_name() {
    assert_eq!(
        ReviewCommentPeekFactory.relationship(),
        PeekRelationship::instance().name(),
        "creation path and registration path must agree on routing"
    );
}

#[test]
fn navigate_to_forwards_to_the_navigator() {
    #[derive(Default)]
    struct RecordingNavigator {
        targets: Mutex<Vec<u32>>,
    }

    impl CommentNavigator for RecordingNavigator {
        fn navigate_to(&self, comment: &ReviewComment) {
            self.targets.lock().unwrap().push(comment.line);
        }
    }

    let descriptor = descriptor_with(vec![ReviewComment::new("alice", "fix typo", 0)]).unwrap();
    let result = ReviewCommentPeekFactory.materialize(&descriptor);
    let navigator = RecordingNavigator::default();

    result.navigate_to(&result.comments()[0], &navigator);
    assert_eq!(*navigator.targets.lock().unwrap(), vec![0]);
}
