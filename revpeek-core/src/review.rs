//! Collaborator seams for review data, plus the in-memory implementation.
//!
//! The resolver and peek flow only ever see these two traits; where the
//! comments actually come from (a review file, a remote service, a test
//! fixture) is the caller's business. [`ReviewSet`] is the concrete
//! implementation the application builds from loaded review data.

use std::collections::BTreeMap;

use crate::model::{AnnotationMarker, LineSpan, ReviewComment};

/// Produces the annotation markers overlapping a span of the document.
///
/// Implementations must return markers in document order.
pub trait AnnotationTagSource {
    fn markers_in(&self, span: LineSpan) -> Vec<AnnotationMarker>;
}

/// Redeems a marker for the full, ordered comment list behind it.
///
/// The returned order is the order the review-data subsystem supplied and
/// must be preserved end-to-end through descriptor and peek result.
pub trait ReviewCommentProvider {
    fn comments_for(&self, marker: &AnnotationMarker) -> Vec<ReviewComment>;
}

/// All review comments for one file, indexed by anchor line.
///
/// One marker (thread) per annotated line; comments within a thread keep
/// insertion order. The `BTreeMap` keeps line iteration in document order,
/// which is what makes the [`AnnotationTagSource`] ordering contract hold
/// for free.
#[derive(Debug, Default, Clone)]
pub struct ReviewSet {
    threads: BTreeMap<u32, Thread>,
}

#[derive(Debug, Clone)]
struct Thread {
    key: String,
    comments: Vec<ReviewComment>,
}

impl ReviewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a comment to the thread on its anchor line, creating the
    /// thread (and minting its key) on first use.
    pub fn push(&mut self, comment: ReviewComment) {
        self.threads
            .entry(comment.line)
            .or_insert_with(|| Thread {
                key: uuid::Uuid::new_v4().to_string(),
                comments: Vec::new(),
            })
            .comments
            .push(comment);
    }

    /// Lines that carry at least one comment, in document order.
    pub fn annotated_lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.threads.keys().copied()
    }

    /// True when `line` carries at least one comment.
    pub fn is_annotated(&self, line: u32) -> bool {
        self.threads.contains_key(&line)
    }

    /// Total number of comments across all threads.
    pub fn comment_count(&self) -> usize {
        self.threads.values().map(|t| t.comments.len()).sum()
    }

    /// True when the set holds no comments at all.
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}

impl AnnotationTagSource for ReviewSet {
    fn markers_in(&self, span: LineSpan) -> Vec<AnnotationMarker> {
        if span.is_empty() {
            return Vec::new();
        }
        self.threads
            .range(span.start..span.end)
            .map(|(_, thread)| AnnotationMarker::new(thread.key.clone()))
            .collect()
    }
}

impl ReviewCommentProvider for ReviewSet {
    fn comments_for(&self, marker: &AnnotationMarker) -> Vec<ReviewComment> {
        self.threads
            .values()
            .find(|t| t.key == marker.thread_key())
            .map(|t| t.comments.clone())
            .unwrap_or_default()
    }
}
