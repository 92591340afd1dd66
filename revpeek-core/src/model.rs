//! Review-data value types shared across the crate.
//!
//! All types here are fully owned (no borrowed lifetimes) and `Send`-safe so
//! they can cross the loader-thread boundary and live in application state
//! without arena allocation. The review-data subsystem owns the authoritative
//! copies; everything in this crate holds clones for display only and never
//! mutates or persists them.

/// One pull-request review remark anchored to a source line.
///
/// Identity is UUID v4 text, matching how the review-data subsystem keys
/// comments. `line` is a 0-based index into the reviewed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewComment {
    pub id: String, // UUID v4 text
    pub author: String,
    pub body: String,
    pub line: u32,
}

impl ReviewComment {
    /// Builds a comment with a freshly minted UUID v4 identity.
    pub fn new(author: impl Into<String>, body: impl Into<String>, line: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.into(),
            body: body.into(),
            line,
        }
    }
}

/// Opaque token meaning "at least one comment thread is anchored here".
///
/// Produced by an [`AnnotationTagSource`](crate::review::AnnotationTagSource)
/// and redeemed through a
/// [`ReviewCommentProvider`](crate::review::ReviewCommentProvider). Consumers
/// must not assume any structure beyond identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationMarker {
    thread: String,
}

impl AnnotationMarker {
    /// Wraps a thread key. Only tag sources should call this.
    pub fn new(thread: impl Into<String>) -> Self {
        Self { thread: thread.into() }
    }

    /// The thread key this marker stands for. Meaningful only to the
    /// provider that issued the marker.
    pub fn thread_key(&self) -> &str {
        &self.thread
    }
}

/// Half-open range of 0-based document lines, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start: u32,
    pub end: u32,
}

impl LineSpan {
    /// Span covering exactly one line.
    pub fn single(line: u32) -> Self {
        Self { start: line, end: line + 1 }
    }

    /// True when `line` falls inside the span.
    pub fn contains(&self, line: u32) -> bool {
        line >= self.start && line < self.end
    }

    /// True when the span covers no lines at all.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}
