//! Peek-session lifecycle: descriptor, relationship routing, and result.
//!
//! The flow is an explicit two-phase protocol. Phase one: the pointer path
//! builds an immutable [`PeekSessionDescriptor`] and hands it to the host's
//! [`PreviewBroker`]. Phase two: the broker, on its own schedule, asks the
//! [`PeekResultFactory`] registered under the relationship name to
//! materialize a [`PeekResult`] for that descriptor. No mutable state is
//! shared between the phases — materialization is a pure function of the
//! descriptor.

use std::sync::LazyLock;

use crate::buffer::TrackingPoint;
use crate::model::ReviewComment;

/// Identity of the editor surface a click occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportId(pub u32);

/// The named kind of peek session this subsystem contributes.
///
/// The host's preview broker routes purely by name-matching, so the session
/// creation path and the renderer registration path must read the same
/// value. That is the one piece of intentional global state in this crate:
/// constructed once, frozen, read concurrently without synchronization.
#[derive(Debug)]
pub struct PeekRelationship {
    name: &'static str,
    display_name: &'static str,
}

static RELATIONSHIP: LazyLock<PeekRelationship> = LazyLock::new(|| PeekRelationship {
    name: "review-comments",
    display_name: "Code Review",
});

impl PeekRelationship {
    /// The process-wide instance. Every call returns the same value for the
    /// lifetime of the process.
    pub fn instance() -> &'static PeekRelationship {
        &RELATIONSHIP
    }

    /// Routing name the broker matches on.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human-readable label for broker UI.
    pub fn display_name(&self) -> &'static str {
        self.display_name
    }
}

/// Immutable request to open a preview surface.
///
/// Carries the target viewport, a tracking anchor (stays meaningful if the
/// buffer is edited between request and materialization), the ordered
/// comment list, and the relationship name the broker routes by.
#[derive(Debug, Clone)]
pub struct PeekSessionDescriptor {
    viewport: ViewportId,
    anchor: TrackingPoint,
    comments: Vec<ReviewComment>,
    relationship: &'static str,
}

impl PeekSessionDescriptor {
    /// Builds a descriptor, or `None` when `comments` is empty — a session
    /// is never opened for a position with zero comments, so callers must
    /// filter first.
    pub fn new(
        viewport: ViewportId,
        anchor: TrackingPoint,
        comments: Vec<ReviewComment>,
    ) -> Option<Self> {
        if comments.is_empty() {
            return None;
        }
        Some(Self {
            viewport,
            anchor,
            comments,
            relationship: PeekRelationship::instance().name(),
        })
    }

    pub fn viewport(&self) -> ViewportId {
        self.viewport
    }

    pub fn anchor(&self) -> TrackingPoint {
        self.anchor
    }

    /// The comments, in the order the provider supplied them.
    pub fn comments(&self) -> &[ReviewComment] {
        &self.comments
    }

    pub fn relationship(&self) -> &'static str {
        self.relationship
    }
}

/// The host collaborator that owns session scheduling, positioning, and
/// display timing. This subsystem only submits requests.
pub trait PreviewBroker {
    fn request_session(&self, descriptor: PeekSessionDescriptor);
}

/// Materializes a displayable result for a descriptor of a matching kind.
///
/// Registered with the broker under [`PeekRelationship::name`]; the broker
/// invokes it when it is ready to render the session.
pub trait PeekResultFactory {
    fn relationship(&self) -> &'static str;
    fn materialize(&self, descriptor: &PeekSessionDescriptor) -> PeekResult;
}

/// The factory for review-comment peek sessions.
#[derive(Debug, Default)]
pub struct ReviewCommentPeekFactory;

impl PeekResultFactory for ReviewCommentPeekFactory {
    fn relationship(&self) -> &'static str {
        PeekRelationship::instance().name()
    }

    fn materialize(&self, descriptor: &PeekSessionDescriptor) -> PeekResult {
        PeekResult::new(descriptor.comments().to_vec())
    }
}

/// Static chrome text for the preview surface. Fixed constants, independent
/// of the comments being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeekDisplayInfo {
    pub title: &'static str,
    pub label: &'static str,
}

const DISPLAY_INFO: PeekDisplayInfo = PeekDisplayInfo {
    title: "Review",
    label: "Code Review",
};

/// Navigation collaborator the host invokes when the user selects a comment
/// inside the preview.
pub trait CommentNavigator {
    fn navigate_to(&self, comment: &ReviewComment);
}

/// The renderable outcome of a peek request.
///
/// Holds the ordered comment list carried over from the descriptor until
/// disposed. Disposal releases the list, fires each registered notification
/// exactly once, and is a no-op on re-entry.
pub struct PeekResult {
    comments: Vec<ReviewComment>,
    disposed: bool,
    on_disposed: Vec<Box<dyn FnOnce() + Send>>,
}

impl PeekResult {
    fn new(comments: Vec<ReviewComment>) -> Self {
        Self { comments, disposed: false, on_disposed: Vec::new() }
    }

    /// The comments to display, empty once disposed.
    pub fn comments(&self) -> &[ReviewComment] {
        &self.comments
    }

    /// Every comment in a review result is navigable.
    pub fn can_navigate_to(&self) -> bool {
        true
    }

    pub fn display_info(&self) -> PeekDisplayInfo {
        DISPLAY_INFO
    }

    /// Registers a callback fired when the result is disposed. Registering
    /// after disposal fires immediately.
    pub fn subscribe_disposed(&mut self, callback: impl FnOnce() + Send + 'static) {
        if self.disposed {
            callback();
        } else {
            self.on_disposed.push(Box::new(callback));
        }
    }

    /// Forwards a navigation request to the host's navigation collaborator.
    /// No logic of its own — the navigator owns what "go there" means.
    pub fn navigate_to(&self, comment: &ReviewComment, navigator: &dyn CommentNavigator) {
        navigator.navigate_to(comment);
    }

    /// Releases the comment list and fires disposal notifications.
    ///
    /// Idempotent: a second call does nothing, even if no comments were ever
    /// set or no callback was registered.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.comments = Vec::new();
        for callback in self.on_disposed.drain(..) {
            callback();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for PeekResult {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for PeekResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeekResult")
            .field("comments", &self.comments.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}
