//! Owned data types for the review loader thread.
//!
//! All types here are fully owned and `Send`-safe so they can be
//! transferred from the loader thread to the main UI thread and stored in
//! `AppState` without arena allocation.

use serde::Deserialize;
use thiserror::Error;

use revpeek_core::review::ReviewSet;

/// The on-disk review file, `.revpeek/review.toml`.
///
/// `revision` optionally pins the commit the review was written against;
/// when present, file content is read from that commit so the overlay lines
/// match what the reviewer saw. `comment` entries keep file order as
/// written — that order is the provider order the peek surface preserves.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewDoc {
    /// Commit-ish the review applies to (`None` = working tree).
    #[serde(default)]
    pub revision: Option<String>,
    /// All review comments, in submission order.
    #[serde(default)]
    pub comment: Vec<ReviewEntry>,
}

/// One `[[comment]]` entry from the review file.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewEntry {
    /// Repository-relative path of the commented file.
    pub file: String,
    /// 0-based line the comment is anchored to.
    pub line: u32,
    /// Reviewer login or display name.
    pub author: String,
    /// Comment body (markdown treated as plain text).
    pub body: String,
}

/// Per-file summary for the file-list panel: path plus how many comments
/// the review carries against it.
#[derive(Debug, Clone)]
pub struct ReviewedFile {
    pub path: String,
    pub comment_count: usize,
}

/// Commands sent from the main thread to the review loader thread.
#[derive(Debug)]
pub enum ReviewRequest {
    /// Load one reviewed file: its content, highlighting, and comments.
    LoadFile(String),
}

/// Result payload sent from the loader back to the main thread.
///
/// Carried inside `AppEvent::ReviewResult(Box<ReviewLoadPayload>)`; `Box`
/// keeps the enum variant small since the highlighted line buffer can be
/// large.
#[derive(Debug)]
pub struct ReviewLoadPayload {
    /// Path of the loaded file, `None` when the review names no files.
    pub file: Option<String>,
    /// Raw file content, one entry per line (feeds the core source buffer).
    pub raw_lines: Vec<String>,
    /// Pre-highlighted lines for the source pane, computed on the loader
    /// thread. Owned `Span` content only, so `'static`.
    pub highlighted_lines: Vec<ratatui::text::Line<'static>>,
    /// Comments for the loaded file, in submission order.
    pub review: ReviewSet,
    /// Every file named by the review, in first-mention order.
    pub files: Vec<ReviewedFile>,
    /// Total comment count across all files (for the startup callout).
    pub total_comments: usize,
}

/// Failures while reading review data. The loader logs these and degrades
/// to an empty payload; they never reach the UI as faults.
#[derive(Debug, Error)]
pub enum ReviewDataError {
    #[error("cannot read review file: {0}")]
    Io(#[from] std::io::Error),
    #[error("review file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("git lookup failed: {0}")]
    Git(#[from] git2::Error),
    #[error("file {0} is not valid UTF-8 at revision {1}")]
    NonUtf8Blob(String, String),
}
