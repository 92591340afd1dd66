//! Background thread that loads review data and file content.
//!
//! Owns the `git2::Repository` for its lifetime (opened inside the thread,
//! never passed in). Parses the review file once at startup, then serves
//! `LoadFile` requests: file content from the review's pinned revision when
//! one is set (blob lookup, falling back to the working tree), syntect
//! highlighting, and the per-file comment set. Every failure degrades to an
//! empty or workdir-backed payload with an error log — the UI never sees a
//! loader fault.

use std::path::Path;
use std::sync::LazyLock;

use crossbeam_channel::Receiver;
use git2::Repository;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, warn};

use revpeek_core::model::ReviewComment;
use revpeek_core::review::ReviewSet;

use crate::event::AppEvent;
use crate::review::types::{
    ReviewDataError, ReviewDoc, ReviewLoadPayload, ReviewRequest, ReviewedFile,
};

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Entry point for the review loader thread.
///
/// Reads the review doc at `review_path`, opens the repository at
/// `repo_path` (optional — without one, content comes from the working
/// tree), pushes an initial payload for the first reviewed file, then loops
/// over incoming requests until the channel closes.
pub fn review_worker_loop(
    repo_path: String,
    review_path: String,
    rx: Receiver<ReviewRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    // Eagerly initialize LazyLock statics to avoid first-request latency.
    let _ = &*PS;
    let _ = &*TS;

    let doc = match read_review_doc(&review_path) {
        Ok(doc) => doc,
        Err(e) => {
            error!(path = %review_path, error = %e, "review file unavailable");
            ReviewDoc::default()
        }
    };

    let repo = match Repository::open(&repo_path) {
        Ok(repo) => Some(repo),
        Err(e) => {
            warn!(path = %repo_path, error = %e, "no repository; using working tree only");
            None
        }
    };

    let files = collect_files(&doc);
    let total_comments = doc.comment.len();

    let initial = files.first().map(|f| f.path.clone());
    let payload = build_payload(repo.as_ref(), &doc, initial, &files, total_comments);
    let _ = event_tx.send(AppEvent::ReviewResult(Box::new(payload)));

    for request in rx {
        let ReviewRequest::LoadFile(path) = request;
        let payload = build_payload(repo.as_ref(), &doc, Some(path), &files, total_comments);
        let _ = event_tx.send(AppEvent::ReviewResult(Box::new(payload)));
    }
}

/// Parses the review file from disk.
fn read_review_doc(path: &str) -> Result<ReviewDoc, ReviewDataError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Every file the review names, in first-mention order, with comment
/// counts.
fn collect_files(doc: &ReviewDoc) -> Vec<ReviewedFile> {
    let mut files: Vec<ReviewedFile> = Vec::new();
    for entry in &doc.comment {
        match files.iter_mut().find(|f| f.path == entry.file) {
            Some(f) => f.comment_count += 1,
            None => files.push(ReviewedFile { path: entry.file.clone(), comment_count: 1 }),
        }
    }
    files
}

/// The comment set for one file, preserving the review file's order.
fn review_set_for(doc: &ReviewDoc, path: &str) -> ReviewSet {
    let mut set = ReviewSet::new();
    for entry in doc.comment.iter().filter(|e| e.file == path) {
        set.push(ReviewComment::new(entry.author.clone(), entry.body.clone(), entry.line));
    }
    set
}

/// Assembles the full payload for `file`. Content failures degrade to an
/// empty line buffer so the UI can still show the file list.
fn build_payload(
    repo: Option<&Repository>,
    doc: &ReviewDoc,
    file: Option<String>,
    files: &[ReviewedFile],
    total_comments: usize,
) -> ReviewLoadPayload {
    let (raw_lines, review) = match &file {
        Some(path) => {
            let lines = match load_lines(repo, doc.revision.as_deref(), path) {
                Ok(lines) => lines,
                Err(e) => {
                    error!(file = %path, error = %e, "cannot load reviewed file");
                    Vec::new()
                }
            };
            (lines, review_set_for(doc, path))
        }
        None => (Vec::new(), ReviewSet::new()),
    };

    let ext = file.as_deref().map(file_ext).unwrap_or("txt");
    let highlighted_lines = highlight_lines(&raw_lines, ext);

    ReviewLoadPayload {
        file,
        raw_lines,
        highlighted_lines,
        review,
        files: files.to_vec(),
        total_comments,
    }
}

/// Reads `path` as lines, preferring the review's pinned revision.
///
/// A failed revision lookup warns and falls back to the working tree —
/// a stale pin should degrade the overlay, not hide the file.
fn load_lines(
    repo: Option<&Repository>,
    revision: Option<&str>,
    path: &str,
) -> Result<Vec<String>, ReviewDataError> {
    if let (Some(repo), Some(rev)) = (repo, revision) {
        match read_at_revision(repo, rev, path) {
            Ok(lines) => return Ok(lines),
            Err(e) => {
                warn!(file = %path, revision = %rev, error = %e, "revision read failed; using working tree");
            }
        }
    }
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(str::to_owned).collect())
}

/// Reads the blob for `path` out of the tree at `rev`.
fn read_at_revision(
    repo: &Repository,
    rev: &str,
    path: &str,
) -> Result<Vec<String>, ReviewDataError> {
    let commit = repo.revparse_single(rev)?.peel_to_commit()?;
    let tree = commit.tree()?;
    let entry = tree.get_path(Path::new(path))?;
    let blob = entry.to_object(repo)?.peel_to_blob()?;
    let content = std::str::from_utf8(blob.content())
        .map_err(|_| ReviewDataError::NonUtf8Blob(path.to_owned(), rev.to_owned()))?;
    Ok(content.lines().map(str::to_owned).collect())
}

/// Converts a syntect `(Style, &str)` run to an owned ratatui `Span`.
///
/// Only the foreground carries over — the panel background is themed by the
/// UI, and syntect's background would fight it. Alpha zero means "no color".
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    let fg = style.foreground;
    let mut ratatui_style = Style::default();
    if fg.a > 0 {
        ratatui_style = ratatui_style.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(syntect::highlighting::FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(syntect::highlighting::FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(syntect::highlighting::FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

/// Builds highlighted ratatui lines for a whole file.
///
/// One `HighlightLines` pass over the file keeps multi-line constructs
/// (strings, comments) correct. Falls back to unstyled lines when the theme
/// set is empty or a line fails to highlight.
fn highlight_lines(lines: &[String], ext: &str) -> Vec<Line<'static>> {
    let Some(theme) = TS.themes.get("base16-ocean.dark").or_else(|| TS.themes.values().next())
    else {
        return lines.iter().map(|l| Line::raw(l.clone())).collect();
    };
    let syntax = PS.find_syntax_by_extension(ext).unwrap_or_else(|| PS.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, theme);

    lines
        .iter()
        .map(|line| {
            let ranges = highlighter.highlight_line(line, &PS).unwrap_or_default();
            if ranges.is_empty() {
                Line::raw(line.clone())
            } else {
                Line::from(
                    ranges
                        .into_iter()
                        .map(|(style, text)| syntect_to_span(style, text))
                        .collect::<Vec<_>>(),
                )
            }
        })
        .collect()
}

/// Extension of a repository-relative path, `"txt"` when absent.
fn file_ext(path: &str) -> &str {
    Path::new(path).extension().and_then(|e| e.to_str()).unwrap_or("txt")
}
