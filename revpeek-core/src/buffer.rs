//! Line-granular source buffer and tracking points.
//!
//! The editor's real text model is supplied by the host; this buffer is the
//! minimal seam the peek flow needs: versioned line storage plus an edit log
//! that tracking points replay. A [`TrackingPoint`] captured before an edit
//! still resolves to a meaningful line afterwards — it re-anchors instead of
//! holding a raw offset.
//!
//! Re-anchoring is forward-biased: insertions strictly before the point (or
//! exactly at it) push it down, deletions covering the point collapse it to
//! the edit start, and edits entirely below it leave it alone. Resolution is
//! a pure replay of the log, so two points captured at the same version
//! always agree.

/// One recorded buffer mutation: `removed` lines starting at `start_line`
/// were replaced by `added` lines.
#[derive(Debug, Clone, Copy)]
struct EditRecord {
    version: u64,
    start_line: u32,
    removed: u32,
    added: u32,
}

/// Versioned, line-granular text buffer.
///
/// Every mutation bumps `version` and appends to the edit log. The log is
/// retained for the buffer's lifetime; peek sessions are short-lived, so the
/// log stays small in practice.
#[derive(Debug, Default)]
pub struct SourceBuffer {
    lines: Vec<String>,
    version: u64,
    edits: Vec<EditRecord>,
}

impl SourceBuffer {
    /// Builds a buffer from owned lines at version 0.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines, version: 0, edits: Vec::new() }
    }

    /// Number of lines currently in the buffer.
    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// The line at `index`, or `None` past the end.
    pub fn line(&self, index: u32) -> Option<&str> {
        self.lines.get(index as usize).map(String::as_str)
    }

    /// Current buffer version. Bumped once per edit.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replaces `removed` lines starting at `start_line` with `new_lines`.
    ///
    /// Out-of-range portions are clamped rather than rejected: the buffer is
    /// a display seam, not the authoritative text model, and a stale edit
    /// must not panic the UI thread.
    pub fn splice(&mut self, start_line: u32, removed: u32, new_lines: Vec<String>) {
        let start = (start_line as usize).min(self.lines.len());
        let end = (start + removed as usize).min(self.lines.len());
        let added = new_lines.len() as u32;
        self.lines.splice(start..end, new_lines);
        self.version += 1;
        self.edits.push(EditRecord {
            version: self.version,
            start_line: start as u32,
            removed: (end - start) as u32,
            added,
        });
    }

    /// Captures a tracking point at the start of `line`, pinned to the
    /// current buffer version.
    ///
    /// `line` is clamped to the last line so a point can always be captured,
    /// even against an empty buffer.
    pub fn create_tracking_point(&self, line: u32) -> TrackingPoint {
        let clamped = line.min(self.line_count().saturating_sub(1));
        TrackingPoint { line: clamped, version: self.version }
    }

    /// Resolves `point` against the current buffer state by replaying every
    /// edit recorded after the point was captured.
    pub fn resolve(&self, point: &TrackingPoint) -> u32 {
        let mut line = point.line;
        for edit in self.edits.iter().filter(|e| e.version > point.version) {
            line = shift_line(line, edit);
        }
        line.min(self.line_count().saturating_sub(1))
    }
}

/// Applies one edit record to a tracked line.
fn shift_line(line: u32, edit: &EditRecord) -> u32 {
    let edit_end = edit.start_line + edit.removed;
    if edit_end <= line {
        // Edit entirely above: shift by the net line delta.
        line + edit.added - edit.removed
    } else if edit.start_line == line && edit.removed == 0 {
        // Insertion exactly at the point: forward bias pushes it down.
        line + edit.added
    } else if edit.start_line <= line {
        // Deletion covered the point: collapse to the edit start.
        edit.start_line
    } else {
        line
    }
}

/// A line position that stays meaningful across buffer edits.
///
/// Holds the captured line and the buffer version it was captured at;
/// [`SourceBuffer::resolve`] replays later edits to find where that position
/// lives now. Cheap to copy and safe to embed in immutable descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingPoint {
    line: u32,
    version: u64,
}

impl TrackingPoint {
    /// The line as captured, before any re-anchoring.
    pub fn captured_line(&self) -> u32 {
        self.line
    }

    /// The buffer version the point was captured at.
    pub fn captured_version(&self) -> u64 {
        self.version
    }
}
