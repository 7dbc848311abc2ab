//! Selection tracking over flattened offsets.

use crate::document::Document;
use crate::types::Selection;

/// Sentinel accepted by [`SelectionTracker::select_range`] for "document end".
pub const DOCUMENT_END: i64 = -1;

/// Holds the last applied selection, clamped to the document.
///
/// The pair is stored as given, not reordered, so a backwards selection
/// keeps its direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    current: Selection,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last applied selection.
    pub fn selection(&self) -> Selection {
        self.current
    }

    /// Select the whole document.
    pub fn select(&mut self, document: &Document) -> Selection {
        self.current = Selection::new(0, document.len());
        self.current
    }

    /// Select `[start, end)`. [`DOCUMENT_END`] stands for the document end;
    /// other values are clamped into the document independently.
    pub fn select_range(&mut self, document: &Document, start: i64, end: i64) -> Selection {
        self.current = Selection::new(
            resolve_offset(document, start),
            resolve_offset(document, end),
        );
        self.current
    }

    /// Place a caret.
    pub fn collapse(&mut self, document: &Document, offset: usize) -> Selection {
        self.current = Selection::collapsed(offset.min(document.len()));
        self.current
    }

    /// Store a selection that was already resolved against the document.
    pub fn set(&mut self, document: &Document, selection: Selection) -> Selection {
        self.current = selection.clamped(document.len());
        self.current
    }

    /// Re-clamp after the document changed underneath the selection.
    pub fn clamp_to(&mut self, document: &Document) -> Selection {
        self.current = self.current.clamped(document.len());
        self.current
    }
}

fn resolve_offset(document: &Document, offset: i64) -> usize {
    let len = document.len();
    if offset == DOCUMENT_END {
        return len;
    }
    offset.clamp(0, len as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all() {
        let doc = Document::from_text("line1\nline2");
        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.select(&doc), Selection::new(0, 11));
        assert_eq!(tracker.selection(), Selection::new(0, 11));
    }

    #[test]
    fn test_sentinel_means_end() {
        let doc = Document::from_text("line1\nline2");
        let mut tracker = SelectionTracker::new();
        let sel = tracker.select_range(&doc, DOCUMENT_END, DOCUMENT_END);
        assert_eq!(sel, Selection::new(11, 11));
    }

    #[test]
    fn test_reversed_range_kept() {
        let doc = Document::from_text("0123456789");
        let mut tracker = SelectionTracker::new();
        let sel = tracker.select_range(&doc, 8, 2);
        assert_eq!(sel, Selection::new(8, 2));
        assert!(sel.is_backwards());
    }

    #[test]
    fn test_clamped_independently() {
        let doc = Document::from_text("abc");
        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.select_range(&doc, -7, 40), Selection::new(0, 3));
        assert_eq!(tracker.select_range(&doc, 2, DOCUMENT_END), Selection::new(2, 3));
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut tracker = SelectionTracker::new();
        tracker.select(&Document::from_text("abcdef"));
        let sel = tracker.clamp_to(&Document::from_text("ab"));
        assert_eq!(sel, Selection::new(0, 2));
    }

    #[test]
    fn test_collapse() {
        let doc = Document::from_text("abc");
        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.collapse(&doc, 9), Selection::collapsed(3));
    }
}
