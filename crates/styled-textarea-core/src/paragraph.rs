//! Paragraphs: one line of text plus the marks applied to it.
//!
//! Paragraphs are immutable. Every edit returns a new paragraph, so a
//! document can share untouched paragraphs between snapshots.

use std::ops::Range;

use crate::marks;
use crate::types::Mark;

/// A maximal run of text carrying one set of marks.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub range: Range<usize>,
    pub text: &'a str,
    /// Marks covering the run, ordered by kind then insertion.
    pub marks: Vec<&'a Mark>,
}

/// A single line of text and its marks, with ranges local to the line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    text: String,
    /// Length in chars, cached.
    len: usize,
    marks: Vec<Mark>,
}

impl Paragraph {
    /// Create an unmarked paragraph. `text` must not contain line breaks.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        debug_assert!(!text.contains('\n'), "paragraph text holds a line break");
        let len = text.chars().count();
        Self {
            text,
            len,
            marks: Vec::new(),
        }
    }

    /// Create a paragraph with marks. Marks are clamped to the text and merged.
    pub fn with_marks(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        let mut paragraph = Self::new(text);
        paragraph.marks = marks::normalize(marks, paragraph.len);
        paragraph
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Marks in insertion order.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Convert a char index to a byte index. Indices past the end map to the end.
    pub fn char_to_byte(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(byte, _)| byte)
            .unwrap_or(self.text.len())
    }

    /// Text of a char range, clamped to the paragraph.
    pub fn slice(&self, range: Range<usize>) -> &str {
        let start = self.char_to_byte(range.start.min(self.len));
        let end = self.char_to_byte(range.end.min(self.len));
        &self.text[start..end.max(start)]
    }

    /// Same text, different marks.
    pub(crate) fn replace_marks(&self, marks: Vec<Mark>) -> Self {
        Self {
            text: self.text.clone(),
            len: self.len,
            marks: marks::normalize(marks, self.len),
        }
    }

    /// Split at a char index. Marks straddling the split are cut in two.
    pub fn split_at(&self, index: usize) -> (Paragraph, Paragraph) {
        let index = index.min(self.len);
        let byte = self.char_to_byte(index);

        let left_marks = self
            .marks
            .iter()
            .filter_map(|m| m.with_range(m.from()..m.to().min(index)))
            .collect();
        let right_marks = self
            .marks
            .iter()
            .filter(|m| m.to() > index)
            .filter_map(|m| m.with_range(m.from().max(index) - index..m.to() - index))
            .collect();

        (
            Paragraph::with_marks(&self.text[..byte], left_marks),
            Paragraph::with_marks(&self.text[byte..], right_marks),
        )
    }

    /// Join `other` onto the end of this paragraph.
    ///
    /// Equivalent marks meeting at the seam are merged back into one.
    pub fn concat(&self, other: &Paragraph) -> Paragraph {
        let shift = self.len;
        let marks = self
            .marks
            .iter()
            .cloned()
            .chain(
                other
                    .marks
                    .iter()
                    .filter_map(|m| m.with_range(m.from() + shift..m.to() + shift)),
            )
            .collect();
        Paragraph::with_marks(format!("{}{}", self.text, other.text), marks)
    }

    /// Remove a char range. Marks after it shift left; marks inside it shrink.
    pub fn delete(&self, range: Range<usize>) -> Paragraph {
        let start = range.start.min(self.len);
        let end = range.end.clamp(start, self.len);
        if start == end {
            return self.clone();
        }

        let mut text = String::with_capacity(self.text.len());
        text.push_str(&self.text[..self.char_to_byte(start)]);
        text.push_str(&self.text[self.char_to_byte(end)..]);

        Paragraph::with_marks(text, marks::shift_for_delete(&self.marks, start..end))
    }

    /// Insert line-break-free text at a char index.
    ///
    /// Marks strictly containing the index grow, marks after it shift, and
    /// the inserted characters additionally pick up `inherited`.
    pub fn insert(&self, index: usize, text: &str, inherited: &[Mark]) -> Paragraph {
        let index = index.min(self.len);
        let inserted = text.chars().count();
        if inserted == 0 {
            return self.clone();
        }

        let byte = self.char_to_byte(index);
        let mut new_text = String::with_capacity(self.text.len() + text.len());
        new_text.push_str(&self.text[..byte]);
        new_text.push_str(text);
        new_text.push_str(&self.text[byte..]);

        let mut shifted = marks::shift_for_insert(&self.marks, index, inserted);
        shifted.extend(
            inherited
                .iter()
                .filter_map(|m| m.with_range(index..index + inserted)),
        );
        Paragraph::with_marks(new_text, shifted)
    }

    /// Cut the text at every mark boundary. An empty paragraph has no segments.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut bounds: Vec<usize> = self
            .marks
            .iter()
            .flat_map(|m| [m.from(), m.to()])
            .chain([0, self.len])
            .collect();
        bounds.sort_unstable();
        bounds.dedup();

        bounds
            .windows(2)
            .map(|pair| {
                let range = pair[0]..pair[1];
                let mut covering: Vec<&Mark> =
                    self.marks.iter().filter(|m| m.covers(range.start)).collect();
                covering.sort_by_key(|m| m.kind());
                Segment {
                    text: self.slice(range.clone()),
                    range,
                    marks: covering,
                }
            })
            .collect()
    }
}
