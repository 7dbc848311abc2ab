//! Immutable document snapshots.
//!
//! A `Document` is an ordered, never-empty list of paragraphs. The flattened
//! text joins paragraph texts with a single `\n`, so paragraph boundaries are
//! exactly the newline positions and every global offset maps to one
//! paragraph plus a local offset.
//!
//! Snapshots are never mutated. Every edit builds a new paragraph list in
//! which paragraphs the edit didn't touch are shared by reference with the
//! previous snapshot.

use std::ops::Range;
use std::sync::Arc;

use serde_json::{Map, Value, json};

use crate::marks;
use crate::paragraph::Paragraph;
use crate::types::Mark;

/// An immutable document snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    paragraphs: Vec<Arc<Paragraph>>,
    /// Length of the flattened text in chars, cached.
    len: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::from_paragraphs(Vec::new())
    }
}

impl Document {
    /// Build a document from paragraphs. An empty list becomes one empty paragraph.
    pub fn from_paragraphs(mut paragraphs: Vec<Arc<Paragraph>>) -> Self {
        if paragraphs.is_empty() {
            paragraphs.push(Arc::new(Paragraph::default()));
        }
        let len = paragraphs.iter().map(|p| p.len()).sum::<usize>() + paragraphs.len() - 1;
        Self { paragraphs, len }
    }

    /// Split text on `\r?\n` into unmarked paragraphs.
    pub fn from_text(text: &str) -> Self {
        let paragraphs = split_lines(text)
            .map(|line| Arc::new(Paragraph::new(line)))
            .collect();
        Self::from_paragraphs(paragraphs)
    }

    /// Flattened text, paragraphs joined by `\n`. Marks are not included.
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.len);
        for (i, paragraph) in self.paragraphs.iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(paragraph.text());
        }
        text
    }

    /// Length of the flattened text in chars.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Plain value assignment: a fresh document with every mark discarded.
    pub fn replace_all(&self, text: &str) -> Document {
        tracing::debug!(
            old_len = self.len,
            paragraphs = self.paragraphs.len(),
            "replacing document content"
        );
        Self::from_text(text)
    }

    pub fn paragraphs(&self) -> &[Arc<Paragraph>] {
        &self.paragraphs
    }

    pub fn paragraph(&self, index: usize) -> Option<&Arc<Paragraph>> {
        self.paragraphs.get(index)
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Global offset of the first char of paragraph `index`.
    pub fn paragraph_start(&self, index: usize) -> usize {
        self.paragraphs[..index.min(self.paragraphs.len())]
            .iter()
            .map(|p| p.len() + 1)
            .sum()
    }

    /// Map a global offset to `(paragraph index, local offset)`.
    ///
    /// An offset on a separator resolves to the end of the paragraph before
    /// it. Offsets past the end resolve to the end of the last paragraph.
    pub fn locate(&self, offset: usize) -> (usize, usize) {
        let mut start = 0;
        for (index, paragraph) in self.paragraphs.iter().enumerate() {
            if offset <= start + paragraph.len() {
                return (index, offset - start);
            }
            start += paragraph.len() + 1;
        }
        let last = self.paragraphs.len() - 1;
        (last, self.paragraphs[last].len())
    }

    /// Flattened text of a global char range, clamped to the document.
    pub fn text_between(&self, from: usize, to: usize) -> String {
        let (from, to) = (from.min(self.len), to.min(self.len));
        if from >= to {
            return String::new();
        }
        self.to_text().chars().skip(from).take(to - from).collect()
    }

    /// True when both snapshots flatten to the same text.
    pub fn same_text(&self, other: &Document) -> bool {
        self.len == other.len
            && self.paragraphs.len() == other.paragraphs.len()
            && self
                .paragraphs
                .iter()
                .zip(&other.paragraphs)
                .all(|(a, b)| Arc::ptr_eq(a, b) || a.text() == b.text())
    }

    /// Structural JSON view: paragraphs, their text runs and the marks on each run.
    ///
    /// Empty paragraphs have no `content` key and unmarked runs no `marks` key.
    pub fn to_json(&self) -> Value {
        let content: Vec<Value> = self
            .paragraphs
            .iter()
            .map(|paragraph| {
                let mut node = Map::new();
                node.insert("type".into(), json!("paragraph"));
                let runs: Vec<Value> = paragraph
                    .segments()
                    .into_iter()
                    .map(|segment| {
                        let mut run = Map::new();
                        run.insert("type".into(), json!("text"));
                        run.insert("text".into(), json!(segment.text));
                        if !segment.marks.is_empty() {
                            let marks = segment.marks.into_iter().map(mark_json).collect();
                            run.insert("marks".into(), Value::Array(marks));
                        }
                        Value::Object(run)
                    })
                    .collect();
                if !runs.is_empty() {
                    node.insert("content".into(), Value::Array(runs));
                }
                Value::Object(node)
            })
            .collect();
        json!({ "type": "doc", "content": content })
    }

    /// Rebuild every paragraph intersecting the global `range`.
    ///
    /// `edit` receives the paragraph and the intersection in local offsets and
    /// returns the replacement, or `None` to keep the paragraph (shared) as is.
    /// Empty intersections are never passed to `edit`.
    pub(crate) fn edit_paragraphs<F>(&self, range: Range<usize>, mut edit: F) -> Document
    where
        F: FnMut(&Paragraph, Range<usize>) -> Option<Paragraph>,
    {
        let mut start = 0;
        let paragraphs = self
            .paragraphs
            .iter()
            .map(|paragraph| {
                let para_start = start;
                let para_end = start + paragraph.len();
                start = para_end + 1;

                let local_start = range.start.max(para_start);
                let local_end = range.end.min(para_end);
                if local_start >= local_end {
                    return Arc::clone(paragraph);
                }
                match edit(paragraph, local_start - para_start..local_end - para_start) {
                    Some(edited) => Arc::new(edited),
                    None => Arc::clone(paragraph),
                }
            })
            .collect();
        Self::from_paragraphs(paragraphs)
    }

    /// Replace paragraphs `range` with `replacement`, sharing the rest.
    fn splice(&self, range: Range<usize>, replacement: Vec<Paragraph>) -> Document {
        let mut paragraphs = Vec::with_capacity(self.paragraphs.len() + replacement.len());
        paragraphs.extend(self.paragraphs[..range.start].iter().cloned());
        paragraphs.extend(replacement.into_iter().map(Arc::new));
        paragraphs.extend(self.paragraphs[range.end..].iter().cloned());
        Self::from_paragraphs(paragraphs)
    }

    /// Split the paragraph containing `offset` in two at that point.
    pub fn split_paragraph(&self, offset: usize) -> Document {
        let (index, local) = self.locate(offset.min(self.len));
        let (left, right) = self.paragraphs[index].split_at(local);
        tracing::trace!(index, local, "splitting paragraph");
        self.splice(index..index + 1, vec![left, right])
    }

    /// Delete the flattened range `[from, to)`.
    ///
    /// Removing a separator joins the paragraphs on either side of it.
    pub fn delete_range(&self, from: usize, to: usize) -> Document {
        let (from, to) = (from.min(to).min(self.len), from.max(to).min(self.len));
        if from == to {
            return self.clone();
        }

        let (first, start) = self.locate(from);
        let (last, end) = self.locate(to);
        tracing::trace!(first, start, last, end, "deleting range");

        if first == last {
            let edited = self.paragraphs[first].delete(start..end);
            return self.splice(first..first + 1, vec![edited]);
        }

        let (head, _) = self.paragraphs[first].split_at(start);
        let (_, tail) = self.paragraphs[last].split_at(end);
        self.splice(first..last + 1, vec![head.concat(&tail)])
    }

    /// Insert text at a global offset. Line breaks in `text` start new paragraphs.
    ///
    /// Inserted characters inherit the marks active at `offset` (the marks
    /// covering the character before it, or the first character at a
    /// paragraph start).
    pub fn insert_text(&self, offset: usize, text: &str) -> Document {
        if text.is_empty() {
            return self.clone();
        }
        let (index, local) = self.locate(offset.min(self.len));
        let paragraph = &self.paragraphs[index];
        let inherited = marks::inherited_at(paragraph, local);

        let lines: Vec<&str> = split_lines(text).collect();
        if let [line] = lines.as_slice() {
            let edited = paragraph.insert(local, line, &inherited);
            return self.splice(index..index + 1, vec![edited]);
        }

        let (head, tail) = paragraph.split_at(local);
        let mut replacement = Vec::with_capacity(lines.len());
        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            let paragraph = if i == 0 {
                head.insert(head.len(), line, &inherited)
            } else if i == last {
                tail.insert(0, line, &inherited)
            } else {
                Paragraph::default().insert(0, line, &inherited)
            };
            replacement.push(paragraph);
        }
        self.splice(index..index + 1, replacement)
    }
}

fn mark_json(mark: &Mark) -> Value {
    let mut node = Map::new();
    node.insert("type".into(), json!(mark.kind().name()));
    if !mark.attrs().is_empty() {
        let attrs = mark
            .attrs()
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        node.insert("attrs".into(), Value::Object(attrs));
    }
    Value::Object(node)
}

/// Split on `\n`, dropping the `\r` of every `\r\n` pair.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut lines = text.split('\n').peekable();
    std::iter::from_fn(move || {
        let line = lines.next()?;
        if lines.peek().is_some() {
            Some(line.strip_suffix('\r').unwrap_or(line))
        } else {
            Some(line)
        }
    })
}
