//! Error types for document validation and configuration.
//!
//! Facade operations never fail: offsets are clamped and unknown mark kinds
//! are skipped. These errors only surface from [`crate::schema::validate`]
//! and [`crate::config::TextareaConfig::from_json`].

use thiserror::Error;

use crate::schema::MarkKind;

/// Errors produced by validation and configuration loading.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TextareaError {
    /// A document must hold at least one paragraph.
    #[error("document has no paragraphs")]
    EmptyDocument,

    /// Paragraph text must not contain line breaks; those are paragraph boundaries.
    #[error("paragraph {paragraph} contains a line break")]
    EmbeddedLineBreak { paragraph: usize },

    /// A mark range is empty or runs past the end of its paragraph.
    #[error("invalid {kind:?} mark {from}..{to} in paragraph {paragraph} of length {len}")]
    InvalidMarkRange {
        paragraph: usize,
        kind: MarkKind,
        from: usize,
        to: usize,
        len: usize,
    },

    /// Two equivalent marks touch or overlap without having been merged.
    #[error("unmerged {kind:?} marks {first:?} and {second:?} in paragraph {paragraph}")]
    UnmergedMarks {
        paragraph: usize,
        kind: MarkKind,
        first: std::ops::Range<usize>,
        second: std::ops::Range<usize>,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl TextareaError {
    /// Whether this error reports a broken document invariant.
    pub fn is_invariant_violation(&self) -> bool {
        !matches!(self, TextareaError::Config(_))
    }
}
