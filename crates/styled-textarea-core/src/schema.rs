//! Schema registry: the fixed node and mark kinds of a textarea document.
//!
//! The registry is pure data. Mark kind names coming from callers are
//! resolved here; names that don't resolve are skipped by the mark
//! operations rather than reported.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::error::TextareaError;
use crate::types::Attrs;

/// Node kinds a document is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The root, holding one or more paragraphs.
    Document,
    /// A block of text, holding zero or more text runs.
    Paragraph,
    /// Inline text carrying marks.
    TextRun,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Document => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::TextRun => "text",
        }
    }

    /// Content expression describing what the node may contain.
    pub fn content(self) -> Option<&'static str> {
        match self {
            NodeKind::Document => Some("paragraph+"),
            NodeKind::Paragraph => Some("text*"),
            NodeKind::TextRun => None,
        }
    }

    pub fn is_inline(self) -> bool {
        matches!(self, NodeKind::TextRun)
    }
}

/// Mark kinds. Declaration order is the order marks are reported in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarkKind {
    Style,
    Link,
}

impl MarkKind {
    pub const ALL: [MarkKind; 2] = [MarkKind::Style, MarkKind::Link];

    /// Canonical name, as used in serialized documents.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Name reported back to callers by mark queries.
    pub fn label(self) -> &'static str {
        match self {
            MarkKind::Style => "Style",
            MarkKind::Link => "Link",
        }
    }

    pub fn descriptor(self) -> &'static MarkKindDescriptor {
        match self {
            MarkKind::Style => &STYLE,
            MarkKind::Link => &LINK,
        }
    }
}

/// Default value of a declared attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttrDefault {
    Str(&'static str),
    Bool(bool),
}

impl AttrDefault {
    pub fn to_value(self) -> Value {
        match self {
            AttrDefault::Str(s) => Value::String(s.to_owned()),
            AttrDefault::Bool(b) => Value::Bool(b),
        }
    }
}

/// A declared attribute of a mark kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttrSpec {
    pub name: &'static str,
    pub default: AttrDefault,
}

/// Everything the registry knows about one mark kind.
#[derive(Debug, PartialEq)]
pub struct MarkKindDescriptor {
    pub kind: MarkKind,
    pub name: &'static str,
    /// Declared attributes. Undeclared attributes are still carried as given.
    pub attrs: &'static [AttrSpec],
}

impl MarkKindDescriptor {
    /// Add every declared attribute the caller left out, at its default.
    pub fn fill_defaults(&self, mut attrs: Attrs) -> Attrs {
        for spec in self.attrs {
            attrs
                .entry(spec.name.into())
                .or_insert_with(|| spec.default.to_value());
        }
        attrs
    }
}

static STYLE: MarkKindDescriptor = MarkKindDescriptor {
    kind: MarkKind::Style,
    name: "style",
    attrs: &[],
};

static LINK: MarkKindDescriptor = MarkKindDescriptor {
    kind: MarkKind::Link,
    name: "link",
    attrs: &[
        AttrSpec {
            name: "href",
            default: AttrDefault::Str(""),
        },
        AttrSpec {
            name: "editMode",
            default: AttrDefault::Bool(false),
        },
    ],
};

/// Resolve a mark kind name.
///
/// `customStyle` is accepted as a style alias since hosts commonly use it.
pub fn resolve(name: &str) -> Option<&'static MarkKindDescriptor> {
    match name {
        "Style" | "style" | "customStyle" => Some(&STYLE),
        "Link" | "link" => Some(&LINK),
        _ => None,
    }
}

/// Check every structural invariant of a document snapshot.
pub fn validate(document: &Document) -> Result<(), TextareaError> {
    if document.paragraph_count() == 0 {
        return Err(TextareaError::EmptyDocument);
    }

    for (index, paragraph) in document.paragraphs().iter().enumerate() {
        if paragraph.text().contains('\n') {
            return Err(TextareaError::EmbeddedLineBreak { paragraph: index });
        }

        let len = paragraph.len();
        for mark in paragraph.marks() {
            if mark.from() >= mark.to() || mark.to() > len {
                return Err(TextareaError::InvalidMarkRange {
                    paragraph: index,
                    kind: mark.kind(),
                    from: mark.from(),
                    to: mark.to(),
                    len,
                });
            }
        }

        let marks = paragraph.marks();
        for (i, first) in marks.iter().enumerate() {
            for second in &marks[i + 1..] {
                if first.is_equivalent(second) && first.touches(second) {
                    return Err(TextareaError::UnmergedMarks {
                        paragraph: index,
                        kind: first.kind(),
                        first: first.range(),
                        second: second.range(),
                    });
                }
            }
        }
    }

    Ok(())
}
