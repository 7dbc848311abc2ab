//! Core value types: marks, mark specs, and selection.
//!
//! These types are engine-agnostic. All offsets are in Unicode scalar
//! values (chars), never bytes.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smol_str::SmolStr;

use crate::schema::MarkKind;

/// Attribute mapping carried by a mark. Compared structurally.
pub type Attrs = BTreeMap<SmolStr, Value>;

/// Build an attribute mapping from key/value pairs.
pub fn attrs<K, I>(pairs: I) -> Attrs
where
    K: Into<SmolStr>,
    I: IntoIterator<Item = (K, Value)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// A mark as requested by a caller: a kind name plus attributes.
///
/// The kind is a name rather than a [`MarkKind`] so that callers can pass
/// names the schema doesn't know; those are skipped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkSpec {
    #[serde(alias = "type")]
    pub kind: SmolStr,
    #[serde(default)]
    pub attrs: Attrs,
}

impl MarkSpec {
    pub fn new(kind: impl Into<SmolStr>, attrs: Attrs) -> Self {
        Self {
            kind: kind.into(),
            attrs,
        }
    }

    /// A style mark carrying inline CSS.
    pub fn style(css: impl Into<String>) -> Self {
        Self::new("Style", attrs([("css", Value::String(css.into()))]))
    }

    /// A link mark pointing at `href`.
    pub fn link(href: impl Into<String>) -> Self {
        Self::new("Link", attrs([("href", Value::String(href.into()))]))
    }
}

/// A mark applied to a half-open range of one paragraph's text.
///
/// Ranges are local to the paragraph and never empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Mark {
    kind: MarkKind,
    attrs: Attrs,
    from: usize,
    to: usize,
}

impl Mark {
    /// Create a mark. Returns `None` for an empty range.
    pub fn new(kind: MarkKind, attrs: Attrs, range: Range<usize>) -> Option<Self> {
        if range.start >= range.end {
            return None;
        }
        Some(Self {
            kind,
            attrs,
            from: range.start,
            to: range.end,
        })
    }

    pub fn kind(&self) -> MarkKind {
        self.kind
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }

    pub fn len(&self) -> usize {
        self.to - self.from
    }

    /// Same kind and same attributes, regardless of range.
    pub fn is_equivalent(&self, other: &Mark) -> bool {
        self.kind == other.kind && self.attrs == other.attrs
    }

    /// Ranges overlap or share an endpoint.
    pub fn touches(&self, other: &Mark) -> bool {
        self.from <= other.to && other.from <= self.to
    }

    /// Ranges share at least one character with `range`.
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        self.from < range.end && range.start < self.to
    }

    /// Whether the character at `index` carries this mark.
    pub fn covers(&self, index: usize) -> bool {
        self.from <= index && index < self.to
    }

    /// Copy of this mark over another range. `None` if the range is empty.
    pub fn with_range(&self, range: Range<usize>) -> Option<Self> {
        Self::new(self.kind, self.attrs.clone(), range)
    }

    /// The caller-facing view of this mark.
    pub fn to_spec(&self) -> MarkSpec {
        MarkSpec::new(self.kind.label(), self.attrs.clone())
    }
}

/// Selection over the flattened text.
///
/// `from` is where the selection started and `to` is where the caret is.
/// They may be in any order; use `start()` and `end()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub from: usize,
    pub to: usize,
}

impl Selection {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Create a collapsed selection (caret only).
    pub fn collapsed(offset: usize) -> Self {
        Self {
            from: offset,
            to: offset,
        }
    }

    /// Lower bound.
    pub fn start(&self) -> usize {
        self.from.min(self.to)
    }

    /// Upper bound.
    pub fn end(&self) -> usize {
        self.from.max(self.to)
    }

    pub fn is_collapsed(&self) -> bool {
        self.from == self.to
    }

    /// Check if the selection is backwards (caret before anchor).
    pub fn is_backwards(&self) -> bool {
        self.to < self.from
    }

    /// Clamp both ends to `max`, keeping their order.
    pub fn clamped(self, max: usize) -> Self {
        Self {
            from: self.from.min(max),
            to: self.to.min(max),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_selection_bounds() {
        let sel = Selection::new(5, 10);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);
        assert!(!sel.is_backwards());

        let sel = Selection::new(10, 5);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);
        assert!(sel.is_backwards());
    }

    #[test]
    fn test_selection_collapsed() {
        let sel = Selection::collapsed(7);
        assert!(sel.is_collapsed());
        assert!(!Selection::new(7, 2).is_collapsed());
    }

    #[test]
    fn test_selection_clamped_keeps_direction() {
        let sel = Selection::new(20, 3).clamped(11);
        assert_eq!(sel, Selection::new(11, 3));
    }

    #[test]
    fn test_empty_mark_rejected() {
        assert!(Mark::new(MarkKind::Style, Attrs::new(), 3..3).is_none());
        assert!(Mark::new(MarkKind::Style, Attrs::new(), 4..3).is_none());
    }

    #[test]
    fn test_mark_relations() {
        let red = attrs([("css", json!("color:red"))]);
        let a = Mark::new(MarkKind::Style, red.clone(), 0..5).unwrap();
        let b = Mark::new(MarkKind::Style, red, 5..10).unwrap();
        let c = Mark::new(MarkKind::Link, Attrs::new(), 0..5).unwrap();

        assert!(a.is_equivalent(&b));
        assert!(a.touches(&b));
        assert!(!a.overlaps(&b.range()));
        assert!(!a.is_equivalent(&c));
        assert!(a.covers(4));
        assert!(!a.covers(5));
    }

    #[test]
    fn test_mark_spec_accepts_type_key() {
        let spec: MarkSpec =
            serde_json::from_value(json!({ "type": "customStyle", "attrs": { "css": "x" } }))
                .unwrap();
        assert_eq!(spec.kind, "customStyle");
        assert_eq!(spec.attrs.get("css"), Some(&json!("x")));

        let spec: MarkSpec = serde_json::from_value(json!({ "kind": "Link" })).unwrap();
        assert!(spec.attrs.is_empty());
    }

    #[test]
    fn test_mark_to_spec() {
        let mark = Mark::new(MarkKind::Link, attrs([("href", json!("/a"))]), 1..2).unwrap();
        assert_eq!(mark.to_spec(), MarkSpec::new("Link", attrs([("href", json!("/a"))])));
    }
}
