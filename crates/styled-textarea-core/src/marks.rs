//! Mark interval management.
//!
//! Adding, removing and querying marks over ranges of the flattened text.
//! A range spanning several paragraphs is applied as one mark per
//! paragraph. Equivalent marks (same kind, same attributes) that touch or
//! overlap are always merged into one interval.
//!
//! The operations are tolerant: offsets are clamped into the document,
//! unknown kind names are skipped and an empty range is a no-op.

use std::ops::Range;

use crate::document::Document;
use crate::paragraph::Paragraph;
use crate::schema::{self, MarkKind};
use crate::types::{Mark, MarkSpec};

/// Resolve `from` and an optional `length` into a clamped, non-empty range.
///
/// A missing length extends the range to the end of the document.
pub fn resolve_range(document: &Document, from: i64, length: Option<i64>) -> Option<Range<usize>> {
    let total = document.len() as i64;
    let end = match length {
        Some(length) => from.saturating_add(length),
        None => total,
    };
    let from = from.clamp(0, total);
    let end = end.clamp(0, total);
    if from >= end {
        return None;
    }
    Some(from as usize..end as usize)
}

/// Apply each resolvable mark spec over `[from, from + length)`.
///
/// Unknown kinds are skipped; the remaining specs still apply.
pub fn add_marks(
    document: &Document,
    from: i64,
    specs: &[MarkSpec],
    length: Option<i64>,
) -> Document {
    let Some(range) = resolve_range(document, from, length) else {
        tracing::debug!(from, ?length, "add_marks: empty range, nothing to do");
        return document.clone();
    };

    let mut next = document.clone();
    for spec in specs {
        let Some(descriptor) = schema::resolve(&spec.kind) else {
            tracing::debug!(kind = %spec.kind, "add_marks: skipping unknown mark kind");
            continue;
        };
        let attrs = descriptor.fill_defaults(spec.attrs.clone());

        next = next.edit_paragraphs(range.clone(), |paragraph, local| {
            tracing::trace!(kind = ?descriptor.kind, ?local, "add_marks: applying to paragraph");
            let mark = Mark::new(descriptor.kind, attrs.clone(), local)?;
            Some(paragraph.replace_marks(insert(paragraph.marks(), mark)))
        });
    }
    next
}

/// Remove marks over `[from, from + length)`.
///
/// With `kinds` non-empty only the named kinds are affected; otherwise
/// every kind is. Marks fully inside the range are dropped, partially
/// covered marks are trimmed, and a mark the range bisects is split into
/// its left and right remainders.
pub fn remove_marks(
    document: &Document,
    from: i64,
    length: Option<i64>,
    kinds: Option<&[&str]>,
) -> Document {
    let Some(range) = resolve_range(document, from, length) else {
        tracing::debug!(from, ?length, "remove_marks: empty range, nothing to do");
        return document.clone();
    };

    let selected: Vec<MarkKind> = match kinds {
        Some(names) if !names.is_empty() => {
            let resolved: Vec<MarkKind> = names
                .iter()
                .filter_map(|name| {
                    let kind = schema::resolve(name).map(|d| d.kind);
                    if kind.is_none() {
                        tracing::debug!(kind = %name, "remove_marks: ignoring unknown mark kind");
                    }
                    kind
                })
                .collect();
            if resolved.is_empty() {
                return document.clone();
            }
            resolved
        }
        _ => MarkKind::ALL.to_vec(),
    };

    document.edit_paragraphs(range, |paragraph, local| {
        if !paragraph
            .marks()
            .iter()
            .any(|m| selected.contains(&m.kind()) && m.overlaps(&local))
        {
            return None;
        }
        let marks = cut(paragraph.marks(), &local, |m| selected.contains(&m.kind()));
        Some(paragraph.replace_marks(marks))
    })
}

/// Marks active at a caret position.
///
/// A mark is active at `pos` when it covers the character just before
/// `pos`. At the start of any paragraph, not only at `pos == 0`, the
/// paragraph's first character is used instead of the separator before it.
/// Results are ordered by kind, then by insertion order. Out-of-range
/// positions yield nothing.
pub fn get_marks(document: &Document, pos: i64) -> Vec<Mark> {
    if pos < 0 || pos as usize > document.len() {
        return Vec::new();
    }
    let pos = pos as usize;

    let (index, local) = document.locate(pos);
    let paragraph = &document.paragraphs()[index];
    let char_index = if local == 0 { 0 } else { local - 1 };
    if char_index >= paragraph.len() {
        return Vec::new();
    }

    let mut active: Vec<Mark> = paragraph
        .marks()
        .iter()
        .filter(|m| m.covers(char_index))
        .cloned()
        .collect();
    active.sort_by_key(Mark::kind);
    active
}

/// Marks a character inserted at local `index` of `paragraph` inherits.
pub(crate) fn inherited_at(paragraph: &Paragraph, index: usize) -> Vec<Mark> {
    let char_index = index.saturating_sub(1);
    paragraph
        .marks()
        .iter()
        .filter(|m| m.covers(char_index))
        .cloned()
        .collect()
}

/// Add `mark` to `marks`, absorbing every equivalent mark it touches.
///
/// The merged mark takes the slot of the earliest absorbed mark, or goes
/// last when nothing was absorbed.
pub(crate) fn insert(marks: &[Mark], mark: Mark) -> Vec<Mark> {
    let mut from = mark.from();
    let mut to = mark.to();
    let mut slot = None;
    let mut out = Vec::with_capacity(marks.len() + 1);

    for existing in marks {
        if existing.is_equivalent(&mark) && existing.touches(&mark) {
            from = from.min(existing.from());
            to = to.max(existing.to());
            slot.get_or_insert(out.len());
        } else {
            out.push(existing.clone());
        }
    }

    // The merged range still has to absorb marks it only reaches after growing.
    let merged = mark.with_range(from..to);
    match (merged, slot) {
        (Some(merged), Some(slot)) => {
            out.insert(slot, merged.clone());
            if out
                .iter()
                .enumerate()
                .any(|(i, m)| i != slot && m.is_equivalent(&merged) && m.touches(&merged))
            {
                let without: Vec<Mark> = out
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| *i != slot)
                    .map(|(_, m)| m)
                    .collect();
                return insert(&without, merged);
            }
        }
        (Some(merged), None) => out.push(merged),
        (None, _) => {}
    }
    out
}

/// Remove the part of every mark matching `filter` that lies in `range`.
///
/// A mark bisected by the range leaves a left and a right remainder, in
/// that order, in its original slot.
pub(crate) fn cut(marks: &[Mark], range: &Range<usize>, filter: impl Fn(&Mark) -> bool) -> Vec<Mark> {
    let mut out = Vec::with_capacity(marks.len() + 1);
    for mark in marks {
        if !filter(mark) || !mark.overlaps(range) {
            out.push(mark.clone());
            continue;
        }
        if let Some(left) = mark.with_range(mark.from()..range.start) {
            out.push(left);
        }
        if let Some(right) = mark.with_range(range.end..mark.to()) {
            out.push(right);
        }
    }
    out
}

/// Adjust marks for the deletion of `range`.
pub(crate) fn shift_for_delete(marks: &[Mark], range: Range<usize>) -> Vec<Mark> {
    let removed = range.end - range.start;
    let map = |pos: usize| {
        if pos <= range.start {
            pos
        } else if pos >= range.end {
            pos - removed
        } else {
            range.start
        }
    };
    marks
        .iter()
        .filter_map(|m| m.with_range(map(m.from())..map(m.to())))
        .collect()
}

/// Adjust marks for `inserted` chars at `index`.
///
/// Marks strictly containing `index` grow; marks starting at or after it shift.
pub(crate) fn shift_for_insert(marks: &[Mark], index: usize, inserted: usize) -> Vec<Mark> {
    marks
        .iter()
        .filter_map(|m| {
            let from = if m.from() >= index { m.from() + inserted } else { m.from() };
            let to = if m.to() > index { m.to() + inserted } else { m.to() };
            m.with_range(from..to)
        })
        .collect()
}

/// Clamp marks to `len`, drop empty ones and merge equivalent touching ones.
pub(crate) fn normalize(marks: Vec<Mark>, len: usize) -> Vec<Mark> {
    let mut out: Vec<Mark> = Vec::with_capacity(marks.len());
    for mark in marks {
        if mark.to() > len {
            tracing::error!(
                from = mark.from(),
                to = mark.to(),
                len,
                "mark runs past paragraph end, clamping"
            );
        }
        let Some(mark) = mark.with_range(mark.from()..mark.to().min(len)) else {
            continue;
        };
        out = insert(&out, mark);
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::attrs;

    fn style(css: &str, range: Range<usize>) -> Mark {
        Mark::new(MarkKind::Style, attrs([("css", json!(css))]), range).unwrap()
    }

    fn marks_of(document: &Document, index: usize) -> Vec<Mark> {
        document.paragraphs()[index].marks().to_vec()
    }

    #[test]
    fn test_resolve_range() {
        let doc = Document::from_text("line1\nline2");
        assert_eq!(resolve_range(&doc, 0, Some(5)), Some(0..5));
        assert_eq!(resolve_range(&doc, 3, None), Some(3..11));
        assert_eq!(resolve_range(&doc, -4, Some(6)), Some(0..2));
        assert_eq!(resolve_range(&doc, 8, Some(100)), Some(8..11));
        assert_eq!(resolve_range(&doc, 11, None), None);
        assert_eq!(resolve_range(&doc, 4, Some(0)), None);
        assert_eq!(resolve_range(&doc, 4, Some(-2)), None);
        assert_eq!(resolve_range(&doc, i64::MAX, Some(i64::MAX)), None);
    }

    #[test]
    fn test_insert_merges_adjacent() {
        let merged = insert(&[style("a", 0..5)], style("a", 5..10));
        assert_eq!(merged, vec![style("a", 0..10)]);
    }

    #[test]
    fn test_insert_bridges_two_marks() {
        let marks = vec![style("a", 0..2), style("b", 0..9), style("a", 6..8)];
        let merged = insert(&marks, style("a", 1..7));
        assert_eq!(merged, vec![style("a", 0..8), style("b", 0..9)]);
    }

    #[test]
    fn test_insert_keeps_distinct_attrs() {
        let merged = insert(&[style("a", 0..5)], style("b", 2..4));
        assert_eq!(merged, vec![style("a", 0..5), style("b", 2..4)]);
    }

    #[test]
    fn test_cut_splits_bisected_mark() {
        let out = cut(&[style("a", 0..10)], &(3..7), |_| true);
        assert_eq!(out, vec![style("a", 0..3), style("a", 7..10)]);
    }

    #[test]
    fn test_cut_respects_filter() {
        let link = Mark::new(MarkKind::Link, attrs([("href", json!("/"))]), 0..10).unwrap();
        let out = cut(&[style("a", 0..10), link.clone()], &(0..10), |m| {
            m.kind() == MarkKind::Style
        });
        assert_eq!(out, vec![link]);
    }

    #[test]
    fn test_add_marks_across_paragraphs() {
        let doc = Document::from_text("line1\nline2");
        let spec = MarkSpec::style("color:red");
        let next = add_marks(&doc, 3, &[spec], Some(5));

        assert_eq!(marks_of(&next, 0), vec![style("color:red", 3..5)]);
        assert_eq!(marks_of(&next, 1), vec![style("color:red", 0..2)]);
    }

    #[test]
    fn test_add_marks_skips_unknown_kind() {
        let doc = Document::from_text("hello");
        let specs = [
            MarkSpec::new("bold", Default::default()),
            MarkSpec::style("color:red"),
        ];
        let next = add_marks(&doc, 0, &specs, Some(2));
        assert_eq!(marks_of(&next, 0), vec![style("color:red", 0..2)]);
    }

    #[test]
    fn test_add_marks_empty_range_is_noop() {
        let doc = Document::from_text("hello");
        let next = add_marks(&doc, 3, &[MarkSpec::style("x")], Some(0));
        assert_eq!(next, doc);
        let next = add_marks(&doc, 5, &[MarkSpec::style("x")], None);
        assert_eq!(next, doc);
    }

    #[test]
    fn test_add_marks_same_spec_merges() {
        let doc = Document::from_text("0123456789ab");
        let spec = MarkSpec::style("x");
        let doc = add_marks(&doc, 0, &[spec.clone()], Some(5));
        let doc = add_marks(&doc, 5, &[spec], Some(5));
        assert_eq!(marks_of(&doc, 0), vec![style("x", 0..10)]);
    }

    #[test]
    fn test_link_defaults_filled() {
        let doc = Document::from_text("hello");
        let doc = add_marks(&doc, 0, &[MarkSpec::link("/a")], Some(5));
        let marks = marks_of(&doc, 0);
        assert_eq!(marks[0].attrs().get("editMode"), Some(&json!(false)));
    }

    #[test]
    fn test_remove_marks_splits() {
        let doc = Document::from_text("0123456789");
        let doc = add_marks(&doc, 0, &[MarkSpec::style("x")], Some(10));
        let doc = remove_marks(&doc, 3, Some(4), Some(&["Style"]));
        assert_eq!(marks_of(&doc, 0), vec![style("x", 0..3), style("x", 7..10)]);
    }

    #[test]
    fn test_remove_marks_trims_one_side() {
        let doc = Document::from_text("0123456789");
        let doc = add_marks(&doc, 2, &[MarkSpec::style("x")], Some(6));

        let right = remove_marks(&doc, 5, Some(5), None);
        assert_eq!(marks_of(&right, 0), vec![style("x", 2..5)]);

        let left = remove_marks(&doc, 0, Some(4), None);
        assert_eq!(marks_of(&left, 0), vec![style("x", 4..8)]);
    }

    #[test]
    fn test_marks_span_empty_paragraph() {
        let doc = Document::from_text("ab\n\ncd\nef");
        let doc = add_marks(&doc, 1, &[MarkSpec::style("x")], Some(7));

        assert_eq!(marks_of(&doc, 0), vec![style("x", 1..2)]);
        assert!(marks_of(&doc, 1).is_empty());
        assert_eq!(marks_of(&doc, 2), vec![style("x", 0..2)]);
        assert_eq!(marks_of(&doc, 3), vec![style("x", 0..1)]);
        assert_eq!(get_marks(&doc, 3), Vec::new());

        let doc = remove_marks(&doc, 5, Some(3), None);
        assert_eq!(marks_of(&doc, 0), vec![style("x", 1..2)]);
        assert_eq!(marks_of(&doc, 2), vec![style("x", 0..1)]);
        assert!(marks_of(&doc, 3).is_empty());

        let doc = remove_marks(&doc, 0, None, None);
        assert!((0..4).all(|i| marks_of(&doc, i).is_empty()));
    }

    #[test]
    fn test_remove_marks_by_kind_only() {
        let doc = Document::from_text("0123456789");
        let doc = add_marks(&doc, 0, &[MarkSpec::style("x"), MarkSpec::link("/")], None);
        let doc = remove_marks(&doc, 0, None, Some(&["Link"]));

        let marks = marks_of(&doc, 0);
        assert_eq!(marks, vec![style("x", 0..10)]);
    }

    #[test]
    fn test_remove_marks_all_kinds() {
        let doc = Document::from_text("ab\ncd");
        let doc = add_marks(&doc, 0, &[MarkSpec::style("x"), MarkSpec::link("/")], None);
        let doc = remove_marks(&doc, 0, None, None);
        assert!(marks_of(&doc, 0).is_empty());
        assert!(marks_of(&doc, 1).is_empty());

        let doc = add_marks(&doc, 0, &[MarkSpec::style("x")], None);
        let doc = remove_marks(&doc, 0, None, Some(&[]));
        assert!(marks_of(&doc, 0).is_empty());
    }

    #[test]
    fn test_remove_marks_unknown_kinds_only() {
        let doc = Document::from_text("hello");
        let doc = add_marks(&doc, 0, &[MarkSpec::style("x")], None);
        let next = remove_marks(&doc, 0, None, Some(&["bold"]));
        assert_eq!(next, doc);
    }

    #[test]
    fn test_get_marks_before_cursor() {
        let doc = Document::from_text("0123456789");
        let doc = add_marks(&doc, 2, &[MarkSpec::style("x")], Some(3));

        assert!(get_marks(&doc, 2).is_empty());
        assert_eq!(get_marks(&doc, 3).len(), 1);
        assert_eq!(get_marks(&doc, 5).len(), 1);
        assert!(get_marks(&doc, 6).is_empty());
    }

    #[test]
    fn test_get_marks_at_block_start() {
        let doc = Document::from_text("ab\ncd");
        let doc = add_marks(&doc, 0, &[MarkSpec::style("x")], Some(1));
        let doc = add_marks(&doc, 3, &[MarkSpec::style("y")], Some(1));

        assert_eq!(get_marks(&doc, 0), vec![style("x", 0..1)]);
        assert_eq!(get_marks(&doc, 3), vec![style("y", 0..1)]);
        assert!(get_marks(&doc, 2).is_empty());
    }

    #[test]
    fn test_get_marks_out_of_range() {
        let doc = Document::from_text("ab");
        let doc = add_marks(&doc, 0, &[MarkSpec::style("x")], None);
        assert!(get_marks(&doc, -1).is_empty());
        assert!(get_marks(&doc, 3).is_empty());
        assert!(get_marks(&Document::default(), 0).is_empty());
    }

    #[test]
    fn test_get_marks_ordered_by_kind() {
        let doc = Document::from_text("hello");
        let doc = add_marks(&doc, 0, &[MarkSpec::link("/")], None);
        let doc = add_marks(&doc, 0, &[MarkSpec::style("b")], None);
        let doc = add_marks(&doc, 0, &[MarkSpec::style("a")], None);

        let kinds: Vec<_> = get_marks(&doc, 2)
            .iter()
            .map(|m| (m.kind(), m.attrs().get("css").cloned()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (MarkKind::Style, Some(json!("b"))),
                (MarkKind::Style, Some(json!("a"))),
                (MarkKind::Link, None),
            ]
        );
    }

    #[test]
    fn test_normalize_drops_and_merges() {
        let out = normalize(vec![style("a", 0..3), style("a", 2..6), style("b", 4..9)], 7);
        assert_eq!(out, vec![style("a", 0..6), style("b", 4..7)]);
    }
}
