//! Action execution and default key behavior.
//!
//! [`execute_action`] applies an [`EditorAction`] to a snapshot and returns the
//! resulting snapshot plus where the caret ends up. [`default_action`] decides
//! what an unconsumed key does.

use crate::actions::{EditorAction, Key, KeyDescriptor};
use crate::document::Document;
use crate::types::Selection;

/// Result of a successful edit.
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub document: Document,
    pub selection: Selection,
}

/// What a key does when the host didn't consume it.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyDefault {
    /// Apply an edit.
    Apply(EditorAction),
    /// Consume the key without doing anything.
    Swallow,
    /// Let the engine handle the key.
    Delegate,
}

/// Resolve the default behavior of a key at the current selection.
///
/// Keys held together with Ctrl, Alt or Meta are never handled here.
pub fn default_action(document: &Document, key: &KeyDescriptor, selection: Selection) -> KeyDefault {
    let modifiers = key.modifiers;
    if modifiers.ctrl || modifiers.alt || modifiers.meta {
        return KeyDefault::Delegate;
    }

    let range = selection;
    match key.key {
        Key::Enter => KeyDefault::Apply(EditorAction::SplitParagraph { range }),
        Key::Backspace => KeyDefault::Apply(EditorAction::DeleteBackward { range }),
        Key::Delete => KeyDefault::Apply(EditorAction::DeleteForward { range }),
        Key::ArrowUp if selection.is_collapsed() && selection.to == 0 => KeyDefault::Swallow,
        Key::ArrowDown if selection.is_collapsed() && selection.to >= document.len() => {
            KeyDefault::Swallow
        }
        _ => KeyDefault::Delegate,
    }
}

/// Apply an action to a snapshot.
///
/// Returns `None` when the action changes nothing, e.g. Backspace at the
/// start of the document.
pub fn execute_action(document: &Document, action: &EditorAction) -> Option<Edit> {
    let edit = match action {
        EditorAction::Insert { text, range } => execute_insert(document, text, *range),
        EditorAction::SplitParagraph { range } => Some(execute_split(document, *range)),
        EditorAction::DeleteBackward { range } => execute_delete_backward(document, *range),
        EditorAction::DeleteForward { range } => execute_delete_forward(document, *range),
    };
    if let Some(edit) = &edit {
        tracing::trace!(
            ?action,
            len = edit.document.len(),
            caret = edit.selection.to,
            "executed action"
        );
    }
    edit
}

fn caret(document: Document, offset: usize) -> Edit {
    let offset = offset.min(document.len());
    Edit {
        document,
        selection: Selection::collapsed(offset),
    }
}

fn execute_insert(document: &Document, text: &str, range: Selection) -> Option<Edit> {
    let range = range.clamped(document.len());
    if text.is_empty() && range.is_collapsed() {
        return None;
    }

    let start = range.start();
    let document = document
        .delete_range(start, range.end())
        .insert_text(start, text);
    let inserted = text.replace("\r\n", "\n").chars().count();
    Some(caret(document, start + inserted))
}

fn execute_split(document: &Document, range: Selection) -> Edit {
    let range = range.clamped(document.len());
    let start = range.start();
    let document = document
        .delete_range(start, range.end())
        .split_paragraph(start);
    caret(document, start + 1)
}

fn execute_delete_backward(document: &Document, range: Selection) -> Option<Edit> {
    let range = range.clamped(document.len());
    if !range.is_collapsed() {
        return Some(caret(
            document.delete_range(range.start(), range.end()),
            range.start(),
        ));
    }

    // At a paragraph start the character before the caret is the separator,
    // so deleting it merges with the previous paragraph.
    let offset = range.start();
    if offset == 0 {
        return None;
    }
    Some(caret(document.delete_range(offset - 1, offset), offset - 1))
}

fn execute_delete_forward(document: &Document, range: Selection) -> Option<Edit> {
    let range = range.clamped(document.len());
    if !range.is_collapsed() {
        return Some(caret(
            document.delete_range(range.start(), range.end()),
            range.start(),
        ));
    }

    let offset = range.start();
    if offset >= document.len() {
        return None;
    }
    Some(caret(document.delete_range(offset, offset + 1), offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Modifiers;
    use crate::marks;
    use crate::types::MarkSpec;

    fn key(key: Key) -> KeyDescriptor {
        KeyDescriptor::new(key)
    }

    fn run(text: &str, action: EditorAction) -> Option<(String, Selection)> {
        let doc = Document::from_text(text);
        execute_action(&doc, &action).map(|edit| (edit.document.to_text(), edit.selection))
    }

    #[test]
    fn test_insert() {
        let result = run(
            "hello",
            EditorAction::Insert {
                text: " world".to_string(),
                range: Selection::collapsed(5),
            },
        );
        assert_eq!(result, Some(("hello world".to_string(), Selection::collapsed(11))));
    }

    #[test]
    fn test_insert_replaces_selection() {
        let result = run(
            "hello world",
            EditorAction::Insert {
                text: "there".to_string(),
                range: Selection::new(11, 6),
            },
        );
        assert_eq!(result, Some(("hello there".to_string(), Selection::collapsed(11))));
    }

    #[test]
    fn test_insert_crlf_counts_once() {
        let result = run(
            "ab",
            EditorAction::Insert {
                text: "x\r\ny".to_string(),
                range: Selection::collapsed(1),
            },
        );
        assert_eq!(result, Some(("ax\nyb".to_string(), Selection::collapsed(4))));
    }

    #[test]
    fn test_empty_insert_is_noop() {
        let action = EditorAction::Insert {
            text: String::new(),
            range: Selection::collapsed(1),
        };
        assert_eq!(run("ab", action), None);
    }

    #[test]
    fn test_insert_inherits_marks() {
        let doc = Document::from_text("hello");
        let doc = marks::add_marks(&doc, 0, &[MarkSpec::style("color:red")], Some(5));
        let edit = execute_action(
            &doc,
            &EditorAction::Insert {
                text: "!".to_string(),
                range: Selection::collapsed(5),
            },
        )
        .unwrap();
        let marks = edit.document.paragraphs()[0].marks();
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].range(), 0..6);
    }

    #[test]
    fn test_split_paragraph() {
        let result = run(
            "hello world",
            EditorAction::SplitParagraph {
                range: Selection::collapsed(5),
            },
        );
        assert_eq!(result, Some(("hello\n world".to_string(), Selection::collapsed(6))));
    }

    #[test]
    fn test_split_deletes_selection_first() {
        let result = run(
            "hello world",
            EditorAction::SplitParagraph {
                range: Selection::new(2, 8),
            },
        );
        assert_eq!(result, Some(("he\nrld".to_string(), Selection::collapsed(3))));
    }

    #[test]
    fn test_delete_backward() {
        let result = run(
            "hello",
            EditorAction::DeleteBackward {
                range: Selection::collapsed(5),
            },
        );
        assert_eq!(result, Some(("hell".to_string(), Selection::collapsed(4))));
    }

    #[test]
    fn test_delete_backward_merges_paragraphs() {
        let result = run(
            "ab\ncd",
            EditorAction::DeleteBackward {
                range: Selection::collapsed(3),
            },
        );
        assert_eq!(result, Some(("abcd".to_string(), Selection::collapsed(2))));
    }

    #[test]
    fn test_delete_backward_at_start_is_noop() {
        let action = EditorAction::DeleteBackward {
            range: Selection::collapsed(0),
        };
        assert_eq!(run("ab", action), None);
    }

    #[test]
    fn test_delete_selection() {
        let result = run(
            "hello world",
            EditorAction::DeleteBackward {
                range: Selection::new(5, 11),
            },
        );
        assert_eq!(result, Some(("hello".to_string(), Selection::collapsed(5))));
    }

    #[test]
    fn test_delete_forward() {
        let result = run(
            "ab\ncd",
            EditorAction::DeleteForward {
                range: Selection::collapsed(2),
            },
        );
        assert_eq!(result, Some(("abcd".to_string(), Selection::collapsed(2))));

        let action = EditorAction::DeleteForward {
            range: Selection::collapsed(5),
        };
        assert_eq!(run("ab\ncd", action), None);
    }

    #[test]
    fn test_default_actions() {
        let doc = Document::from_text("line1\nline2");
        let caret = Selection::collapsed(3);

        assert_eq!(
            default_action(&doc, &key(Key::Enter), caret),
            KeyDefault::Apply(EditorAction::SplitParagraph { range: caret })
        );
        assert_eq!(
            default_action(&doc, &key(Key::Backspace), caret),
            KeyDefault::Apply(EditorAction::DeleteBackward { range: caret })
        );
        assert_eq!(
            default_action(&doc, &key(Key::character("q")), caret),
            KeyDefault::Delegate
        );
        assert_eq!(
            default_action(&doc, &KeyDescriptor::ctrl(Key::Enter), caret),
            KeyDefault::Delegate
        );
        assert_eq!(
            default_action(
                &doc,
                &KeyDescriptor::with_modifiers(Key::Enter, Modifiers { shift: true, ..Modifiers::NONE }),
                caret
            ),
            KeyDefault::Apply(EditorAction::SplitParagraph { range: caret })
        );
    }

    #[test]
    fn test_vertical_arrows_at_edges() {
        let doc = Document::from_text("line1\nline2");

        let start = Selection::collapsed(0);
        let end = Selection::collapsed(11);
        assert_eq!(default_action(&doc, &key(Key::ArrowUp), start), KeyDefault::Swallow);
        assert_eq!(default_action(&doc, &key(Key::ArrowDown), end), KeyDefault::Swallow);
        assert_eq!(default_action(&doc, &key(Key::ArrowDown), start), KeyDefault::Delegate);
        assert_eq!(default_action(&doc, &key(Key::ArrowUp), end), KeyDefault::Delegate);
        assert_eq!(
            default_action(&doc, &key(Key::ArrowUp), Selection::new(4, 0)),
            KeyDefault::Delegate
        );
    }
}
