//! Key descriptors and editing actions.
//!
//! Engines report raw key events as a [`KeyDescriptor`]. Keys the host doesn't
//! consume are resolved into an [`EditorAction`] and applied by
//! [`crate::execute`]. Typed text arrives separately, as an `Insert` action.

use std::fmt;

use smol_str::SmolStr;

use crate::types::Selection;

/// Semantic editing operations on the document.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Insert text over `range`, replacing any selected content.
    Insert { text: String, range: Selection },

    /// Split the paragraph at the caret (Enter), deleting the selection first.
    SplitParagraph { range: Selection },

    /// Delete the selection, or the character before the caret (Backspace).
    DeleteBackward { range: Selection },

    /// Delete the selection, or the character after the caret (Delete).
    DeleteForward { range: Selection },
}

/// Key values for keyboard input.
///
/// Only keys with default behavior get their own variant. Everything else an
/// engine reports is kept by name in `Named` so hosts can still observe it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    /// Any other named key (`F5`, `Escape`, `PageDown`...).
    Named(SmolStr),

    Unidentified,

    Backspace,
    Delete,
    Enter,
    Tab,

    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,

    Alt,
    Control,
    Meta,
    Shift,
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(value: &str) -> Self {
        match value {
            "" | "Unidentified" => Self::Unidentified,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "Alt" => Self::Alt,
            "Control" => Self::Control,
            "Meta" => Self::Meta,
            "Shift" => Self::Shift,
            other if other.chars().count() == 1 => Self::Character(other.into()),
            other => Self::Named(other.into()),
        }
    }

    /// The DOM name of the key. Inverse of [`Key::from_dom_key`].
    pub fn as_str(&self) -> &str {
        match self {
            Self::Character(s) | Self::Named(s) => s.as_str(),
            Self::Unidentified => "Unidentified",
            Self::Backspace => "Backspace",
            Self::Delete => "Delete",
            Self::Enter => "Enter",
            Self::Tab => "Tab",
            Self::ArrowLeft => "ArrowLeft",
            Self::ArrowRight => "ArrowRight",
            Self::ArrowUp => "ArrowUp",
            Self::ArrowDown => "ArrowDown",
            Self::Home => "Home",
            Self::End => "End",
            Self::Alt => "Alt",
            Self::Control => "Control",
            Self::Meta => "Meta",
            Self::Shift => "Shift",
        }
    }
}

/// Modifier key state at the time of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
}

/// A raw key event as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyDescriptor {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyDescriptor {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn ctrl(key: Key) -> Self {
        Self::with_modifiers(key, Modifiers::CTRL)
    }

    /// Build a descriptor from DOM `KeyboardEvent` fields.
    pub fn from_dom(key: &str, ctrl: bool, alt: bool, shift: bool, meta: bool) -> Self {
        Self {
            key: Key::from_dom_key(key),
            modifiers: Modifiers {
                ctrl,
                alt,
                shift,
                meta,
            },
        }
    }
}

impl fmt::Display for KeyDescriptor {
    /// `Ctrl+Alt+Shift+Meta+Key`, omitting modifiers that aren't held.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, name) in [
            (m.ctrl, "Ctrl"),
            (m.alt, "Alt"),
            (m.shift, "Shift"),
            (m.meta, "Meta"),
        ] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(self.key.as_str())
    }
}

/// What happened to a key event after the textarea saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Handled here (by the host or a default action). The engine must not act on it.
    Consumed,
    /// Not handled. The engine applies its own behavior.
    Delegated,
}
