//! Synthesizing input-like notifications from document mutations.
//!
//! The host sees the textarea the way it would see a native `<textarea>`:
//! a content-changed notification when the text changes, a value-committed
//! notification when an edit is final (the control isn't focused, or it just
//! lost focus), and every raw key before default handling.
//!
//! Mark-only changes leave the text alone and emit nothing.

use crate::actions::KeyDescriptor;
use crate::document::Document;

/// Receives notifications from the textarea.
pub trait TextareaHost {
    /// The flattened text changed. Mirrors an `input` event.
    fn content_changed(&mut self, text: &str);

    /// The value is final. Mirrors a `change` event.
    fn value_committed(&mut self);

    /// A raw key arrived. Return `true` to consume it and skip default handling.
    fn key_observed(&mut self, key: &KeyDescriptor) -> bool {
        let _ = key;
        false
    }
}

/// A notification as delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    ContentChanged(String),
    ValueCommitted,
    KeyObserved(KeyDescriptor),
}

/// A host that keeps every notification, for tests and for callers that poll.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    notifications: Vec<Notification>,
    consumed_keys: Vec<KeyDescriptor>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume `key` whenever it is observed.
    pub fn consume_key(mut self, key: KeyDescriptor) -> Self {
        self.consumed_keys.push(key);
        self
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Remove and return everything recorded so far.
    pub fn take(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl TextareaHost for RecordingHost {
    fn content_changed(&mut self, text: &str) {
        self.notifications
            .push(Notification::ContentChanged(text.to_owned()));
    }

    fn value_committed(&mut self) {
        self.notifications.push(Notification::ValueCommitted);
    }

    fn key_observed(&mut self, key: &KeyDescriptor) -> bool {
        self.notifications.push(Notification::KeyObserved(key.clone()));
        self.consumed_keys.contains(key)
    }
}

impl<H: TextareaHost + ?Sized> TextareaHost for &mut H {
    fn content_changed(&mut self, text: &str) {
        (**self).content_changed(text)
    }

    fn value_committed(&mut self) {
        (**self).value_committed()
    }

    fn key_observed(&mut self, key: &KeyDescriptor) -> bool {
        (**self).key_observed(key)
    }
}

/// Tracks focus transitions and turns snapshot pairs into notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventBridge {
    focused: bool,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus as of the last observation.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Report a mutation from `previous` to `next`.
    ///
    /// Emits content-changed if the text differs and, when the control isn't
    /// focused, value-committed right after it. Returns whether anything was
    /// emitted. `has_focus` only decides the commit; the tracked focus moves
    /// through [`EventBridge::observe_focus`] alone.
    pub fn observe_mutation<H: TextareaHost + ?Sized>(
        &mut self,
        previous: &Document,
        next: &Document,
        has_focus: bool,
        host: &mut H,
    ) -> bool {
        if previous.same_text(next) {
            return false;
        }

        let text = next.to_text();
        tracing::debug!(len = next.len(), has_focus, "content changed");
        host.content_changed(&text);
        if !has_focus {
            tracing::debug!("value committed after unfocused edit");
            host.value_committed();
        }
        true
    }

    /// Report the current focus state. Losing focus commits the value.
    pub fn observe_focus<H: TextareaHost + ?Sized>(&mut self, has_focus: bool, host: &mut H) {
        let was_focused = std::mem::replace(&mut self.focused, has_focus);
        if was_focused && !has_focus {
            tracing::debug!("value committed on blur");
            host.value_committed();
        }
    }

    /// Let the host see a key first. Returns `true` if the host consumed it.
    pub fn forward_key<H: TextareaHost + ?Sized>(&self, key: &KeyDescriptor, host: &mut H) -> bool {
        let consumed = host.key_observed(key);
        tracing::trace!(%key, consumed, "key observed");
        consumed
    }
}
