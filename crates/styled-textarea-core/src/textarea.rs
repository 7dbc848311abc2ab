//! The textarea-like facade.
//!
//! [`StyledTextarea`] owns the current snapshot and composes the rest of the
//! crate behind an API shaped like a native `<textarea>`: a string value, a
//! selection, focus, and a readonly flag, plus mark operations on top.
//!
//! Every change goes through one commit path: the new snapshot replaces the
//! old one, the selection is re-resolved, the engine redraws, and the event
//! bridge compares old and new to decide what to tell the host.

use serde_json::Value;

use crate::actions::{EditorAction, KeyDescriptor, KeyOutcome};
use crate::config::TextareaConfig;
use crate::document::Document;
use crate::engine::{DocumentEngine, HeadlessEngine};
use crate::events::{EventBridge, RecordingHost, TextareaHost};
use crate::execute::{self, KeyDefault};
use crate::marks;
use crate::render::{self, RenderView};
use crate::schema;
use crate::selection::SelectionTracker;
use crate::types::{Mark, MarkSpec, Selection};

/// A multi-line text input whose text can carry style and link marks.
///
/// Nothing happens until [`initialize`](Self::initialize) is called: before
/// that the value is empty and every mutation is ignored.
#[derive(Debug)]
pub struct StyledTextarea<E = HeadlessEngine, H = RecordingHost> {
    engine: E,
    host: H,
    document: Option<Document>,
    selection: SelectionTracker,
    bridge: EventBridge,
    readonly: bool,
    placeholder: Option<String>,
}

impl StyledTextarea {
    /// A textarea with no display that records its notifications.
    pub fn headless() -> Self {
        Self::new(HeadlessEngine::new(), RecordingHost::new())
    }
}

impl<E: DocumentEngine, H: TextareaHost> StyledTextarea<E, H> {
    pub fn new(engine: E, host: H) -> Self {
        Self {
            engine,
            host,
            document: None,
            selection: SelectionTracker::new(),
            bridge: EventBridge::new(),
            readonly: false,
            placeholder: None,
        }
    }

    /// Create the document from `config` and draw it.
    ///
    /// Calling this again starts over with a fresh document. Initialization
    /// is not an edit, so the host is not notified.
    pub fn initialize(&mut self, config: &TextareaConfig) {
        tracing::debug!(
            len = config.value.len(),
            readonly = config.readonly,
            "initializing textarea"
        );
        self.document = Some(Document::from_text(&config.value));
        self.selection = SelectionTracker::new();
        self.readonly = config.readonly;
        self.placeholder = config.placeholder.clone();
        self.apply_readonly();
    }

    pub fn is_initialized(&self) -> bool {
        self.document.is_some()
    }

    /// The flattened text, paragraphs joined by `\n`.
    pub fn value(&self) -> String {
        self.document
            .as_ref()
            .map(Document::to_text)
            .unwrap_or_default()
    }

    /// Replace the whole text. All marks are discarded and the caret moves
    /// to the start.
    pub fn set_value(&mut self, text: &str) {
        let Some(document) = &self.document else {
            return;
        };
        let next = document.replace_all(text);
        self.commit(next, Some(Selection::collapsed(0)));
    }

    pub fn selection(&self) -> Selection {
        self.selection.selection()
    }

    /// Apply marks over `[from, from + length)`, or to the end when `length`
    /// is `None`. Unknown kinds are skipped.
    pub fn add_marks(&mut self, from: i64, specs: &[MarkSpec], length: Option<i64>) {
        let Some(document) = &self.document else {
            return;
        };
        let next = marks::add_marks(document, from, specs, length);
        self.commit(next, None);
    }

    /// Remove marks over `[from, from + length)`. With `kinds` given and
    /// non-empty, only those kinds are removed.
    pub fn remove_marks(&mut self, from: i64, length: Option<i64>, kinds: Option<&[&str]>) {
        let Some(document) = &self.document else {
            return;
        };
        let next = marks::remove_marks(document, from, length, kinds);
        self.commit(next, None);
    }

    /// Marks active at a caret position.
    pub fn get_marks(&self, pos: i64) -> Vec<MarkSpec> {
        self.document
            .as_ref()
            .map(|document| {
                marks::get_marks(document, pos)
                    .iter()
                    .map(Mark::to_spec)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Link the text between `start` and `end`, in either order.
    pub fn add_link(&mut self, start: i64, end: i64, href: &str) {
        let (start, end) = (start.min(end), start.max(end));
        self.add_marks(start, &[MarkSpec::link(href)], Some(end.saturating_sub(start)));
    }

    /// Select the whole document.
    pub fn select(&mut self) {
        let Some(document) = &self.document else {
            return;
        };
        let requested = self.selection.select(document);
        let resolved = self.engine.resolve_selection(document, requested);
        self.selection.set(document, resolved);
    }

    /// Select `[start, end)`; `-1` stands for the document end.
    pub fn select_range(&mut self, start: i64, end: i64) {
        let Some(document) = &self.document else {
            return;
        };
        let requested = self.selection.select_range(document, start, end);
        let resolved = self.engine.resolve_selection(document, requested);
        self.selection.set(document, resolved);
    }

    pub fn focus(&mut self) {
        self.engine.focus();
        let focused = self.engine.has_focus();
        self.bridge.observe_focus(focused, &mut self.host);
    }

    /// Drop focus. If the textarea had it, the value is committed.
    pub fn blur(&mut self) {
        self.engine.blur();
        let focused = self.engine.has_focus();
        self.bridge.observe_focus(focused, &mut self.host);
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    /// Switch between editable and readonly. Only link presentation and the
    /// engine's editability change; the document is untouched.
    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
        self.apply_readonly();
    }

    fn apply_readonly(&mut self) {
        let Some(document) = &self.document else {
            return;
        };
        self.engine.set_editable(!self.readonly);
        let view = render::render_document(document, self.readonly, self.placeholder.as_deref());
        self.engine.render(&view);
    }

    /// A raw key from the engine. The host sees it first; if it doesn't
    /// consume the key, the default behavior applies.
    pub fn handle_key(&mut self, key: &KeyDescriptor) -> KeyOutcome {
        if self.bridge.forward_key(key, &mut self.host) {
            return KeyOutcome::Consumed;
        }
        let Some(document) = &self.document else {
            return KeyOutcome::Delegated;
        };

        match execute::default_action(document, key, self.selection.selection()) {
            KeyDefault::Apply(action) => {
                self.apply(&action);
                KeyOutcome::Consumed
            }
            KeyDefault::Swallow => KeyOutcome::Consumed,
            KeyDefault::Delegate => KeyOutcome::Delegated,
        }
    }

    /// Text typed or pasted through the engine, replacing the selection.
    pub fn handle_text_input(&mut self, text: &str) {
        let range = self.selection.selection();
        self.apply(&EditorAction::Insert {
            text: text.to_owned(),
            range,
        });
    }

    /// The engine gained or lost focus on its own.
    pub fn handle_focus_change(&mut self, focused: bool) {
        self.bridge.observe_focus(focused, &mut self.host);
    }

    /// The user moved the caret or selection inside the engine.
    pub fn sync_selection(&mut self, anchor: usize, head: usize) {
        if let Some(document) = &self.document {
            self.selection.set(document, Selection::new(anchor, head));
        }
    }

    /// The current snapshot.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Structural JSON of the document, marks included.
    pub fn styles(&self) -> Option<Value> {
        self.document.as_ref().map(Document::to_json)
    }

    pub fn render_view(&self) -> Option<RenderView> {
        self.document.as_ref().map(|document| {
            render::render_document(document, self.readonly, self.placeholder.as_deref())
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn apply(&mut self, action: &EditorAction) {
        let Some(document) = &self.document else {
            return;
        };
        if let Some(edit) = execute::execute_action(document, action) {
            self.commit(edit.document, Some(edit.selection));
        }
    }

    /// Replace the snapshot, then redraw and notify.
    ///
    /// With `selection` the caret moves there; otherwise the current selection
    /// is clamped to the new document.
    fn commit(&mut self, next: Document, selection: Option<Selection>) {
        let Some(current) = self.document.as_mut() else {
            return;
        };
        let previous = std::mem::replace(current, next);
        let document = &*current;

        if cfg!(debug_assertions) {
            if let Err(err) = schema::validate(document) {
                tracing::error!(%err, "document invariant violated");
            }
        }

        match selection {
            Some(requested) => {
                let resolved = self.engine.resolve_selection(document, requested);
                self.selection.set(document, resolved);
            }
            None => {
                self.selection.clamp_to(document);
            }
        }

        let view = render::render_document(document, self.readonly, self.placeholder.as_deref());
        self.engine.render(&view);

        let has_focus = self.engine.has_focus();
        self.bridge
            .observe_mutation(&previous, document, has_focus, &mut self.host);
    }
}
