//! The seam between the textarea and whatever draws it.
//!
//! A [`DocumentEngine`] renders snapshots, owns focus and may adjust requested
//! selections (snapping to valid positions). The browser implementation lives
//! outside this crate; [`HeadlessEngine`] is used in tests and when nothing is
//! attached.

use crate::document::Document;
use crate::render::RenderView;
use crate::types::Selection;

/// Rendering and focus capabilities the textarea needs from its host platform.
pub trait DocumentEngine {
    /// Draw a new view. Called after every document or readonly change.
    fn render(&mut self, view: &RenderView);

    fn has_focus(&self) -> bool;

    fn focus(&mut self);

    fn blur(&mut self);

    /// Toggle whether the user can edit through the engine.
    fn set_editable(&mut self, editable: bool);

    /// Apply a requested selection and report where it actually landed.
    ///
    /// The default only clamps to the document.
    fn resolve_selection(&mut self, document: &Document, requested: Selection) -> Selection {
        requested.clamped(document.len())
    }
}

/// An engine with no display that just records what it was asked to do.
#[derive(Debug, Clone)]
pub struct HeadlessEngine {
    focused: bool,
    editable: bool,
    last_view: Option<RenderView>,
    render_count: usize,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self {
            focused: false,
            editable: true,
            last_view: None,
            render_count: 0,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// The most recently rendered view.
    pub fn last_view(&self) -> Option<&RenderView> {
        self.last_view.as_ref()
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentEngine for HeadlessEngine {
    fn render(&mut self, view: &RenderView) {
        self.render_count += 1;
        self.last_view = Some(view.clone());
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }
}

impl<E: DocumentEngine + ?Sized> DocumentEngine for &mut E {
    fn render(&mut self, view: &RenderView) {
        (**self).render(view)
    }

    fn has_focus(&self) -> bool {
        (**self).has_focus()
    }

    fn focus(&mut self) {
        (**self).focus()
    }

    fn blur(&mut self) {
        (**self).blur()
    }

    fn set_editable(&mut self, editable: bool) {
        (**self).set_editable(editable)
    }

    fn resolve_selection(&mut self, document: &Document, requested: Selection) -> Selection {
        (**self).resolve_selection(document, requested)
    }
}
