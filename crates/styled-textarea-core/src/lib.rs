//! styled-textarea-core: the document model behind a styled textarea.
//!
//! A styled textarea behaves like a native multi-line text input while
//! storing its text as paragraphs carrying style and link marks. This crate
//! provides:
//! - `Document` - immutable, structurally shared snapshots of paragraphs
//! - `marks` - add/remove/query of marks over half-open ranges, with merge
//!   and split semantics
//! - `SelectionTracker` - a clamped selection over the flattened text
//! - `EventBridge` - input-like notifications synthesized from mutations
//! - `StyledTextarea` - the textarea-shaped facade, generic over a
//!   `DocumentEngine` (display) and a `TextareaHost` (listener)
//!
//! Offsets everywhere are char offsets into the flattened text, where
//! paragraphs are joined by a single `\n`.

pub mod actions;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod events;
pub mod execute;
pub mod marks;
pub mod paragraph;
pub mod render;
pub mod schema;
pub mod selection;
pub mod textarea;
pub mod types;

pub use actions::{EditorAction, Key, KeyDescriptor, KeyOutcome, Modifiers};
pub use config::TextareaConfig;
pub use document::Document;
pub use engine::{DocumentEngine, HeadlessEngine};
pub use error::TextareaError;
pub use events::{EventBridge, Notification, RecordingHost, TextareaHost};
pub use execute::{Edit, KeyDefault, default_action, execute_action};
pub use marks::{add_marks, get_marks, remove_marks};
pub use paragraph::{Paragraph, Segment};
pub use render::{LinkPresentation, RenderView, RenderedParagraph, TextRun, render_document};
pub use schema::{MarkKind, MarkKindDescriptor, NodeKind};
pub use selection::{DOCUMENT_END, SelectionTracker};
pub use smol_str::SmolStr;
pub use textarea::StyledTextarea;
pub use types::{Attrs, Mark, MarkSpec, Selection, attrs};
