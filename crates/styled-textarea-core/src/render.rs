//! Presentation view of a document for the engine to draw.
//!
//! The view is plain data: paragraphs as `p.styled-textarea-paragraph`, text
//! split into runs at mark boundaries, style marks folded into inline CSS and
//! class names, and links presented according to the readonly flag.

use serde::Serialize;
use serde_json::Value;
use smol_str::SmolStr;

use crate::document::Document;
use crate::paragraph::{Paragraph, Segment};
use crate::schema::MarkKind;

pub const PARAGRAPH_TAG: &str = "p";
pub const PARAGRAPH_CLASS: &str = "styled-textarea-paragraph";
pub const LINK_CLASS: &str = "styled-textarea-link";

const EDITABLE_LINK_STYLE: &str = "cursor: text; pointer-events: none;";
const READONLY_LINK_STYLE: &str = "cursor: pointer;";

/// Everything the engine needs to draw the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderView {
    pub editable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub paragraphs: Vec<RenderedParagraph>,
}

impl RenderView {
    /// Placeholder applies only while the document has no text.
    pub fn shows_placeholder(&self) -> bool {
        self.placeholder.is_some() && self.paragraphs.iter().all(|p| p.runs.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedParagraph {
    pub tag: &'static str,
    pub class: &'static str,
    pub runs: Vec<TextRun>,
}

/// A run of text with uniform marks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    /// Inline CSS of the style marks on this run, joined in mark order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<SmolStr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkPresentation>,
}

/// How a link mark is drawn.
///
/// Editable documents draw links as inert `span`s so clicks place the caret.
/// Readonly documents draw real anchors that open in a new tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkPresentation {
    pub tag: &'static str,
    pub class: &'static str,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'static str>,
    pub style: &'static str,
}

impl LinkPresentation {
    pub fn new(href: impl Into<String>, editable: bool) -> Self {
        if editable {
            Self {
                tag: "span",
                class: LINK_CLASS,
                href: href.into(),
                target: None,
                style: EDITABLE_LINK_STYLE,
            }
        } else {
            Self {
                tag: "a",
                class: LINK_CLASS,
                href: href.into(),
                target: Some("_blank"),
                style: READONLY_LINK_STYLE,
            }
        }
    }
}

/// Build the view for a snapshot.
pub fn render_document(document: &Document, readonly: bool, placeholder: Option<&str>) -> RenderView {
    let editable = !readonly;
    RenderView {
        editable,
        placeholder: placeholder.map(str::to_owned),
        paragraphs: document
            .paragraphs()
            .iter()
            .map(|p| render_paragraph(p, editable))
            .collect(),
    }
}

fn render_paragraph(paragraph: &Paragraph, editable: bool) -> RenderedParagraph {
    RenderedParagraph {
        tag: PARAGRAPH_TAG,
        class: PARAGRAPH_CLASS,
        runs: paragraph
            .segments()
            .into_iter()
            .map(|segment| render_run(segment, editable))
            .collect(),
    }
}

fn render_run(segment: Segment<'_>, editable: bool) -> TextRun {
    let mut css = Vec::new();
    let mut classes = Vec::new();
    let mut link = None;

    for mark in segment.marks {
        match mark.kind() {
            MarkKind::Style => {
                if let Some(Value::String(style)) = mark.attrs().get("css") {
                    css.push(style.trim().to_owned());
                }
                if let Some(Value::String(class)) = mark.attrs().get("className") {
                    classes.extend(class.split_whitespace().map(SmolStr::from));
                }
            }
            MarkKind::Link => {
                // Overlapping links: the last one in mark order wins.
                let href = match mark.attrs().get("href") {
                    Some(Value::String(href)) => href.clone(),
                    _ => String::new(),
                };
                link = Some(LinkPresentation::new(href, editable));
            }
        }
    }

    css.retain(|s| !s.is_empty());
    TextRun {
        text: segment.text.to_owned(),
        style: (!css.is_empty()).then(|| css.join(" ")),
        classes,
        link,
    }
}
