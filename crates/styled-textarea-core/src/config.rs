//! Initial textarea configuration.

use serde::{Deserialize, Serialize};

use crate::error::TextareaError;

/// Settings applied when a textarea is initialized.
///
/// Field names are camelCase on the wire, matching element attributes:
///
/// ```json
/// { "value": "hello", "readonly": true, "placeholder": "Type here" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextareaConfig {
    /// Initial text. Line breaks become paragraph boundaries.
    pub value: String,
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl TextareaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, TextareaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}
