use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::sanitizer::Preset;

/// DTO for sanitizing a piece of text.
#[derive(Debug, Deserialize, Validate)]
pub struct SanitizeRequest {
    #[validate(length(max = 65536, message = "Text must be at most 65536 chars"))]
    pub text: String,

    /// Policy preset; `default` when omitted.
    #[serde(default)]
    pub preset: Preset,

    /// Render Markdown before cleaning.
    /// Defaults to what the preset expects (on for `markdown`, off otherwise).
    pub markdown: Option<bool>,
}

impl SanitizeRequest {
    pub fn renders_markdown(&self) -> bool {
        self.markdown.unwrap_or_else(|| self.preset.renders_markdown())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SanitizeResponse {
    pub html: String,
}
