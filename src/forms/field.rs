// src/forms/field.rs

use std::str::FromStr;

use thiserror::Error;

use crate::sanitizer::{self, Policy, Preset, SanitizeError};

/// The two kinds of secure text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Default preset, input is HTML.
    SecureText,
    /// Markdown preset, input is rendered from Markdown before cleaning.
    Markdown,
}

impl FieldKind {
    pub fn preset(self) -> Preset {
        match self {
            FieldKind::SecureText => Preset::Default,
            FieldKind::Markdown => Preset::Markdown,
        }
    }

    pub fn renders_markdown(self) -> bool {
        matches!(self, FieldKind::Markdown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::SecureText => "secure-text",
            FieldKind::Markdown => "markdown",
        }
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secure-text" => Ok(FieldKind::SecureText),
            "markdown" => Ok(FieldKind::Markdown),
            other => Err(format!("Unknown field kind '{}'", other)),
        }
    }
}

/// Validation failures surfaced to the person filling in the form.
#[derive(Error, Debug)]
pub enum FieldError {
    #[error("This field is required.")]
    Required,

    #[error("Ensure this value has at most {max} characters (it has {actual}).")]
    TooLong { max: usize, actual: usize },

    #[error(transparent)]
    Invalid(#[from] SanitizeError),
}

/// A form field whose cleaned value is always safe HTML.
///
/// The kind picks the policy and whether Markdown is rendered; a custom policy
/// can replace the preset.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    kind: FieldKind,
    policy: Option<Policy>,
    required: bool,
    max_length: Option<usize>,
    strip_whitespace: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            policy: None,
            required: true,
            max_length: None,
            strip_whitespace: true,
        }
    }

    pub fn secure_text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::SecureText)
    }

    pub fn markdown(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Markdown)
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Limit on the raw input, in characters.
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn strip_whitespace(mut self, strip: bool) -> Self {
        self.strip_whitespace = strip;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn policy(&self) -> &Policy {
        self.policy
            .as_ref()
            .unwrap_or_else(|| self.kind.preset().policy())
    }

    /// Validates and sanitizes a raw submitted value.
    pub fn clean(&self, raw: &[u8]) -> Result<String, FieldError> {
        let renders_markdown = self.kind.renders_markdown();
        let decoded = sanitizer::decode_input(raw, renders_markdown)?;

        if let Some(max) = self.max_length {
            let actual = decoded.chars().count();
            if actual > max {
                return Err(FieldError::TooLong { max, actual });
            }
        }

        let value = if self.strip_whitespace {
            decoded.trim()
        } else {
            &*decoded
        };

        if value.is_empty() {
            if self.required {
                return Err(FieldError::Required);
            }
            return Ok(String::new());
        }

        Ok(sanitizer::sanitize(value, self.policy(), renders_markdown))
    }

    pub fn clean_str(&self, raw: &str) -> Result<String, FieldError> {
        self.clean(raw.as_bytes())
    }
}
