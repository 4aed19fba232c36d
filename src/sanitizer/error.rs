// src/sanitizer/error.rs

use thiserror::Error;

/// Errors from the sanitizing pipeline.
///
/// Only the Markdown pre-pass can fail; cleaning is total.
#[derive(Error, Debug)]
pub enum SanitizeError {
    #[error("Markdown input is not valid UTF-8: {0}")]
    MarkdownRender(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, SanitizeError>;
