// src/sanitizer/mod.rs

//! Sanitizing pipeline: optional Markdown rendering, then the allow-list cleaner.

mod cleaner;
mod error;
mod escape;
mod markdown;
mod policy;
mod strip;
mod tokenizer;

use std::borrow::Cow;

pub use error::{Result, SanitizeError};
pub use escape::encode_html;
pub use markdown::render_markdown;
pub use policy::{Disposition, Policy, PolicyBuilder, Preset};

/// Turns untrusted text into HTML that is safe to embed in a page body.
///
/// With `render_markdown` set, `text` is first rendered as Markdown and the
/// resulting HTML is cleaned like any other input. Never fails: malformed
/// markup is recovered, not rejected.
pub fn sanitize(text: &str, policy: &Policy, render_markdown: bool) -> String {
    let rendered;
    let html = if render_markdown {
        rendered = markdown::render_markdown(text);
        rendered.as_str()
    } else {
        text
    };

    let cleaned = match policy.disposition() {
        Disposition::Escape => cleaner::clean(html, policy),
        Disposition::Strip => strip::strip(html, policy),
    };

    tracing::debug!(
        input_len = text.len(),
        output_len = cleaned.len(),
        render_markdown,
        "sanitized input"
    );
    cleaned
}

/// Byte-level entry point for raw form payloads.
///
/// Markdown input must be valid UTF-8 and fails with
/// [`SanitizeError::MarkdownRender`] otherwise. Input that is cleaned as HTML
/// only is decoded lossily, so the cleaning path stays infallible.
pub fn sanitize_bytes(input: &[u8], policy: &Policy, render_markdown: bool) -> Result<String> {
    let text = decode_input(input, render_markdown)?;
    Ok(sanitize(&text, policy, render_markdown))
}

/// Decodes raw input the way [`sanitize_bytes`] does.
pub fn decode_input(input: &[u8], render_markdown: bool) -> Result<Cow<'_, str>> {
    if render_markdown {
        Ok(Cow::Borrowed(std::str::from_utf8(input)?))
    } else {
        Ok(String::from_utf8_lossy(input))
    }
}
