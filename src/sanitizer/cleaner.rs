// src/sanitizer/cleaner.rs

//! Allow-list cleaner with escape semantics.
//!
//! Allowed tags are re-serialized with only their permitted attributes.
//! Disallowed tags are escaped one element at a time: their source text
//! becomes literal text and their content is cleaned like everything else.
//! Allowed tags still open at end of input are closed there.

use std::collections::HashMap;

use url::Url;

use super::escape::{decode_character_references, escape_attribute_into, escape_text_into};
use super::policy::Policy;
use super::tokenizer::{Tag, Token, Tokenizer};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

const URL_ATTRIBUTES: &[&str] = &[
    "action",
    "background",
    "cite",
    "formaction",
    "href",
    "longdesc",
    "poster",
    "src",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Cleans `html` against `policy`. Total over all inputs.
pub(crate) fn clean(html: &str, policy: &Policy) -> String {
    let mut out = String::with_capacity(html.len() + html.len() / 8);
    let mut open: Vec<String> = Vec::new();
    // Open elements per tag name, so a stray end tag never walks the stack.
    let mut open_counts: HashMap<String, usize> = HashMap::new();

    for token in Tokenizer::new(html) {
        match token {
            Token::Text(text) => escape_text_into(&mut out, text),
            Token::Comment(raw) => {
                if !policy.strip_comments() {
                    escape_text_into(&mut out, raw);
                }
            }
            Token::StartTag(tag) if policy.is_tag_allowed(&tag.name) => {
                write_start_tag(&mut out, &tag, policy);
                if !is_void(&tag.name) {
                    *open_counts.entry(tag.name.clone()).or_default() += 1;
                    open.push(tag.name);
                }
            }
            Token::EndTag(tag) if policy.is_tag_allowed(&tag.name) => {
                let position = match open_counts.get(&tag.name) {
                    Some(&count) if count > 0 => open.iter().rposition(|name| *name == tag.name),
                    _ => None,
                };
                match position {
                    // Closing an outer element closes everything nested inside it.
                    Some(pos) => {
                        for name in open.drain(pos..).rev() {
                            if let Some(count) = open_counts.get_mut(&name) {
                                *count -= 1;
                            }
                            write_end_tag(&mut out, &name);
                        }
                    }
                    None => {
                        tracing::trace!(tag = %tag.name, "escaping stray end tag");
                        escape_text_into(&mut out, tag.raw);
                    }
                }
            }
            Token::StartTag(tag) | Token::EndTag(tag) => {
                tracing::trace!(tag = %tag.name, "escaping disallowed tag");
                escape_text_into(&mut out, tag.raw);
            }
        }
    }

    for name in open.iter().rev() {
        write_end_tag(&mut out, name);
    }

    out
}

fn write_start_tag(out: &mut String, tag: &Tag<'_>, policy: &Policy) {
    out.push('<');
    out.push_str(&tag.name);

    let mut seen: Vec<&str> = Vec::with_capacity(tag.attributes.len());
    for attr in &tag.attributes {
        // First occurrence wins, as in browsers.
        if seen.contains(&attr.name.as_str()) {
            continue;
        }
        seen.push(&attr.name);

        if !policy.is_attribute_allowed(&tag.name, &attr.name) {
            tracing::trace!(tag = %tag.name, attribute = %attr.name, "dropping attribute");
            continue;
        }
        let value = attr.value.unwrap_or("");
        if URL_ATTRIBUTES.contains(&attr.name.as_str()) && !is_url_allowed(value, policy) {
            tracing::debug!(tag = %tag.name, attribute = %attr.name, "dropping unsafe url");
            continue;
        }

        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        escape_attribute_into(out, value);
        out.push('"');
    }

    out.push('>');
}

fn write_end_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Relative URLs pass. Absolute URLs pass only with an allowed scheme.
fn is_url_allowed(value: &str, policy: &Policy) -> bool {
    let Some(decoded) = decode_character_references(value) else {
        return false;
    };
    match Url::parse(decoded.trim()) {
        Ok(url) => policy.allows_scheme(url.scheme()),
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}
