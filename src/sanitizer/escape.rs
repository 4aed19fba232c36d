// src/sanitizer/escape.rs

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// A complete character reference at the start of the haystack (`&amp;`, `&#60;`, `&#x3C;`).
static CHARACTER_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z][A-Za-z0-9]{1,31});")
        .expect("character reference pattern is valid")
});

/// Named references resolved when inspecting URL values. Anything else is
/// treated as unresolvable.
const NAMED_REFERENCES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("colon", ':'),
    ("sol", '/'),
    ("bsol", '\\'),
    ("Tab", '\t'),
    ("NewLine", '\n'),
    ("lpar", '('),
    ("rpar", ')'),
    ("semi", ';'),
    ("comma", ','),
    ("period", '.'),
    ("num", '#'),
    ("quest", '?'),
    ("equals", '='),
    ("percnt", '%'),
    ("plus", '+'),
];

/// Escapes text content: `<` and `>` become entities, and a bare `&` becomes
/// `&amp;`. Existing character references and quotes are kept as they are, so
/// escaping already escaped text changes nothing.
pub(crate) fn escape_text_into(out: &mut String, text: &str) {
    escape_into(out, text, false);
}

/// Same as [`escape_text_into`], plus `"` for double-quoted attribute values.
pub(crate) fn escape_attribute_into(out: &mut String, value: &str) {
    escape_into(out, value, true);
}

fn escape_into(out: &mut String, text: &str, quotes: bool) {
    let mut last = 0;
    for (i, b) in text.bytes().enumerate() {
        let replacement = match b {
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' if quotes => "&quot;",
            b'&' if !CHARACTER_REFERENCE.is_match(&text[i..]) => "&amp;",
            _ => continue,
        };
        out.push_str(&text[last..i]);
        out.push_str(replacement);
        last = i + 1;
    }
    out.push_str(&text[last..]);
}

/// Escapes every HTML metacharacter, with no reference preservation.
/// Used for values the server places into markup itself.
pub fn encode_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Decodes the character references a browser would resolve in an attribute
/// value written by this cleaner. Returns `None` for a named reference outside
/// the known table.
pub(crate) fn decode_character_references(value: &str) -> Option<Cow<'_, str>> {
    if !value.contains('&') {
        return Some(Cow::Borrowed(value));
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];
        match CHARACTER_REFERENCE.find(rest) {
            Some(m) => {
                out.push(resolve_reference(&rest[1..m.end() - 1])?);
                rest = &rest[m.end()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Some(Cow::Owned(out))
}

fn resolve_reference(body: &str) -> Option<char> {
    if let Some(number) = body.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => number.parse::<u32>().ok(),
        };
        let c = code
            .and_then(char::from_u32)
            .filter(|c| *c != '\0')
            .unwrap_or('\u{fffd}');
        return Some(c);
    }
    NAMED_REFERENCES
        .iter()
        .find(|(name, _)| *name == body)
        .map(|(_, c)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape_text(text: &str) -> String {
        let mut out = String::new();
        escape_text_into(&mut out, text);
        out
    }

    #[test]
    fn escapes_angle_brackets_and_bare_ampersands() {
        assert_eq!(escape_text("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_text("AT&T;"), "AT&amp;T;");
    }

    #[test]
    fn keeps_character_references_and_quotes() {
        assert_eq!(
            escape_text("&lt;b&gt; &amp; &#169; &#xA9; it's \"q\""),
            "&lt;b&gt; &amp; &#169; &#xA9; it's \"q\""
        );
    }

    #[test]
    fn escaping_is_stable() {
        let once = escape_text("<script>if (a && b) {}</script>");
        assert_eq!(escape_text(&once), once);
    }

    #[test]
    fn attribute_escaping_covers_quotes() {
        let mut out = String::new();
        escape_attribute_into(&mut out, r#"say "hi" & <bye>"#);
        assert_eq!(out, "say &quot;hi&quot; &amp; &lt;bye&gt;");
    }

    #[test]
    fn encode_html_escapes_everything() {
        assert_eq!(encode_html("plain"), "plain");
        assert_eq!(
            encode_html(r#"<p class="x">&amp;'</p>"#),
            "&lt;p class=&quot;x&quot;&gt;&amp;amp;&#x27;&lt;/p&gt;"
        );
    }

    #[test]
    fn decodes_numeric_and_known_named_references() {
        assert_eq!(
            decode_character_references("jav&#x61;script&colon;x").as_deref(),
            Some("javascript:x")
        );
        assert_eq!(
            decode_character_references("a&#0;b&#9999999;").as_deref(),
            Some("a\u{fffd}b\u{fffd}")
        );
        assert_eq!(
            decode_character_references("a & b").as_deref(),
            Some("a & b")
        );
        assert_eq!(decode_character_references("&madeup;"), None);
    }
}
