// src/sanitizer/tokenizer.rs

//! Lenient HTML tokenizer.
//!
//! Splits input into text, tags and comments without ever failing. A lone `<`
//! comes back as text so the cleaner escapes it. A tag cut off by end of input
//! swallows the rest of the input as a single text token, the way a browser
//! drops everything after it, so no byte is scanned as a tag candidate twice.
//! Tokens borrow from the input; only tag and attribute names are lowercased
//! into owned strings.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text(&'a str),
    StartTag(Tag<'a>),
    EndTag(Tag<'a>),
    /// Comments, doctypes, processing instructions and other `<!...>` markup,
    /// delimiters included.
    Comment(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    pub name: String,
    pub attributes: Vec<Attribute<'a>>,
    /// Source text of the whole tag, from `<` to `>`.
    pub raw: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: String,
    /// Raw value without quotes; `None` for a bare attribute.
    pub value: Option<&'a str>,
}

pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let bytes = self.input.as_bytes();
        let start = self.pos;
        if start >= bytes.len() {
            return None;
        }

        if bytes[start] == b'<' {
            let end = match markup(self.input, start) {
                Markup::Token(token, end) => {
                    self.pos = end;
                    return Some(token);
                }
                // Not markup: the `<` is text, up to the next candidate.
                Markup::Text => next_open(bytes, start + 1),
                Markup::Unterminated => bytes.len(),
            };
            self.pos = end;
            return Some(Token::Text(&self.input[start..end]));
        }

        let end = next_open(bytes, start);
        self.pos = end;
        Some(Token::Text(&self.input[start..end]))
    }
}

fn next_open(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'<')
        .map_or(bytes.len(), |i| from + i)
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

fn skip_spaces(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }
    pos
}

enum Markup<'a> {
    Token(Token<'a>, usize),
    /// The `<` is plain text.
    Text,
    /// A tag ran into end of input.
    Unterminated,
}

impl<'a> From<Option<(Token<'a>, usize)>> for Markup<'a> {
    fn from(tag: Option<(Token<'a>, usize)>) -> Self {
        match tag {
            Some((token, end)) => Markup::Token(token, end),
            None => Markup::Unterminated,
        }
    }
}

/// Recognises markup starting at the `<` at `start`.
fn markup(input: &str, start: usize) -> Markup<'_> {
    let bytes = input.as_bytes();
    let Some(&next) = bytes.get(start + 1) else {
        return Markup::Text;
    };
    match next {
        b'!' if bytes[start..].starts_with(b"<!--") => {
            let (token, end) = comment(input, start);
            Markup::Token(token, end)
        }
        b'!' | b'?' => {
            let (token, end) = bogus_comment(input, start);
            Markup::Token(token, end)
        }
        b'/' => match bytes.get(start + 2) {
            Some(b) if b.is_ascii_alphabetic() => end_tag(input, start).into(),
            Some(b'>') | None => Markup::Text,
            Some(_) => {
                let (token, end) = bogus_comment(input, start);
                Markup::Token(token, end)
            }
        },
        b if b.is_ascii_alphabetic() => start_tag(input, start).into(),
        _ => Markup::Text,
    }
}

fn comment(input: &str, start: usize) -> (Token<'_>, usize) {
    let bytes = input.as_bytes();
    let body = start + 4;
    // `<!-->` and `<!--->` close immediately.
    let end = if bytes[body..].starts_with(b">") {
        body + 1
    } else if bytes[body..].starts_with(b"->") {
        body + 2
    } else {
        bytes[body..]
            .windows(3)
            .position(|w| w == b"-->")
            .map_or(bytes.len(), |i| body + i + 3)
    };
    (Token::Comment(&input[start..end]), end)
}

fn bogus_comment(input: &str, start: usize) -> (Token<'_>, usize) {
    let bytes = input.as_bytes();
    let end = bytes[start..]
        .iter()
        .position(|&b| b == b'>')
        .map_or(bytes.len(), |i| start + i + 1);
    (Token::Comment(&input[start..end]), end)
}

fn tag_name_end(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && !is_space(bytes[pos]) && !matches!(bytes[pos], b'/' | b'>') {
        pos += 1;
    }
    pos
}

fn start_tag(input: &str, start: usize) -> Option<(Token<'_>, usize)> {
    let name_end = tag_name_end(input.as_bytes(), start + 1);
    let name = input[start + 1..name_end].to_ascii_lowercase();
    let (attributes, end) = attributes(input, name_end)?;
    let tag = Tag {
        name,
        attributes,
        raw: &input[start..end],
    };
    Some((Token::StartTag(tag), end))
}

fn end_tag(input: &str, start: usize) -> Option<(Token<'_>, usize)> {
    let name_end = tag_name_end(input.as_bytes(), start + 2);
    let name = input[start + 2..name_end].to_ascii_lowercase();
    // Attributes on end tags are parsed only to find where the tag stops.
    let (_, end) = attributes(input, name_end)?;
    let tag = Tag {
        name,
        attributes: Vec::new(),
        raw: &input[start..end],
    };
    Some((Token::EndTag(tag), end))
}

/// Parses attributes up to and including the closing `>`.
/// A trailing `/` is accepted and ignored, as HTML does.
/// Returns `None` if input ends first.
fn attributes(input: &str, mut pos: usize) -> Option<(Vec<Attribute<'_>>, usize)> {
    let bytes = input.as_bytes();
    let mut attrs = Vec::new();

    loop {
        pos = skip_spaces(bytes, pos);
        match *bytes.get(pos)? {
            b'>' => return Some((attrs, pos + 1)),
            b'/' => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        // The first character of a name may be anything, `=` included.
        let name_start = pos;
        pos += 1;
        while pos < bytes.len()
            && !is_space(bytes[pos])
            && !matches!(bytes[pos], b'/' | b'>' | b'=')
        {
            pos += 1;
        }
        let name = input[name_start..pos].to_ascii_lowercase();

        let after_name = skip_spaces(bytes, pos);
        let mut value = None;
        if bytes.get(after_name) == Some(&b'=') {
            let value_start = skip_spaces(bytes, after_name + 1);
            match *bytes.get(value_start)? {
                quote @ (b'"' | b'\'') => {
                    let close = bytes[value_start + 1..]
                        .iter()
                        .position(|&b| b == quote)?
                        + value_start
                        + 1;
                    value = Some(&input[value_start + 1..close]);
                    pos = close + 1;
                }
                b'>' => {
                    value = Some("");
                    pos = value_start;
                }
                _ => {
                    let mut end = value_start;
                    while end < bytes.len() && !is_space(bytes[end]) && bytes[end] != b'>' {
                        end += 1;
                    }
                    value = Some(&input[value_start..end]);
                    pos = end;
                }
            }
        }

        attrs.push(Attribute { name, value });
    }
}
