// src/sanitizer/markdown.rs

use pulldown_cmark::{Options, Parser, html};

/// Renders CommonMark (plus tables and strikethrough) to HTML.
///
/// Raw HTML in the source passes through untouched; the result must go
/// through the cleaner like any other untrusted HTML. Trailing whitespace is
/// trimmed so single paragraphs round out without a dangling newline.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);

    let trimmed = html_output.trim_end().len();
    html_output.truncate(trimmed);
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_paragraphs() {
        assert_eq!(
            render_markdown("This text can be easily be\n\n marked down."),
            "<p>This text can be easily be</p>\n<p>marked down.</p>"
        );
    }

    #[test]
    fn passes_raw_html_through() {
        assert_eq!(
            render_markdown("<script>alert('hey there')</script>"),
            "<script>alert('hey there')</script>"
        );
    }

    #[test]
    fn renders_inline_markup() {
        assert_eq!(
            render_markdown("# Title\n\nSome **bold** and ~~gone~~ text."),
            "<h1>Title</h1>\n<p>Some <strong>bold</strong> and <del>gone</del> text.</p>"
        );
    }
}
