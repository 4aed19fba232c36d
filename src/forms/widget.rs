// src/forms/widget.rs

use std::collections::BTreeMap;

use crate::sanitizer::encode_html;

const DEFAULT_CLASSES: &str = "hidden secure-input";

/// Hidden textarea plus the mount point a client-side WYSIWYG editor attaches to.
///
/// The editor finds its textarea through `data-editor`, which names the id of
/// the editor `div`.
#[derive(Debug, Clone, Default)]
pub struct WysiwygWidget {
    attrs: BTreeMap<String, String>,
}

impl WysiwygWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra textarea attribute. A `class` is appended to the default classes.
    /// Names outside `[A-Za-z0-9_:-]` are dropped.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if is_attribute_name(&name) {
            self.attrs.insert(name, value.into());
        } else {
            tracing::warn!(attribute = %name, "ignoring invalid widget attribute name");
        }
        self
    }

    pub fn render(&self, name: &str, value: Option<&str>) -> String {
        let editor_id = format!("{}-secure-input", name);

        let mut attrs: BTreeMap<&str, String> = BTreeMap::new();
        attrs.insert("class", DEFAULT_CLASSES.to_string());
        attrs.insert("cols", "40".to_string());
        attrs.insert("rows", "10".to_string());
        attrs.insert("id", format!("id_{}", name));
        attrs.insert("name", name.to_string());
        attrs.insert("data-editor", editor_id.clone());
        for (key, extra) in &self.attrs {
            if key == "class" {
                attrs.insert("class", format!("{} {}", DEFAULT_CLASSES, extra));
            } else {
                attrs.insert(key.as_str(), extra.clone());
            }
        }

        let mut html = String::from("<textarea");
        for (key, val) in &attrs {
            html.push_str(&format!(" {}=\"{}\"", key, encode_html(val)));
        }
        html.push_str(">\r\n");
        html.push_str(&encode_html(value.unwrap_or("")));
        html.push_str("</textarea>");
        html.push_str(&format!(
            "<div class=\"bootstrap-wysiwyg\" id=\"{}\"></div>",
            encode_html(&editor_id)
        ));
        html
    }
}

fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b':' | b'-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_textarea_and_editor_mount() {
        let html = WysiwygWidget::new().render("text", None);
        assert_eq!(
            html,
            "<textarea class=\"hidden secure-input\" cols=\"40\" \
             data-editor=\"text-secure-input\" id=\"id_text\" name=\"text\" rows=\"10\">\r\n\
             </textarea><div class=\"bootstrap-wysiwyg\" id=\"text-secure-input\"></div>"
        );
    }

    #[test]
    fn escapes_initial_value() {
        let html = WysiwygWidget::new().render("body", Some("<p>hi & bye</p>"));
        assert!(html.contains(">\r\n&lt;p&gt;hi &amp; bye&lt;/p&gt;</textarea>"));
    }

    #[test]
    fn merges_extra_attributes() {
        let html = WysiwygWidget::new()
            .with_attr("class", "wide")
            .with_attr("placeholder", "Say \"hi\"")
            .render("text", None);
        assert!(html.contains("class=\"hidden secure-input wide\""));
        assert!(html.contains("placeholder=\"Say &quot;hi&quot;\""));
    }

    #[test]
    fn drops_attribute_names_that_could_break_out() {
        let html = WysiwygWidget::new()
            .with_attr("onfocus=alert(1) x", "y")
            .with_attr("\"><script>", "y")
            .with_attr("", "y")
            .with_attr("data-role:x_1", "ok")
            .render("text", None);
        assert!(!html.contains("onfocus"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains(" =\""));
        assert!(html.contains(" data-role:x_1=\"ok\""));
    }
}
