// src/sanitizer/strip.rs

use std::collections::{HashMap, HashSet};

use ammonia::Builder;

use super::policy::Policy;

/// Tags whose content is dropped along with the tag in strip mode.
const CONTENT_TAGS: [&str; 2] = ["script", "style"];

/// Clean HTML content using the ammonia library, driven by `policy`.
///
/// Used for [`Disposition::Strip`](super::Disposition::Strip): disallowed tags
/// are removed instead of escaped, keeping their text, except `script` and
/// `style` whose content is removed as well. Output is serialized from
/// ammonia's parse tree, so structure is normalised the way a browser would
/// build it.
pub(crate) fn strip(html: &str, policy: &Policy) -> String {
    let tags: HashSet<&str> = policy.allowed_tags().into_iter().collect();
    let tag_attributes: HashMap<&str, HashSet<&str>> = policy
        .tag_attributes()
        .map(|(tag, attrs)| (tag, attrs.iter().map(String::as_str).collect()))
        .collect();
    let generic_attributes: HashSet<&str> = policy.generic_attributes().collect();
    let url_schemes: HashSet<&str> = policy.url_schemes().collect();
    // ammonia rejects a tag that is both allowed and content-cleaned.
    let clean_content_tags: HashSet<&str> = CONTENT_TAGS
        .into_iter()
        .filter(|tag| !tags.contains(tag))
        .collect();

    Builder::default()
        .tags(tags)
        .clean_content_tags(clean_content_tags)
        .tag_attributes(tag_attributes)
        .generic_attributes(generic_attributes)
        .url_schemes(url_schemes)
        .link_rel(None)
        .strip_comments(policy.strip_comments())
        .clean(html)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitizer::Disposition;

    fn policy() -> Policy {
        Policy::builder()
            .allow_tags(["p"])
            .allow_tag_attributes("a", ["href"])
            .disposition(Disposition::Strip)
            .build()
    }

    #[test]
    fn removes_disallowed_tags_keeping_text() {
        assert_eq!(
            strip("<p>kept</p><aside>loose text</aside>", &policy()),
            "<p>kept</p>loose text"
        );
    }

    #[test]
    fn removes_script_content() {
        let out = strip("<p>hi</p><script>alert(1)</script>", &policy());
        assert!(!out.contains("alert"));
        assert!(!out.contains("script"));
        assert!(out.contains("<p>hi</p>"));
    }

    #[test]
    fn applies_attribute_and_scheme_rules() {
        let out = strip(
            r#"<a href="javascript:alert(1)" onclick="x">a</a><a href="https://ok.example/">b</a>"#,
            &policy(),
        );
        assert!(!out.contains("javascript"));
        assert!(!out.contains("onclick"));
        assert!(out.contains(r#"<a href="https://ok.example/">b</a>"#));
    }
}
