// src/sanitizer/policy.rs

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// What the cleaner does with a tag that is not on the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Render the tag as literal text (`<aside>` becomes `&lt;aside&gt;`).
    #[default]
    Escape,
    /// Remove the tag, keeping its text content.
    Strip,
}

/// Allow-list of tags and attributes that may pass through the cleaner unescaped.
///
/// Policies are plain values: build one once and share it by reference.
/// Tag and attribute names are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Policy {
    tags: BTreeMap<String, BTreeSet<String>>,
    generic_attributes: BTreeSet<String>,
    url_schemes: BTreeSet<String>,
    strip_comments: bool,
    disposition: Disposition,
}

const DEFAULT_URL_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

impl Policy {
    fn empty() -> Self {
        Self {
            tags: BTreeMap::new(),
            generic_attributes: BTreeSet::new(),
            url_schemes: DEFAULT_URL_SCHEMES.iter().map(|s| s.to_string()).collect(),
            strip_comments: true,
            disposition: Disposition::Escape,
        }
    }

    pub fn builder() -> PolicyBuilder {
        PolicyBuilder {
            policy: Self::empty(),
        }
    }

    /// No tags at all: every piece of markup is escaped.
    pub fn plain() -> Self {
        Self::empty()
    }

    /// Secure text preset: light structural and inline markup, links without scripting.
    pub fn secure_text() -> Self {
        Self::builder()
            .allow_tags([
                "b", "blockquote", "br", "code", "em", "h1", "h2", "h3", "h4", "h5", "h6", "i",
                "li", "ol", "p", "strong", "ul",
            ])
            .allow_tag_attributes("a", ["href", "title"])
            .allow_tag_attributes("abbr", ["title"])
            .allow_tag_attributes("acronym", ["title"])
            .build()
    }

    /// Everything a CommonMark renderer emits, minus anything that can run or embed content.
    pub fn markdown() -> Self {
        Self::builder()
            .allow_tags([
                "b", "blockquote", "br", "del", "em", "h1", "h2", "h3", "h4", "h5", "h6", "hr",
                "i", "li", "p", "pre", "s", "strong", "sub", "sup", "table", "tbody", "td", "th",
                "thead", "tr", "ul",
            ])
            .allow_tag_attributes("a", ["href", "title"])
            .allow_tag_attributes("img", ["src", "alt", "title"])
            .allow_tag_attributes("code", ["class"])
            .allow_tag_attributes("ol", ["start"])
            .build()
    }

    pub fn allowed_tags(&self) -> BTreeSet<&str> {
        self.tags.keys().map(String::as_str).collect()
    }

    /// Attributes permitted on `tag`, including generic ones.
    /// Unknown tags yield an empty set.
    pub fn allowed_attributes(&self, tag: &str) -> BTreeSet<&str> {
        let tag = tag.to_ascii_lowercase();
        self.tags
            .get(&tag)
            .into_iter()
            .flatten()
            .chain(self.generic_attributes.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// `tag` and `attribute` must already be lowercase.
    pub fn is_attribute_allowed(&self, tag: &str, attribute: &str) -> bool {
        self.generic_attributes.contains(attribute)
            || self
                .tags
                .get(tag)
                .is_some_and(|attributes| attributes.contains(attribute))
    }

    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.url_schemes.contains(&scheme.to_ascii_lowercase())
    }

    pub fn url_schemes(&self) -> impl Iterator<Item = &str> {
        self.url_schemes.iter().map(String::as_str)
    }

    pub(crate) fn tag_attributes(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.tags.iter().map(|(tag, attrs)| (tag.as_str(), attrs))
    }

    pub(crate) fn generic_attributes(&self) -> impl Iterator<Item = &str> {
        self.generic_attributes.iter().map(String::as_str)
    }

    pub fn strip_comments(&self) -> bool {
        self.strip_comments
    }

    pub fn disposition(&self) -> Disposition {
        self.disposition
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::secure_text()
    }
}

/// Incremental construction of a custom [`Policy`].
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    policy: Policy,
}

impl PolicyBuilder {
    pub fn allow_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            self.policy
                .tags
                .entry(tag.as_ref().to_ascii_lowercase())
                .or_default();
        }
        self
    }

    /// Allows `tag` (if not already allowed) together with `attributes` on it.
    pub fn allow_tag_attributes<I, S>(mut self, tag: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy
            .tags
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .extend(attributes.into_iter().map(|a| a.as_ref().to_ascii_lowercase()));
        self
    }

    /// Attributes allowed on every allowed tag.
    pub fn allow_generic_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy
            .generic_attributes
            .extend(attributes.into_iter().map(|a| a.as_ref().to_ascii_lowercase()));
        self
    }

    /// Replaces the schemes accepted in URL-valued attributes.
    pub fn url_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.policy.url_schemes = schemes
            .into_iter()
            .map(|s| s.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    pub fn strip_comments(mut self, strip: bool) -> Self {
        self.policy.strip_comments = strip;
        self
    }

    pub fn disposition(mut self, disposition: Disposition) -> Self {
        self.policy.disposition = disposition;
        self
    }

    pub fn build(self) -> Policy {
        self.policy
    }
}

static DEFAULT_POLICY: Lazy<Policy> = Lazy::new(Policy::secure_text);
static MARKDOWN_POLICY: Lazy<Policy> = Lazy::new(Policy::markdown);
static PLAIN_POLICY: Lazy<Policy> = Lazy::new(Policy::plain);

/// Named, process-wide policy presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Default,
    Markdown,
    Plain,
}

impl Preset {
    pub fn policy(self) -> &'static Policy {
        match self {
            Preset::Default => &DEFAULT_POLICY,
            Preset::Markdown => &MARKDOWN_POLICY,
            Preset::Plain => &PLAIN_POLICY,
        }
    }

    /// Whether input for this preset is Markdown unless the caller says otherwise.
    pub fn renders_markdown(self) -> bool {
        matches!(self, Preset::Markdown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Markdown => "markdown",
            Preset::Plain => "plain",
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Preset::Default),
            "markdown" => Ok(Preset::Markdown),
            "plain" => Ok(Preset::Plain),
            other => Err(format!("Unknown policy preset '{}'", other)),
        }
    }
}
