//! Allow-list policy for the HTML sanitizer.

use rustc_hash::{FxHashMap, FxHashSet};

/// Tags whose content is never text meant for readers.
///
/// These are dropped together with their whole subtree, whatever the policy
/// says, so that script bodies never resurface as text.
const NON_TEXT_TAGS: &[&str] = &[
    "script", "style", "textarea", "noscript", "iframe", "object", "embed", "template", "svg",
    "math", "option",
];

/// Attributes holding a URL that must pass the scheme check.
const URL_ATTRIBUTES: &[&str] = &["href", "src", "cite"];

const DEFAULT_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "blockquote", "pre", "code", "kbd",
    "samp", "span", "div", "a", "b", "i", "strong", "em", "del", "s", "sub", "sup", "abbr", "ul",
    "ol", "li", "dl", "dt", "dd", "table", "thead", "tbody", "tfoot", "tr", "th", "td", "caption",
    "figure", "figcaption", "img",
];

const DEFAULT_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "name", "title"]),
    ("img", &["src", "alt", "title", "width", "height"]),
    ("abbr", &["title"]),
    ("th", &["colspan", "rowspan"]),
    ("td", &["colspan", "rowspan"]),
    ("ol", &["start"]),
    ("blockquote", &["cite"]),
];

const DEFAULT_SCHEMES: &[&str] = &["http", "https", "mailto", "tel", "ftp"];

/// Which tags, attributes and URL schemes survive sanitization.
///
/// Names are matched case-insensitively (stored lowercase).
#[derive(Debug, Clone)]
pub struct SanitizePolicy {
    tags: FxHashSet<String>,
    attributes: FxHashMap<String, FxHashSet<String>>,
    url_schemes: FxHashSet<String>,
}

impl Default for SanitizePolicy {
    fn default() -> Self {
        let mut policy = Self::empty();
        for tag in DEFAULT_TAGS {
            policy.allow_tag(tag);
        }
        for (tag, attrs) in DEFAULT_ATTRIBUTES {
            for attr in *attrs {
                policy.allow_attribute(tag, attr);
            }
        }
        for scheme in DEFAULT_SCHEMES {
            policy.allow_scheme(scheme);
        }
        policy
    }
}

impl SanitizePolicy {
    /// A policy that allows nothing: output is plain escaped text.
    pub fn empty() -> Self {
        Self {
            tags: FxHashSet::default(),
            attributes: FxHashMap::default(),
            url_schemes: FxHashSet::default(),
        }
    }

    pub fn allow_tag(&mut self, tag: &str) -> &mut Self {
        self.tags.insert(tag.trim().to_ascii_lowercase());
        self
    }

    pub fn deny_tag(&mut self, tag: &str) -> &mut Self {
        self.tags.remove(&tag.trim().to_ascii_lowercase());
        self
    }

    pub fn allow_attribute(&mut self, tag: &str, attr: &str) -> &mut Self {
        self.attributes
            .entry(tag.trim().to_ascii_lowercase())
            .or_default()
            .insert(attr.trim().to_ascii_lowercase());
        self
    }

    pub fn allow_scheme(&mut self, scheme: &str) -> &mut Self {
        self.url_schemes.insert(scheme.trim().to_ascii_lowercase());
        self
    }

    /// Whether `tag` (lowercase) is re-emitted.
    pub fn allows_tag(&self, tag: &str) -> bool {
        !is_non_text_tag(tag) && self.tags.contains(tag)
    }

    /// Whether `attr` (lowercase) survives on `tag` (lowercase).
    ///
    /// Event handler attributes (`on*`) are never allowed.
    pub fn allows_attribute(&self, tag: &str, attr: &str) -> bool {
        !attr.starts_with("on")
            && self
                .attributes
                .get(tag)
                .is_some_and(|attrs| attrs.contains(attr))
    }

    /// Whether a URL attribute value is relative or uses an allowed scheme.
    ///
    /// `value` must already be entity-decoded. Whitespace and control
    /// characters are ignored for the scheme check, as browsers do.
    pub fn allows_url(&self, value: &str) -> bool {
        let compact: String = value
            .chars()
            .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
            .collect();

        match scheme_of(&compact) {
            Some(scheme) => self.url_schemes.contains(&scheme.to_ascii_lowercase()),
            None => true,
        }
    }
}

/// Tags dropped together with their content.
pub fn is_non_text_tag(tag: &str) -> bool {
    NON_TEXT_TAGS.contains(&tag)
}

/// Attributes subject to the URL scheme check.
pub fn is_url_attribute(attr: &str) -> bool {
    URL_ATTRIBUTES.contains(&attr)
}

/// Scheme of an absolute URL, `None` for relative references.
fn scheme_of(url: &str) -> Option<&str> {
    let end = url.find([':', '/', '?', '#'])?;
    if url.as_bytes()[end] != b':' {
        return None;
    }
    Some(&url[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tags() {
        let policy = SanitizePolicy::default();
        assert!(policy.allows_tag("p"));
        assert!(policy.allows_tag("img"));
        assert!(!policy.allows_tag("script"));
        assert!(!policy.allows_tag("form"));
    }

    #[test]
    fn test_non_text_tags_cannot_be_allowed() {
        let mut policy = SanitizePolicy::default();
        policy.allow_tag("script").allow_tag("STYLE");
        assert!(!policy.allows_tag("script"));
        assert!(!policy.allows_tag("style"));
    }

    #[test]
    fn test_allow_and_deny_tag_case_insensitive() {
        let mut policy = SanitizePolicy::empty();
        policy.allow_tag("MARK");
        assert!(policy.allows_tag("mark"));
        policy.deny_tag("Mark");
        assert!(!policy.allows_tag("mark"));
    }

    #[test]
    fn test_attributes() {
        let policy = SanitizePolicy::default();
        assert!(policy.allows_attribute("a", "href"));
        assert!(policy.allows_attribute("img", "alt"));
        assert!(!policy.allows_attribute("p", "style"));
        assert!(!policy.allows_attribute("a", "onclick"));
    }

    #[test]
    fn test_event_handlers_never_allowed() {
        let mut policy = SanitizePolicy::default();
        policy.allow_attribute("a", "onclick");
        assert!(!policy.allows_attribute("a", "onclick"));
    }

    #[test]
    fn test_urls() {
        let policy = SanitizePolicy::default();
        assert!(policy.allows_url("https://example.com/a"));
        assert!(policy.allows_url("mailto:me@example.com"));
        assert!(policy.allows_url("/posts/a"));
        assert!(policy.allows_url("../img.png"));
        assert!(policy.allows_url("#section"));
        assert!(policy.allows_url("page?x=a:b"));
        assert!(policy.allows_url(""));

        assert!(!policy.allows_url("javascript:alert(1)"));
        assert!(!policy.allows_url("JavaScript:alert(1)"));
        assert!(!policy.allows_url(" java\tscript:alert(1)"));
        assert!(!policy.allows_url("data:text/html;base64,AAAA"));
        assert!(!policy.allows_url("vbscript:msgbox"));
    }

    #[test]
    fn test_scheme_of() {
        assert_eq!(scheme_of("https://x"), Some("https"));
        assert_eq!(scheme_of("/a:b"), None);
        assert_eq!(scheme_of("a"), None);
    }
}
