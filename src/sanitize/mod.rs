//! HTML sanitizer for feed content.
//!
//! Parses rendered post HTML with `tl` and re-serializes only what the
//! [`SanitizePolicy`] allows:
//!
//! - allowed tags are kept with their allowed attributes
//! - non-text tags (`script`, `style`, ...) are dropped with their content
//! - any other tag is unwrapped (children kept)
//! - comments are dropped
//!
//! Text and attribute values are decoded then re-escaped, which makes
//! `sanitize` idempotent. Characters XML 1.0 forbids are dropped, so the
//! output can always be embedded in the feed.

mod policy;

pub use policy::SanitizePolicy;
use policy::{is_non_text_tag, is_url_attribute};

use crate::utils::html::{escape, escape_attr, is_void_element, strip_non_xml, unescape};

/// Sanitize an HTML fragment. Never fails; unparsable input yields `""`.
pub fn sanitize(html: &str, policy: &SanitizePolicy) -> String {
    let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
        return String::new();
    };

    let parser = dom.parser();
    let mut out = String::with_capacity(html.len());
    for handle in dom.children() {
        write_node(*handle, parser, policy, &mut out);
    }
    out
}

/// Serialize one node (and its subtree) into `out`.
fn write_node(
    handle: tl::NodeHandle,
    parser: &tl::Parser,
    policy: &SanitizePolicy,
    out: &mut String,
) {
    let Some(node) = handle.get(parser) else {
        return;
    };

    match node {
        tl::Node::Tag(tag) => write_tag(tag, parser, policy, out),
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str();
            out.push_str(&escape(&strip_non_xml(&unescape(&text))));
        }
        tl::Node::Comment(_) => {}
    }
}

fn write_tag(tag: &tl::HTMLTag, parser: &tl::Parser, policy: &SanitizePolicy, out: &mut String) {
    let name = tag.name().as_utf8_str().to_ascii_lowercase();

    if is_non_text_tag(&name) {
        return;
    }

    let keep = policy.allows_tag(&name);
    if keep {
        out.push('<');
        out.push_str(&name);
        write_attributes(tag, &name, policy, out);
        out.push('>');
    }

    // Void elements get no closing tag; anything nested under one by a
    // lenient parse is emitted after it.
    for child in tag.children().top().iter() {
        write_node(*child, parser, policy, out);
    }

    if keep && !is_void_element(&name) {
        out.push_str("</");
        out.push_str(&name);
        out.push('>');
    }
}

/// Write allowed attributes, sorted by name for stable output.
fn write_attributes(tag: &tl::HTMLTag, name: &str, policy: &SanitizePolicy, out: &mut String) {
    let mut attrs: Vec<(String, String)> = tag
        .attributes()
        .iter()
        .filter_map(|(key, value)| {
            let key = key.to_ascii_lowercase();
            if !policy.allows_attribute(name, &key) {
                return None;
            }
            let value = value
                .map(|v| strip_non_xml(&unescape(&v)).into_owned())
                .unwrap_or_default();
            if is_url_attribute(&key) && !policy.allows_url(&value) {
                return None;
            }
            Some((key, value))
        })
        .collect();

    attrs.sort_by(|a, b| a.0.cmp(&b.0));
    attrs.dedup_by(|a, b| a.0 == b.0);

    for (key, value) in attrs {
        out.push(' ');
        out.push_str(&key);
        out.push_str("=\"");
        out.push_str(&escape_attr(&value));
        out.push('"');
    }
}
