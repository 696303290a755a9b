//! Streaming fragment parsers for the editor's server-rendered markup
//!
//! The editor answers listing and detail calls with HTML fragments, not
//! well-formed documents: closing tags may be omitted and attributes follow
//! HTML rather than XML rules. The parsers here therefore run on a lenient
//! `quick-xml` event reader and track nesting with plain depth counters
//! instead of building a DOM.
//!
//! Leniency is a contract, not an accident: an element missing an expected
//! attribute is "not applicable" and is skipped, and a reader error ends the
//! scan of the fragment. Neither ever becomes an `Err`. The flip side is that
//! a silently partial listing is indistinguishable from "no matches" when the
//! remote markup drifts; callers should keep that in mind.

mod detail;
mod listers;

pub use detail::item_detail;
pub use listers::{list_items, list_pages, list_simple_media, list_works};

use quick_xml::events::{BytesRef, BytesStart, BytesText};
use quick_xml::Reader;
use regex::Regex;
use std::sync::OnceLock;

/// Split a `group[field]` form-field name into its two components.
///
/// The pattern is anchored at the start; deeper suffixes such as
/// `meta[title][en]` still yield `("meta", "title")`.
pub fn split_bracket(name: &str) -> Option<(&str, &str)> {
    static BRACKET_RE: OnceLock<Regex> = OnceLock::new();
    let re = BRACKET_RE.get_or_init(|| Regex::new(r"^([^\[]+)\[([^\]]+)\]").expect("valid pattern"));
    let caps = re.captures(name)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Reader tuned for the editor's HTML fragments
pub(crate) fn fragment_reader(html: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.allow_dangling_amp = true;
    config.check_comments = false;
    reader
}

/// Case-insensitive tag-name comparison (the markup mixes cases freely)
pub(crate) fn tag_is(name: &[u8], expected: &[u8]) -> bool {
    name.eq_ignore_ascii_case(expected)
}

/// Attribute value by name, `None` when absent or unreadable
pub(crate) fn attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.html_attributes()
        .flatten()
        .find(|a| a.key.as_ref().eq_ignore_ascii_case(name))
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Is the attribute present at all (HTML boolean attributes like `checked`)?
pub(crate) fn has_attr(e: &BytesStart, name: &[u8]) -> bool {
    e.html_attributes()
        .flatten()
        .any(|a| a.key.as_ref().eq_ignore_ascii_case(name))
}

/// Character data of a text event, raw bytes as fallback
pub(crate) fn text_chunk(e: &BytesText) -> String {
    match e.decode() {
        Ok(cow) => cow.into_owned(),
        Err(_) => String::from_utf8_lossy(e).into_owned(),
    }
}

/// Resolve a general reference event (`&#233;`, `&amp;`, ...) to text.
/// Unknown entity names are dropped, in line with the lenient policy.
pub(crate) fn ref_chunk(e: &BytesRef) -> Option<String> {
    if let Ok(Some(ch)) = e.resolve_char_ref() {
        return Some(ch.to_string());
    }
    let named = match &**e {
        b"amp" => "&",
        b"lt" => "<",
        b"gt" => ">",
        b"quot" => "\"",
        b"apos" => "'",
        b"nbsp" => " ",
        _ => return None,
    };
    Some(named.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bracket() {
        assert_eq!(split_bracket("style[left]"), Some(("style", "left")));
        assert_eq!(split_bracket("meta[title][en]"), Some(("meta", "title")));
        assert_eq!(split_bracket("research"), None);
        assert_eq!(split_bracket("[oops]"), None);
    }
}
