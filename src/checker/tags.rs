// src/checker/tags.rs
// =============================================================================
// Which HTML elements carry links, and in which attributes.
//
// The table is an explicit value handed to the extractor, so callers can
// check a narrower (or wider) set of elements than the standard one.
//
// Attribute order matters: when an element has several link attributes,
// candidates are produced in the order listed here.
// =============================================================================

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAttributeMap {
    tags: HashMap<String, Vec<String>>,
}

// (tag, attributes) pairs for the standard table
const STANDARD_TAGS: &[(&str, &[&str])] = &[
    ("a", &["href"]),
    ("area", &["href"]),
    ("audio", &["src"]),
    ("blockquote", &["cite"]),
    ("del", &["cite"]),
    ("embed", &["src"]),
    ("frame", &["src", "longdesc"]),
    ("iframe", &["src", "longdesc"]),
    ("img", &["src", "longdesc"]),
    ("input", &["src"]),
    ("ins", &["cite"]),
    ("link", &["href"]),
    ("menuitem", &["icon"]),
    ("object", &["data"]),
    ("q", &["cite"]),
    ("script", &["src"]),
    ("source", &["src"]),
    ("track", &["src"]),
    ("video", &["src", "poster"]),
];

impl TagAttributeMap {
    /// Builds a table from (tag, attributes) pairs.
    /// Names are stored lowercase; a repeated tag replaces the earlier entry.
    pub fn new<T, A, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, Vec<A>)>,
        T: Into<String>,
        A: Into<String>,
    {
        let tags = entries
            .into_iter()
            .map(|(tag, attrs)| {
                let attrs = attrs
                    .into_iter()
                    .map(|a| Into::<String>::into(a).to_ascii_lowercase())
                    .collect();
                (Into::<String>::into(tag).to_ascii_lowercase(), attrs)
            })
            .collect();
        Self { tags }
    }

    /// Anchors, media sources, long descriptions, citations, etc.
    pub fn standard() -> Self {
        Self::new(
            STANDARD_TAGS
                .iter()
                .map(|(tag, attrs)| (*tag, attrs.to_vec())),
        )
    }

    /// Link attributes for a tag, in candidate order. Empty for unknown tags.
    pub fn attributes(&self, tag_name: &str) -> &[String] {
        self.tags
            .get(tag_name)
            .or_else(|| self.tags.get(&tag_name.to_ascii_lowercase()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, tag_name: &str) -> bool {
        !self.attributes(tag_name).is_empty()
    }
}

impl Default for TagAttributeMap {
    fn default() -> Self {
        Self::standard()
    }
}
