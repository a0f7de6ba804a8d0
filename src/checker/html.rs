// src/checker/html.rs
// =============================================================================
// This module finds link candidates in HTML documents.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Is built on html5ever (Mozilla's HTML parser), so malformed markup is
//   repaired exactly the way a browser would: unclosed tags still become
//   elements, duplicate attributes are dropped after the first, etc.
//
// Instead of CSS selectors we walk the tree ourselves in document order,
// because the order candidates are found in becomes their `index`.
//
// Nothing is resolved or checked here; that's the verifier's job.
//
// Rust concepts:
// - Lifetimes: candidates borrow from the parsed document
// - impl Iterator: lazy, nothing is walked until somebody asks
// - Closures: Anonymous functions (|x| ...)
// =============================================================================

use crate::checker::link::LinkCandidate;
use crate::checker::tags::TagAttributeMap;
use scraper::node::Element;
use scraper::{ElementRef, Html};

// Elements that never have content; their opening tag is written as <x ... />
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

pub struct LinkExtractor<'m> {
    tags: &'m TagAttributeMap,
}

impl<'m> LinkExtractor<'m> {
    pub fn new(tags: &'m TagAttributeMap) -> Self {
        Self { tags }
    }

    // Lazily walks every element of the document in order and yields one
    // candidate per link attribute present.
    //
    // A link element nested in another (e.g. <q> inside <a>) gets its own
    // candidate; both see the inner text since text covers the whole subtree.
    pub fn candidates<'d>(&self, document: &'d Html) -> impl Iterator<Item = LinkCandidate> + 'd
    where
        'm: 'd,
    {
        let tags: &'d TagAttributeMap = self.tags;
        document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .flat_map(move |element| element_candidates(tags, element))
            .enumerate()
            .map(|(index, mut candidate)| {
                candidate.index = index;
                candidate
            })
    }
}

// Parses `markup` and collects all of its candidates
pub fn extract_links(markup: &str, tags: &TagAttributeMap) -> Vec<LinkCandidate> {
    let document = Html::parse_document(markup);
    LinkExtractor::new(tags).candidates(&document).collect()
}

// The first <base href="..."> of the document, if any
pub fn document_base(document: &Html) -> Option<String> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "base" && element.value().attr("href").is_some())
        .and_then(|element| element.value().attr("href").map(str::to_string))
}

fn element_candidates(tags: &TagAttributeMap, element: ElementRef<'_>) -> Vec<LinkCandidate> {
    let value = element.value();
    let attrs = tags.attributes(value.name());
    if attrs.is_empty() {
        return Vec::new();
    }

    // Only attributes actually present produce candidates
    let present: Vec<(&str, &str)> = attrs
        .iter()
        .filter_map(|name| value.attr(name).map(|v| (name.as_str(), v)))
        .collect();
    if present.is_empty() {
        return Vec::new();
    }

    let tag = opening_tag(value);
    let text = element_text(element);

    present
        .into_iter()
        .map(|(attr_name, url)| LinkCandidate {
            // Assigned by the enumerate() in candidates()
            index: 0,
            url: url.to_string(),
            tag_name: Some(value.name().to_string()),
            attr_name: Some(attr_name.to_string()),
            tag: Some(tag.clone()),
            text: text.clone(),
        })
        .collect()
}

// Rebuilds the element's own opening tag, attributes in source order
fn opening_tag(element: &Element) -> String {
    let mut tag = format!("<{}", element.name());
    for (name, value) in element.attrs() {
        tag.push(' ');
        tag.push_str(name);
        tag.push_str("=\"");
        tag.push_str(&escape_attribute(value));
        tag.push('"');
    }
    if VOID_ELEMENTS.contains(&element.name()) {
        tag.push_str("/>");
    } else {
        tag.push('>');
    }
    tag
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

// Flattened text of the subtree, None when there are no text nodes at all
fn element_text(element: ElementRef<'_>) -> Option<String> {
    let mut pieces = element.text().peekable();
    pieces.peek()?;
    Some(pieces.collect())
}
