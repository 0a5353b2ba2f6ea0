// src/dom/mod.rs
//
// Thin traversal helpers over scraper's ElementRef. Handlers and extraction
// primitives only ever need tag names, classes, element-level children/sibling
// navigation and a couple of diagnostic renderings; keeping those behind small
// functions keeps the rest of the crate independent of scraper quirks.

use scraper::{ElementRef, Selector};

/// Compiles a selector that is known-good at build time.
/// Only ever called on string literals inside `Lazy` statics.
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("Failed to compile selector '{}': {:?}", css, e))
}

pub fn tag(el: ElementRef<'_>) -> &str {
    el.value().name()
}

pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

/// Element-only children, the way cheerio's `children()` behaves
/// (whitespace and comment nodes are not walkable).
pub fn child_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.children().filter_map(ElementRef::wrap)
}

pub fn first_child_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    child_elements(el).next()
}

pub fn child_count(el: ElementRef<'_>) -> usize {
    child_elements(el).count()
}

/// The next element sibling, skipping intervening text nodes.
pub fn next_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// All element siblings after `el`, in document order.
pub fn following_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.next_siblings().filter_map(ElementRef::wrap)
}

/// Proper descendants of `el` (self excluded).
pub fn descendant_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Whole text content of the subtree, concatenated.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>()
}

/// A `tag.class1.class2` fingerprint, used in UNKNOWN_TAG diagnostics.
pub fn node_name(el: ElementRef<'_>) -> String {
    let mut name = tag(el).to_string();
    for class in el.value().classes() {
        name.push('.');
        name.push_str(class);
    }
    name
}

/// Ancestor path down to `el` (`div.row -> div.col-md-6 -> p`), body/root excluded.
pub fn path_to(el: ElementRef<'_>) -> String {
    let mut names: Vec<String> = el
        .ancestors()
        .filter_map(ElementRef::wrap)
        .filter(|a| !matches!(tag(*a), "html" | "body"))
        .map(node_name)
        .collect();
    names.reverse();
    names.push(node_name(el));
    names.join(" -> ")
}
