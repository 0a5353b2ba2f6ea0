// src/extract/mod.rs
//
// Content extraction primitives: pure functions that pull semantic text/HTML
// out of a DOM subtree with strict validation. Anything outside the known
// allow-lists raises a typed error rather than being silently dropped - the
// engine never guesses.

pub mod table;

use crate::dom::{self, attr, descendant_elements, tag, text_of};
use crate::utils::error::{ErrorCode, MigrationError};
use scraper::{node::Node, ElementRef};

/// The "Updated on ..." suffix some authors appended to headings; it is a
/// rendering-time token and never part of the migrated title.
const UPDATED_ON_TOKEN: &str = "Updated on $date";

const HEADING_ALLOWED_TAGS: [&str; 2] = ["strong", "sub"];
const LINK_ALLOWED_TAGS: [&str; 4] = ["img", "picture", "p", "span"];
const TEXTUAL_TAGS: [&str; 10] = ["p", "ul", "ol", "li", "strong", "em", "a", "br", "u", "img"];

// Presentation-only attributes are dropped; everything else must be on the
// allow-list or the fragment is rejected.
const BLOCKLISTED_ATTRS: [&str; 4] = ["style", "align", "alt", "class"];
const ALLOWLISTED_ATTRS: [&str; 6] = ["id", "href", "src", "title", "data-original", "colspan"];

const VOID_TAGS: [&str; 6] = ["br", "img", "hr", "input", "source", "wbr"];

pub fn is_heading_node(el: ElementRef<'_>) -> bool {
    matches!(tag(el), "h2" | "h3" | "h4" | "h5" | "h6" | "h7")
}

// The legacy corpus genuinely contains <h7>.
pub fn is_sub_heading_node(el: ElementRef<'_>) -> bool {
    matches!(tag(el), "h3" | "h4" | "h5" | "h6" | "h7")
}

pub fn is_textual_node(el: ElementRef<'_>) -> bool {
    TEXTUAL_TAGS.contains(&tag(el))
}

pub fn is_table_node(el: ElementRef<'_>) -> bool {
    dom::has_class(el, "hungry-table")
        || dom::has_class(el, "js-hungry-table")
        || dom::has_class(el, "table")
        || dom::has_class(el, "product-hl-table")
        || tag(el) == "table"
}

/// Lazy-loaded images keep the real source in `data-original`.
pub fn extract_img_src<'a>(img: ElementRef<'a>) -> Option<&'a str> {
    attr(img, "data-original").or_else(|| attr(img, "src"))
}

/// Strips the layout-only class names (padding/positioning) authors sprinkled
/// on wrapper divs. Used by predicates that need "no meaningful class left".
pub fn strip_layout_classes(el: ElementRef<'_>) -> String {
    el.value()
        .classes()
        .filter(|c| {
            let layout = c.starts_with("lt-pad")
                || c.starts_with("rt-pad")
                || c.starts_with("btm-pad")
                || c.starts_with("top-pad")
                || c.starts_with("pad-")
                || matches!(*c, "text-center" | "text-right" | "text-left" | "pull-left" | "pull-right");
            !layout
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the trimmed text of a heading node. The node may only contain
/// `strong`/`sub` wrappers; any other descendant is a hard error.
pub fn extract_heading_text(el: ElementRef<'_>) -> Result<String, MigrationError> {
    for d in descendant_elements(el) {
        if !HEADING_ALLOWED_TAGS.contains(&tag(d)) {
            return Err(MigrationError::at_with(
                ErrorCode::HeadingHasChildren,
                format!("Found {} inside", tag(d)),
                el,
            ));
        }
    }
    Ok(text_of(el).replace(UPDATED_ON_TOKEN, "").trim().to_string())
}

/// Returns the trimmed text of a link, allowing the image/caption wrappers
/// authors used inside anchors.
pub fn extract_link_text(el: ElementRef<'_>) -> Result<String, MigrationError> {
    for d in descendant_elements(el) {
        if !LINK_ALLOWED_TAGS.contains(&tag(d)) {
            return Err(MigrationError::at_with(
                ErrorCode::HeadingHasChildren,
                format!("Found {} inside", tag(d)),
                el,
            ));
        }
    }
    Ok(text_of(el).trim().to_string())
}

/// Recursive, node-kind-dispatched content extraction: the content-side
/// analogue of a recursive-descent parser.
pub fn extract_content_html(el: ElementRef<'_>) -> Result<String, MigrationError> {
    let html = if is_textual_node(el) {
        validate_textual_descendants(el)?;
        cleansed_html(el)?
    } else if is_table_node(el) {
        table::extract_table_html(el)?
    } else if tag(el) == "div" {
        extract_children_content(el)?
    } else if tag(el) == "td" {
        cleansed_inner_html(el)?
    } else if is_sub_heading_node(el) {
        let inner = extract_children_content(el)?;
        if inner.starts_with("<strong>") {
            inner
        } else {
            format!("<strong>{}</strong>", inner.trim())
        }
    } else {
        return Err(MigrationError::at(ErrorCode::NonContentNode, el));
    };
    Ok(html.trim().to_string())
}

/// Extracts and concatenates the content of every child node (text included).
pub fn extract_children_content(el: ElementRef<'_>) -> Result<String, MigrationError> {
    let mut out = String::new();
    for node in el.children() {
        if let Some(child) = ElementRef::wrap(node) {
            out.push_str(&extract_content_html(child)?);
        } else if let Node::Text(text) = node.value() {
            if !text.trim().is_empty() {
                push_escaped_text(&mut out, text);
            }
        }
    }
    Ok(out)
}

fn validate_textual_descendants(el: ElementRef<'_>) -> Result<(), MigrationError> {
    for d in descendant_elements(el) {
        if !is_textual_node(d) {
            return Err(MigrationError::at_with(
                ErrorCode::NonContentNode,
                format!("Found {} inside", tag(d)),
                el,
            ));
        }
    }
    Ok(())
}

/// Re-serializes `el` (tag included) with presentation attributes dropped and
/// everything left validated against the attribute allow-list.
pub fn cleansed_html(el: ElementRef<'_>) -> Result<String, MigrationError> {
    let mut out = String::new();
    write_cleansed_element(el, el, &mut out)?;
    Ok(out)
}

/// Same cleansing, children only (used for `td` cell bodies).
pub fn cleansed_inner_html(el: ElementRef<'_>) -> Result<String, MigrationError> {
    let mut out = String::new();
    write_cleansed_children(el, el, &mut out)?;
    Ok(out)
}

// The scraper tree is immutable, so cleansing is a validating serializer
// rather than in-place attribute removal. `root` is the node reported in any
// error fragment (the closest meaningful ancestor, per the error contract).
fn write_cleansed_element(
    el: ElementRef<'_>,
    root: ElementRef<'_>,
    out: &mut String,
) -> Result<(), MigrationError> {
    let name = tag(el);

    let mut unknown: Vec<&str> = el
        .value()
        .attrs()
        .map(|(k, _)| k)
        .filter(|k| !BLOCKLISTED_ATTRS.contains(k) && !ALLOWLISTED_ATTRS.contains(k))
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        return Err(MigrationError::at_with(
            ErrorCode::UnknownAttribute,
            format!("Unknown attribute given - {}", unknown.join(",")),
            root,
        ));
    }

    if name == "a" {
        if let Some(href) = attr(el, "href") {
            if href.contains('#') {
                return Err(MigrationError::at_with(ErrorCode::LocalLink, "Local link used", root));
            }
        }
    }

    out.push('<');
    out.push_str(name);
    // Allow-list order keeps the emitted attribute order byte-deterministic.
    for attr_name in ALLOWLISTED_ATTRS {
        // Lazy-loaded images are normalized: the real source wins, the
        // placeholder and the data-original carrier are dropped.
        let value = if name == "img" {
            match attr_name {
                "src" => extract_img_src(el),
                "data-original" => None,
                _ => attr(el, attr_name),
            }
        } else {
            attr(el, attr_name)
        };
        if let Some(value) = value {
            out.push(' ');
            out.push_str(attr_name);
            out.push_str("=\"");
            push_escaped_attr(out, value);
            out.push('"');
        }
    }
    out.push('>');

    if VOID_TAGS.contains(&name) {
        return Ok(());
    }

    write_cleansed_children(el, root, out)?;

    out.push_str("</");
    out.push_str(name);
    out.push('>');
    Ok(())
}

fn write_cleansed_children(
    el: ElementRef<'_>,
    root: ElementRef<'_>,
    out: &mut String,
) -> Result<(), MigrationError> {
    for node in el.children() {
        if let Some(child) = ElementRef::wrap(node) {
            write_cleansed_element(child, root, out)?;
        } else if let Node::Text(text) = node.value() {
            push_escaped_text(out, text);
        }
    }
    Ok(())
}

fn push_escaped_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
