// src/handlers/references.rs
//
// References / interlinks blocks: lists of links pointing at sibling landing
// pages. Multiple blocks per document are legitimate and accumulate.

use crate::dom::{self, child_elements, first_child_element, next_element, selector, tag, text_of};
use crate::extract::extract_heading_text;
use crate::handlers::{ensure_links_extracted, link_item, Context, Conversion, Handler};
use crate::schema::{Element, LinkItem, ReferenceBlock};
use crate::utils::error::MigrationError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

/// Titles that identify a link block as a references/interlinks block.
pub static REFERENCES_TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)related|interlink|useful links|also read|other products").expect("static regex")
});

static RELATED_PRODUCTS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)related [a-z]* products?").expect("static regex"));

static ANY_HEADING: Lazy<Selector> = Lazy::new(|| selector("h2, h3, h4, h5, h6, h7"));
static LIST_LINKS: Lazy<Selector> = Lazy::new(|| selector("li > a"));
static ALL_LIST_ITEMS: Lazy<Selector> = Lazy::new(|| selector("li"));
static ANY_LINK: Lazy<Selector> = Lazy::new(|| selector("a"));
static ACCORDION: Lazy<Selector> = Lazy::new(|| selector(".twi-accordion"));
static PANEL_HEADING_LINK: Lazy<Selector> = Lazy::new(|| selector(".panel-heading a"));
static PANEL_TITLE: Lazy<Selector> = Lazy::new(|| selector(".panel-title"));
static PANEL_BODY_LINKS: Lazy<Selector> = Lazy::new(|| selector(".panel-body a"));

fn references_conversion(title: String, items: Vec<LinkItem>) -> Conversion {
    Conversion::of(Element::References(ReferenceBlock { title, items }))
}

fn collect_links<'a>(
    scope: ElementRef<'a>,
    sel: &Selector,
) -> Result<Vec<LinkItem>, MigrationError> {
    scope.select(sel).map(link_item).collect()
}

/// A `<nav>` of links; the block title is the first heading inside it.
pub struct NavVariant;

impl Handler for NavVariant {
    fn name(&self) -> &'static str {
        "ReferencesVariant_Nav"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        tag(el) == "nav"
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let nav = window[0];
        let title = match nav.select(&ANY_HEADING).next() {
            Some(h) => extract_heading_text(h)?,
            None => String::new(),
        };
        let items = collect_links(nav, &LIST_LINKS)?;
        ensure_links_extracted(&title, &items, nav)?;
        Ok(references_conversion(title, items))
    }
}

/// A "Related … products" heading followed by a table of links.
pub struct HeadingAndTableVariant;

impl Handler for HeadingAndTableVariant {
    fn name(&self) -> &'static str {
        "ReferencesVariant_HeadingAndTable"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        RELATED_PRODUCTS_REGEX.is_match(&text_of(el))
            && next_element(el).map(|n| tag(n) == "table").unwrap_or(false)
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let title = extract_heading_text(window[0])?;
        let items = collect_links(window[1], &ANY_LINK)?;
        ensure_links_extracted(&title, &items, window[1])?;
        Ok(references_conversion(title, items))
    }
}

/// `div.product-interlinks` wrapping an accordion of links.
pub struct InterlinksOfAccordionVariant;

impl Handler for InterlinksOfAccordionVariant {
    fn name(&self) -> &'static str {
        "ReferencesVariant_InterlinksOfAccordion"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        dom::has_class(el, "product-interlinks") && el.select(&ACCORDION).next().is_some()
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let el = window[0];
        let title = el
            .select(&PANEL_HEADING_LINK)
            .next()
            .map(|t| text_of(t).trim().to_string())
            .unwrap_or_default();
        let items = collect_links(el, &PANEL_BODY_LINKS)?;
        ensure_links_extracted(&title, &items, el)?;
        Ok(references_conversion(title, items))
    }
}

/// A standalone accordion whose panel title marks it as an interlinks block.
pub struct AccordionVariant;

impl Handler for AccordionVariant {
    fn name(&self) -> &'static str {
        "ReferencesVariant_Accordion"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        (dom::has_class(el, "twi-accordion") || dom::has_class(el, "ln-accordion"))
            && el
                .select(&PANEL_TITLE)
                .next()
                .map(|t| REFERENCES_TITLE_REGEX.is_match(&text_of(t)))
                .unwrap_or(false)
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let el = window[0];
        let title = el
            .select(&PANEL_TITLE)
            .next()
            .map(|t| text_of(t).trim().to_string())
            .unwrap_or_default();
        let items = collect_links(el, &PANEL_BODY_LINKS)?;
        ensure_links_extracted(&title, &items, el)?;
        Ok(references_conversion(title, items))
    }
}

/// `<p><strong>Title</strong></p>` immediately followed by a `<ul>` of links.
pub struct StrongAndListVariant;

impl StrongAndListVariant {
    fn list_is_all_links(ul: ElementRef<'_>) -> bool {
        let lis: Vec<ElementRef> = child_elements(ul).collect();
        !lis.is_empty()
            && lis.iter().all(|li| {
                first_child_element(*li).map(|c| tag(c) == "a").unwrap_or(false)
            })
    }
}

impl Handler for StrongAndListVariant {
    fn name(&self) -> &'static str {
        "ReferencesVariant_StrongAndList"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        let Some(next) = next_element(el) else { return false };
        tag(el) == "p"
            && first_child_element(el).map(|c| tag(c) == "strong").unwrap_or(false)
            && REFERENCES_TITLE_REGEX.is_match(&text_of(el))
            && tag(next) == "ul"
            && Self::list_is_all_links(next)
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let title = extract_heading_text(window[0])?;
        let items = collect_links(window[1], &LIST_LINKS)?;
        ensure_links_extracted(&title, &items, window[1])?;
        Ok(references_conversion(title, items))
    }
}

/// `div.useful-links` block: heading plus a flat set of anchors.
pub struct UsefulLinksVariant;

impl Handler for UsefulLinksVariant {
    fn name(&self) -> &'static str {
        "ReferencesVariant_UsefulLinks"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        dom::has_class(el, "useful-links")
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let el = window[0];
        let title = match el.select(&ANY_HEADING).next() {
            Some(h) => extract_heading_text(h)?,
            None => String::new(),
        };
        let items = collect_links(el, &ANY_LINK)?;
        ensure_links_extracted(&title, &items, el)?;
        Ok(references_conversion(title, items))
    }
}

/// A grid row whose columns are `<ul>`s of links under one heading.
pub struct GridOfListsVariant;

impl Handler for GridOfListsVariant {
    fn name(&self) -> &'static str {
        "ReferencesVariant_GridOfLists"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        if !(tag(el) == "div" && dom::has_class(el, "row")) {
            return false;
        }
        if el.select(&ANY_HEADING).next().is_none() {
            return false;
        }
        let linked: Vec<ElementRef> = el.select(&LIST_LINKS).collect();
        let all_items = el.select(&ALL_LIST_ITEMS).count();
        !linked.is_empty() && linked.len() == all_items
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let el = window[0];
        let title = match el.select(&ANY_HEADING).next() {
            Some(h) => extract_heading_text(h)?,
            None => String::new(),
        };
        let items = collect_links(el, &LIST_LINKS)?;
        ensure_links_extracted(&title, &items, el)?;
        Ok(references_conversion(title, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Registry;
    use crate::utils::error::ErrorCode;
    use scraper::Html;

    fn convert_first(html: &str) -> Result<Conversion, MigrationError> {
        let dom = Html::parse_fragment(html);
        let node = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        let registry = Registry::standard();
        let handler = registry.dispatch(node)?;
        let window = handler.walk_to_pull_related(node);
        handler.convert(&window, &registry.context())
    }

    fn reference_block(conversion: &Conversion) -> &ReferenceBlock {
        match &conversion.elements[0] {
            Element::References(block) => block,
            other => panic!("expected references element, got {:?}", other),
        }
    }

    #[test]
    fn nav_variant_extracts_title_and_links() {
        let conv = convert_first(
            r#"<nav><h3>Related Mutual Fund Pages</h3>
            <ul><li><a href="/elss">ELSS</a></li><li><a href="/sip">SIP</a></li></ul></nav>"#,
        )
        .unwrap();
        let block = reference_block(&conv);
        assert_eq!(block.title, "Related Mutual Fund Pages");
        assert_eq!(
            block.items,
            vec![
                LinkItem { link: "/elss".into(), title: "ELSS".into() },
                LinkItem { link: "/sip".into(), title: "SIP".into() },
            ]
        );
    }

    #[test]
    fn nav_without_links_fails_the_gate() {
        let err = convert_first("<nav><h3>Related Products</h3></nav>").unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyElement);
    }

    #[test]
    fn heading_and_table_variant_consumes_both_nodes() {
        let conv = convert_first(
            r#"<h2>Related Insurance Products</h2>
            <table><tbody><tr><td><a href="/car">Car</a></td><td><a href="/bike">Bike</a></td></tr></tbody></table>"#,
        )
        .unwrap();
        let block = reference_block(&conv);
        assert_eq!(block.items.len(), 2);
        assert_eq!(block.items[1].link, "/bike");
    }

    #[test]
    fn local_link_in_reference_list_is_rejected() {
        let err = convert_first(
            r##"<nav><h3>Related Products</h3><ul><li><a href="#top">Top</a></li></ul></nav>"##,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::LocalLink);
    }

    #[test]
    fn interlinks_accordion_variant() {
        let conv = convert_first(
            r#"<div class="product-interlinks"><div class="twi-accordion">
                <div class="panel">
                    <div class="panel-heading"><a>Other Products</a></div>
                    <div class="panel-body"><a href="/gold">Gold</a><a href="/fd">FD</a></div>
                </div>
            </div></div>"#,
        )
        .unwrap();
        let block = reference_block(&conv);
        assert_eq!(block.title, "Other Products");
        assert_eq!(block.items.len(), 2);
    }

    #[test]
    fn strong_paragraph_and_list_variant() {
        let conv = convert_first(
            r#"<p><strong>Also Read</strong></p>
            <ul><li><a href="/a">A</a></li><li><a href="/b">B</a></li></ul>"#,
        )
        .unwrap();
        let block = reference_block(&conv);
        assert_eq!(block.title, "Also Read");
        assert_eq!(block.items.len(), 2);
    }

    #[test]
    fn grid_with_unlinked_items_is_left_to_the_grid_handler() {
        let dom = Html::parse_fragment(
            r#"<div class="row"><h2>Related Pages</h2>
            <ul><li><a href="/x">X</a></li><li>plain text item</li></ul></div>"#,
        );
        let el = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        let handler = Registry::standard().dispatch(el).unwrap();
        assert_eq!(handler.name(), "GridHandler");
    }

    #[test]
    fn grid_of_lists_variant() {
        let conv = convert_first(
            r#"<div class="row"><h2>Related Pages</h2>
            <div class="col-md-6"><ul><li><a href="/x">X</a></li></ul></div>
            <div class="col-md-6"><ul><li><a href="/y">Y</a></li></ul></div></div>"#,
        )
        .unwrap();
        let block = reference_block(&conv);
        assert_eq!(block.items.len(), 2);
    }
}
