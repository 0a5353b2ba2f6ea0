// src/handlers/cta.rs
//
// Call-to-action shapes: button-styled links and link groups steering the
// reader toward a product page. Unlike references these may be title-less.

use crate::dom::{self, child_elements, first_child_element, selector, tag};
use crate::extract::extract_heading_text;
use crate::handlers::{link_item, Context, Conversion, Handler};
use crate::schema::{CtaBlock, Element, LinkItem};
use crate::utils::error::{ensure_with, ErrorCode, MigrationError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static ANY_HEADING: Lazy<Selector> = Lazy::new(|| selector("h2, h3, h4, h5, h6, h7"));
static ANY_LINK: Lazy<Selector> = Lazy::new(|| selector("a"));
static LIST_LINKS: Lazy<Selector> = Lazy::new(|| selector("li > a"));

fn ensure_cta_links(items: &[LinkItem], el: ElementRef<'_>) -> Result<(), MigrationError> {
    ensure_with(
        !items.is_empty() && items.iter().all(|i| !i.link.is_empty()),
        ErrorCode::EmptyElement,
        "CTA block matched but extracted no usable links",
        el,
    )
}

fn cta_conversion(title: Option<String>, items: Vec<LinkItem>) -> Conversion {
    Conversion::of(Element::Cta(CtaBlock { title, items }))
}

/// A single button-styled anchor sitting on its own.
pub struct LonelyLinkVariant;

impl Handler for LonelyLinkVariant {
    fn name(&self) -> &'static str {
        "CTAVariant_LonelyLink"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        tag(el) == "a"
            && (dom::has_class(el, "btn")
                || dom::has_class(el, "btn-primary")
                || dom::has_class(el, "cta-button"))
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
        let items = vec![link_item(el)?];
        ensure_cta_links(&items, el)?;
        Ok(cta_conversion(None, items))
    }
}

/// A dedicated CTA container, optionally led by a heading.
pub struct CtaSectionVariant;

impl Handler for CtaSectionVariant {
    fn name(&self) -> &'static str {
        "CTAVariant_Section"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        dom::has_class(el, "cta-section") || dom::has_class(el, "lp-cta")
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
            Some(h) => {
                let text = extract_heading_text(h)?;
                (!text.is_empty()).then_some(text)
            }
            None => None,
        };
        let items: Vec<LinkItem> =
            el.select(&ANY_LINK).map(link_item).collect::<Result<_, _>>()?;
        ensure_cta_links(&items, el)?;
        Ok(cta_conversion(title, items))
    }
}

/// `<ul class="list-group">` where every item is a bare link.
pub struct ListGroupUlVariant;

impl Handler for ListGroupUlVariant {
    fn name(&self) -> &'static str {
        "CTAVariant_ListGroupUl"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        if !(tag(el) == "ul" && dom::has_class(el, "list-group")) {
            return false;
        }
        let lis: Vec<ElementRef> = child_elements(el).collect();
        !lis.is_empty()
            && lis
                .iter()
                .all(|li| first_child_element(*li).map(|c| tag(c) == "a").unwrap_or(false))
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
        let items: Vec<LinkItem> =
            el.select(&LIST_LINKS).map(link_item).collect::<Result<_, _>>()?;
        ensure_cta_links(&items, el)?;
        Ok(cta_conversion(None, items))
    }
}

/// `<div class="list-group">` of paragraphs, one link per paragraph.
pub struct ListGroupPVariant;

impl Handler for ListGroupPVariant {
    fn name(&self) -> &'static str {
        "CTAVariant_ListGroupP"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        if !(tag(el) == "div" && dom::has_class(el, "list-group")) {
            return false;
        }
        let ps: Vec<ElementRef> = child_elements(el).collect();
        !ps.is_empty()
            && ps.iter().all(|p| {
                tag(*p) == "p" && child_elements(*p).filter(|c| tag(*c) == "a").count() == 1
            })
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
        let items: Vec<LinkItem> =
            el.select(&ANY_LINK).map(link_item).collect::<Result<_, _>>()?;
        ensure_cta_links(&items, el)?;
        Ok(cta_conversion(None, items))
    }
}
