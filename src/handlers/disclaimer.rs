// src/handlers/disclaimer.rs
//
// Disclaimer shapes. A document may carry at most one disclaimer; the builder
// enforces that, these handlers only recognize and extract the block.

use crate::dom::{self, attr, selector, tag, text_of};
use crate::extract::extract_children_content;
use crate::handlers::{Context, Conversion, Handler};
use crate::schema::{Disclaimer, Element};
use crate::utils::error::{ensure_with, ErrorCode, MigrationError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

/// "Disclaimer", "*Disclaimer", "** Disclaimer:" and similar lead-ins.
pub static DISCLAIMER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*\*{0,3}\s*disclaimer\b").expect("static regex"));

static PANEL_TITLE: Lazy<Selector> = Lazy::new(|| selector(".panel-title"));
static PANEL_BODY: Lazy<Selector> = Lazy::new(|| selector(".panel-body"));

fn accordion_has_disclaimer_title(el: ElementRef<'_>) -> bool {
    el.select(&PANEL_TITLE)
        .next()
        .map(|t| DISCLAIMER_REGEX.is_match(text_of(t).trim()))
        .unwrap_or(false)
}

fn disclaimer_from_accordion(el: ElementRef<'_>) -> Result<Conversion, MigrationError> {
    let body = el
        .select(&PANEL_BODY)
        .next()
        .ok_or_else(|| {
            MigrationError::at_with(ErrorCode::EmptyElement, "Disclaimer accordion has no panel body", el)
        })?;
    let text = extract_children_content(body)?.trim().to_string();
    ensure_with(!text.is_empty(), ErrorCode::EmptyElement, "Disclaimer body is empty", el)?;
    Ok(Conversion::of(Element::Disclaimer(Disclaimer { text, link: None })))
}

/// A bare paragraph (or div/em/small) starting with the word "Disclaimer".
pub struct RegexVariant;

impl Handler for RegexVariant {
    fn name(&self) -> &'static str {
        "DisclaimerVariant_Regex"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        // An accordion-shaped disclaimer flattens to text starting with its
        // panel title, so anything carrying a panel title is left to the
        // accordion/grid variants.
        matches!(tag(el), "p" | "div" | "em" | "small")
            && DISCLAIMER_REGEX.is_match(text_of(el).trim())
            && el.select(&PANEL_TITLE).next().is_none()
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
        let text = text_of(el).trim().to_string();
        ensure_with(!text.is_empty(), ErrorCode::EmptyElement, "Disclaimer text is empty", el)?;
        Ok(Conversion::of(Element::Disclaimer(Disclaimer { text, link: None })))
    }
}

/// An accordion whose panel title is the disclaimer lead-in. Must outrank the
/// generic accordion handler.
pub struct AccordionVariant;

impl Handler for AccordionVariant {
    fn name(&self) -> &'static str {
        "DisclaimerVariant_Accordion"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        (dom::has_class(el, "twi-accordion")
            || dom::has_class(el, "ln-accordion")
            || dom::has_class(el, "panel"))
            && accordion_has_disclaimer_title(el)
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        disclaimer_from_accordion(window[0])
    }
}

/// A grid row wrapping a single disclaimer accordion.
pub struct GridOfAccordionsVariant;

impl Handler for GridOfAccordionsVariant {
    fn name(&self) -> &'static str {
        "DisclaimerVariant_GridOfAccordions"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        tag(el) == "div" && dom::has_class(el, "row") && accordion_has_disclaimer_title(el)
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        disclaimer_from_accordion(window[0])
    }
}

/// A lone anchor pointing at a dedicated disclaimer page.
pub struct LinkVariant;

impl Handler for LinkVariant {
    fn name(&self) -> &'static str {
        "DisclaimerVariant_Link"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        tag(el) == "a"
            && attr(el, "href").map(|h| h.to_ascii_lowercase().contains("disclaimer")).unwrap_or(false)
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
        let href = attr(el, "href").unwrap_or_default().to_string();
        ensure_with(!href.is_empty(), ErrorCode::EmptyElement, "Disclaimer link has no href", el)?;
        let text = text_of(el).trim().to_string();
        Ok(Conversion::of(Element::Disclaimer(Disclaimer { text, link: Some(href) })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Registry;
    use scraper::Html;

    fn convert_first(html: &str) -> Result<Conversion, MigrationError> {
        let dom = Html::parse_fragment(html);
        let node = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        let registry = Registry::standard();
        let handler = registry.dispatch(node)?;
        let window = handler.walk_to_pull_related(node);
        handler.convert(&window, &registry.context())
    }

    fn disclaimer_of(conversion: &Conversion) -> &Disclaimer {
        match &conversion.elements[0] {
            Element::Disclaimer(d) => d,
            other => panic!("expected disclaimer, got {:?}", other),
        }
    }

    #[test]
    fn starred_paragraph_is_a_disclaimer() {
        let conv = convert_first("<p>**Disclaimer: mutual funds are subject to risk.</p>").unwrap();
        let d = disclaimer_of(&conv);
        assert!(d.text.starts_with("**Disclaimer"));
        assert_eq!(d.link, None);
    }

    #[test]
    fn paragraph_mentioning_disclaimer_mid_text_is_not_matched() {
        // Must not be claimed by the regex variant; falls through to text.
        let conv = convert_first("<p>Read the disclaimer before investing.</p>").unwrap();
        assert!(matches!(conv.elements[0], Element::Text { .. }));
    }

    #[test]
    fn accordion_variant_extracts_panel_body() {
        let conv = convert_first(
            r#"<div class="twi-accordion"><div class="panel">
                <div class="panel-heading"><h2 class="panel-title"><a>Disclaimer</a></h2></div>
                <div class="panel-body"><p>Terms and conditions apply.</p></div>
            </div></div>"#,
        )
        .unwrap();
        let d = disclaimer_of(&conv);
        assert_eq!(d.text, "<p>Terms and conditions apply.</p>");
    }

    #[test]
    fn grid_wrapped_accordion_is_claimed_by_grid_variant() {
        let html = r#"<div class="row"><div class="col-md-12"><div class="ln-accordion">
            <div class="panel">
                <div class="panel-heading"><h2 class="panel-title"><a>*Disclaimer</a></h2></div>
                <div class="panel-body"><p>Subject to market risks.</p></div>
            </div>
        </div></div></div>"#;
        let dom = Html::parse_fragment(html);
        let el = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        let handler = Registry::standard().dispatch(el).unwrap();
        assert_eq!(handler.name(), "DisclaimerVariant_GridOfAccordions");
        let conv = handler
            .convert(&handler.walk_to_pull_related(el), &Registry::standard().context())
            .unwrap();
        assert_eq!(disclaimer_of(&conv).text, "<p>Subject to market risks.</p>");
    }

    #[test]
    fn regex_variant_yields_to_accordion_shapes() {
        let html = r#"<div class="twi-accordion"><div class="panel">
            <div class="panel-heading"><h2 class="panel-title"><a>Disclaimer</a></h2></div>
            <div class="panel-body"><p>Terms and conditions apply.</p></div>
        </div></div>"#;
        let dom = Html::parse_fragment(html);
        let el = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        assert!(!RegexVariant.is_capable_of_processing(el));
        let handler = Registry::standard().dispatch(el).unwrap();
        assert_eq!(handler.name(), "DisclaimerVariant_Accordion");

        // A flat disclaimer div is still the regex variant's to claim.
        let dom = Html::parse_fragment("<div>*Disclaimer: terms apply.</div>");
        let el = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        assert!(RegexVariant.is_capable_of_processing(el));
    }

    #[test]
    fn link_variant_keeps_target_url() {
        let conv =
            convert_first(r#"<a href="/general-info/disclaimer">Disclaimer</a>"#).unwrap();
        let d = disclaimer_of(&conv);
        assert_eq!(d.text, "Disclaimer");
        assert_eq!(d.link.as_deref(), Some("/general-info/disclaimer"));
    }

    #[test]
    fn empty_accordion_body_is_rejected() {
        let err = convert_first(
            r#"<div class="twi-accordion"><div class="panel">
                <div class="panel-heading"><h2 class="panel-title"><a>Disclaimer</a></h2></div>
                <div class="panel-body"></div>
            </div></div>"#,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyElement);
    }
}
