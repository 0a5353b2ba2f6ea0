// src/handlers/accordion.rs
//
// Generic collapsible accordions. Panels whose title matches the FAQ heading
// pattern are converted to FAQ blocks instead; the two kinds can coexist in
// one accordion.

use crate::dom::{self, selector, text_of};
use crate::extract::extract_children_content;
use crate::handlers::faq::{FaqInsideAccordionPanel, FAQ_HEADING_REGEX};
use crate::handlers::{Context, Conversion, Handler};
use crate::schema::Element;
use crate::utils::error::{ensure_with, ErrorCode, MigrationError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static PANELS: Lazy<Selector> = Lazy::new(|| selector(".panel"));
static PANEL_TITLE: Lazy<Selector> = Lazy::new(|| selector(".panel-title"));
static PANEL_BODY: Lazy<Selector> = Lazy::new(|| selector(".panel-body"));

pub struct AccordionHandler;

impl Handler for AccordionHandler {
    fn name(&self) -> &'static str {
        "AccordionHandler"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        dom::has_class(el, "twi-accordion")
            || dom::has_class(el, "ln-accordion")
            || dom::has_class(el, "panel-group")
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
        let panels: Vec<ElementRef> = el.select(&PANELS).collect();
        ensure_with(
            !panels.is_empty(),
            ErrorCode::EmptyElement,
            "Accordion has no panels",
            el,
        )?;

        let mut out = Conversion::default();
        for panel in panels {
            let title = panel
                .select(&PANEL_TITLE)
                .next()
                .map(|t| text_of(t).trim().to_string())
                .unwrap_or_default();
            if FAQ_HEADING_REGEX.is_match(&title) {
                out.merge(FaqInsideAccordionPanel::convert_panel(panel)?);
                continue;
            }
            let body = panel.select(&PANEL_BODY).next().ok_or_else(|| {
                MigrationError::at_with(ErrorCode::EmptyElement, "Accordion panel has no body", panel)
            })?;
            let body = extract_children_content(body)?.trim().to_string();
            ensure_with(
                !title.is_empty() && !body.is_empty(),
                ErrorCode::EmptyElement,
                "Accordion panel title/body is empty",
                panel,
            )?;
            out.elements.push(Element::Accordion { title, body });
        }
        Ok(out)
    }
}
