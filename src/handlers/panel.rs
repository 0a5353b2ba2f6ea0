// src/handlers/panel.rs
//
// Highlight panels: jumbotron banners and "key details" callout boxes. Both
// map to the same Panel element, title plus free-form body.

use crate::dom::{self, child_elements, tag};
use crate::extract::{extract_content_html, extract_heading_text, is_heading_node};
use crate::handlers::{Context, Conversion, Handler};
use crate::schema::Element;
use crate::utils::error::{ensure_with, ErrorCode, MigrationError};
use scraper::ElementRef;

fn panel_from_children(el: ElementRef<'_>) -> Result<Conversion, MigrationError> {
    let mut title = String::new();
    let mut body = String::new();
    for child in child_elements(el) {
        if title.is_empty() && is_heading_node(child) {
            title = extract_heading_text(child)?;
        } else {
            body.push_str(&extract_content_html(child)?);
        }
    }
    ensure_with(
        !title.is_empty() && !body.is_empty(),
        ErrorCode::EmptyElement,
        "Panel title/body is empty",
        el,
    )?;
    Ok(Conversion::of(Element::Panel { title, body }))
}

pub struct JumbotronVariant;

impl Handler for JumbotronVariant {
    fn name(&self) -> &'static str {
        "PanelVariant_Jumbotron"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        tag(el) == "div" && dom::has_class(el, "jumbotron")
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        panel_from_children(window[0])
    }
}

pub struct KeyDetailsVariant;

impl Handler for KeyDetailsVariant {
    fn name(&self) -> &'static str {
        "PanelVariant_KeyDetails"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        dom::has_class(el, "primary-key-details") || dom::has_class(el, "key-details")
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        panel_from_children(window[0])
    }
}
