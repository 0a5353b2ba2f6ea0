// src/handlers/section.rs
//
// Structural pseudo-elements: the page <h1> becomes the document title, any
// other top-level heading opens a new section. Neither carries content of its
// own; the builder interprets them.

use crate::dom::tag;
use crate::extract::{extract_heading_text, is_heading_node};
use crate::handlers::{Context, Conversion, Handler};
use crate::schema::Element;
use crate::utils::error::MigrationError;
use scraper::ElementRef;

pub struct TitleHandler;

impl Handler for TitleHandler {
    fn name(&self) -> &'static str {
        "TitleHandler"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        tag(el) == "h1"
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let text = extract_heading_text(window[0])?;
        Ok(Conversion::of(Element::Title { text }))
    }
}

pub struct SectionHandler;

impl Handler for SectionHandler {
    fn name(&self) -> &'static str {
        "SectionHandler"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        is_heading_node(el)
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let title = extract_heading_text(window[0])?;
        Ok(Conversion::of(Element::Section { title }))
    }
}
