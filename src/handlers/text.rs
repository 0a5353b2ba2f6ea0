// src/handlers/text.rs

use crate::dom::{descendant_elements, tag, text_of};
use crate::extract::{extract_content_html, is_textual_node};
use crate::handlers::{Context, Conversion, Handler};
use crate::schema::Element;
use crate::utils::error::MigrationError;
use scraper::ElementRef;

/// Catch-all for flowing copy: paragraphs, lists, inline markup. Runs late so
/// the specialized shapes (FAQ lists, CTA link groups, reference lists) get
/// first refusal.
pub struct TextHandler;

impl Handler for TextHandler {
    fn name(&self) -> &'static str {
        "TextHandler"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        is_textual_node(el)
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
        let has_media = descendant_elements(el).any(|d| tag(d) == "img");
        if text_of(el).trim().is_empty() && !has_media {
            // Empty copy nodes are common author debris; note and move on.
            return Ok(Conversion {
                elements: Vec::new(),
                issues: vec!["Textual node produced no content".to_string()],
            });
        }
        let body = extract_content_html(el)?;
        Ok(Conversion::of(Element::Text { body }))
    }
}
