// src/handlers/blockquote.rs

use crate::dom::tag;
use crate::extract::extract_children_content;
use crate::handlers::{Context, Conversion, Handler};
use crate::schema::Element;
use crate::utils::error::{ensure_with, ErrorCode, MigrationError};
use scraper::ElementRef;

pub struct BlockquoteHandler;

impl Handler for BlockquoteHandler {
    fn name(&self) -> &'static str {
        "BlockquoteHandler"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        tag(el) == "blockquote"
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
        let body = extract_children_content(el)?.trim().to_string();
        ensure_with(!body.is_empty(), ErrorCode::EmptyElement, "Blockquote is empty", el)?;
        Ok(Conversion::of(Element::Blockquote { body }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Registry;
    use scraper::Html;

    #[test]
    fn blockquote_body_is_extracted() {
        let dom = Html::parse_fragment("<blockquote><p>Save first, spend later.</p></blockquote>");
        let el = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        let registry = Registry::standard();
        let conv = BlockquoteHandler.convert(&[el], &registry.context()).unwrap();
        assert!(matches!(
            &conv.elements[0],
            Element::Blockquote { body } if body == "<p>Save first, spend later.</p>"
        ));
    }

    #[test]
    fn empty_blockquote_is_rejected() {
        let dom = Html::parse_fragment("<blockquote>   </blockquote>");
        let el = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        let registry = Registry::standard();
        let err = BlockquoteHandler.convert(&[el], &registry.context()).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyElement);
    }
}
