// src/handlers/grid.rs

use crate::dom::{self, tag};
use crate::extract::extract_children_content;
use crate::handlers::{Context, Conversion, Handler};
use crate::schema::Element;
use crate::utils::error::{ensure_with, ErrorCode, MigrationError};
use scraper::ElementRef;

/// Bootstrap grid rows that survived the specialized handlers (disclaimer
/// grids, link grids). The column structure is layout, so only the content is
/// kept, flattened in reading order.
pub struct GridHandler;

impl Handler for GridHandler {
    fn name(&self) -> &'static str {
        "GridHandler"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        tag(el) == "div" && dom::has_class(el, "row")
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
        ensure_with(!body.is_empty(), ErrorCode::EmptyElement, "Grid row is empty", el)?;
        Ok(Conversion::of(Element::Grid { body }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Registry;
    use scraper::Html;

    fn convert(html: &str) -> Result<Conversion, MigrationError> {
        let dom = Html::parse_fragment(html);
        let el = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        let registry = Registry::standard();
        let handler = registry.dispatch(el)?;
        assert_eq!(handler.name(), "GridHandler");
        handler.convert(&handler.walk_to_pull_related(el), &registry.context())
    }

    #[test]
    fn columns_are_flattened_in_reading_order() {
        let conv = convert(
            r#"<div class="row">
                <div class="col-md-6"><p>left</p></div>
                <div class="col-md-6"><p>right</p></div>
            </div>"#,
        )
        .unwrap();
        assert!(matches!(
            &conv.elements[0],
            Element::Grid { body } if body == "<p>left</p><p>right</p>"
        ));
    }

    #[test]
    fn empty_row_is_rejected() {
        let err = convert(r#"<div class="row"><div class="col-md-12"></div></div>"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyElement);
    }
}
