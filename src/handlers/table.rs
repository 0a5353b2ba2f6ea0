// src/handlers/table.rs

use crate::dom::{self, selector, tag};
use crate::extract::{is_table_node, table::extract_table_html};
use crate::handlers::{Context, Conversion, Handler};
use crate::schema::Element;
use crate::utils::error::MigrationError;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static INNER_TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));

/// Data tables, bare or inside the responsive/marker-classed wrappers.
pub struct TableHandler;

impl Handler for TableHandler {
    fn name(&self) -> &'static str {
        "TableHandler"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        is_table_node(el)
            || (tag(el) == "div"
                && dom::has_class(el, "table-responsive")
                && el.select(&INNER_TABLE).next().is_some())
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let body = extract_table_html(window[0])?;
        Ok(Conversion::of(Element::Table { body }))
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
        assert_eq!(handler.name(), "TableHandler");
        handler.convert(&handler.walk_to_pull_related(el), &registry.context())
    }

    #[test]
    fn bare_table_is_normalized() {
        let conv = convert(
            "<table><thead><tr><th>Fund</th></tr></thead><tbody><tr><td>Bluechip</td></tr></tbody></table>",
        )
        .unwrap();
        assert!(matches!(
            &conv.elements[0],
            Element::Table { body }
                if body == "<table><thead><tr><th>Fund</th></tr></thead><tbody><tr><td>Bluechip</td></tr></tbody></table>"
        ));
    }

    #[test]
    fn responsive_wrapper_is_claimed_too() {
        let conv = convert(
            r#"<div class="table-responsive"><table><tbody><tr><td>x</td></tr></tbody></table></div>"#,
        )
        .unwrap();
        assert!(matches!(&conv.elements[0], Element::Table { .. }));
    }
}
