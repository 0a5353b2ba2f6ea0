// src/walker.rs
//
// Top-level conversion driver for one document: parse the legacy fragment,
// walk its top-level element runs through the registry, feed the resulting
// element stream to the builder. Fail-fast: the first typed error aborts the
// document.

use crate::builder::{BuildMode, DocBuilder};
use crate::handlers::Registry;
use crate::schema::{ConvertedDocument, Issue};
use crate::utils::error::MigrationError;
use scraper::{ElementRef, Html};

pub fn convert_document(
    html: &str,
    mode: BuildMode,
) -> Result<ConvertedDocument, MigrationError> {
    let dom = Html::parse_fragment(html);
    let nodes: Vec<ElementRef> =
        dom.root_element().children().filter_map(ElementRef::wrap).collect();

    let registry = Registry::standard();
    let ctx = registry.context();
    let mut builder = DocBuilder::new(mode);

    let mut cursor = 0;
    while cursor < nodes.len() {
        let el = nodes[cursor];
        let handler = registry.dispatch(el)?;
        let window = handler.walk_to_pull_related(el);
        tracing::debug!(
            handler = handler.name(),
            window = window.len(),
            "converting top-level run"
        );
        let conversion = handler.convert(&window, &ctx)?;
        for element in conversion.elements {
            builder.add(element)?;
        }
        for message in conversion.issues {
            builder.add_issue(Issue { message, fragment: el.html() });
        }
        cursor += window.len();
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ConversionStatus, Element};
    use crate::utils::error::ErrorCode;

    const FAQ_PAGE: &str = r#"
        <h1>Term Insurance</h1>
        <h2>Why buy term insurance</h2>
        <p>It is the cheapest protection.</p>
        <h2>FAQ</h2>
        <p><strong>What is a term plan?</strong></p>
        <p>Pure protection, no maturity benefit.</p>
        <p><strong>Who should buy one?</strong></p>
        <p>Anyone with dependents.</p>
    "#;

    #[test]
    fn title_heading_and_copy_produce_a_structured_document() {
        let out = convert_document(FAQ_PAGE, BuildMode::Strict).unwrap();
        assert_eq!(out.status, ConversionStatus::Success);
        assert_eq!(out.document.title, "Term Insurance");
        // The FAQ block joins the open section rather than starting one.
        assert_eq!(out.document.sections.len(), 1);
        assert_eq!(out.document.sections[0].title, "Why buy term insurance");
        assert!(matches!(
            &out.document.sections[0].elements[0],
            Element::Text { body } if body == "<p>It is the cheapest protection.</p>"
        ));
    }

    #[test]
    fn faq_block_lands_in_slot_and_section_flow() {
        let out = convert_document(FAQ_PAGE, BuildMode::Strict).unwrap();
        let faq = out.document.faq.as_ref().expect("faq slot should be filled");
        assert_eq!(faq.title, "FAQ");
        assert_eq!(faq.items.len(), 2);
        assert_eq!(faq.items[0].question, "What is a term plan?");
        assert_eq!(faq.items[0].answer, "<p>Pure protection, no maturity benefit.</p>");
        // The same block also appears where it sat in reading order.
        let in_flow = out
            .document
            .sections
            .iter()
            .flat_map(|s| &s.elements)
            .any(|e| matches!(e, Element::Faq(b) if b.title == "FAQ"));
        assert!(in_flow);
    }

    #[test]
    fn conversion_is_deterministic() {
        let a = serde_json::to_string(&convert_document(FAQ_PAGE, BuildMode::Strict).unwrap())
            .unwrap();
        let b = serde_json::to_string(&convert_document(FAQ_PAGE, BuildMode::Strict).unwrap())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unclaimed_node_aborts_the_document() {
        let err = convert_document(
            r#"<p>fine</p><object class="flash-widget"></object>"#,
            BuildMode::Strict,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownTag);
        assert!(err.message.unwrap().contains("object.flash-widget"));
    }

    #[test]
    fn second_disclaimer_fails_strict_but_degrades_lenient() {
        let html = r#"
            <p>*Disclaimer: first version.</p>
            <p>*Disclaimer: second version.</p>
        "#;
        let err = convert_document(html, BuildMode::Strict).unwrap_err();
        assert_eq!(err.code, ErrorCode::MultipleDisclaimer);

        let out = convert_document(html, BuildMode::Lenient).unwrap();
        assert_eq!(out.status, ConversionStatus::Warning);
        assert_eq!(
            out.document.disclaimer.as_ref().unwrap().text,
            "*Disclaimer: first version."
        );
    }

    #[test]
    fn skipped_debris_degrades_status_to_warning() {
        let out = convert_document("<p>content</p><hr>", BuildMode::Strict).unwrap();
        assert_eq!(out.status, ConversionStatus::Warning);
        assert_eq!(out.issues.len(), 1);
        assert!(out.issues[0].fragment.contains("hr"));
    }

    #[test]
    fn empty_input_builds_an_empty_success_document() {
        let out = convert_document("", BuildMode::Strict).unwrap();
        assert_eq!(out.status, ConversionStatus::Success);
        assert!(out.document.sections.is_empty());
        assert_eq!(out.document.title, "");
    }
}
