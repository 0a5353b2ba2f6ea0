// src/handlers/mod.rs
//
// The handler catalog: every structural markup idiom the legacy corpus uses is
// recognized by exactly one handler. Handlers are stateless, registered once
// in a fixed priority order (more specific shapes first), and dispatched
// first-match-wins. A node no handler claims is a hard UNKNOWN_TAG.

pub mod accordion;
pub mod blockquote;
pub mod cta;
pub mod disclaimer;
pub mod fallback;
pub mod faq;
pub mod grid;
pub mod media;
pub mod panel;
pub mod references;
pub mod section;
pub mod table;
pub mod text;

use crate::dom::{self, attr, node_name, path_to};
use crate::extract::extract_link_text;
use crate::schema::{Element, LinkItem};
use crate::utils::error::{ensure_with, ErrorCode, MigrationError};
use once_cell::sync::Lazy;
use scraper::ElementRef;

/// The output of one handler invocation: structured elements plus any
/// non-fatal notes for reviewers.
#[derive(Debug, Default)]
pub struct Conversion {
    pub elements: Vec<Element>,
    pub issues: Vec<String>,
}

impl Conversion {
    pub fn of(element: Element) -> Self {
        Self { elements: vec![element], issues: Vec::new() }
    }

    pub fn merge(&mut self, other: Conversion) {
        self.elements.extend(other.elements);
        self.issues.extend(other.issues);
    }
}

/// One registered capability: shape test, sibling-window extraction,
/// conversion to structured element(s).
pub trait Handler: Send + Sync {
    /// Stable identifier used in logs.
    fn name(&self) -> &'static str;

    /// Pure structural predicate, evaluated against the first node of an
    /// unconsumed run. Must be side-effect-free.
    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool;

    /// The contiguous sibling window this handler consumes. Defaults to the
    /// matched node plus its next sibling; handlers needing a single node or a
    /// variable-width run override this.
    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let mut window = vec![el];
        window.extend(dom::next_element(el));
        window
    }

    /// Pure conversion of the window. Must fail with a typed error rather
    /// than return a partial result.
    fn convert(
        &self,
        window: &[ElementRef<'_>],
        ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError>;
}

/// Passed to converters so composite handlers can re-dispatch nested content
/// through the registry (e.g. container unwrapping).
pub struct Context<'r> {
    registry: &'r Registry,
}

impl<'r> Context<'r> {
    /// Runs the dispatch/window/convert loop over an arbitrary node run,
    /// concatenating the results. Consumption rules match the top-level walk.
    pub fn convert_sequence(
        &self,
        nodes: &[ElementRef<'_>],
    ) -> Result<Conversion, MigrationError> {
        let mut out = Conversion::default();
        let mut cursor = 0;
        while cursor < nodes.len() {
            let el = nodes[cursor];
            let handler = self.registry.dispatch(el)?;
            let window = handler.walk_to_pull_related(el);
            tracing::trace!(handler = handler.name(), window = window.len(), "nested dispatch");
            out.merge(handler.convert(&window, self)?);
            cursor += window.len();
        }
        Ok(out)
    }
}

/// Ordered, process-wide, read-only handler registry.
pub struct Registry {
    handlers: Vec<Box<dyn Handler>>,
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::with_standard_catalog);

impl Registry {
    pub fn standard() -> &'static Registry {
        &REGISTRY
    }

    pub fn context(&self) -> Context<'_> {
        Context { registry: self }
    }

    /// Picks the first capable handler for `el`; hard error if none matches.
    pub fn dispatch(&self, el: ElementRef<'_>) -> Result<&dyn Handler, MigrationError> {
        for handler in &self.handlers {
            if handler.is_capable_of_processing(el) {
                return Ok(handler.as_ref());
            }
        }
        Err(MigrationError::at_with(
            ErrorCode::UnknownTag,
            format!("IdentifyHandler for {} ({})", node_name(el), path_to(el)),
            el,
        ))
    }

    // Order is significant: specific/exclusive shapes must precede the
    // general ones that could over-match them (any accordion matches
    // AccordionHandler; a disclaimer-titled one must be claimed earlier).
    fn with_standard_catalog() -> Self {
        let handlers: Vec<Box<dyn Handler>> = vec![
            Box::new(disclaimer::RegexVariant),
            Box::new(disclaimer::GridOfAccordionsVariant),
            Box::new(disclaimer::AccordionVariant),
            Box::new(disclaimer::LinkVariant),
            Box::new(references::NavVariant),
            Box::new(references::HeadingAndTableVariant),
            Box::new(references::InterlinksOfAccordionVariant),
            Box::new(references::AccordionVariant),
            Box::new(references::StrongAndListVariant),
            Box::new(references::UsefulLinksVariant),
            Box::new(references::GridOfListsVariant),
            Box::new(faq::SchemaDivVariant),
            Box::new(faq::HeadingThenParagraphsVariant),
            Box::new(faq::HeadingThenSubheadingsVariant),
            Box::new(faq::HeadingThenDetailsVariant),
            Box::new(faq::HeadingThenDivOfDetailsVariant),
            Box::new(faq::OrderedListOfStrongVariant),
            Box::new(faq::OrderedListOfParagraphStrongVariant),
            Box::new(faq::UnorderedListOfSubheadingsVariant),
            Box::new(section::TitleHandler),
            Box::new(section::SectionHandler),
            Box::new(cta::LonelyLinkVariant),
            Box::new(cta::CtaSectionVariant),
            Box::new(cta::ListGroupUlVariant),
            Box::new(cta::ListGroupPVariant),
            Box::new(text::TextHandler),
            Box::new(accordion::AccordionHandler),
            Box::new(panel::JumbotronVariant),
            Box::new(panel::KeyDetailsVariant),
            Box::new(blockquote::BlockquoteHandler),
            Box::new(table::TableHandler),
            Box::new(media::VideoHandler),
            Box::new(media::IframeHandler),
            Box::new(fallback::NoopWarningHandler),
            Box::new(grid::GridHandler),
            Box::new(fallback::UnwrapHandler),
        ];
        Self { handlers }
    }
}

/// Builds a validated link item from an anchor. Same-page fragment links never
/// survive migration, so they are rejected here as well as during cleansing.
pub(crate) fn link_item(a: ElementRef<'_>) -> Result<LinkItem, MigrationError> {
    let href = attr(a, "href").unwrap_or_default();
    ensure_with(!href.contains('#'), ErrorCode::LocalLink, "Local link used", a)?;
    Ok(LinkItem { link: href.to_string(), title: extract_link_text(a)? })
}

/// Post-extraction gate shared by the link-list converters (references, CTA):
/// an empty list, a missing href, or an empty block title means the shape test
/// matched but the content did not deliver.
pub(crate) fn ensure_links_extracted(
    title: &str,
    items: &[LinkItem],
    el: ElementRef<'_>,
) -> Result<(), MigrationError> {
    ensure_with(
        !items.is_empty() && items.iter().all(|i| !i.link.is_empty()) && !title.is_empty(),
        ErrorCode::EmptyElement,
        "Link block matched but extracted no usable links/title",
        el,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn unmatched_node_reports_fingerprint_and_path() {
        let dom = Html::parse_fragment(r#"<object class="legacy-widget"></object>"#);
        let el = dom
            .root_element()
            .children()
            .find_map(ElementRef::wrap)
            .unwrap();
        let err = Registry::standard().dispatch(el).err().unwrap();
        assert_eq!(err.code, ErrorCode::UnknownTag);
        let msg = err.message.unwrap();
        assert!(msg.contains("object.legacy-widget"), "got: {}", msg);
    }

    #[test]
    fn disclaimer_accordion_outranks_generic_accordion() {
        let html = r#"<div class="twi-accordion">
            <div class="panel">
                <div class="panel-heading"><h2 class="panel-title"><a>Disclaimer</a></h2></div>
                <div class="panel-body"><p>Terms apply.</p></div>
            </div>
        </div>"#;
        let dom = Html::parse_fragment(html);
        let el = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        let handler = Registry::standard().dispatch(el).unwrap();
        assert_eq!(handler.name(), "DisclaimerVariant_Accordion");
    }

    #[test]
    fn faq_heading_outranks_plain_section_heading() {
        let html = "<h2>FAQ</h2><p><strong>Q1</strong></p><p>A1</p>";
        let dom = Html::parse_fragment(html);
        let el = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        let handler = Registry::standard().dispatch(el).unwrap();
        assert_eq!(handler.name(), "FAQVariant_HeadingThenParagraphs");
    }

    #[test]
    fn local_link_is_rejected_when_building_link_items() {
        let dom = Html::parse_fragment(r##"<a href="#top">Top</a>"##);
        let a = dom.root_element().children().find_map(ElementRef::wrap).unwrap();
        let err = link_item(a).unwrap_err();
        assert_eq!(err.code, ErrorCode::LocalLink);
    }
}
