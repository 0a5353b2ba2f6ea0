// src/handlers/faq.rs
//
// FAQ shapes. Authors produced a remarkable number of structurally distinct
// renderings of "heading + question/answer pairs"; each gets its own variant
// so predicates stay mutually exclusive and individually auditable. All
// converters share one post-extraction gate: no items, a missing question or
// answer, or an empty title is EMPTY_ELEMENT, never a partial block.

use crate::dom::{self, child_elements, first_child_element, next_element, selector, tag, text_of};
use crate::extract::{extract_content_html, extract_heading_text, is_heading_node};
use crate::handlers::{Context, Conversion, Handler};
use crate::schema::{Element, FaqBlock, FaqItem};
use crate::utils::error::{ensure_with, ErrorCode, MigrationError};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

pub static FAQ_HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)frequently asked questions|faq").expect("static regex"));

static SCHEMA_SECTIONS: Lazy<Selector> = Lazy::new(|| selector("section"));
static SCHEMA_QUESTION: Lazy<Selector> = Lazy::new(|| selector("strong"));
static SCHEMA_ANSWER: Lazy<Selector> = Lazy::new(|| selector("div > div"));
static SUMMARY_QUESTION: Lazy<Selector> = Lazy::new(|| selector("summary > strong"));
static VIDEO_FRAME: Lazy<Selector> = Lazy::new(|| selector("iframe.video-frame"));
static LI_P_STRONG: Lazy<Selector> = Lazy::new(|| selector("p > strong"));
static PANEL_TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector(".panel-title a"));
static PANEL_BODY: Lazy<Selector> = Lazy::new(|| selector(".panel-body"));
static PANEL_QUESTIONS: Lazy<Selector> = Lazy::new(|| selector("ul > h3, ul > li > h3"));

fn heading_matches(el: ElementRef<'_>) -> bool {
    FAQ_HEADING_REGEX.is_match(&text_of(el))
}

fn assert_extracted(
    title: &str,
    items: &[FaqItem],
    el: ElementRef<'_>,
) -> Result<(), MigrationError> {
    ensure_with(
        !items.is_empty()
            && items.iter().all(|i| !i.question.is_empty() && !i.answer.is_empty())
            && !title.is_empty(),
        ErrorCode::EmptyElement,
        "FAQ matched but extracted no usable question/answer items",
        el,
    )
}

fn faq_conversion(title: String, items: Vec<FaqItem>, issues: Vec<String>) -> Conversion {
    Conversion { elements: vec![Element::Faq(FaqBlock { title, items })], issues }
}

/// `<h2>FAQ</h2>` followed by a schema.org FAQPage div of `<section>`s.
pub struct SchemaDivVariant;

impl Handler for SchemaDivVariant {
    fn name(&self) -> &'static str {
        "FAQVariant_SchemaDiv"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        let Some(next) = next_element(el) else { return false };
        tag(el) == "h2"
            && heading_matches(el)
            && tag(next) == "div"
            && dom::attr(next, "itemtype") == Some("https://schema.org/FAQPage")
            && next.select(&SCHEMA_SECTIONS).next().is_some()
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let title = extract_heading_text(window[0])?;
        let container = window[1];
        let mut items = Vec::new();
        for section in container.select(&SCHEMA_SECTIONS) {
            let question = match section.select(&SCHEMA_QUESTION).next() {
                Some(q) => extract_heading_text(q)?,
                None => String::new(),
            };
            let answer = match section.select(&SCHEMA_ANSWER).next() {
                Some(a) => extract_content_html(a)?,
                None => String::new(),
            };
            items.push(FaqItem { question, answer });
        }
        assert_extracted(&title, &items, container)?;
        Ok(faq_conversion(title, items, Vec::new()))
    }
}

/// Heading followed by alternating `<p><strong>Q</strong></p>` questions and
/// one-or-more textual answer siblings. The window expands until the
/// question/answer alternation breaks.
pub struct HeadingThenParagraphsVariant;

impl HeadingThenParagraphsVariant {
    fn is_question(el: ElementRef<'_>) -> bool {
        tag(el) == "p"
            && first_child_element(el).map(|c| tag(c) == "strong").unwrap_or(false)
    }

    fn is_answer(el: ElementRef<'_>) -> bool {
        matches!(tag(el), "p" | "ul") && !Self::is_question(el)
    }
}

impl Handler for HeadingThenParagraphsVariant {
    fn name(&self) -> &'static str {
        "FAQVariant_HeadingThenParagraphs"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        tag(el) == "h2"
            && heading_matches(el)
            && next_element(el).map(|n| tag(n) == "p").unwrap_or(false)
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let mut window = vec![el];
        let mut curr = el;
        loop {
            let Some(q) = next_element(curr) else { break };
            let Some(first_answer) = next_element(q) else { break };
            if !Self::is_question(q) || !Self::is_answer(first_answer) {
                break;
            }
            window.push(q);
            window.push(first_answer);
            // An answer may continue over several siblings.
            let mut last = first_answer;
            while let Some(next) = next_element(last) {
                if !Self::is_answer(next) {
                    break;
                }
                window.push(next);
                last = next;
            }
            curr = last;
        }
        window
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let title = extract_heading_text(window[0])?;
        let mut items = Vec::new();
        let mut i = 1;
        while i < window.len() {
            let question = extract_heading_text(window[i])?;
            let question = question.trim_start_matches("Q: ").to_string();
            i += 1;
            let mut answer = String::new();
            while i < window.len() && !Self::is_question(window[i]) {
                answer.push_str(&extract_content_html(window[i])?);
                i += 1;
            }
            let answer = answer.trim_start_matches("A: ").to_string();
            items.push(FaqItem { question, answer });
        }
        assert_extracted(&title, &items, window[0])?;
        Ok(faq_conversion(title, items, Vec::new()))
    }
}

/// Heading followed by alternating `<h3>` questions and textual answers.
pub struct HeadingThenSubheadingsVariant;

impl HeadingThenSubheadingsVariant {
    fn is_answer(el: ElementRef<'_>) -> bool {
        matches!(tag(el), "p" | "ul" | "ol")
    }
}

impl Handler for HeadingThenSubheadingsVariant {
    fn name(&self) -> &'static str {
        "FAQVariant_HeadingThenSubheadings"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        is_heading_node(el)
            && heading_matches(el)
            && next_element(el).map(|n| tag(n) == "h3").unwrap_or(false)
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let mut window = vec![el];
        let mut curr = el;
        loop {
            let Some(q) = next_element(curr) else { break };
            if tag(q) != "h3" {
                break;
            }
            let Some(first_answer) = next_element(q) else { break };
            if !Self::is_answer(first_answer) {
                break;
            }
            window.push(q);
            window.push(first_answer);
            let mut last = first_answer;
            while let Some(next) = next_element(last) {
                if !Self::is_answer(next) {
                    break;
                }
                window.push(next);
                last = next;
            }
            curr = last;
        }
        window
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let title = extract_heading_text(window[0])?;
        let mut items = Vec::new();
        let mut i = 1;
        while i < window.len() {
            let question = extract_heading_text(window[i])?;
            i += 1;
            let mut answer = String::new();
            while i < window.len() && tag(window[i]) != "h3" {
                answer.push_str(&extract_content_html(window[i])?);
                i += 1;
            }
            items.push(FaqItem { question, answer });
        }
        assert_extracted(&title, &items, window[0])?;
        Ok(faq_conversion(title, items, Vec::new()))
    }
}

/// Heading followed by a run of `<details><summary><strong>Q</strong></summary>…`
/// disclosure nodes; the window follows the chain until it ends.
pub struct HeadingThenDetailsVariant;

impl Handler for HeadingThenDetailsVariant {
    fn name(&self) -> &'static str {
        "FAQVariant_HeadingThenDetails"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        is_heading_node(el)
            && heading_matches(el)
            && next_element(el).map(|n| tag(n) == "details").unwrap_or(false)
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let mut window = vec![el];
        let mut curr = el;
        while let Some(next) = next_element(curr) {
            if tag(next) != "details" {
                break;
            }
            window.push(next);
            curr = next;
        }
        window
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let title = extract_heading_text(window[0])?;
        let mut issues = Vec::new();
        let mut items = Vec::new();
        for details in &window[1..] {
            let (item, stripped_video) = convert_details_item(*details)?;
            if stripped_video {
                issues.push(
                    "FAQ Q&A had a video which was removed as it is not supported".to_string(),
                );
            }
            items.push(item);
        }
        assert_extracted(&title, &items, window[0])?;
        Ok(faq_conversion(title, items, issues))
    }
}

/// Heading followed by a div whose children are all `<details>` nodes.
pub struct HeadingThenDivOfDetailsVariant;

impl Handler for HeadingThenDivOfDetailsVariant {
    fn name(&self) -> &'static str {
        "FAQVariant_HeadingThenDivOfDetails"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        let Some(next) = next_element(el) else { return false };
        // Note: an empty div trivially satisfies the every-child-is-details
        // count check; the converter's gate rejects it as EMPTY_ELEMENT.
        is_heading_node(el)
            && heading_matches(el)
            && tag(next) == "div"
            && child_elements(next).filter(|c| tag(*c) == "details").count()
                == dom::child_count(next)
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let title = extract_heading_text(window[0])?;
        let mut items = Vec::new();
        for details in child_elements(window[1]) {
            let (item, _) = convert_details_item(details)?;
            items.push(item);
        }
        assert_extracted(&title, &items, window[1])?;
        Ok(faq_conversion(title, items, Vec::new()))
    }
}

/// One `<details>` node to one Q/A item. Returns whether an unsupported video
/// frame was stripped from the answer.
fn convert_details_item(details: ElementRef<'_>) -> Result<(FaqItem, bool), MigrationError> {
    let question = match details.select(&SUMMARY_QUESTION).next() {
        Some(q) => extract_heading_text(q)?,
        None => String::new(),
    };
    let mut answer = String::new();
    let mut stripped_video = false;
    for child in child_elements(details) {
        if tag(child) == "summary" {
            continue;
        }
        if VIDEO_FRAME.matches(&child) {
            stripped_video = true;
            continue;
        }
        answer.push_str(&extract_content_html(child)?);
    }
    Ok((FaqItem { question, answer }, stripped_video))
}

/// Heading followed by `<ol>` where each `<li>` opens with a `<strong>`
/// question and the rest of the item is the answer.
pub struct OrderedListOfStrongVariant;

impl Handler for OrderedListOfStrongVariant {
    fn name(&self) -> &'static str {
        "FAQVariant_OrderedListOfStrong"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        let Some(next) = next_element(el) else { return false };
        if !(is_heading_node(el) && heading_matches(el) && tag(next) == "ol") {
            return false;
        }
        let items: Vec<ElementRef> = child_elements(next).collect();
        !items.is_empty()
            && items.iter().all(|li| {
                first_child_element(*li).map(|c| tag(c) == "strong").unwrap_or(false)
                    && child_elements(*li).any(|c| matches!(tag(c), "p" | "ul"))
            })
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let title = extract_heading_text(window[0])?;
        let mut items = Vec::new();
        for li in child_elements(window[1]) {
            let strong = first_child_element(li);
            let question = match strong {
                Some(s) => extract_heading_text(s)?,
                None => String::new(),
            };
            let mut answer = String::new();
            if let Some(s) = strong {
                for sibling in dom::following_elements(s) {
                    answer.push_str(&extract_content_html(sibling)?);
                }
            }
            items.push(FaqItem { question, answer });
        }
        assert_extracted(&title, &items, window[1])?;
        Ok(faq_conversion(title, items, Vec::new()))
    }
}

/// Heading followed by `<ol>` where each `<li>` holds a `<p><strong>Q</strong></p>`
/// and the answer is the item's second child.
pub struct OrderedListOfParagraphStrongVariant;

impl Handler for OrderedListOfParagraphStrongVariant {
    fn name(&self) -> &'static str {
        "FAQVariant_OrderedListOfParagraphStrong"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        let Some(next) = next_element(el) else { return false };
        if !(is_heading_node(el) && heading_matches(el) && tag(next) == "ol") {
            return false;
        }
        let lis: Vec<ElementRef> = child_elements(next).collect();
        !lis.is_empty()
            && lis.iter().all(|li| {
                first_child_element(*li)
                    .map(|c| tag(c) == "p" && c.select(&SCHEMA_QUESTION).next().is_some())
                    .unwrap_or(false)
            })
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let title = extract_heading_text(window[0])?;
        let mut items = Vec::new();
        for li in child_elements(window[1]) {
            let question = match li.select(&LI_P_STRONG).next() {
                Some(q) => extract_heading_text(q)?,
                None => String::new(),
            };
            let answer = match child_elements(li).nth(1) {
                Some(a) => extract_content_html(a)?,
                None => String::new(),
            };
            items.push(FaqItem { question, answer });
        }
        assert_extracted(&title, &items, window[1])?;
        Ok(faq_conversion(title, items, Vec::new()))
    }
}

/// Heading followed by `<ul>` where each `<li>` opens with an `<h3>` question.
pub struct UnorderedListOfSubheadingsVariant;

impl Handler for UnorderedListOfSubheadingsVariant {
    fn name(&self) -> &'static str {
        "FAQVariant_UnorderedListOfSubheadings"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        let Some(next) = next_element(el) else { return false };
        if !(is_heading_node(el) && heading_matches(el) && tag(next) == "ul") {
            return false;
        }
        let lis: Vec<ElementRef> = child_elements(next).collect();
        !lis.is_empty()
            && lis.iter().all(|li| {
                first_child_element(*li).map(|c| tag(c) == "h3").unwrap_or(false)
            })
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let title = extract_heading_text(window[0])?;
        let mut items = Vec::new();
        for li in child_elements(window[1]) {
            let h3 = first_child_element(li);
            let question = match h3 {
                Some(h) => extract_heading_text(h)?,
                None => String::new(),
            };
            let mut answer = String::new();
            if let Some(h) = h3 {
                for sibling in dom::following_elements(h) {
                    answer.push_str(&extract_content_html(sibling)?);
                }
            }
            items.push(FaqItem { question, answer });
        }
        assert_extracted(&title, &items, window[1])?;
        Ok(faq_conversion(title, items, Vec::new()))
    }
}

/// FAQ content living inside an accordion panel. Only reachable
/// compositionally: AccordionHandler invokes `convert_panel` on panels whose
/// title matches the FAQ heading regex. Never dispatched at top level.
pub struct FaqInsideAccordionPanel;

impl FaqInsideAccordionPanel {
    pub fn convert_panel(panel: ElementRef<'_>) -> Result<Conversion, MigrationError> {
        let title = match panel.select(&PANEL_TITLE_LINK).next() {
            Some(t) => extract_heading_text(t)?,
            None => String::new(),
        };
        let mut items = Vec::new();
        if let Some(body) = panel.select(&PANEL_BODY).next() {
            for q in body.select(&PANEL_QUESTIONS) {
                let question = extract_heading_text(q)?;
                let mut answer = String::new();
                for sibling in dom::following_elements(q) {
                    if matches!(tag(sibling), "h3" | "li") {
                        break;
                    }
                    answer.push_str(&extract_content_html(sibling)?);
                }
                items.push(FaqItem { question, answer });
            }
        }
        assert_extracted(&title, &items, panel)?;
        Ok(faq_conversion(title, items, Vec::new()))
    }
}

impl Handler for FaqInsideAccordionPanel {
    fn name(&self) -> &'static str {
        "FAQVariant_InsideAccordionPanel"
    }

    fn is_capable_of_processing(&self, _el: ElementRef<'_>) -> bool {
        // Usable only through AccordionHandler.
        false
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        Self::convert_panel(window[0])
    }
}
