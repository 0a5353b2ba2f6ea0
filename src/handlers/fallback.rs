// src/handlers/fallback.rs
//
// Last-resort handlers. NoopWarning swallows author debris (spacer breaks,
// empty wrappers) with a recorded issue; Unwrap dissolves pure layout
// containers and re-dispatches their children. Anything still unclaimed after
// these is a genuine UNKNOWN_TAG.

use crate::dom::{child_count, child_elements, tag, text_of};
use crate::extract::strip_layout_classes;
use crate::handlers::{Context, Conversion, Handler};
use crate::utils::error::MigrationError;
use scraper::ElementRef;

pub struct NoopWarningHandler;

impl Handler for NoopWarningHandler {
    fn name(&self) -> &'static str {
        "NoopWarningHandler"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        matches!(tag(el), "br" | "hr")
            || (matches!(tag(el), "div" | "p" | "span")
                && child_count(el) == 0
                && text_of(el).trim().is_empty())
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        _ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        Ok(Conversion {
            elements: Vec::new(),
            issues: vec![format!("Skipped non-content node <{}>", tag(window[0]))],
        })
    }
}

/// Containers whose classes are purely layout (or absent) contribute no
/// semantics; their children re-enter dispatch individually.
pub struct UnwrapHandler;

impl UnwrapHandler {
    fn is_layout_only(el: ElementRef<'_>) -> bool {
        let meaningful = strip_layout_classes(el);
        meaningful.is_empty()
            || meaningful
                .split_whitespace()
                .all(|c| matches!(c, "container" | "container-fluid") || c.starts_with("col-"))
    }
}

impl Handler for UnwrapHandler {
    fn name(&self) -> &'static str {
        "UnwrapHandler"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        matches!(tag(el), "div" | "center" | "section")
            && child_count(el) > 0
            && Self::is_layout_only(el)
    }

    fn walk_to_pull_related<'a>(&self, el: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        vec![el]
    }

    fn convert(
        &self,
        window: &[ElementRef<'_>],
        ctx: &Context<'_>,
    ) -> Result<Conversion, MigrationError> {
        let children: Vec<ElementRef> = child_elements(window[0]).collect();
        ctx.convert_sequence(&children)
    }
}
