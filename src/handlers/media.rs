// src/handlers/media.rs
//
// Embedded media. Video embeds carry the `video-frame` class (sometimes under
// a wrapper div); any other iframe is preserved as a generic embed.

use crate::dom::{self, attr, child_count, first_child_element, tag};
use crate::handlers::{Context, Conversion, Handler};
use crate::schema::Element;
use crate::utils::error::{ensure_with, ErrorCode, MigrationError};
use scraper::ElementRef;

fn is_video_frame(el: ElementRef<'_>) -> bool {
    tag(el) == "iframe" && dom::has_class(el, "video-frame")
}

fn video_frame_of(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if is_video_frame(el) {
        return Some(el);
    }
    if tag(el) == "div" && child_count(el) == 1 {
        return first_child_element(el).filter(|c| is_video_frame(*c));
    }
    None
}

pub struct VideoHandler;

impl Handler for VideoHandler {
    fn name(&self) -> &'static str {
        "VideoHandler"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        video_frame_of(el).is_some()
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
        let frame = video_frame_of(el)
            .ok_or_else(|| MigrationError::at(ErrorCode::EmptyElement, el))?;
        // Lazy-loaded players stash the URL in data-src.
        let link = attr(frame, "src").or_else(|| attr(frame, "data-src")).unwrap_or_default();
        ensure_with(!link.is_empty(), ErrorCode::EmptyElement, "Video frame has no source", el)?;
        Ok(Conversion::of(Element::Video { link: link.to_string() }))
    }
}

pub struct IframeHandler;

impl Handler for IframeHandler {
    fn name(&self) -> &'static str {
        "IframeHandler"
    }

    fn is_capable_of_processing(&self, el: ElementRef<'_>) -> bool {
        tag(el) == "iframe"
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
        let link = attr(el, "src").unwrap_or_default();
        ensure_with(!link.is_empty(), ErrorCode::EmptyElement, "Iframe has no source", el)?;
        Ok(Conversion::of(Element::Iframe { link: link.to_string() }))
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
        handler.convert(&handler.walk_to_pull_related(el), &registry.context())
    }

    #[test]
    fn video_frame_iframe_becomes_video() {
        let conv = convert(
            r#"<iframe class="video-frame" src="https://www.youtube.com/embed/abc"></iframe>"#,
        )
        .unwrap();
        assert!(matches!(
            &conv.elements[0],
            Element::Video { link } if link == "https://www.youtube.com/embed/abc"
        ));
    }

    #[test]
    fn wrapped_video_frame_is_recognized() {
        let conv = convert(
            r#"<div class="video-wrapper"><iframe class="video-frame" data-src="https://www.youtube.com/embed/xyz"></iframe></div>"#,
        )
        .unwrap();
        assert!(matches!(
            &conv.elements[0],
            Element::Video { link } if link == "https://www.youtube.com/embed/xyz"
        ));
    }

    #[test]
    fn plain_iframe_becomes_generic_embed() {
        let conv =
            convert(r#"<iframe src="https://calculator.example.com/emi"></iframe>"#).unwrap();
        assert!(matches!(
            &conv.elements[0],
            Element::Iframe { link } if link == "https://calculator.example.com/emi"
        ));
    }

    #[test]
    fn sourceless_iframe_is_rejected() {
        let err = convert("<iframe></iframe>").unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyElement);
    }
}
