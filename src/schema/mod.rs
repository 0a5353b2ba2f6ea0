// src/schema/mod.rs
//
// The normalized target schema: a Document of ordered sections of typed
// elements. Field and type names mirror what the downstream review UI renders,
// so serialization shape is part of the contract.

use serde::Serialize;

/// One structured content block discovered by a handler.
///
/// `Section` and `Title` are structural pseudo-elements: the builder consumes
/// them to open a new section / set the document title instead of storing them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text { body: String },
    Faq(FaqBlock),
    References(ReferenceBlock),
    Disclaimer(Disclaimer),
    Cta(CtaBlock),
    Table { body: String },
    Accordion { title: String, body: String },
    Panel { title: String, body: String },
    Video { link: String },
    Iframe { link: String },
    Grid { body: String },
    Blockquote { body: String },
    Section { title: String },
    Title { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqBlock {
    pub title: String,
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceBlock {
    pub title: String,
    pub items: Vec<LinkItem>,
}

/// A link with its display text. Shared by references and CTA blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkItem {
    pub link: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CtaBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<LinkItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disclaimer {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub title: String,
    pub body: String,
    pub elements: Vec<Element>,
}

/// Always `"section"`; kept as a unit enum so the serialized shape matches the
/// legacy consumer without a hand-written Serialize impl.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Section,
}

impl Section {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            kind: SectionKind::Section,
            title: title.into(),
            body: String::new(),
            elements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub body: String,
    pub sections: Vec<Section>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<Disclaimer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faq: Option<FaqBlock>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceBlock>,
}

/// A non-fatal, reviewer-visible note attached to an otherwise successful
/// conversion (e.g. "a video was stripped").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub message: String,
    pub fragment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConversionStatus {
    Success,
    Warning,
}

/// The full per-document conversion output surfaced to reviewers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedDocument {
    pub document: Document,
    pub status: ConversionStatus,
    pub issues: Vec<Issue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elements_serialize_with_type_tag() {
        let faq = Element::Faq(FaqBlock {
            title: "FAQ".into(),
            items: vec![FaqItem { question: "Q1".into(), answer: "<p>A1</p>".into() }],
        });
        let json = serde_json::to_value(&faq).unwrap();
        assert_eq!(json["type"], "faq");
        assert_eq!(json["items"][0]["question"], "Q1");
    }

    #[test]
    fn section_serializes_with_literal_type() {
        let section = Section::with_title("Benefits");
        let json = serde_json::to_value(&section).unwrap();
        assert_eq!(json["type"], "section");
        assert_eq!(json["title"], "Benefits");
    }

    #[test]
    fn empty_optional_blocks_are_omitted() {
        let doc = Document::default();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("disclaimer").is_none());
        assert!(json.get("faq").is_none());
        assert!(json.get("references").is_none());
    }

    #[test]
    fn status_serializes_screaming() {
        assert_eq!(serde_json::to_value(ConversionStatus::Warning).unwrap(), "WARNING");
    }
}
