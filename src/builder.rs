// src/builder.rs
//
// Accumulates the element stream emitted by the walker into a well-formed
// Document. Elements keep their reading-order position inside sections; the
// singleton blocks (faq, disclaimer) and the cumulative references list are
// additionally recorded in their document-level slots.

use crate::schema::{
    ConversionStatus, ConvertedDocument, Document, Element, Issue, Section,
};
use crate::utils::error::{ErrorCode, MigrationError};

/// Duplicate-singleton policy. Strict treats a second disclaimer/faq as a hard
/// error; Lenient keeps the first one and degrades the document to WARNING.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BuildMode {
    #[default]
    Strict,
    Lenient,
}

pub struct DocBuilder {
    doc: Document,
    mode: BuildMode,
    issues: Vec<Issue>,
}

impl DocBuilder {
    pub fn new(mode: BuildMode) -> Self {
        Self { doc: Document::default(), mode, issues: Vec::new() }
    }

    /// Routes one element: structural pseudo-elements mutate document shape,
    /// everything else lands in the current section.
    pub fn add(&mut self, element: Element) -> Result<(), MigrationError> {
        match element {
            Element::Section { title } => {
                self.add_new_section_with_title(title);
                Ok(())
            }
            Element::Title { text } => {
                if self.doc.title.is_empty() {
                    self.doc.title = text;
                }
                Ok(())
            }
            Element::Disclaimer(disclaimer) => {
                if self.doc.disclaimer.is_some() {
                    return self.duplicate_singleton(ErrorCode::MultipleDisclaimer);
                }
                self.doc.disclaimer = Some(disclaimer.clone());
                self.add_element(Element::Disclaimer(disclaimer));
                Ok(())
            }
            Element::Faq(faq) => {
                if self.doc.faq.is_some() {
                    return self.duplicate_singleton(ErrorCode::MultipleFaq);
                }
                self.doc.faq = Some(faq.clone());
                self.add_element(Element::Faq(faq));
                Ok(())
            }
            Element::References(references) => {
                // Reference blocks accumulate; multiple blocks never conflict.
                self.doc.references.push(references.clone());
                self.add_element(Element::References(references));
                Ok(())
            }
            other => {
                self.add_element(other);
                Ok(())
            }
        }
    }

    pub fn add_new_section_with_title(&mut self, title: impl Into<String>) {
        self.doc.sections.push(Section::with_title(title));
    }

    fn add_element(&mut self, element: Element) {
        if self.doc.sections.is_empty() {
            // Content before any explicit section opener goes into an
            // anonymous section.
            self.add_new_section_with_title("");
        }
        self.doc
            .sections
            .last_mut()
            .expect("a section always exists at this point")
            .elements
            .push(element);
    }

    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    fn duplicate_singleton(&mut self, code: ErrorCode) -> Result<(), MigrationError> {
        match self.mode {
            BuildMode::Strict => Err(MigrationError::with_message(
                code,
                "Document contains more than one of a singleton block",
            )),
            BuildMode::Lenient => {
                tracing::warn!("Duplicate singleton block ({}), keeping the first one", code);
                self.issues.push(Issue {
                    message: format!("{}: duplicate block dropped, first occurrence kept", code),
                    fragment: String::new(),
                });
                Ok(())
            }
        }
    }

    pub fn build(self) -> ConvertedDocument {
        let status = if self.issues.is_empty() {
            ConversionStatus::Success
        } else {
            ConversionStatus::Warning
        };
        ConvertedDocument { document: self.doc, status, issues: self.issues }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Disclaimer;

    fn disclaimer(text: &str) -> Element {
        Element::Disclaimer(Disclaimer { text: text.into(), link: None })
    }

    #[test]
    fn anonymous_section_is_synthesized_for_early_content() {
        let mut builder = DocBuilder::new(BuildMode::Strict);
        builder.add(Element::Text { body: "<p>x</p>".into() }).unwrap();
        let out = builder.build();
        assert_eq!(out.document.sections.len(), 1);
        assert_eq!(out.document.sections[0].title, "");
        assert_eq!(out.document.sections[0].elements.len(), 1);
    }

    #[test]
    fn section_element_opens_new_section() {
        let mut builder = DocBuilder::new(BuildMode::Strict);
        builder.add(Element::Section { title: "Benefits".into() }).unwrap();
        builder.add(Element::Text { body: "<p>x</p>".into() }).unwrap();
        let out = builder.build();
        assert_eq!(out.document.sections.len(), 1);
        assert_eq!(out.document.sections[0].title, "Benefits");
    }

    #[test]
    fn second_disclaimer_is_a_hard_error_in_strict_mode() {
        let mut builder = DocBuilder::new(BuildMode::Strict);
        builder.add(disclaimer("first")).unwrap();
        let err = builder.add(disclaimer("second")).unwrap_err();
        assert_eq!(err.code, ErrorCode::MultipleDisclaimer);
    }

    #[test]
    fn second_disclaimer_degrades_to_warning_in_lenient_mode() {
        let mut builder = DocBuilder::new(BuildMode::Lenient);
        builder.add(disclaimer("first")).unwrap();
        builder.add(disclaimer("second")).unwrap();
        let out = builder.build();
        assert_eq!(out.status, ConversionStatus::Warning);
        assert_eq!(out.document.disclaimer.as_ref().unwrap().text, "first");
        assert_eq!(out.issues.len(), 1);
        assert!(out.issues[0].message.contains("MULTIPLE_DISCLAIMER"));
    }

    #[test]
    fn references_accumulate_instead_of_conflicting() {
        use crate::schema::{LinkItem, ReferenceBlock};
        let block = |title: &str| {
            Element::References(ReferenceBlock {
                title: title.into(),
                items: vec![LinkItem { link: "/a".into(), title: "A".into() }],
            })
        };
        let mut builder = DocBuilder::new(BuildMode::Strict);
        builder.add(block("Related")).unwrap();
        builder.add(block("Also read")).unwrap();
        let out = builder.build();
        assert_eq!(out.document.references.len(), 2);
        assert_eq!(out.status, ConversionStatus::Success);
    }

    #[test]
    fn title_pseudo_element_sets_document_title_once() {
        let mut builder = DocBuilder::new(BuildMode::Strict);
        builder.add(Element::Title { text: "First".into() }).unwrap();
        builder.add(Element::Title { text: "Second".into() }).unwrap();
        let out = builder.build();
        assert_eq!(out.document.title, "First");
    }
}
