// src/utils/error.rs
use scraper::ElementRef;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Typed failure codes for document conversion. Every hard error carries one of
/// these plus the serialized offending fragment so a failure can be diagnosed
/// without re-running against the source page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No registered handler matched a top-level node.
    UnknownTag,
    /// A heading/link contained a descendant outside its allow-list.
    HeadingHasChildren,
    /// A node of a kind that never carries migratable content.
    NonContentNode,
    /// A matched block extracted to nothing (no items, empty title, missing Q/A).
    EmptyElement,
    /// An attribute survived cleansing but is not on the allow-list.
    UnknownAttribute,
    /// A same-page fragment link; these never survive migration.
    LocalLink,
    /// A table violated the structural expectations (header/body row rules).
    MalformedTable,
    MultipleDisclaimer,
    MultipleFaq,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::UnknownTag => "UNKNOWN_TAG",
            ErrorCode::HeadingHasChildren => "HEADING_HAS_CHILDREN",
            ErrorCode::NonContentNode => "NON_CONTENT_NODE",
            ErrorCode::EmptyElement => "EMPTY_ELEMENT",
            ErrorCode::UnknownAttribute => "UNKNOWN_ATTRIBUTE",
            ErrorCode::LocalLink => "LOCAL_LINK",
            ErrorCode::MalformedTable => "MALFORMED_TABLE",
            ErrorCode::MultipleDisclaimer => "MULTIPLE_DISCLAIMER",
            ErrorCode::MultipleFaq => "MULTIPLE_FAQ",
        };
        f.write_str(name)
    }
}

/// A hard conversion failure. Aborts the current document; never the batch.
#[derive(Debug, Clone)]
pub struct MigrationError {
    pub code: ErrorCode,
    pub message: Option<String>,
    pub fragment: String,
}

impl MigrationError {
    pub fn at(code: ErrorCode, el: ElementRef<'_>) -> Self {
        Self { code, message: None, fragment: el.html() }
    }

    pub fn at_with(code: ErrorCode, message: impl Into<String>, el: ElementRef<'_>) -> Self {
        Self { code, message: Some(message.into()), fragment: el.html() }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: Some(message.into()), fragment: String::new() }
    }
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(msg) = &self.message {
            write!(f, ": {}", msg)?;
        }
        if !self.fragment.is_empty() {
            write!(f, " (fragment: {})", self.fragment)?;
        }
        Ok(())
    }
}

impl std::error::Error for MigrationError {}

/// Boolean-assertion helper: raise a typed, node-scoped error unless `cond` holds.
pub fn ensure_with(
    cond: bool,
    code: ErrorCode,
    message: impl Into<String>,
    el: ElementRef<'_>,
) -> Result<(), MigrationError> {
    if cond {
        Ok(())
    } else {
        Err(MigrationError::at_with(code, message, el))
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse source dump: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported source path: {0}")]
    UnsupportedPath(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
