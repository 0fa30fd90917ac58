//! Extracted content: paragraphs and per-page records.

use serde::{Deserialize, Serialize};

/// A body paragraph extracted from a page.
///
/// Paragraphs are immutable once created; the ranker scores them through a
/// separate wrapper rather than changing them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Normalized paragraph text
    pub text: String,
    /// Document file name
    pub document: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl Paragraph {
    /// Create a new paragraph.
    pub fn new(text: impl Into<String>, document: impl Into<String>, page: u32) -> Self {
        Self {
            text: text.into(),
            document: document.into(),
            page,
        }
    }
}

/// Titles and paragraphs classified on one page of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Document file name
    pub document: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Titles in extraction order
    pub titles: Vec<String>,
    /// Paragraphs in extraction order
    pub paragraphs: Vec<Paragraph>,
}

impl PageRecord {
    /// Create an empty record for a page.
    pub fn new(document: impl Into<String>, page: u32) -> Self {
        Self {
            document: document.into(),
            page,
            titles: Vec::new(),
            paragraphs: Vec::new(),
        }
    }

    /// Check if the page yielded neither titles nor paragraphs.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty() && self.paragraphs.is_empty()
    }
}
