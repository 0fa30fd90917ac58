//! The paragraph corpus of a run.

use std::collections::{BTreeMap, HashMap};

use crate::model::{PageRecord, Paragraph};

/// All paragraphs of a run in document-then-page order, plus a lookup from
/// (document, page) to the page's record for title selection.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    paragraphs: Vec<Paragraph>,
    pages: HashMap<String, BTreeMap<u32, PageRecord>>,
}

impl Corpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from page records, keeping their order.
    pub fn assemble<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PageRecord>,
    {
        let mut corpus = Self::new();
        for record in records {
            corpus.push(record);
        }
        corpus
    }

    /// Append one page record.
    ///
    /// Its paragraphs go to the end of the flat sequence; no deduplication
    /// happens across pages or documents.
    pub fn push(&mut self, record: PageRecord) {
        self.paragraphs.extend(record.paragraphs.iter().cloned());
        self.pages
            .entry(record.document.clone())
            .or_default()
            .insert(record.page, record);
    }

    /// The flat paragraph sequence.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// The record of one page, if it produced any content.
    pub fn page(&self, document: &str, page: u32) -> Option<&PageRecord> {
        self.pages.get(document)?.get(&page)
    }

    /// Titles of one page in extraction order; empty if the page is unknown.
    pub fn titles_for(&self, document: &str, page: u32) -> &[String] {
        self.page(document, page)
            .map(|r| r.titles.as_slice())
            .unwrap_or(&[])
    }

    /// Page records of one document, in page order.
    pub fn records_for(&self, document: &str) -> impl Iterator<Item = &PageRecord> {
        self.pages.get(document).into_iter().flat_map(|p| p.values())
    }

    /// Number of paragraphs.
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Check if the corpus has no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}
