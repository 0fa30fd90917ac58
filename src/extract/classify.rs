//! Title and paragraph classification of page blocks.
//!
//! The dominant font size of a page is taken as its body size. A block is a
//! title candidate when any of its spans is noticeably larger than the body
//! size or is set in bold; short candidates become titles and long blocks
//! become paragraphs.

use crate::model::{Block, PageLayout, PageRecord, Paragraph, ParsedDocument};

use super::normalize::normalize;

/// Thresholds used by [`PageBlockClassifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// A span larger than `title_size_ratio × body size` marks a title candidate
    pub title_size_ratio: f32,
    /// Style-flag bit that marks bold text
    pub bold_flag: u32,
    /// Longest title, in whitespace-separated words
    pub max_title_words: usize,
    /// Blocks shorter than this (normalized chars) are ignored
    pub min_block_chars: usize,
    /// Paragraphs must be strictly longer than this (normalized chars)
    pub min_paragraph_chars: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            title_size_ratio: 1.15,
            bold_flag: 16,
            max_title_words: 12,
            min_block_chars: 10,
            min_paragraph_chars: 50,
        }
    }
}

impl ClassifierConfig {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title size ratio.
    pub fn with_title_size_ratio(mut self, ratio: f32) -> Self {
        self.title_size_ratio = ratio;
        self
    }

    /// Set the maximum title word count.
    pub fn with_max_title_words(mut self, words: usize) -> Self {
        self.max_title_words = words;
        self
    }

    /// Set the minimum block length.
    pub fn with_min_block_chars(mut self, chars: usize) -> Self {
        self.min_block_chars = chars;
        self
    }

    /// Set the paragraph length threshold.
    pub fn with_min_paragraph_chars(mut self, chars: usize) -> Self {
        self.min_paragraph_chars = chars;
        self
    }
}

/// Classifies the blocks of a page into titles and paragraphs.
#[derive(Debug, Clone, Default)]
pub struct PageBlockClassifier {
    config: ClassifierConfig,
}

impl PageBlockClassifier {
    /// Create a classifier with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with the given thresholds.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// The active thresholds.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one page.
    ///
    /// Returns `None` when the page has no spans, or when no block
    /// qualified as either a title or a paragraph.
    pub fn classify_page(&self, document: &str, page: &PageLayout) -> Option<PageRecord> {
        let body_size = paragraph_font_size(&page.span_sizes())?;
        let mut record = PageRecord::new(document, page.number);

        for block in &page.blocks {
            let text = normalize(&block.raw_text());
            let chars = text.chars().count();
            if chars < self.config.min_block_chars {
                continue;
            }

            let words = text.split_whitespace().count();
            if self.is_title_candidate(block, body_size) && words <= self.config.max_title_words {
                record.titles.push(text);
            } else if chars > self.config.min_paragraph_chars {
                record
                    .paragraphs
                    .push(Paragraph::new(text, document, page.number));
            } else {
                log::trace!(
                    "{} p{}: dropped {}-char block {:?}",
                    document,
                    page.number,
                    chars,
                    text
                );
            }
        }

        if record.is_empty() {
            None
        } else {
            Some(record)
        }
    }

    /// Classify every page of a document, keeping only non-empty records.
    pub fn classify_document(&self, document: &ParsedDocument) -> Vec<PageRecord> {
        let records: Vec<PageRecord> = document
            .pages
            .iter()
            .filter_map(|page| self.classify_page(&document.name, page))
            .collect();

        log::debug!(
            "{}: {} of {} pages yielded content",
            document.name,
            records.len(),
            document.page_count()
        );
        records
    }

    fn is_title_candidate(&self, block: &Block, body_size: f32) -> bool {
        let threshold = self.config.title_size_ratio * body_size;
        block
            .spans()
            .any(|s| s.size > threshold || s.flags & self.config.bold_flag != 0)
    }
}

/// Body font size of a page: the element at index `len / 2` of the sorted
/// span sizes. Never averages the two middle values.
pub fn paragraph_font_size(sizes: &[f32]) -> Option<f32> {
    if sizes.is_empty() {
        return None;
    }
    let mut sorted = sizes.to_vec();
    sorted.sort_by(f32::total_cmp);
    Some(sorted[sorted.len() / 2])
}
