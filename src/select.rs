//! Section selection from the ranked paragraphs.
//!
//! Sections are unique (document, page) pairs taken in rank order, each
//! named by the page's first usable title or, failing that, by the opening
//! words of its best paragraph. Sub-sections are the top paragraphs as is.

use crate::extract::Corpus;
use crate::model::{Section, SubSection};
use crate::rank::ScoredParagraph;

/// Titles too generic to name a section.
pub const GENERIC_TITLE_STOPLIST: &[&str] = &[
    "introduction",
    "conclusion",
    "abstract",
    "references",
    "contents",
    "acknowledgements",
    "appendix",
    "summary",
    "methodology",
    "discussion",
    "results",
    "background",
    "methods",
];

/// Selection limits.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Number of unique sections to report
    pub section_count: usize,
    /// Number of raw paragraphs to report
    pub sub_section_count: usize,
    /// Longest usable title, in words
    pub max_title_words: usize,
    /// Words of paragraph text in a synthesized title
    pub fallback_words: usize,
    /// Suffix of a synthesized title
    pub fallback_suffix: String,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            section_count: 5,
            sub_section_count: 5,
            max_title_words: 8,
            fallback_words: 7,
            fallback_suffix: "...".to_string(),
        }
    }
}

impl SelectionConfig {
    /// Create a config with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of sections.
    pub fn with_section_count(mut self, count: usize) -> Self {
        self.section_count = count;
        self
    }

    /// Set the number of sub-sections.
    pub fn with_sub_section_count(mut self, count: usize) -> Self {
        self.sub_section_count = count;
        self
    }
}

/// Picks the reported sections and sub-sections.
#[derive(Debug, Clone, Default)]
pub struct SectionSelector {
    config: SelectionConfig,
}

impl SectionSelector {
    /// Create a selector with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selector with the given limits.
    pub fn with_config(config: SelectionConfig) -> Self {
        Self { config }
    }

    /// Top unique sections, ranked from 1.
    pub fn sections(&self, ranked: &[ScoredParagraph<'_>], corpus: &Corpus) -> Vec<Section> {
        let mut seen: Vec<(&str, u32)> = Vec::new();
        let mut sections = Vec::new();

        for scored in ranked {
            if sections.len() >= self.config.section_count {
                break;
            }

            let paragraph = scored.paragraph;
            let identity = (paragraph.document.as_str(), paragraph.page);
            if seen.contains(&identity) {
                continue;
            }
            seen.push(identity);

            let title = self
                .choose_title(corpus.titles_for(&paragraph.document, paragraph.page))
                .map(str::to_string)
                .unwrap_or_else(|| self.fallback_title(&paragraph.text));

            sections.push(Section {
                document: paragraph.document.clone(),
                title,
                rank: sections.len() as u32 + 1,
                page: paragraph.page,
            });
        }

        sections
    }

    /// Top paragraphs verbatim; several may come from the same page.
    pub fn sub_sections(&self, ranked: &[ScoredParagraph<'_>]) -> Vec<SubSection> {
        ranked
            .iter()
            .take(self.config.sub_section_count)
            .map(|s| SubSection {
                document: s.paragraph.document.clone(),
                text: s.paragraph.text.clone(),
                page: s.paragraph.page,
            })
            .collect()
    }

    /// The first title, in extraction order, that is short, specific and
    /// free of colons.
    pub fn choose_title<'t>(&self, titles: &'t [String]) -> Option<&'t str> {
        titles
            .iter()
            .map(String::as_str)
            .find(|t| self.is_usable_title(t))
    }

    /// Title synthesized from the opening words of a paragraph.
    pub fn fallback_title(&self, text: &str) -> String {
        let words: Vec<&str> = text
            .split_whitespace()
            .take(self.config.fallback_words)
            .collect();
        format!("{}{}", words.join(" "), self.config.fallback_suffix)
    }

    fn is_usable_title(&self, title: &str) -> bool {
        let lowered = title.trim().to_lowercase();
        title.split_whitespace().count() <= self.config.max_title_words
            && !GENERIC_TITLE_STOPLIST.contains(&lowered.as_str())
            && !title.contains(':')
    }
}
