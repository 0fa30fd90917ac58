//! # rankpdf
//!
//! Persona-driven section extraction from PDF collections.
//!
//! This library splits the pages of PDF documents into titles and body
//! paragraphs using font size and weight, ranks every paragraph by its
//! similarity to a persona-and-task query, and selects the most relevant,
//! well-titled sections for a compact JSON report.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rankpdf::{Pipeline, PipelineConfig};
//!
//! fn main() -> rankpdf::Result<()> {
//!     let config = PipelineConfig::resolve();
//!     let report = Pipeline::new(config).run()?;
//!
//!     for section in &report.extracted_sections {
//!         println!("{}. {} ({})", section.rank, section.title, section.document);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout-aware parsing**: spans carry font size and style flags
//! - **Heuristic classification**: titles vs. paragraphs per page
//! - **Pluggable embedders**: feature hashing by default, ONNX Runtime
//!   sentence models with the `onnx` feature
//! - **Deterministic ranking**: stable ordering for equal scores

pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod rank;
pub mod render;
pub mod select;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use detect::{detect_format_from_bytes, detect_format_from_path, discover_pdfs, PdfFormat};
pub use error::{Error, Result};
pub use extract::{ClassifierConfig, Corpus, PageBlockClassifier};
pub use model::{
    InputRecord, JobToBeDone, PageLayout, PageRecord, Paragraph, ParsedDocument, Persona, Report,
    Section, SubSection,
};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use pipeline::Pipeline;
pub use rank::{Embedder, EmbedderKind, HashingEmbedder, RelevanceRanker, ScoredParagraph};
pub use render::JsonFormat;
pub use select::{SectionSelector, SelectionConfig};

use std::path::Path;

/// Parse a PDF file into page layouts.
///
/// # Example
///
/// ```no_run
/// use rankpdf::parse_file;
///
/// let doc = parse_file("document.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParsedDocument> {
    parser::parse_path(path, ParseOptions::default())
}

/// Parse a PDF from bytes into page layouts.
///
/// The document is named `name` in the resulting layouts.
pub fn parse_bytes(data: &[u8], name: &str) -> Result<ParsedDocument> {
    PdfParser::from_bytes(data)?.parse_document(name)
}

/// Parse and classify a PDF file into per-page titles and paragraphs.
///
/// # Example
///
/// ```no_run
/// use rankpdf::extract_file;
///
/// for page in extract_file("document.pdf").unwrap() {
///     println!("p{}: {:?}", page.page, page.titles);
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Vec<PageRecord>> {
    let doc = parse_file(path)?;
    Ok(PageBlockClassifier::new().classify_document(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bytes_empty_data() {
        let data: [u8; 0] = [];
        assert!(parse_bytes(&data, "empty.pdf").is_err());
    }

    #[test]
    fn test_parse_bytes_too_short() {
        assert!(matches!(parse_bytes(b"%PDF", "short.pdf"), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_parse_bytes_truncated_body() {
        // Valid header, no body
        let result = parse_bytes(b"%PDF-1.4\n", "truncated.pdf");
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_file_missing() {
        assert!(matches!(extract_file("/nonexistent/file.pdf"), Err(Error::Io(_))));
    }
}
