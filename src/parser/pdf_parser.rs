//! PDF document parser using lopdf.

use std::io::Read;
use std::path::Path;

use crate::detect::{detect_format_from_bytes, detect_format_from_path, document_name};
use crate::error::Result;
use crate::model::{PageLayout, ParsedDocument};

use super::backend::{LopdfBackend, PdfBackend};
use super::layout::LayoutAnalyzer;
use super::options::{ErrorMode, ParseOptions};

/// PDF document parser.
pub struct PdfParser {
    backend: LopdfBackend,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        detect_format_from_path(path)?;

        let backend = LopdfBackend::load_file(path)?;
        Ok(Self { backend, options })
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        detect_format_from_bytes(data)?;

        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self { backend, options })
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Analyze every selected page into a [`PageLayout`], in page order.
    pub fn parse(&self) -> Result<Vec<PageLayout>> {
        let analyzer = LayoutAnalyzer::new(&self.backend);
        let mut pages = Vec::new();

        for page_num in self.backend.pages().into_keys() {
            if !self.options.includes(page_num) {
                continue;
            }

            match analyzer.page_layout(page_num) {
                Ok(page) => pages.push(page),
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Failed to analyze page {}: {}", page_num, e);
                }
            }
        }

        Ok(pages)
    }

    /// Parse into a named document.
    pub fn parse_document(&self, name: impl Into<String>) -> Result<ParsedDocument> {
        Ok(ParsedDocument::new(name, self.parse()?))
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.backend.pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.backend.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.backend.version()
    }
}

/// Open and parse a PDF file, naming the document after its file name.
pub fn parse_path<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<ParsedDocument> {
    let path = path.as_ref();
    let parser = PdfParser::open_with_options(path, options)?;
    parser.parse_document(document_name(path))
}
