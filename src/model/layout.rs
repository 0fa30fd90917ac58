//! Page layout types produced by the PDF parser.
//!
//! A page is an ordered list of blocks, a block an ordered list of lines and
//! a line an ordered list of spans. Every span carries its font size and a
//! style-flag bitmask; the bit values follow the common PDF text-extraction
//! convention so that bold is bit value 16.

use serde::{Deserialize, Serialize};

/// Style-flag bits carried by [`Span::flags`].
pub mod flags {
    /// Superscript text.
    pub const SUPERSCRIPT: u32 = 1;
    /// Italic or oblique font.
    pub const ITALIC: u32 = 2;
    /// Serifed font.
    pub const SERIF: u32 = 4;
    /// Fixed-pitch font.
    pub const MONOSPACE: u32 = 8;
    /// Bold font.
    pub const BOLD: u32 = 16;
}

/// A run of text with uniform font size and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Style-flag bitmask (see [`flags`])
    pub flags: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(text: impl Into<String>, size: f32, flags: u32) -> Self {
        Self {
            text: text.into(),
            size,
            flags,
        }
    }

    /// Whether the bold bit is set.
    pub fn is_bold(&self) -> bool {
        self.flags & flags::BOLD != 0
    }
}

/// A line of spans sharing a baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// The spans in reading order
    pub spans: Vec<Span>,
}

impl Line {
    /// Create a line from spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Concatenated span text, without separators.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A block of consecutive lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// The lines in reading order
    pub lines: Vec<Line>,
}

impl Block {
    /// Create a block from lines.
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Iterate over every span of the block in order.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.lines.iter().flat_map(|l| l.spans.iter())
    }

    /// Reconstructed block text: span texts concatenated, with one trailing
    /// space appended after each line.
    pub fn raw_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            for span in &line.spans {
                text.push_str(&span.text);
            }
            text.push(' ');
        }
        text
    }
}

/// The layout of a single page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,
    /// Text blocks in reading order
    pub blocks: Vec<Block>,
}

impl PageLayout {
    /// Create a page layout.
    pub fn new(number: u32, blocks: Vec<Block>) -> Self {
        Self { number, blocks }
    }

    /// Font sizes of every span on the page, in document order.
    pub fn span_sizes(&self) -> Vec<f32> {
        self.blocks
            .iter()
            .flat_map(|b| b.spans())
            .map(|s| s.size)
            .collect()
    }

    /// Check if the page has no spans at all.
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.spans().next().is_none())
    }
}

/// A parsed document: its file name and page layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Document file name (e.g., "report.pdf")
    pub name: String,
    /// Pages in order
    pub pages: Vec<PageLayout>,
}

impl ParsedDocument {
    /// Create a parsed document.
    pub fn new(name: impl Into<String>, pages: Vec<PageLayout>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
