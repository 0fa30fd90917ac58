//! PDF backend abstraction layer.
//!
//! The layout analyzer only talks to [`PdfBackend`], which keeps `lopdf`
//! types out of span extraction and lets tests drive the analyzer with
//! hand-written content streams.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::flags;

/// Page identifier: (object number, generation number).
pub type PageId = (u32, u16);

/// A font resource available on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct FontResource {
    /// Resource name (key in the page's font dictionary, e.g. `F1`)
    pub name: Vec<u8>,
    /// Base font name (e.g., "Helvetica-Bold")
    pub base_font: String,
    /// Style flags derived from the font name and descriptor
    pub flags: u32,
}

impl FontResource {
    /// Create a font resource, deriving style flags from the base font name.
    pub fn new(name: impl Into<Vec<u8>>, base_font: impl Into<String>) -> Self {
        let base_font = base_font.into();
        let flags = flags_from_font_name(&base_font);
        Self {
            name: name.into(),
            base_font,
            flags,
        }
    }

    /// Merge in flags from a font descriptor's `/Flags` entry.
    pub fn with_descriptor_flags(mut self, descriptor_flags: i64) -> Self {
        self.flags |= flags_from_descriptor(descriptor_flags);
        self
    }
}

/// A value from a PDF content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<Operand>),
    Other,
}

impl Operand {
    /// Numeric value, if the operand is a number.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Operand::Integer(i) => Some(*i as f32),
            Operand::Real(r) => Some(*r),
            _ => None,
        }
    }
}

/// A single operation from a PDF content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<Operand>,
}

impl ContentOp {
    /// Create an operation.
    pub fn new(operator: impl Into<String>, operands: Vec<Operand>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    /// Numeric operand at `index`, or `default` when absent or not a number.
    pub fn number(&self, index: usize, default: f32) -> f32 {
        self.operands
            .get(index)
            .and_then(Operand::as_f32)
            .unwrap_or(default)
    }
}

/// Abstract interface for PDF document access.
pub trait PdfBackend {
    /// Return all pages as (page_number → PageId).
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// Return the font resources of a page.
    fn page_fonts(&self, page: PageId) -> Result<Vec<FontResource>>;

    /// Return the decompressed content stream bytes of a page.
    fn page_content(&self, page: PageId) -> Result<Vec<u8>>;

    /// Parse raw content stream bytes into a sequence of operations.
    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>>;

    /// Decode a string operand using the font's encoding on the given page.
    /// Falls back to simple decoding if the font or encoding is unavailable.
    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String;
}

/// Style flags implied by a base font name such as `ABCDEF+Times-BoldItalic`.
pub fn flags_from_font_name(base_font: &str) -> u32 {
    let name = base_font
        .rsplit_once('+')
        .map(|(_, n)| n)
        .unwrap_or(base_font)
        .to_lowercase();

    let mut result = 0;
    if ["bold", "black", "heavy", "semibold", "demi"]
        .iter()
        .any(|k| name.contains(k))
    {
        result |= flags::BOLD;
    }
    if name.contains("italic") || name.contains("oblique") {
        result |= flags::ITALIC;
    }
    if name.contains("courier") || name.contains("mono") {
        result |= flags::MONOSPACE;
    }
    if (name.contains("times") || name.contains("serif") || name.contains("georgia"))
        && !name.contains("sans")
    {
        result |= flags::SERIF;
    }
    result
}

/// Style flags implied by a font descriptor's `/Flags` bit field.
pub fn flags_from_descriptor(descriptor_flags: i64) -> u32 {
    const FIXED_PITCH: i64 = 1;
    const SERIF: i64 = 1 << 1;
    const ITALIC: i64 = 1 << 6;
    const FORCE_BOLD: i64 = 1 << 18;

    let mut result = 0;
    if descriptor_flags & FIXED_PITCH != 0 {
        result |= flags::MONOSPACE;
    }
    if descriptor_flags & SERIF != 0 {
        result |= flags::SERIF;
    }
    if descriptor_flags & ITALIC != 0 {
        result |= flags::ITALIC;
    }
    if descriptor_flags & FORCE_BOLD != 0 {
        result |= flags::BOLD;
    }
    result
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

// ---------------------------------------------------------------------------
// LopdfBackend: concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

use lopdf::{Document as LopdfDocument, Object};

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path).map_err(Error::from)?;
        Ok(Self { doc })
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data).map_err(Error::from)?;
        Ok(Self { doc })
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version string.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn descriptor_flags(&self, font: &lopdf::Dictionary) -> Option<i64> {
        let descriptor = match font.get(b"FontDescriptor").ok()? {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok()?,
            Object::Dictionary(d) => d,
            _ => return None,
        };
        descriptor.get(b"Flags").ok()?.as_i64().ok()
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_fonts(&self, page: PageId) -> Result<Vec<FontResource>> {
        let fonts = self
            .doc
            .get_page_fonts(page)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(fonts
            .iter()
            .map(|(name, dict)| {
                let base_font = dict
                    .get(b"BaseFont")
                    .ok()
                    .and_then(|o| o.as_name().ok())
                    .map(|n| String::from_utf8_lossy(n).to_string())
                    .unwrap_or_else(|| "Unknown".to_string());
                let resource = FontResource::new(name.clone(), base_font);
                match self.descriptor_flags(dict) {
                    Some(f) => resource.with_descriptor_flags(f),
                    None => resource,
                }
            })
            .collect())
    }

    fn page_content(&self, page: PageId) -> Result<Vec<u8>> {
        self.doc
            .get_page_content(page)
            .map_err(|e| Error::PdfParse(e.to_string()))
    }

    fn decode_content(&self, data: &[u8]) -> Result<Vec<ContentOp>> {
        let content =
            lopdf::content::Content::decode(data).map_err(|e| Error::PdfParse(e.to_string()))?;

        Ok(content
            .operations
            .into_iter()
            .map(|op| ContentOp {
                operator: op.operator,
                operands: op.operands.iter().map(convert_object).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font_name: &[u8], bytes: &[u8]) -> String {
        if let Ok(fonts) = self.doc.get_page_fonts(page) {
            if let Some(font) = fonts.get(font_name) {
                if let Ok(enc) = font.get_font_encoding(&self.doc) {
                    if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                        return text;
                    }
                }
            }
        }
        decode_text_simple(bytes)
    }
}

/// Convert a `lopdf::Object` to [`Operand`].
fn convert_object(obj: &Object) -> Operand {
    match obj {
        Object::Integer(i) => Operand::Integer(*i),
        Object::Real(r) => Operand::Real(*r),
        Object::Name(n) => Operand::Name(n.clone()),
        Object::String(b, _) => Operand::Str(b.clone()),
        Object::Array(arr) => Operand::Array(arr.iter().map(convert_object).collect()),
        _ => Operand::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        // 0xE9 = 'é' in Latin-1
        let bytes = vec![0x48, 0x65, 0x6C, 0x6C, 0xE9];
        assert_eq!(decode_text_simple(&bytes), "Hellé");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text_simple(&bytes), "Hi");
    }

    #[test]
    fn test_flags_from_font_name() {
        assert_eq!(flags_from_font_name("Helvetica-Bold"), flags::BOLD);
        assert_eq!(
            flags_from_font_name("ABCDEF+Times-BoldItalic"),
            flags::BOLD | flags::ITALIC | flags::SERIF
        );
        assert_eq!(flags_from_font_name("Courier"), flags::MONOSPACE);
        assert_eq!(flags_from_font_name("OpenSans-Regular"), 0);
        assert_eq!(flags_from_font_name("Helvetica"), 0);
    }

    #[test]
    fn test_flags_from_descriptor() {
        assert_eq!(flags_from_descriptor(1 << 18), flags::BOLD);
        assert_eq!(flags_from_descriptor(64 | 2), flags::ITALIC | flags::SERIF);
        assert_eq!(flags_from_descriptor(32), 0);
    }

    #[test]
    fn test_font_resource_merges_descriptor() {
        let font = FontResource::new(b"F1".to_vec(), "Arial").with_descriptor_flags(1 << 18);
        assert!(font.flags & flags::BOLD != 0);
    }

    #[test]
    fn test_content_op_number() {
        let op = ContentOp::new("Td", vec![Operand::Integer(42), Operand::Real(3.5)]);
        assert_eq!(op.number(0, 0.0), 42.0);
        assert_eq!(op.number(1, 0.0), 3.5);
        assert_eq!(op.number(2, 7.0), 7.0);
    }
}
