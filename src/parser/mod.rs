//! PDF parsing module.

mod backend;
mod layout;
mod options;
mod pdf_parser;

pub use backend::{
    decode_text_simple, flags_from_descriptor, flags_from_font_name, ContentOp, FontResource,
    LopdfBackend, Operand, PageId, PdfBackend,
};
pub use layout::{LayoutAnalyzer, PositionedSpan};
pub use options::{ErrorMode, ParseOptions};
pub use pdf_parser::{parse_path, PdfParser};
