//! Model types shared across the pipeline.
//!
//! Layout types carry what the PDF parser sees (spans with size and style
//! flags), content types carry what the classifier keeps (titles and
//! paragraphs), and report types carry what the run emits.

mod content;
mod layout;
mod report;
mod request;

pub use content::{PageRecord, Paragraph};
pub use layout::{flags, Block, Line, PageLayout, ParsedDocument, Span};
pub use report::{format_timestamp, Report, ReportMetadata, Section, SubSection};
pub use request::{InputRecord, JobToBeDone, Persona};
