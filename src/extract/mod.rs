//! Content extraction: block text cleanup, title/paragraph classification
//! and corpus assembly.

mod classify;
mod corpus;
mod normalize;

pub use classify::{paragraph_font_size, ClassifierConfig, PageBlockClassifier};
pub use corpus::Corpus;
pub use normalize::normalize;
