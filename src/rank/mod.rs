//! Relevance ranking: embedders and the paragraph ranker.

mod embedder;
mod hashing;
#[cfg(feature = "onnx")]
mod onnx;
mod ranker;

use std::path::Path;

use crate::error::Result;

pub use embedder::{cosine_similarity, l2_normalize, Embedder, EmbedderKind};
pub use hashing::{HashingEmbedder, DEFAULT_DIMENSION};
#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;
pub use ranker::{build_query, RelevanceRanker, ScoredParagraph};

/// Construct the configured embedder.
///
/// `dimension` applies to the hashing embedder only; the ONNX embedder
/// reports the hidden size of its model.
pub fn load_embedder(
    kind: EmbedderKind,
    model_dir: &Path,
    dimension: usize,
) -> Result<Box<dyn Embedder>> {
    match kind {
        EmbedderKind::Hashing => {
            log::info!("Using hashing embedder ({} dimensions)", dimension);
            Ok(Box::new(HashingEmbedder::new(dimension)?))
        }
        EmbedderKind::Onnx => load_onnx(model_dir),
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(model_dir: &Path) -> Result<Box<dyn Embedder>> {
    Ok(Box::new(OnnxEmbedder::from_dir(model_dir)?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(model_dir: &Path) -> Result<Box<dyn Embedder>> {
    Err(crate::error::Error::Embedding(format!(
        "the onnx embedder is not available in this build (model dir {}); rebuild with --features onnx",
        model_dir.display()
    )))
}
