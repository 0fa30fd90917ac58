//! The text-embedding seam.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Turns text into a fixed-length vector.
///
/// Implementations are driven from a single thread and may keep mutable
/// state (inference sessions, scratch buffers) between calls.
pub trait Embedder {
    /// Embed one text.
    fn embed(&mut self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, one vector per input, in input order.
    ///
    /// The default calls [`Embedder::embed`] in a loop.
    fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    /// Length of the vectors produced.
    fn dimension(&self) -> usize;

    /// Short backend name for logging.
    fn name(&self) -> &str;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }

    fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Available embedding backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbedderKind {
    /// Feature hashing, no model files
    #[default]
    Hashing,
    /// ONNX Runtime sentence embedding model
    Onnx,
}

impl FromStr for EmbedderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hashing" | "hash" => Ok(EmbedderKind::Hashing),
            "onnx" => Ok(EmbedderKind::Onnx),
            other => Err(Error::Config(format!(
                "unknown embedder '{}' (expected 'hashing' or 'onnx')",
                other
            ))),
        }
    }
}

impl fmt::Display for EmbedderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedderKind::Hashing => write!(f, "hashing"),
            EmbedderKind::Onnx => write!(f, "onnx"),
        }
    }
}

/// Cosine similarity of two vectors, clamped to [-1, 1].
///
/// Returns 0.0 when the lengths differ or either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Scale a vector to unit length in place. Zero vectors are left as is.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-12 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}
