//! Feature-hashing embedder.
//!
//! Lower-cased alphanumeric tokens and adjacent-token bigrams are hashed
//! with xxh3 into a fixed number of buckets. One hash bit picks the sign of
//! the contribution so unrelated features tend to cancel rather than pile
//! up. Vectors are L2-normalized, so cosine similarity reduces to lexical
//! overlap weighted by term frequency.

use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::error::{Error, Result};

use super::embedder::{l2_normalize, Embedder};

/// Default vector length, matching common sentence-embedding models.
pub const DEFAULT_DIMENSION: usize = 384;

const UNIGRAM_SEED: u64 = 0x5eed_0001;
const BIGRAM_SEED: u64 = 0x5eed_0002;

/// Bigram contributions are weighted below single tokens.
const BIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic embedder that needs no model files.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Create an embedder with the given vector length.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(Error::Config("embedding dimension must be positive".into()));
        }
        Ok(Self { dimension })
    }

    /// Embed without the `&mut self` receiver the trait requires.
    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        let mut vector = vec![0.0f32; self.dimension];

        for token in &tokens {
            self.add_feature(&mut vector, token.as_bytes(), UNIGRAM_SEED, 1.0);
        }
        for pair in tokens.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.add_feature(&mut vector, bigram.as_bytes(), BIGRAM_SEED, BIGRAM_WEIGHT);
        }

        l2_normalize(&mut vector);
        vector
    }

    fn add_feature(&self, vector: &mut [f32], feature: &[u8], seed: u64, weight: f32) {
        let hash = xxh3_64_with_seed(feature, seed);
        let bucket = (hash % self.dimension as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
        }
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

/// Split text into lower-cased runs of alphanumeric characters.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}
