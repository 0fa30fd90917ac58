//! ONNX Runtime sentence-embedding backend.
//!
//! Expects a directory holding `model.onnx` (a BERT-style encoder such as
//! all-MiniLM-L6-v2 exported to ONNX) and its `tokenizer.json`. The model
//! takes `input_ids`, `attention_mask` and `token_type_ids` and returns the
//! last hidden state; sentence vectors are the mean over tokens followed by
//! L2 normalization.

use std::path::Path;

use ndarray::{Array2, Axis};
use ort::{session::Session, value::Value};
use tokenizers::Tokenizer;

use crate::error::{Error, Result};

use super::embedder::{l2_normalize, Embedder};

/// Model file name inside the model directory.
pub const MODEL_FILE: &str = "model.onnx";

/// Tokenizer file name inside the model directory.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Longest input in tokens; longer texts are truncated.
const MAX_TOKENS: usize = 256;

/// Sentence embedder backed by an ONNX Runtime session.
pub struct OnnxEmbedder {
    session: Session,
    tokenizer: Tokenizer,
    dimension: usize,
}

impl OnnxEmbedder {
    /// Load from a directory containing the model and tokenizer.
    pub fn from_dir(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);

        if !model_path.exists() {
            return Err(Error::Embedding(format!(
                "ONNX model not found at {}",
                model_path.display()
            )));
        }
        if !tokenizer_path.exists() {
            return Err(Error::Embedding(format!(
                "tokenizer not found at {}",
                tokenizer_path.display()
            )));
        }

        Self::from_files(&model_path, &tokenizer_path)
    }

    /// Load from explicit file paths.
    pub fn from_files(model_path: &Path, tokenizer_path: &Path) -> Result<Self> {
        log::info!("Loading ONNX model from {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| load_error(model_path, e))?
            .with_intra_threads(1)
            .map_err(|e| load_error(model_path, e))?
            .commit_from_file(model_path)
            .map_err(|e| load_error(model_path, e))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| Error::Embedding(format!("failed to load tokenizer: {}", e)))?;

        let mut embedder = Self {
            session,
            tokenizer,
            dimension: 0,
        };
        // The hidden size is only known from an actual output.
        embedder.dimension = embedder.embed("dimension check")?.len();

        log::info!("ONNX embedder loaded ({} dimensions)", embedder.dimension);
        Ok(embedder)
    }

    fn tokenize(&self, text: &str) -> Result<(Vec<i64>, Vec<i64>, Vec<i64>)> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::Embedding(format!("tokenization failed: {}", e)))?;

        let len = encoding.get_ids().len().min(MAX_TOKENS);
        let ids = encoding.get_ids()[..len].iter().map(|&x| x as i64).collect();
        let mask = encoding.get_attention_mask()[..len]
            .iter()
            .map(|&x| x as i64)
            .collect();
        let type_ids = encoding.get_type_ids()[..len]
            .iter()
            .map(|&x| x as i64)
            .collect();
        Ok((ids, mask, type_ids))
    }
}

impl Embedder for OnnxEmbedder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
        let (ids, mask, type_ids) = self.tokenize(text)?;
        let seq_len = ids.len();
        if seq_len == 0 {
            return Err(Error::Embedding("tokenizer produced no tokens".into()));
        }

        let to_value = |data: Vec<i64>| {
            Array2::from_shape_vec((1, seq_len), data)
                .map_err(|e| Error::Embedding(e.to_string()))
                .and_then(|a| Value::from_array(a).map_err(|e| Error::Embedding(e.to_string())))
        };
        let weights: Vec<f32> = mask.iter().map(|&m| m as f32).collect();
        let input_ids = to_value(ids)?;
        let attention_mask = to_value(mask)?;
        let token_type_ids = to_value(type_ids)?;

        let outputs = self
            .session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => token_type_ids,
            ])
            .map_err(|e| Error::Embedding(format!("ONNX inference failed: {}", e)))?;

        // Last hidden state: [1, seq_len, hidden]
        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Embedding(format!("failed to extract output tensor: {}", e)))?;
        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        if dims.len() != 3 || dims[0] != 1 || dims[1] != seq_len {
            return Err(Error::Embedding(format!(
                "unexpected output shape {:?}, expected [1, {}, hidden]",
                dims, seq_len
            )));
        }

        let hidden = Array2::from_shape_vec((dims[1], dims[2]), data.to_vec())
            .map_err(|e| Error::Embedding(e.to_string()))?;

        // Masked mean pooling
        let mask_sum: f32 = weights.iter().sum::<f32>().max(1e-9);
        let weighted = &hidden * &ndarray::Array1::from(weights).insert_axis(Axis(1));
        let mut pooled: Vec<f32> = weighted
            .sum_axis(Axis(0))
            .iter()
            .map(|x| x / mask_sum)
            .collect();

        l2_normalize(&mut pooled);
        Ok(pooled)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

fn load_error<E: std::fmt::Display>(model_path: &Path, e: E) -> Error {
    Error::Embedding(format!(
        "failed to load ONNX model from {}: {}",
        model_path.display(),
        e
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = OnnxEmbedder::from_dir(dir.path());
        assert!(matches!(result, Err(Error::Embedding(msg)) if msg.contains("model.onnx")));
    }

    #[test]
    fn test_missing_tokenizer() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), b"not a model").unwrap();
        let result = OnnxEmbedder::from_dir(dir.path());
        assert!(matches!(result, Err(Error::Embedding(msg)) if msg.contains("tokenizer")));
    }
}
