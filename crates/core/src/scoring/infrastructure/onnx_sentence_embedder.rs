/// Sentence embedder for MiniLM-style transformer models using ONNX Runtime.
///
/// Tokenizes with a HuggingFace `tokenizer.json`, runs the encoder, and
/// mean-pools the last hidden state over the attention mask. Output vectors
/// are L2-normalized.
use std::path::Path;
use std::sync::Mutex;

use ndarray::{Array2, ArrayViewD, Axis};
use tokenizers::{Encoding, Tokenizer, TruncationParams};

use crate::scoring::domain::text_embedder::TextEmbedder;

/// Longest input the model was trained on; longer transcripts are truncated.
pub const MAX_SEQUENCE_LENGTH: usize = 256;

pub struct OnnxSentenceEmbedder {
    session: Mutex<ort::session::Session>,
    tokenizer: Tokenizer,
}

impl OnnxSentenceEmbedder {
    pub fn new(model_path: &Path, tokenizer_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| format!("Failed to load tokenizer {}: {e}", tokenizer_path.display()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| format!("Failed to configure truncation: {e}"))?;

        let intra_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_inter_threads(1)?
            .with_intra_threads(intra_threads)?
            .commit_from_file(model_path)?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
        })
    }
}

impl TextEmbedder for OnnxSentenceEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, Box<dyn std::error::Error>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| format!("Tokenization failed: {e}"))?;
        let batch = Batch::from_encodings(&encodings);

        let input_ids = ort::value::Tensor::from_array(batch.input_ids)?;
        let attention_mask = ort::value::Tensor::from_array(batch.attention_mask.clone())?;
        let token_type_ids = ort::value::Tensor::from_array(batch.token_type_ids)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => input_ids,
            "attention_mask" => attention_mask,
            "token_type_ids" => token_type_ids
        ])?;
        let hidden = outputs[0].try_extract_array::<f32>()?;

        let mut embeddings = mean_pool(hidden, &batch.attention_mask)?;
        for embedding in &mut embeddings {
            l2_normalize(embedding);
        }
        Ok(embeddings)
    }
}

/// Token ids padded to the longest sequence in the batch.
struct Batch {
    input_ids: Array2<i64>,
    attention_mask: Array2<i64>,
    token_type_ids: Array2<i64>,
}

impl Batch {
    fn from_encodings(encodings: &[Encoding]) -> Self {
        let rows = encodings.len();
        let cols = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut batch = Self {
            input_ids: Array2::zeros((rows, cols)),
            attention_mask: Array2::zeros((rows, cols)),
            token_type_ids: Array2::zeros((rows, cols)),
        };
        for (row, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let types = encoding.get_type_ids();
            for col in 0..ids.len() {
                batch.input_ids[[row, col]] = ids[col] as i64;
                batch.attention_mask[[row, col]] = mask[col] as i64;
                batch.token_type_ids[[row, col]] = types[col] as i64;
            }
        }
        batch
    }
}

/// Averages `[batch, tokens, dim]` hidden states over unmasked tokens.
fn mean_pool(
    hidden: ArrayViewD<'_, f32>,
    attention_mask: &Array2<i64>,
) -> Result<Vec<Vec<f32>>, Box<dyn std::error::Error>> {
    let hidden = hidden
        .into_dimensionality::<ndarray::Ix3>()
        .map_err(|e| format!("Unexpected hidden state shape: {e}"))?;
    let (rows, tokens, dim) = hidden.dim();
    if rows != attention_mask.nrows() || tokens != attention_mask.ncols() {
        return Err(format!(
            "Hidden state shape {:?} does not match attention mask {:?}",
            hidden.dim(),
            attention_mask.dim()
        )
        .into());
    }

    let mut pooled = Vec::with_capacity(rows);
    for (row, states) in hidden.axis_iter(Axis(0)).enumerate() {
        let mut sum = vec![0.0f32; dim];
        let mut count = 0.0f32;
        for (token, state) in states.axis_iter(Axis(0)).enumerate() {
            if attention_mask[[row, token]] == 0 {
                continue;
            }
            for (acc, value) in sum.iter_mut().zip(state.iter()) {
                *acc += value;
            }
            count += 1.0;
        }
        if count > 0.0 {
            for acc in &mut sum {
                *acc /= count;
            }
        }
        pooled.push(sum);
    }
    Ok(pooled)
}

pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_l2_normalize_unit_vector() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let mut v = vec![0.0, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_mean_pool_ignores_padding() {
        // One sequence of 3 tokens, last one padded.
        let hidden = Array3::from_shape_vec(
            (1, 3, 2),
            vec![1.0, 2.0, 3.0, 4.0, 100.0, 100.0],
        )
        .unwrap();
        let mask = Array2::from_shape_vec((1, 3), vec![1, 1, 0]).unwrap();
        let pooled = mean_pool(hidden.into_dyn().view(), &mask).unwrap();
        assert_eq!(pooled, vec![vec![2.0, 3.0]]);
    }

    #[test]
    fn test_mean_pool_batch_rows_independent() {
        let hidden = Array3::from_shape_vec(
            (2, 2, 1),
            vec![2.0, 4.0, 10.0, 0.0],
        )
        .unwrap();
        let mask = Array2::from_shape_vec((2, 2), vec![1, 1, 1, 0]).unwrap();
        let pooled = mean_pool(hidden.into_dyn().view(), &mask).unwrap();
        assert_eq!(pooled, vec![vec![3.0], vec![10.0]]);
    }

    #[test]
    fn test_mean_pool_fully_masked_row_is_zero() {
        let hidden = Array3::from_shape_vec((1, 2, 2), vec![1.0, 1.0, 1.0, 1.0]).unwrap();
        let mask = Array2::from_shape_vec((1, 2), vec![0, 0]).unwrap();
        let pooled = mean_pool(hidden.into_dyn().view(), &mask).unwrap();
        assert_eq!(pooled, vec![vec![0.0, 0.0]]);
    }

    #[test]
    fn test_mean_pool_rejects_shape_mismatch() {
        let hidden = Array3::<f32>::zeros((1, 4, 2));
        let mask = Array2::from_shape_vec((1, 3), vec![1, 1, 1]).unwrap();
        assert!(mean_pool(hidden.into_dyn().view(), &mask).is_err());
    }

    #[test]
    fn test_mean_pool_rejects_wrong_rank() {
        let hidden = Array2::<f32>::zeros((1, 4));
        let mask = Array2::from_shape_vec((1, 4), vec![1, 1, 1, 1]).unwrap();
        assert!(mean_pool(hidden.into_dyn().view(), &mask).is_err());
    }

    #[test]
    fn test_missing_tokenizer_file_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = OnnxSentenceEmbedder::new(
            &dir.path().join("model.onnx"),
            &dir.path().join("tokenizer.json"),
        );
        assert!(result.is_err());
    }
}
