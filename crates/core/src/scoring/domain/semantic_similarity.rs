use std::sync::Arc;

use super::measurement::Measurement;
use super::text_embedder::TextEmbedder;

/// Cosine similarity between two texts, in [0, 1].
///
/// Never fails: a missing embedder or any embedding error yields the
/// configured fallback as a [`Measurement::Degraded`].
#[derive(Clone)]
pub struct SemanticSimilarity {
    embedder: Option<Arc<dyn TextEmbedder>>,
    fallback: f64,
}

impl SemanticSimilarity {
    pub fn new(embedder: Option<Arc<dyn TextEmbedder>>, fallback: f64) -> Self {
        Self { embedder, fallback }
    }

    pub fn measure(&self, a: &str, b: &str) -> Measurement<f64> {
        let Some(embedder) = &self.embedder else {
            return Measurement::degraded(self.fallback, "no embedding model available");
        };
        match similarity(embedder.as_ref(), a, b) {
            Ok(value) => Measurement::Measured(value),
            Err(e) => Measurement::degraded(self.fallback, format!("embedding failed: {e}")),
        }
    }
}

fn similarity(
    embedder: &dyn TextEmbedder,
    a: &str,
    b: &str,
) -> Result<f64, Box<dyn std::error::Error>> {
    let embeddings = embedder.embed(&[a, b])?;
    let [first, second] = embeddings.as_slice() else {
        return Err(format!("expected 2 embeddings, got {}", embeddings.len()).into());
    };
    let cosine = cosine_similarity(first, second)?;
    // Negative cosine means unrelated for scoring purposes.
    Ok(cosine.clamp(0.0, 1.0))
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, Box<dyn std::error::Error>> {
    if a.len() != b.len() {
        return Err(format!("embedding dimensions differ: {} vs {}", a.len(), b.len()).into());
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let cosine = dot / (norm_a * norm_b);
    if cosine.is_finite() {
        Ok(cosine)
    } else {
        Err("embedding contains non-finite values".into())
    }
}
