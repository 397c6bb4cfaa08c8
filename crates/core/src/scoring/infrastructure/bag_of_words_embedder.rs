/// Hashed bag-of-words embedder.
///
/// A model-free fallback that maps lower-cased word tokens into a fixed number
/// of term-frequency buckets. Captures lexical overlap only, not meaning, but
/// is deterministic and needs no download.
use crate::scoring::domain::text_embedder::TextEmbedder;
use crate::shared::text;

pub const DEFAULT_DIMENSIONS: usize = 512;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub struct BagOfWordsEmbedder {
    dimensions: usize,
}

impl BagOfWordsEmbedder {
    pub fn new(dimensions: usize) -> Result<Self, &'static str> {
        if dimensions == 0 {
            return Err("dimensions must be >= 1");
        }
        Ok(Self { dimensions })
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text::lexical_tokens(text) {
            let bucket = (fnv1a(token.as_bytes()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }
        vector
    }
}

impl Default for BagOfWordsEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
        }
    }
}

impl TextEmbedder for BagOfWordsEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, Box<dyn std::error::Error>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Stable across platforms and releases, unlike `DefaultHasher`.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ *b as u64).wrapping_mul(FNV_PRIME)
    })
}
