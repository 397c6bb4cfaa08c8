/// Domain interface for sentence embeddings.
///
/// Must return one vector per input, all of the same length, and the same
/// vectors for the same text.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, Box<dyn std::error::Error>>;
}
