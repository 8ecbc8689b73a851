// Embeddings module
// This module handles Gemini integration and course content chunking

pub mod chunking;
pub mod gemini;

pub use chunking::{ChunkingConfig, DEFAULT_MAX_CHUNK_SIZE, chunk_text};
pub use gemini::{EMPTY_GENERATION, GeminiClient};

/// Produces embedding vectors for similarity comparison.
///
/// Callers treat a failed call, or an empty result, as "no embedding" for
/// the affected text: the chunk is skipped on ingestion and scores zero
/// on retrieval.
pub trait EmbeddingProvider {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// Produces free text for a prompt.
///
/// Never fails: implementations substitute the empty JSON array literal
/// `"[]"` when the provider is unreachable or its response is unusable.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> String;
}

impl EmbeddingProvider for GeminiClient {
    #[inline]
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        GeminiClient::embed(self, text)
    }
}

impl TextGenerator for GeminiClient {
    #[inline]
    fn generate(&self, prompt: &str) -> String {
        GeminiClient::generate(self, prompt)
    }
}
