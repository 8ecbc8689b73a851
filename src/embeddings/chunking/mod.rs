#[cfg(test)]
mod tests;

use std::sync::LazyLock;

use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default maximum chunk length in characters.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 500;

/// Configuration for course content chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters before a new chunk is started
    pub max_chunk_size: usize,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }
}

// A sentence boundary sits immediately after a terminator and before
// whitespace; the lookbehind keeps the terminator attached to its sentence.
static SENTENCE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?<=[.!?])\s+").expect("sentence boundary pattern is valid")
});

/// Split course text into sentence-bounded chunks of at most `max_size`
/// characters.
///
/// Sentences accumulate greedily: when appending the next sentence would
/// push the running chunk past `max_size`, the chunk is closed and the
/// sentence starts a new one. A single sentence longer than `max_size` is
/// never split further and becomes its own oversized chunk. Empty or
/// whitespace-only input yields no chunks.
#[inline]
pub fn chunk_text(text: &str, max_size: usize) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(trimmed) {
        if !current.is_empty() && current.len() + 1 + sentence.len() > max_size {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(sentence);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    debug!(
        "Chunked {} characters into {} chunks (max size {})",
        trimmed.len(),
        chunks.len(),
        max_size
    );

    chunks
}

fn split_sentences(text: &str) -> Vec<&str> {
    match SENTENCE_BOUNDARY.split(text).collect::<Result<Vec<_>, _>>() {
        Ok(sentences) => sentences.into_iter().filter(|s| !s.is_empty()).collect(),
        Err(e) => {
            warn!("Sentence splitting failed, keeping text whole: {}", e);
            vec![text]
        }
    }
}
