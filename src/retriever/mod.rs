// Retriever module
// This module ranks stored course chunks against a query embedding


use anyhow::Result;
use itertools::Itertools;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::database::sqlite::models::{Course, CourseChunk};
use crate::database::sqlite::queries::ChunkQueries;
use crate::embeddings::EmbeddingProvider;

/// Separator between chunk texts in the assembled context.
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Number of top-scoring chunks included in the context.
pub const CONTEXT_CHUNK_COUNT: usize = 3;

/// Cosine similarity of two vectors.
///
/// Exactly `0` (never NaN, never an error) when either vector is empty,
/// the lengths differ, or either magnitude is zero.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot = x.mul_add(*y, dot);
        norm_a = x.mul_add(*x, norm_a);
        norm_b = y.mul_add(*y, norm_b);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b).sqrt()
}

/// Rank chunks by cosine similarity to `query`, highest first, and return
/// the top `top_k`. The sort is stable, so equal scores keep the chunks'
/// insertion order (earlier-inserted wins).
#[inline]
pub fn rank_chunks<'a>(
    chunks: &'a [CourseChunk],
    query: &[f32],
    top_k: usize,
) -> Vec<&'a CourseChunk> {
    let mut scored: Vec<(&CourseChunk, f32)> = chunks
        .iter()
        .map(|chunk| (chunk, cosine_similarity(&chunk.embedding, query)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(top_k)
        .map(|(chunk, _)| chunk)
        .collect()
}

/// Retrieves the most relevant stored chunk texts for a query.
pub struct Retriever<P> {
    provider: P,
}

impl<P: EmbeddingProvider> Retriever<P> {
    #[inline]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Assemble context text for a course: embed the query, rank the
    /// course's chunks by similarity, and join the top 3 texts with
    /// [`CONTEXT_SEPARATOR`].
    ///
    /// A failed query embedding degrades to an empty vector, which scores
    /// every chunk at zero and falls back to insertion order.
    #[inline]
    pub async fn retrieve_context(
        &self,
        pool: &SqlitePool,
        course: &Course,
        query: &str,
    ) -> Result<String> {
        let query_vector = match self.provider.embed(query) {
            Ok(vector) => vector,
            Err(e) => {
                warn!(
                    "Query embedding failed for course {}, ranking without similarity: {:#}",
                    course.id, e
                );
                Vec::new()
            }
        };

        let chunks = ChunkQueries::list_by_course(pool, course.id).await?;
        let ranked = rank_chunks(&chunks, &query_vector, CONTEXT_CHUNK_COUNT);

        debug!(
            "Retrieved {} of {} chunks for course {}",
            ranked.len(),
            chunks.len(),
            course.id
        );

        Ok(ranked
            .iter()
            .map(|chunk| chunk.content.as_str())
            .join(CONTEXT_SEPARATOR))
    }
}
