// Indexer module
// This module turns course content into embedded, stored chunks


use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::database::sqlite::models::{Course, NewCourseChunk};
use crate::database::sqlite::queries::ChunkQueries;
use crate::embeddings::chunking::{ChunkingConfig, chunk_text};
use crate::embeddings::{EmbeddingProvider, GeminiClient};

/// Statistics about a single course ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestStats {
    pub chunks_created: usize,
    pub chunks_skipped: usize,
}

/// Ingestion pipeline: chunks course content, embeds each chunk, and
/// replaces the course's stored chunk set.
pub struct Indexer<P> {
    provider: P,
    chunking: ChunkingConfig,
}

impl Indexer<GeminiClient> {
    #[inline]
    pub fn new(config: &Config) -> Result<Self> {
        let provider =
            GeminiClient::new(config).context("Failed to initialize Gemini client")?;
        Ok(Self::with_provider(provider, config.chunking.clone()))
    }
}

impl<P: EmbeddingProvider> Indexer<P> {
    #[inline]
    pub fn with_provider(provider: P, chunking: ChunkingConfig) -> Self {
        Self { provider, chunking }
    }

    /// Chunk and embed a course's content, then replace its stored chunk
    /// set in one transaction.
    ///
    /// Embedding calls run sequentially, one round trip per chunk. A chunk
    /// whose embedding call fails or comes back empty is skipped, never
    /// stored with a placeholder vector. `on_progress` is called after each
    /// embedding attempt with `(completed, total)`.
    #[inline]
    pub async fn ingest_course(
        &self,
        pool: &SqlitePool,
        course: &Course,
        mut on_progress: impl FnMut(usize, usize),
    ) -> Result<IngestStats> {
        let segments = chunk_text(&course.content, self.chunking.max_chunk_size);
        info!(
            "Ingesting course {} ({} segments)",
            course.id,
            segments.len()
        );

        let mut new_chunks = Vec::with_capacity(segments.len());
        let mut skipped = 0usize;

        for (index, content) in segments.iter().enumerate() {
            match self.provider.embed(content) {
                Ok(embedding) if !embedding.is_empty() => {
                    new_chunks.push(NewCourseChunk {
                        course_id: course.id,
                        chunk_index: index as i64,
                        content: content.clone(),
                        embedding,
                    });
                }
                Ok(_) => {
                    warn!(
                        "Empty embedding for segment {} of course {}, skipping",
                        index, course.id
                    );
                    skipped += 1;
                }
                Err(e) => {
                    warn!(
                        "Embedding failed for segment {} of course {}, skipping: {:#}",
                        index, course.id, e
                    );
                    skipped += 1;
                }
            }

            on_progress(index + 1, segments.len());
        }

        let stored = ChunkQueries::replace_for_course(pool, course.id, &new_chunks)
            .await
            .context("Failed to replace course chunks")?;

        debug!(
            "Course {} ingestion complete: {} stored, {} skipped",
            course.id, stored, skipped
        );

        Ok(IngestStats {
            chunks_created: stored,
            chunks_skipped: skipped,
        })
    }
}
