// Agent module
// This module derives the difficulty policy and drives quiz generation


use std::fmt;

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::database::sqlite::models::QuizAttempt;
use crate::database::sqlite::queries::{AttemptQueries, CourseQueries};
use crate::embeddings::{EmbeddingProvider, TextGenerator};
use crate::retriever::Retriever;
use crate::{QuizError, Result};

/// Score at or above which an attempt counts as passing. Shared by the
/// difficulty policy and the pass-rate statistic.
pub const PASS_THRESHOLD_PERCENT: i64 = 50;

/// Score at or above which the next quiz moves to the hard tier.
pub const HARD_THRESHOLD_PERCENT: i64 = 80;

/// Difficulty bucket for the next quiz, each bound to a fixed question
/// count and pedagogical goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    /// Policy lookup on the most recent score. No history defaults to the
    /// easiest tier.
    #[inline]
    pub fn for_last_score(last_score: Option<i64>) -> Self {
        match last_score {
            None => Self::Easy,
            Some(score) if score < PASS_THRESHOLD_PERCENT => Self::Easy,
            Some(score) if score < HARD_THRESHOLD_PERCENT => Self::Medium,
            Some(_) => Self::Hard,
        }
    }

    /// Policy lookup over an attempt history ordered oldest first; only
    /// the last (most recent) attempt's score matters.
    #[inline]
    pub fn for_history(history: &[QuizAttempt]) -> Self {
        Self::for_last_score(history.last().map(|attempt| attempt.score_percent))
    }

    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }

    #[inline]
    pub fn question_count(self) -> u32 {
        match self {
            Self::Easy => 5,
            Self::Medium => 10,
            Self::Hard => 15,
        }
    }

    #[inline]
    pub fn pedagogical_goal(self) -> &'static str {
        match self {
            Self::Easy => "Generate simpler questions to reinforce basics and build confidence.",
            Self::Medium => {
                "Introduce application-based questions and moderately complex scenarios."
            }
            Self::Hard => {
                "Challenge the student with complex, edge-case, or multi-step reasoning questions."
            }
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assemble the generation request: retrieved context, difficulty, goal,
/// question count, and the strict output-format instruction.
#[inline]
pub fn build_prompt(context: &str, tier: DifficultyTier) -> String {
    format!(
        r#"You are an AI tutor agent.

CONTEXT FROM COURSE MATERIAL:
{context}

STUDENT STATUS:
- Difficulty Level: {difficulty}
- Goal: {goal}

TASK:
Generate a unique quiz with {count} multiple-choice questions based ONLY on the provided context.

OUTPUT FORMAT:
Return strictly a raw JSON array (no markdown, no ```json wrappers).
Each object must strictly follow this structure:
[
  {{
    "question": "Question text here?",
    "options": ["A. Option 1", "B. Option 2", "C. Option 3", "D. Option 4"],
    "correctAnswer": "A",
    "explanation": "Brief explanation of why A is correct."
  }}
]
"#,
        context = context,
        difficulty = tier.label(),
        goal = tier.pedagogical_goal(),
        count = tier.question_count(),
    )
}

/// Stateless quiz-generation agent.
///
/// Every call recomputes the difficulty policy from the stored attempt
/// history, retrieves fresh context, and submits one generation request.
pub struct QuizAgent<P, G> {
    retriever: Retriever<P>,
    generator: G,
}

impl<P: EmbeddingProvider, G: TextGenerator> QuizAgent<P, G> {
    #[inline]
    pub fn new(embedder: P, generator: G) -> Self {
        Self {
            retriever: Retriever::new(embedder),
            generator,
        }
    }

    /// Generate a quiz for a (student, course) pair and return the
    /// provider's raw text unmodified; parsing is the caller's concern.
    ///
    /// Fails with [`QuizError::CourseNotFound`] when the course does not
    /// exist. Provider failures do not surface: the generation client
    /// substitutes `"[]"` and a failed query embedding degrades retrieval
    /// to insertion order.
    #[inline]
    pub async fn generate_quiz(
        &self,
        pool: &SqlitePool,
        student_id: i64,
        course_id: i64,
    ) -> Result<String> {
        let history = AttemptQueries::history(pool, student_id, course_id).await?;
        let tier = DifficultyTier::for_history(&history);

        info!(
            "Generating {} quiz ({} questions) for student {} on course {} ({} prior attempts)",
            tier,
            tier.question_count(),
            student_id,
            course_id,
            history.len()
        );

        let course = CourseQueries::get_by_id(pool, course_id)
            .await?
            .ok_or(QuizError::CourseNotFound(course_id))?;

        let query = format!("core concepts of {}", course.title);
        let context = self
            .retriever
            .retrieve_context(pool, &course, &query)
            .await?;

        let prompt = build_prompt(&context, tier);
        debug!("Submitting generation prompt ({} characters)", prompt.len());

        Ok(self.generator.generate(&prompt))
    }
}
