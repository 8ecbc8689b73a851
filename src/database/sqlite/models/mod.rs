#[cfg(test)]
mod tests;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub created_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
}

/// A stored course chunk with its embedding vector parsed from storage.
///
/// An embedding that cannot be parsed back out of the database is replaced
/// with an empty vector, which ranks as "no similarity" during retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseChunk {
    pub id: i64,
    pub course_id: i64,
    pub chunk_index: i64,
    pub content: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourseChunk {
    pub course_id: i64,
    pub chunk_index: i64,
    pub content: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct QuizAttempt {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub score_percent: i64,
    pub correct_answers: Option<i64>,
    pub total_questions: Option<i64>,
    pub completed_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuizAttempt {
    pub student_id: i64,
    pub course_id: i64,
    pub score_percent: i64,
    pub correct_answers: Option<i64>,
    pub total_questions: Option<i64>,
}

/// Aggregated per-course numbers shown by the list and stats commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseStatistics {
    pub total_chunks: i64,
    pub total_attempts: i64,
    pub average_score: f64,
    pub pass_rate: f64,
}
