
use super::models::{
    Course, CourseChunk, CourseStatistics, NewCourse, NewCourseChunk, NewQuizAttempt, QuizAttempt,
};
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use tracing::warn;

pub struct CourseQueries;

impl CourseQueries {
    #[inline]
    pub async fn create(pool: &SqlitePool, new_course: NewCourse) -> Result<Course> {
        let now = Utc::now().naive_utc();
        let id = sqlx::query(
            "INSERT INTO courses (title, description, content, created_date) VALUES (?, ?, ?, ?)",
        )
        .bind(&new_course.title)
        .bind(&new_course.description)
        .bind(&new_course.content)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create course")?
        .last_insert_rowid();

        Self::get_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created course"))
    }

    #[inline]
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Course>> {
        let result = sqlx::query_as::<_, Course>(
            "SELECT id, title, description, content, created_date FROM courses WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get course by id")?;

        Ok(result)
    }

    #[inline]
    pub async fn get_by_title(pool: &SqlitePool, title: &str) -> Result<Option<Course>> {
        let result = sqlx::query_as::<_, Course>(
            "SELECT id, title, description, content, created_date FROM courses WHERE title = ?",
        )
        .bind(title)
        .fetch_optional(pool)
        .await
        .context("Failed to get course by title")?;

        Ok(result)
    }

    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT id, title, description, content, created_date FROM courses ORDER BY id",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list all courses")?;

        Ok(courses)
    }

    #[inline]
    pub async fn update_content(
        pool: &SqlitePool,
        id: i64,
        content: &str,
    ) -> Result<Option<Course>> {
        let result = sqlx::query("UPDATE courses SET content = ? WHERE id = ?")
            .bind(content)
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to update course content")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::get_by_id(pool, id).await
    }

    /// Delete a course. Its chunks and attempts go with it via the
    /// foreign-key cascades.
    #[inline]
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to delete course")?;

        Ok(result.rows_affected() > 0)
    }

    #[inline]
    pub async fn get_statistics(
        pool: &SqlitePool,
        course_id: i64,
        pass_threshold: i64,
    ) -> Result<Option<CourseStatistics>> {
        if Self::get_by_id(pool, course_id).await?.is_none() {
            return Ok(None);
        }

        let total_chunks: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM course_chunks WHERE course_id = ?")
                .bind(course_id)
                .fetch_one(pool)
                .await
                .context("Failed to count course chunks")?;

        let total_attempts: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM quiz_attempts WHERE course_id = ?")
                .bind(course_id)
                .fetch_one(pool)
                .await
                .context("Failed to count quiz attempts")?;

        let average_score: Option<f64> =
            sqlx::query_scalar("SELECT AVG(score_percent) FROM quiz_attempts WHERE course_id = ?")
                .bind(course_id)
                .fetch_one(pool)
                .await
                .context("Failed to average quiz scores")?;

        let passed: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM quiz_attempts WHERE course_id = ? AND score_percent >= ?",
        )
        .bind(course_id)
        .bind(pass_threshold)
        .fetch_one(pool)
        .await
        .context("Failed to count passing attempts")?;

        let pass_rate = if total_attempts == 0 {
            0.0
        } else {
            passed as f64 * 100.0 / total_attempts as f64
        };

        Ok(Some(CourseStatistics {
            total_chunks,
            total_attempts,
            average_score: average_score.unwrap_or(0.0),
            pass_rate,
        }))
    }
}

#[derive(Debug, FromRow)]
struct ChunkRow {
    id: i64,
    course_id: i64,
    chunk_index: i64,
    content: String,
    embedding: String,
}

impl ChunkRow {
    fn into_chunk(self) -> CourseChunk {
        let embedding = serde_json::from_str(&self.embedding).unwrap_or_else(|e| {
            warn!("Discarding unreadable embedding for chunk {}: {}", self.id, e);
            Vec::new()
        });

        CourseChunk {
            id: self.id,
            course_id: self.course_id,
            chunk_index: self.chunk_index,
            content: self.content,
            embedding,
        }
    }
}

pub struct ChunkQueries;

impl ChunkQueries {
    /// Replace a course's chunk set in a single transaction.
    ///
    /// The prior set is deleted before the new rows are inserted, so stale
    /// chunks never coexist with new ones, and the transaction serializes
    /// overlapping replacements of the same course. An empty `chunks` slice
    /// clears the course.
    #[inline]
    pub async fn replace_for_course(
        pool: &SqlitePool,
        course_id: i64,
        chunks: &[NewCourseChunk],
    ) -> Result<usize> {
        let now = Utc::now().naive_utc();
        let mut tx = pool
            .begin()
            .await
            .context("Failed to begin chunk replacement")?;

        sqlx::query("DELETE FROM course_chunks WHERE course_id = ?")
            .bind(course_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete prior course chunks")?;

        for chunk in chunks {
            let embedding = serde_json::to_string(&chunk.embedding)
                .context("Failed to serialize chunk embedding")?;

            sqlx::query(
                "INSERT INTO course_chunks (course_id, chunk_index, content, embedding, created_date) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(chunk.course_id)
            .bind(chunk.chunk_index)
            .bind(&chunk.content)
            .bind(embedding)
            .bind(now)
            .execute(&mut *tx)
            .await
            .context("Failed to insert course chunk")?;
        }

        tx.commit()
            .await
            .context("Failed to commit chunk replacement")?;

        Ok(chunks.len())
    }

    /// Chunks for a course in insertion order.
    #[inline]
    pub async fn list_by_course(pool: &SqlitePool, course_id: i64) -> Result<Vec<CourseChunk>> {
        let rows = sqlx::query_as::<_, ChunkRow>(
            "SELECT id, course_id, chunk_index, content, embedding FROM course_chunks \
             WHERE course_id = ? ORDER BY chunk_index",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
        .context("Failed to list course chunks")?;

        Ok(rows.into_iter().map(ChunkRow::into_chunk).collect())
    }
}

pub struct AttemptQueries;

impl AttemptQueries {
    #[inline]
    pub async fn create(pool: &SqlitePool, new_attempt: NewQuizAttempt) -> Result<QuizAttempt> {
        let now = Utc::now().naive_utc();
        let id = sqlx::query(
            "INSERT INTO quiz_attempts \
             (student_id, course_id, score_percent, correct_answers, total_questions, completed_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(new_attempt.student_id)
        .bind(new_attempt.course_id)
        .bind(new_attempt.score_percent)
        .bind(new_attempt.correct_answers)
        .bind(new_attempt.total_questions)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to record quiz attempt")?
        .last_insert_rowid();

        Self::get_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve recorded attempt"))
    }

    #[inline]
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<QuizAttempt>> {
        let result = sqlx::query_as::<_, QuizAttempt>(
            "SELECT id, student_id, course_id, score_percent, correct_answers, total_questions, \
             completed_at FROM quiz_attempts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get attempt by id")?;

        Ok(result)
    }

    /// Attempt history for a (student, course) pair, oldest first. The last
    /// element is the most recent attempt.
    #[inline]
    pub async fn history(
        pool: &SqlitePool,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<QuizAttempt>> {
        let attempts = sqlx::query_as::<_, QuizAttempt>(
            "SELECT id, student_id, course_id, score_percent, correct_answers, total_questions, \
             completed_at FROM quiz_attempts WHERE student_id = ? AND course_id = ? \
             ORDER BY completed_at ASC, id ASC",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_all(pool)
        .await
        .context("Failed to load attempt history")?;

        Ok(attempts)
    }
}
