use super::*;
use anyhow::Result;
use std::collections::HashSet;
use tempfile::TempDir;

use crate::database::sqlite::models::{NewCourse, NewCourseChunk, NewQuizAttempt};
use crate::database::sqlite::queries::{AttemptQueries, ChunkQueries, CourseQueries};

async fn create_test_database() -> Result<(TempDir, Database)> {
    let temp_dir = TempDir::new()?;
    let database = Database::initialize_from_config_dir(temp_dir.path()).await?;
    Ok((temp_dir, database))
}

#[tokio::test]
async fn integration_schema_migration() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type='table' \
         AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations'",
    )
    .fetch_all(database.pool())
    .await?;

    let expected_tables: HashSet<&'static str> = ["courses", "course_chunks", "quiz_attempts"]
        .into_iter()
        .collect();

    let actual_tables: HashSet<&str> = tables.iter().map(|t| t.as_str()).collect();
    assert_eq!(actual_tables, expected_tables);

    Ok(())
}

#[tokio::test]
async fn integration_migrations_are_idempotent() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    database.run_migrations().await?;
    database.run_migrations().await?;

    Ok(())
}

#[tokio::test]
async fn integration_course_delete_cascades() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let course = CourseQueries::create(
        database.pool(),
        NewCourse {
            title: "Cascade Course".to_string(),
            description: None,
            content: "Content.".to_string(),
        },
    )
    .await?;

    ChunkQueries::replace_for_course(
        database.pool(),
        course.id,
        &[NewCourseChunk {
            course_id: course.id,
            chunk_index: 0,
            content: "Content.".to_string(),
            embedding: vec![1.0],
        }],
    )
    .await?;

    AttemptQueries::create(
        database.pool(),
        NewQuizAttempt {
            student_id: 1,
            course_id: course.id,
            score_percent: 70,
            correct_answers: Some(7),
            total_questions: Some(10),
        },
    )
    .await?;

    assert!(CourseQueries::delete(database.pool(), course.id).await?);

    let chunks = ChunkQueries::list_by_course(database.pool(), course.id).await?;
    assert!(chunks.is_empty());

    let attempts = AttemptQueries::history(database.pool(), 1, course.id).await?;
    assert!(attempts.is_empty());

    Ok(())
}

#[tokio::test]
async fn integration_foreign_keys_reject_orphan_chunks() -> Result<()> {
    let (_temp_dir, database) = create_test_database().await?;

    let result = ChunkQueries::replace_for_course(
        database.pool(),
        999,
        &[NewCourseChunk {
            course_id: 999,
            chunk_index: 0,
            content: "Orphan.".to_string(),
            embedding: vec![1.0],
        }],
    )
    .await;

    assert!(result.is_err());

    Ok(())
}

#[tokio::test]
async fn integration_database_file_created() -> Result<()> {
    let (temp_dir, _database) = create_test_database().await?;

    assert!(temp_dir.path().join("quizsmith.db").exists());

    Ok(())
}
