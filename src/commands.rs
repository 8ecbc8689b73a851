use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use sqlx::SqlitePool;
use tracing::info;

use crate::agent::{DifficultyTier, PASS_THRESHOLD_PERCENT, QuizAgent};
use crate::config::{Config, get_config_dir};
use crate::database::sqlite::Database;
use crate::database::sqlite::models::{Course, NewCourse, NewQuizAttempt};
use crate::database::sqlite::queries::{AttemptQueries, CourseQueries};
use crate::embeddings::GeminiClient;
use crate::indexer::Indexer;
use crate::quiz::{parse_quiz_response, score_percent};

async fn open_database() -> Result<(Config, Database)> {
    let config_dir = get_config_dir()?;
    let config = Config::load(&config_dir).context("Failed to load configuration")?;
    let database = Database::new(config.database_path())
        .await
        .context("Failed to initialize database")?;
    Ok((config, database))
}

fn read_content(file: &Path) -> Result<String> {
    std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read course content from {}", file.display()))
}

/// Resolve a course from a CLI selector: a numeric ID or an exact title.
async fn resolve_course(pool: &SqlitePool, selector: &str) -> Result<Course> {
    let course = if let Ok(id) = selector.parse::<i64>() {
        CourseQueries::get_by_id(pool, id).await?
    } else {
        CourseQueries::get_by_title(pool, selector).await?
    };

    course.ok_or_else(|| anyhow::anyhow!("No course matches '{}'", selector))
}

async fn ingest_with_progress(config: &Config, database: &Database, course: &Course) -> Result<()> {
    let indexer = Indexer::new(config)?;

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{spinner} Embedding chunks {pos}/{len}")
            .context("Failed to build progress style")?,
    );

    let stats = indexer
        .ingest_course(database.pool(), course, |done, total| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        })
        .await?;
    bar.finish_and_clear();

    println!("Ingested course content:");
    println!("  Chunks stored: {}", stats.chunks_created);
    if stats.chunks_skipped > 0 {
        println!(
            "  Chunks skipped (embedding failed): {}",
            stats.chunks_skipped
        );
    }

    Ok(())
}

/// Create a course from a content file and ingest it
#[inline]
pub async fn add_course(title: String, description: Option<String>, file: PathBuf) -> Result<()> {
    info!("Adding course '{}' from {}", title, file.display());

    let content = read_content(&file)?;
    let (config, database) = open_database().await?;

    if CourseQueries::get_by_title(database.pool(), &title)
        .await?
        .is_some()
    {
        println!("A course titled '{}' already exists.", title);
        println!("Use 'quizsmith update' to replace its content.");
        return Ok(());
    }

    let course = CourseQueries::create(
        database.pool(),
        NewCourse {
            title,
            description,
            content,
        },
    )
    .await
    .context("Failed to create course")?;

    println!("Created course: {} (ID: {})", course.title, course.id);

    ingest_with_progress(&config, &database, &course).await
}

/// Replace a course's content and re-ingest it
#[inline]
pub async fn update_course(selector: String, file: PathBuf) -> Result<()> {
    let content = read_content(&file)?;
    let (config, database) = open_database().await?;

    let course = resolve_course(database.pool(), &selector).await?;
    info!("Updating content of course {}", course.id);

    let course = CourseQueries::update_content(database.pool(), course.id, &content)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Course {} disappeared during update", course.id))?;

    println!("Updated course: {} (ID: {})", course.title, course.id);

    ingest_with_progress(&config, &database, &course).await
}

/// Delete a course with its chunks and recorded attempts
#[inline]
pub async fn delete_course(selector: String) -> Result<()> {
    let (_config, database) = open_database().await?;

    let course = resolve_course(database.pool(), &selector).await?;

    if CourseQueries::delete(database.pool(), course.id).await? {
        println!("Deleted course: {} (ID: {})", course.title, course.id);
        println!("Its chunks and recorded attempts were removed with it.");
    } else {
        println!("Course {} was already gone.", course.id);
    }

    Ok(())
}

/// List all courses with their statistics
#[inline]
pub async fn list_courses() -> Result<()> {
    let (_config, database) = open_database().await?;

    let courses = CourseQueries::list_all(database.pool())
        .await
        .context("Failed to list courses")?;

    if courses.is_empty() {
        println!("No courses have been added yet.");
        println!("Use 'quizsmith add <title> <file>' to add one.");
        return Ok(());
    }

    println!("Courses ({} total):", courses.len());
    println!();

    for course in &courses {
        println!("📚 {} (ID: {})", course.title, course.id);
        if let Some(description) = &course.description {
            println!("   {}", description);
        }
        println!(
            "   Added: {}",
            course.created_date.format("%Y-%m-%d %H:%M")
        );

        match CourseQueries::get_statistics(database.pool(), course.id, PASS_THRESHOLD_PERCENT)
            .await
        {
            Ok(Some(stats)) => {
                println!("   Content Chunks: {}", stats.total_chunks);
                println!("   Quiz Attempts: {}", stats.total_attempts);
                if stats.total_attempts > 0 {
                    println!("   Average Score: {:.1}%", stats.average_score);
                    println!("   Pass Rate: {:.1}%", stats.pass_rate);
                }
            }
            Ok(None) => println!("   Statistics: Not available"),
            Err(e) => println!("   Statistics: Error - {}", e),
        }

        println!();
    }

    Ok(())
}

/// Generate an adaptive quiz for a student and print it
#[inline]
pub async fn generate_quiz(student_id: i64, selector: String, raw: bool) -> Result<()> {
    let (config, database) = open_database().await?;

    let course = resolve_course(database.pool(), &selector).await?;

    let history = AttemptQueries::history(database.pool(), student_id, course.id).await?;
    let tier = DifficultyTier::for_history(&history);
    println!(
        "Generating a {} quiz ({} questions) for student {} on '{}'...",
        style(tier).bold(),
        tier.question_count(),
        student_id,
        course.title
    );

    let client = GeminiClient::new(&config)?;
    let agent = QuizAgent::new(client.clone(), client);
    let response = agent
        .generate_quiz(database.pool(), student_id, course.id)
        .await?;

    if raw {
        println!("{}", response);
        return Ok(());
    }

    let items = parse_quiz_response(&response);
    if items.is_empty() {
        println!("{}", style("No quiz could be generated.").yellow());
        println!("The provider's response contained no usable questions.");
        println!("Try again, or inspect the raw output with --raw.");
        return Ok(());
    }

    for (number, item) in items.iter().enumerate() {
        println!();
        println!("{}. {}", number + 1, style(&item.question_text).bold());
        for (letter, option) in ["A", "B", "C", "D"].iter().zip(&item.options) {
            println!("   {}. {}", letter, option);
        }
        println!("   Answer: {}", style(&item.correct_answer).green());
        if !item.explanation.is_empty() {
            println!("   {}", style(&item.explanation).dim());
        }
    }

    println!();
    println!("{} questions generated.", items.len());
    println!(
        "Record the result with 'quizsmith record {} {} <score>'.",
        student_id, course.id
    );

    Ok(())
}

/// Check a reported score against the 0-100 range and, when answer
/// counts are supplied, against the percentage they imply.
fn validate_attempt(score: i64, correct: Option<i64>, total: Option<i64>) -> Result<()> {
    if !(0..=100).contains(&score) {
        anyhow::bail!("Score must be between 0 and 100 (got {})", score);
    }

    if let (Some(correct), Some(total)) = (correct, total) {
        if correct < 0 || total < 0 || correct > total {
            anyhow::bail!(
                "Invalid answer counts: {} correct out of {}",
                correct,
                total
            );
        }

        let derived = score_percent(correct, total);
        if derived != score {
            anyhow::bail!(
                "Score {}% does not match {} correct out of {} (expected {}%)",
                score,
                correct,
                total,
                derived
            );
        }
    }

    Ok(())
}

/// Record a completed quiz attempt
#[inline]
pub async fn record_attempt(
    student_id: i64,
    selector: String,
    score: i64,
    correct: Option<i64>,
    total: Option<i64>,
) -> Result<()> {
    validate_attempt(score, correct, total)?;

    let (_config, database) = open_database().await?;
    let course = resolve_course(database.pool(), &selector).await?;

    let attempt = AttemptQueries::create(
        database.pool(),
        NewQuizAttempt {
            student_id,
            course_id: course.id,
            score_percent: score,
            correct_answers: correct,
            total_questions: total,
        },
    )
    .await?;

    let verdict = if attempt.score_percent >= PASS_THRESHOLD_PERCENT {
        style("passed").green()
    } else {
        style("failed").red()
    };
    println!(
        "Recorded attempt for student {} on '{}': {}% ({})",
        student_id, course.title, attempt.score_percent, verdict
    );

    let next = DifficultyTier::for_last_score(Some(attempt.score_percent));
    println!(
        "Next quiz difficulty: {} ({} questions)",
        next,
        next.question_count()
    );

    Ok(())
}

/// Show a student's attempt history for a course
#[inline]
pub async fn show_history(student_id: i64, selector: String) -> Result<()> {
    let (_config, database) = open_database().await?;
    let course = resolve_course(database.pool(), &selector).await?;

    let history = AttemptQueries::history(database.pool(), student_id, course.id).await?;

    if history.is_empty() {
        println!(
            "No attempts recorded for student {} on '{}'.",
            student_id, course.title
        );
    } else {
        println!(
            "Attempts for student {} on '{}' (oldest first):",
            student_id, course.title
        );
        for attempt in &history {
            let counts = match (attempt.correct_answers, attempt.total_questions) {
                (Some(correct), Some(total)) => format!(" ({}/{} correct)", correct, total),
                _ => String::new(),
            };
            println!(
                "  {}  {}%{}",
                attempt.completed_at.format("%Y-%m-%d %H:%M"),
                attempt.score_percent,
                counts
            );
        }
    }

    let next = DifficultyTier::for_history(&history);
    println!(
        "Next quiz difficulty: {} ({} questions)",
        next,
        next.question_count()
    );

    Ok(())
}

/// Show aggregate statistics for a course
#[inline]
pub async fn show_stats(selector: String) -> Result<()> {
    let (_config, database) = open_database().await?;
    let course = resolve_course(database.pool(), &selector).await?;

    let stats = CourseQueries::get_statistics(database.pool(), course.id, PASS_THRESHOLD_PERCENT)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Course {} disappeared during lookup", course.id))?;

    println!("📊 {} (ID: {})", course.title, course.id);
    println!("   Content Chunks: {}", stats.total_chunks);
    println!("   Quiz Attempts: {}", stats.total_attempts);
    if stats.total_attempts > 0 {
        println!("   Average Score: {:.1}%", stats.average_score);
        println!(
            "   Pass Rate: {:.1}% (score ≥ {}%)",
            stats.pass_rate, PASS_THRESHOLD_PERCENT
        );
    }

    Ok(())
}
