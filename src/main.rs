use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quizsmith::Result;
use quizsmith::commands::{
    add_course, delete_course, generate_quiz, list_courses, record_attempt, show_history,
    show_stats, update_course,
};
use quizsmith::config::{run_interactive_config, show_config};

#[derive(Parser)]
#[command(name = "quizsmith")]
#[command(about = "Retrieval-augmented adaptive quiz generation for course content")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the Gemini provider and chunking settings
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
    /// Add a new course and ingest its content
    Add {
        /// Course title
        title: String,
        /// Path to a plain-text file with the course content
        file: PathBuf,
        /// Optional course description
        #[arg(long)]
        description: Option<String>,
    },
    /// List all courses with their statistics
    List,
    /// Delete a course along with its chunks and recorded attempts
    Delete {
        /// Course ID or title
        course: String,
    },
    /// Replace a course's content and re-ingest it
    Update {
        /// Course ID or title
        course: String,
        /// Path to a plain-text file with the new content
        file: PathBuf,
    },
    /// Generate an adaptive quiz for a student
    Generate {
        /// Student ID
        student: i64,
        /// Course ID or title
        course: String,
        /// Print the provider's raw response instead of parsed questions
        #[arg(long)]
        raw: bool,
    },
    /// Record a completed quiz attempt
    Record {
        /// Student ID
        student: i64,
        /// Course ID or title
        course: String,
        /// Score percentage (0-100)
        score: i64,
        /// Number of correctly answered questions
        #[arg(long)]
        correct: Option<i64>,
        /// Total number of questions in the quiz
        #[arg(long)]
        total: Option<i64>,
    },
    /// Show a student's attempt history for a course
    History {
        /// Student ID
        student: i64,
        /// Course ID or title
        course: String,
    },
    /// Show aggregate statistics for a course
    Stats {
        /// Course ID or title
        course: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                run_interactive_config()?;
            }
        }
        Commands::Add {
            title,
            file,
            description,
        } => {
            add_course(title, description, file).await?;
        }
        Commands::List => {
            list_courses().await?;
        }
        Commands::Delete { course } => {
            delete_course(course).await?;
        }
        Commands::Update { course, file } => {
            update_course(course, file).await?;
        }
        Commands::Generate {
            student,
            course,
            raw,
        } => {
            generate_quiz(student, course, raw).await?;
        }
        Commands::Record {
            student,
            course,
            score,
            correct,
            total,
        } => {
            record_attempt(student, course, score, correct, total).await?;
        }
        Commands::History { student, course } => {
            show_history(student, course).await?;
        }
        Commands::Stats { course } => {
            show_stats(course).await?;
        }
    }

    Ok(())
}
