use chrono::Utc;

use super::*;

#[test]
fn course_serialization_round_trip() {
    let course = Course {
        id: 1,
        title: "Rust Fundamentals".to_string(),
        description: Some("Ownership, borrowing, lifetimes".to_string()),
        content: "Ownership is the core concept.".to_string(),
        created_date: Utc::now().naive_utc(),
    };

    let json = serde_json::to_string(&course).expect("can serialize course");
    let parsed: Course = serde_json::from_str(&json).expect("can parse course");

    assert_eq!(course, parsed);
}

#[test]
fn attempt_optional_counts() {
    let attempt = QuizAttempt {
        id: 7,
        student_id: 3,
        course_id: 1,
        score_percent: 85,
        correct_answers: None,
        total_questions: None,
        completed_at: Utc::now().naive_utc(),
    };

    let json = serde_json::to_string(&attempt).expect("can serialize attempt");
    let parsed: QuizAttempt = serde_json::from_str(&json).expect("can parse attempt");

    assert_eq!(parsed.correct_answers, None);
    assert_eq!(parsed.total_questions, None);
    assert_eq!(parsed.score_percent, 85);
}

#[test]
fn chunk_embedding_json_round_trip() {
    // Embeddings are stored in the database as JSON text; exact values
    // chosen so f32 round trips losslessly.
    let embedding = vec![0.5_f32, -0.25, 0.125];

    let json = serde_json::to_string(&embedding).expect("can serialize embedding");
    let parsed: Vec<f32> = serde_json::from_str(&json).expect("can parse embedding");

    assert_eq!(embedding, parsed);
}
