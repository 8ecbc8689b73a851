use criterion::{Criterion, criterion_group, criterion_main};
use quizsmith::quiz::parse_quiz_response;
use std::hint::black_box;

fn provider_response(questions: usize) -> String {
    let items = (0..questions)
        .map(|i| {
            format!(
                r#"{{"question":"What does question {i} test?","options":["A. First choice","B. Second choice","C. Third choice","D. Fourth choice"],"correctAnswer":"B","explanation":"Question {i} checks a single concept."}}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",");
    format!("```json\n[{items}]\n```")
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let response = provider_response(15);
    c.bench_function("extraction", |b| {
        b.iter(|| parse_quiz_response(black_box(&response)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
