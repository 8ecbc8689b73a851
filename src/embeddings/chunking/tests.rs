use super::split_sentences as split_sentences_impl;
use super::*;

#[test]
fn split_sentences() {
    assert_eq!(
        split_sentences_impl("First rule. Second rule.  Third rule."),
        vec!["First rule.", "Second rule.", "Third rule."]
    );
    assert_eq!(
        split_sentences_impl("Line one.\nLine two."),
        vec!["Line one.", "Line two."]
    );
    assert_eq!(
        split_sentences_impl("No terminator here"),
        vec!["No terminator here"]
    );
    assert!(split_sentences_impl("").is_empty());
}

#[test]
fn short_content_single_chunk() {
    let chunks = chunk_text("Rust has a strong type system.", 500);
    assert_eq!(chunks, vec!["Rust has a strong type system.".to_string()]);
}

#[test]
fn empty_input_yields_no_chunks() {
    assert!(chunk_text("", 500).is_empty());
    assert!(chunk_text("   \n\t  ", 500).is_empty());
}

#[test]
fn sentences_accumulate_until_limit() {
    let text = "aaaaaaaaa. bbbbbbbbb. ccccccccc. ddddddddd.";
    let chunks = chunk_text(text, 21);
    assert_eq!(
        chunks,
        vec![
            "aaaaaaaaa. bbbbbbbbb.".to_string(),
            "ccccccccc. ddddddddd.".to_string()
        ]
    );
}

#[test]
fn no_chunk_exceeds_limit_for_short_sentences() {
    let text = "The compiler checks lifetimes. Borrowing rules prevent aliasing bugs. \
                Traits describe shared behavior. Generics monomorphize at compile time. \
                Pattern matching must be exhaustive. Closures capture their environment.";
    let chunks = chunk_text(text, 80);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(chunk.len() <= 80, "chunk exceeded limit: {:?}", chunk);
    }
}

#[test]
fn oversized_sentence_kept_whole() {
    let long = format!("{}.", "x".repeat(120));
    let text = format!("Short one. {} Short two.", long);

    let chunks = chunk_text(&text, 50);

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0], "Short one.");
    assert_eq!(chunks[1], long);
    assert_eq!(chunks[2], "Short two.");
    assert!(chunks[1].len() > 50);
}

#[test]
fn splits_after_exclamation_and_question_marks() {
    let chunks = chunk_text("Does it borrow? It moves! Ownership transfers.", 15);
    assert_eq!(
        chunks,
        vec![
            "Does it borrow?".to_string(),
            "It moves!".to_string(),
            "Ownership transfers.".to_string()
        ]
    );
}

#[test]
fn text_without_terminators_is_one_chunk() {
    let text = "word ".repeat(200);
    let chunks = chunk_text(&text, 100);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0], text.trim());
}

#[test]
fn all_sentences_survive_in_order() {
    let text = "One. Two. Three. Four. Five.";
    let chunks = chunk_text(text, 10);
    assert_eq!(chunks.join(" "), text);
}

#[test]
fn default_config_limit() {
    assert_eq!(ChunkingConfig::default().max_chunk_size, 500);
}
