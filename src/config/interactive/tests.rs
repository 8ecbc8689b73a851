use super::load_existing_config as load_existing_config_impl;

#[test]
fn load_existing_config() {
    let config = load_existing_config_impl().expect("config loaded successfully");
    assert!(!config.gemini.base_url.is_empty());
    assert!(!config.gemini.embedding_model.is_empty());
    assert!(!config.gemini.generation_model.is_empty());
    assert!(config.gemini.timeout_seconds > 0);
    assert!(config.chunking.max_chunk_size > 0);
}
