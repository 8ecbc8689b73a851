use serial_test::serial;
use tempfile::TempDir;

use super::*;

#[test]
fn default_config() {
    let config = Config::default();
    assert_eq!(
        config.gemini.base_url,
        "https://generativelanguage.googleapis.com/v1beta/models"
    );
    assert_eq!(config.gemini.embedding_model, "text-embedding-004");
    assert_eq!(config.gemini.generation_model, "gemini-2.5-flash");
    assert_eq!(config.gemini.timeout_seconds, 30);
    assert!(config.gemini.api_key.is_empty());
    assert_eq!(config.chunking.max_chunk_size, 500);
}

#[test]
fn config_validation() {
    let config = Config::default();
    assert!(config.validate().is_ok());

    let mut invalid_config = config.clone();
    invalid_config.gemini.base_url = "not a url".to_string();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.gemini.embedding_model = String::new();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.gemini.generation_model = "   ".to_string();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.gemini.timeout_seconds = 0;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.gemini.timeout_seconds = 301;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.chunking.max_chunk_size = 50;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config;
    invalid_config.chunking.max_chunk_size = 5000;
    assert!(invalid_config.validate().is_err());
}

#[test]
fn toml_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string(&config).expect("should serialize toml correctly");
    let parsed_config: Config = toml::from_str(&toml_str).expect("should parse toml correctly");
    assert_eq!(config, parsed_config);
}

#[test]
fn setter_validation() {
    let mut config = GeminiConfig::default();

    assert!(
        config
            .set_base_url("http://localhost:8080/v1beta/models".to_string())
            .is_ok()
    );
    assert!(config.set_embedding_model("embed-next".to_string()).is_ok());
    assert!(config.set_generation_model("gen-next".to_string()).is_ok());
    assert!(config.set_timeout_seconds(60).is_ok());

    assert!(config.set_base_url("ftp://example.com".to_string()).is_err());
    assert!(config.set_base_url("no-scheme".to_string()).is_err());
    assert!(config.set_embedding_model(String::new()).is_err());
    assert!(config.set_generation_model(" ".to_string()).is_err());
    assert!(config.set_timeout_seconds(0).is_err());
    assert!(config.set_timeout_seconds(301).is_err());

    assert_eq!(config.base_url, "http://localhost:8080/v1beta/models");
    assert_eq!(config.timeout_seconds, 60);
}

#[test]
fn load_missing_config_uses_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let config = Config::load(temp_dir.path()).expect("loading defaults should succeed");

    assert_eq!(config.gemini, GeminiConfig::default());
    assert_eq!(config.chunking.max_chunk_size, 500);
    assert_eq!(config.base_dir, temp_dir.path());
}

#[test]
fn save_and_load_round_trip() {
    let temp_dir = TempDir::new().expect("should create temp dir");

    let mut config = Config::load(temp_dir.path()).expect("loading defaults should succeed");
    config.gemini.api_key = "configured-key".to_string();
    config.gemini.timeout_seconds = 45;
    config.chunking.max_chunk_size = 800;
    config.save().expect("should save config");

    let loaded = Config::load(temp_dir.path()).expect("should load saved config");
    assert_eq!(loaded, config);
}

#[test]
fn load_rejects_invalid_config_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        temp_dir.path().join("config.toml"),
        "[gemini]\ntimeout_seconds = 0\n",
    )
    .expect("should write config file");

    assert!(Config::load(temp_dir.path()).is_err());
}

#[test]
#[serial]
fn api_key_from_config() {
    // SAFETY: serialized test; no other thread reads the environment here.
    unsafe { std::env::remove_var(GEMINI_API_KEY_ENV) };

    let mut gemini = GeminiConfig::default();
    assert!(matches!(
        gemini.resolved_api_key(),
        Err(ConfigError::MissingApiKey)
    ));

    gemini.api_key = "from-config".to_string();
    assert_eq!(
        gemini.resolved_api_key().expect("key should resolve"),
        "from-config"
    );
}

#[test]
#[serial]
fn api_key_env_override_wins() {
    // SAFETY: serialized test; no other thread reads the environment here.
    unsafe { std::env::set_var(GEMINI_API_KEY_ENV, "from-env") };

    let mut gemini = GeminiConfig::default();
    gemini.api_key = "from-config".to_string();
    assert_eq!(
        gemini.resolved_api_key().expect("key should resolve"),
        "from-env"
    );

    // SAFETY: serialized test; no other thread reads the environment here.
    unsafe { std::env::remove_var(GEMINI_API_KEY_ENV) };
}
