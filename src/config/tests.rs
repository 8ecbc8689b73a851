use super::*;
use std::fs;
use tempfile::TempDir;

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn config_file_persistence() {
        let temp_dir = TempDir::new().expect("should create TempDir successfully");
        let config_path = temp_dir.path().join("config.toml");

        let original_config = Config {
            gemini: GeminiConfig {
                base_url: "http://localhost:9090/v1beta/models".to_string(),
                api_key: "persisted-key".to_string(),
                embedding_model: "test-embedding".to_string(),
                generation_model: "test-generation".to_string(),
                timeout_seconds: 45,
            },
            ..Config::default()
        };

        let toml_content = toml::to_string_pretty(&original_config)
            .expect("config should convert to toml string successfully");
        fs::write(&config_path, toml_content).expect("should write to config_path successfully");

        let content =
            fs::read_to_string(&config_path).expect("should read from config_path successfully");
        let loaded_config: Config = toml::from_str(&content).expect("should parse toml correctly");

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn config_directory_creation() {
        let temp_dir = TempDir::new().expect("should create TempDir successfully");
        let config_dir = temp_dir.path().join(".quizsmith");

        fs::create_dir_all(&config_dir).expect("should create config dir");
        assert!(config_dir.exists());
        assert!(config_dir.is_dir());
    }

    #[test]
    fn config_dir_has_app_suffix() {
        let dir = get_config_dir().expect("config dir should resolve");
        assert!(dir.ends_with("quizsmith"));
    }
}
