// Configuration management module
// This module handles TOML configuration and the interactive setup flow

pub mod interactive;
pub mod settings;

#[cfg(test)]
mod tests;

pub use interactive::{run_interactive_config, show_config};
pub use settings::{Config, ConfigError, GEMINI_API_KEY_ENV, GeminiConfig};

/// Get the configuration directory path
#[inline]
pub fn get_config_dir() -> Result<std::path::PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("quizsmith"))
        .ok_or(ConfigError::DirectoryError)
}
