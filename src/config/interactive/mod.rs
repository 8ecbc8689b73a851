#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input};

use super::{Config, ConfigError, GeminiConfig, get_config_dir};

#[inline]
pub fn run_interactive_config() -> Result<()> {
    println!("{}", style("🔧 Quizsmith Configuration Setup").bold().cyan());
    println!();

    let mut config = load_existing_config()?;

    println!("{}", style("Gemini Configuration").bold().yellow());
    println!("Configure the Gemini API used for embeddings and quiz generation.");
    println!();

    configure_gemini(&mut config.gemini)?;

    let max_chunk_size: usize = Input::new()
        .with_prompt("Maximum chunk size (characters)")
        .default(config.chunking.max_chunk_size)
        .validate_with(|input: &usize| -> Result<(), &str> {
            if (100..=4096).contains(input) {
                Ok(())
            } else {
                Err("Max chunk size must be between 100 and 4096")
            }
        })
        .interact_text()?;
    config.chunking.max_chunk_size = max_chunk_size;

    println!();
    println!("{}", style("Testing configuration...").yellow());

    if test_gemini_connection(&config.gemini)? {
        println!("{}", style("✓ Gemini endpoint reachable!").green());
    } else {
        println!(
            "{}",
            style("⚠ Warning: Could not reach the Gemini endpoint").yellow()
        );
        println!("You can continue, but course ingestion and quiz generation will fail.");
    }

    println!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        println!("{}", style("✓ Configuration saved successfully!").green());
        println!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        println!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config_dir = get_config_dir()?;
    let config = Config::load(&config_dir).context("Failed to load configuration")?;

    println!("{}", style("📋 Current Configuration").bold().cyan());
    println!();

    println!("{}", style("Gemini Settings:").bold().yellow());
    println!("  Base URL: {}", style(&config.gemini.base_url).cyan());
    println!(
        "  Embedding Model: {}",
        style(&config.gemini.embedding_model).cyan()
    );
    println!(
        "  Generation Model: {}",
        style(&config.gemini.generation_model).cyan()
    );
    println!(
        "  Timeout: {}s",
        style(config.gemini.timeout_seconds).cyan()
    );
    match config.gemini.resolved_api_key() {
        Ok(_) => println!("  API Key: {}", style("configured").green()),
        Err(_) => println!("  API Key: {}", style("not set").red()),
    }

    println!();
    println!("{}", style("Chunking Settings:").bold().yellow());
    println!(
        "  Max Chunk Size: {}",
        style(config.chunking.max_chunk_size).cyan()
    );

    println!();
    println!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );
    println!(
        "Database file: {}",
        style(config.database_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config() -> Result<Config> {
    let config_dir = get_config_dir()?;
    Config::load(&config_dir).map_or_else(
        |_| {
            println!(
                "{}",
                style("No existing configuration found. Using defaults.").yellow()
            );
            Ok(Config {
                base_dir: config_dir.clone(),
                ..Config::default()
            })
        },
        |config| {
            println!("{}", style("Found existing configuration.").green());
            Ok(config)
        },
    )
}

fn configure_gemini(gemini: &mut GeminiConfig) -> Result<()> {
    let base_url: String = Input::new()
        .with_prompt("Gemini API base URL")
        .default(gemini.base_url.clone())
        .validate_with(|input: &String| -> Result<(), ConfigError> {
            let mut temp_config = GeminiConfig::default();
            temp_config.set_base_url(input.clone())?;
            Ok(())
        })
        .interact_text()?;

    let api_key: String = Input::new()
        .with_prompt("Gemini API key (leave empty to use GEMINI_API_KEY)")
        .default(gemini.api_key.clone())
        .allow_empty(true)
        .interact_text()?;

    let embedding_model: String = Input::new()
        .with_prompt("Embedding model")
        .default(gemini.embedding_model.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Model name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let generation_model: String = Input::new()
        .with_prompt("Generation model")
        .default(gemini.generation_model.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Model name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let timeout_seconds: u64 = Input::new()
        .with_prompt("Request timeout (seconds)")
        .default(gemini.timeout_seconds)
        .validate_with(|input: &u64| -> Result<(), &str> {
            if *input == 0 {
                Err("Timeout must be greater than 0")
            } else if *input > 300 {
                Err("Timeout must be 300 seconds or less")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    gemini.set_base_url(base_url)?;
    gemini.api_key = api_key;
    gemini.set_embedding_model(embedding_model)?;
    gemini.set_generation_model(generation_model)?;
    gemini.set_timeout_seconds(timeout_seconds)?;

    Ok(())
}

fn test_gemini_connection(gemini: &GeminiConfig) -> Result<bool> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(std::time::Duration::from_secs(5)))
        .build()
        .into();

    // An unauthenticated GET answers 4xx when the endpoint is alive.
    match agent.get(&gemini.base_url).call() {
        Ok(_) => Ok(true),
        Err(ureq::Error::StatusCode(code)) if (400..500).contains(&code) => Ok(true),
        Err(_) => Ok(false),
    }
}
