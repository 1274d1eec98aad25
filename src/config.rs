use config::{Config, ConfigError, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "Please complete the following task:";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub system_instruction: String,
    pub word_limit: usize,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl Settings {
    /// Defaults, then `<config dir>/chunky/config.*`, then `./chunky.*`,
    /// then `CHUNKY_*` variables. `.env` is loaded first.
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let mut files = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            files.push(dir.join("chunky").join("config"));
        }
        files.push(PathBuf::from("chunky"));

        Self::from_files(&files)
    }

    pub fn from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("api_key", "")?
            .set_default("base_url", "https://api.openai.com/v1")?
            .set_default("model", "gpt-4")?
            .set_default("system_instruction", DEFAULT_SYSTEM_INSTRUCTION)?
            .set_default("word_limit", 100)?
            .set_default("timeout_secs", 120)?
            .set_default("log_level", "info")?;

        for file in files {
            builder = builder.add_source(File::with_name(&file.to_string_lossy()).required(false));
        }

        let config = builder
            .add_source(Environment::with_prefix("CHUNKY"))
            .build()?;
        let mut settings: Settings = config.try_deserialize()?;

        if settings.api_key.is_empty() {
            if let Ok(key) = env::var("OPENAI_API_KEY") {
                settings.api_key = key;
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.word_limit == 0 {
            return Err(ConfigError::Message("word_limit must be at least 1".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Message("model must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempdir().unwrap();
        let settings = Settings::from_files(&[dir.path().join("missing")]).unwrap();

        assert_eq!(settings.word_limit, 100);
        assert_eq!(settings.system_instruction, DEFAULT_SYSTEM_INSTRUCTION);
        assert!(settings.timeout_secs > 0);
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("chunky.toml"),
            concat!(
                "base_url = \"http://localhost:8080/v1\"\n",
                "system_instruction = \"You are an editor.\"\n",
            ),
        )
        .unwrap();

        let settings = Settings::from_files(&[dir.path().join("chunky")]).unwrap();
        assert_eq!(settings.base_url, "http://localhost:8080/v1");
        assert_eq!(settings.system_instruction, "You are an editor.");
    }

    #[test]
    fn test_later_file_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("first.toml"), "system_instruction = \"first\"\n").unwrap();
        fs::write(dir.path().join("second.toml"), "system_instruction = \"second\"\n").unwrap();

        let settings =
            Settings::from_files(&[dir.path().join("first"), dir.path().join("second")]).unwrap();
        assert_eq!(settings.system_instruction, "second");
    }

    #[test]
    fn test_zero_word_limit_is_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("chunky.toml"), "word_limit = 0\n").unwrap();

        let result = Settings::from_files(&[dir.path().join("chunky")]);
        assert!(result.is_err());
    }
}
