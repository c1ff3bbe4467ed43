//! Configuration management for logsage
//!
//! Loads the TOML config, applies profile and environment overrides, and
//! validates the result before anything else runs.

use crate::error::{LogsageError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta", default)]
    pub meta: MetaConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            schema_version: "1.0.0".to_string(),
            created_at: current_timestamp(),
            last_modified: current_timestamp(),
        }
    }
}

/// Completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub base_url: String,
    pub api_key_env: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout_secs: 120,
        }
    }
}

/// Segmentation and analysis limits, all measured in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Logs longer than this take the segmented path
    pub segmentation_threshold: usize,
    /// Character budget per segment
    pub segment_max_chars: usize,
    /// Lines repeated from the previous segment's tail
    pub overlap_lines: usize,
    /// Lines kept in the carried-forward context summary
    pub context_max_lines: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            segmentation_threshold: 10_000,
            segment_max_chars: 8_000,
            overlap_lines: 5,
            context_max_lines: 3,
        }
    }
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_max_chars: Option<usize>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, None)
    }

    /// Load configuration with a specific profile applied
    pub fn load_with_profile(path: &Path, profile: &str) -> Result<Self> {
        Self::load_with(path, Some(profile))
    }

    fn load_with(path: &Path, profile: Option<&str>) -> Result<Self> {
        if !path.exists() {
            return Err(LogsageError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| LogsageError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        if let Some(profile) = profile {
            config.apply_profile(profile)?;
        }

        // Environment wins over file and profile
        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| LogsageError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply a profile's overrides to the configuration
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let overrides = self
            .profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| LogsageError::Config(format!("Unknown profile: {}", profile)))?;

        if let Some(model) = overrides.model {
            self.llm.model = model;
        }
        if let Some(temperature) = overrides.temperature {
            self.llm.temperature = temperature;
        }
        if let Some(max_chars) = overrides.segment_max_chars {
            self.analysis.segment_max_chars = max_chars;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: LOGSAGE_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::vars());
    }

    fn apply_overrides(&mut self, vars: impl Iterator<Item = (String, String)>) {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix("LOGSAGE_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "LLM__MODEL" => {
                self.llm.model = value.to_string();
            }
            "LLM__BASE_URL" => {
                self.llm.base_url = value.to_string();
            }
            "ANALYSIS__SEGMENT_MAX_CHARS" => {
                self.analysis.segment_max_chars = parse_usize(path, value)?;
            }
            "ANALYSIS__SEGMENTATION_THRESHOLD" => {
                self.analysis.segmentation_threshold = parse_usize(path, value)?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| LogsageError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("logsage").join("config.toml"))
    }
}

fn parse_usize(path: &str, value: &str) -> Result<usize> {
    value.parse().map_err(|_| LogsageError::InvalidConfigValue {
        path: path.to_string(),
        message: format!("Cannot parse '{}' as an unsigned integer", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_analysis_limits() {
        let config = Config::default();
        assert_eq!(config.analysis.segmentation_threshold, 10_000);
        assert_eq!(config.analysis.segment_max_chars, 8_000);
        assert_eq!(config.analysis.overlap_lines, 5);
        assert_eq!(config.analysis.context_max_lines, 3);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let mut config = Config::default();
        config.llm.model = "local-model".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.llm.model, "local-model");
        assert_eq!(loaded.analysis, config.analysis);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: Config = toml::from_str(
            "[llm]\nmodel = \"llama3\"\n\n[analysis]\nsegment_max_chars = 4000\n",
        )
        .unwrap();

        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.analysis.segment_max_chars, 4_000);
        assert_eq!(config.analysis.segmentation_threshold, 10_000);
        assert_eq!(config.analysis.overlap_lines, 5);
        assert_eq!(config.analysis.context_max_lines, 3);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load(Path::new("/nonexistent/logsage/config.toml"));
        assert!(matches!(result, Err(LogsageError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_profile_overrides() {
        let mut config = Config::default();
        config.profiles.insert(
            "fast".to_string(),
            ProfileOverrides {
                model: Some("gpt-4o-mini".to_string()),
                temperature: None,
                segment_max_chars: Some(4_000),
            },
        );

        config.apply_profile("fast").unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.analysis.segment_max_chars, 4_000);
    }

    #[test]
    fn test_unknown_profile() {
        let mut config = Config::default();
        assert!(config.apply_profile("nope").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(
            vec![
                ("LOGSAGE_LLM__MODEL".to_string(), "qwen2".to_string()),
                (
                    "LOGSAGE_ANALYSIS__SEGMENT_MAX_CHARS".to_string(),
                    "2000".to_string(),
                ),
                (
                    "LOGSAGE_ANALYSIS__SEGMENTATION_THRESHOLD".to_string(),
                    "not-a-number".to_string(),
                ),
                ("UNRELATED".to_string(), "x".to_string()),
            ]
            .into_iter(),
        );

        assert_eq!(config.llm.model, "qwen2");
        assert_eq!(config.analysis.segment_max_chars, 2000);
        // Unparseable values are skipped with a warning
        assert_eq!(config.analysis.segmentation_threshold, 10_000);
    }
}
