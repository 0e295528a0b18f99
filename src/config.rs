use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::analysis::DEFAULT_PREVIEW_CHARS;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub runs_per_prompt: usize,
    pub preview_chars: usize,
    pub max_keywords: usize,
    pub max_prompts: usize,
    pub platforms: Vec<String>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            runs_per_prompt: 3,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            max_keywords: 5,
            max_prompts: 10,
            platforms: vec!["chatgpt".to_string(), "perplexity".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryEngineConfig {
    pub api_base: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_ms: u64,
    pub max_retries: u32,
}

impl Default for QueryEngineConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.3,
            timeout_ms: 30_000,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSourceConfig {
    pub timeout_ms: u64,
    pub user_agent: String,
    pub max_paragraphs: usize,
    pub max_chars: usize,
}

impl Default for ContentSourceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            max_paragraphs: 10,
            max_chars: 2_000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    pub analysis: AnalysisSettings,
    pub query_engine: QueryEngineConfig,
    pub content: ContentSourceConfig,
}

impl VisibilityConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => {
                let contents =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                        path: path.display().to_string(),
                        source,
                    })?;
                toml::from_str(&contents)?
            }
            _ => VisibilityConfig::default(),
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let payload = toml::to_string_pretty(self)?;
        std::fs::write(path, payload).map_err(write_error)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Applies overrides from `lookup` (environment variable names to values).
    /// Values that are blank or fail to parse are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = text("VISIBILITY_RUNS").and_then(|v| v.trim().parse().ok()) {
            self.analysis.runs_per_prompt = value;
        }
        if let Some(value) = text("VISIBILITY_PREVIEW_CHARS").and_then(|v| v.trim().parse().ok()) {
            self.analysis.preview_chars = value;
        }
        if let Some(value) = text("VISIBILITY_MAX_PROMPTS").and_then(|v| v.trim().parse().ok()) {
            self.analysis.max_prompts = value;
        }
        if let Some(value) = text("VISIBILITY_PLATFORMS") {
            let platforms: Vec<String> = value
                .split(',')
                .map(|platform| platform.trim().to_string())
                .filter(|platform| !platform.is_empty())
                .collect();
            if !platforms.is_empty() {
                self.analysis.platforms = platforms;
            }
        }
        if let Some(value) = text("OPENAI_API_BASE") {
            self.query_engine.api_base = value;
        }
        if let Some(value) = text("OPENAI_MODEL") {
            self.query_engine.model = value;
        }
        if let Some(value) = text("OPENAI_MAX_TOKENS").and_then(|v| v.trim().parse().ok()) {
            self.query_engine.max_tokens = value;
        }
        if let Some(value) = text("OPENAI_TEMPERATURE").and_then(|v| v.trim().parse().ok()) {
            self.query_engine.temperature = value;
        }
        if let Some(value) = text("OPENAI_TIMEOUT_MS").and_then(|v| v.trim().parse().ok()) {
            self.query_engine.timeout_ms = value;
        }
        if let Some(value) = text("OPENAI_MAX_RETRIES").and_then(|v| v.trim().parse().ok()) {
            self.query_engine.max_retries = value;
        }
        if let Some(value) = text("CONTENT_TIMEOUT_MS").and_then(|v| v.trim().parse().ok()) {
            self.content.timeout_ms = value;
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("VISIBILITY_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/visibility.toml")))
}
