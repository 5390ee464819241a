//! Configuration management for the resume tailor

use crate::error::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub tailoring: TailoringConfig,
    pub output: OutputConfig,
}

/// Connection settings for the remote text generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// OpenAI-compatible chat completions URL
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the API key, if any
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Tunables for the tailoring pipeline. The defaults are working values,
/// not hard laws.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoringConfig {
    /// Fraction of compared entries that must change for a pass to count
    /// as a sufficient modification
    pub min_change_ratio: f64,
    /// Per-category cap on extracted keywords
    pub max_keywords_per_category: usize,
    /// Generated descriptions shorter than this are discarded in favor of
    /// the original text
    pub min_generated_len: usize,
    /// Job descriptions shorter than this skip extraction entirely and
    /// use the fallback keyword set
    pub min_job_len: usize,
    /// Similarity above which a candidate skill is treated as already
    /// present
    pub skill_similarity_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
    Markdown,
    Html,
    Pdf,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(format!(
                "Invalid output format: {}. Supported: text, json, markdown, html, pdf",
                s
            )),
        }
    }
}

impl Default for TailoringConfig {
    fn default() -> Self {
        Self {
            min_change_ratio: 0.4,
            max_keywords_per_category: 7,
            min_generated_len: 20,
            min_job_len: 20,
            skill_similarity_threshold: 0.92,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig {
                endpoint: "http://localhost:8080/v1/chat/completions".to_string(),
                model: "deepseek-chat".to_string(),
                api_key_env: "RESUME_TAILOR_API_KEY".to_string(),
                timeout_secs: 60,
                max_retries: 3,
                retry_base_delay_ms: 500,
                temperature: 0.7,
                max_tokens: 512,
            },
            tailoring: TailoringConfig {
                min_change_ratio: 0.4,
                max_keywords_per_category: 7,
                min_generated_len: 20,
                min_job_len: 20,
                skill_similarity_threshold: 0.92,
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                color_output: true,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    pub fn load_from(config_path: PathBuf) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                PipelineError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(Self::config_path())
    }

    pub fn save_to(&self, config_path: PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            PipelineError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-tailor")
            .join("config.toml")
    }

    /// Resolve the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        if self.generator.api_key_env.is_empty() {
            return None;
        }
        std::env::var(&self.generator.api_key_env)
            .ok()
            .filter(|k| !k.is_empty())
    }

    /// Set a configuration value by dotted key, e.g.
    /// `generator.endpoint` or `tailoring.min_change_ratio`.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid =
            |v: &str| PipelineError::Configuration(format!("Invalid value for {}: {}", key, v));

        match key {
            "generator.endpoint" => self.generator.endpoint = value.to_string(),
            "generator.model" => self.generator.model = value.to_string(),
            "generator.api_key_env" => self.generator.api_key_env = value.to_string(),
            "generator.timeout_secs" => {
                self.generator.timeout_secs = value.parse().map_err(|_| invalid(value))?
            }
            "generator.max_retries" => {
                self.generator.max_retries = value.parse().map_err(|_| invalid(value))?
            }
            "generator.retry_base_delay_ms" => {
                self.generator.retry_base_delay_ms = value.parse().map_err(|_| invalid(value))?
            }
            "generator.temperature" => {
                self.generator.temperature = value.parse().map_err(|_| invalid(value))?
            }
            "generator.max_tokens" => {
                self.generator.max_tokens = value.parse().map_err(|_| invalid(value))?
            }
            "tailoring.min_change_ratio" => {
                self.tailoring.min_change_ratio = value.parse().map_err(|_| invalid(value))?
            }
            "tailoring.max_keywords_per_category" => {
                self.tailoring.max_keywords_per_category =
                    value.parse().map_err(|_| invalid(value))?
            }
            "tailoring.min_generated_len" => {
                self.tailoring.min_generated_len = value.parse().map_err(|_| invalid(value))?
            }
            "tailoring.min_job_len" => {
                self.tailoring.min_job_len = value.parse().map_err(|_| invalid(value))?
            }
            "tailoring.skill_similarity_threshold" => {
                self.tailoring.skill_similarity_threshold =
                    value.parse().map_err(|_| invalid(value))?
            }
            "output.format" => {
                self.output.format = value.parse().map_err(|_| invalid(value))?
            }
            "output.color_output" => {
                self.output.color_output = value.parse().map_err(|_| invalid(value))?
            }
            _ => {
                return Err(PipelineError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }
        Ok(())
    }
}
