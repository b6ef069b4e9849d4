use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, SkillRadarError};
use crate::ranker::{CHART_TOP_N, DEFAULT_TOP_N};

const MAX_WORKERS: usize = 64;

/// Main configuration structure loaded from skill_radar.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub discovery: DiscoveryConfig,
    pub output: OutputConfig,
    pub lexicon: LexiconConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Ranking and matching behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub top_n: usize,
    pub chart_top_n: usize,
    /// Threads used to match descriptions; 1 keeps matching on the caller's thread
    pub workers: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            chart_top_n: CHART_TOP_N,
            workers: 1,
        }
    }
}

/// LLM keyword generation and new-skill discovery
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub enabled: bool,
    pub model: String,
    pub base_url: String,
    pub chunk_size: usize,
    pub max_chunk_chars: usize,
    pub temperature: f32,
    pub keyword_temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: "llama-3.3-70b-versatile".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            chunk_size: 15,
            max_chunk_chars: 8000,
            temperature: 0.3,
            keyword_temperature: 0.7,
            max_tokens: 500,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// Extra `[[skill]]` entries layered over the builtin lexicon
    pub extra_file: Option<PathBuf>,
}

/// Secrets and other values that only ever come from the environment
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub groq_api_key: Option<String>,
}

impl RuntimeConfig {
    pub fn load_from_env() -> Self {
        Self {
            groq_api_key: std::env::var("GROQ_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses SKILL_RADAR_CONFIG environment variable or defaults to "skill_radar.toml"
    pub fn load() -> Result<Self> {
        // 1) SKILL_RADAR_ENV_FILE if set
        // 2) ./.env
        if let Ok(env_path) = std::env::var("SKILL_RADAR_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let config_path = std::env::var("SKILL_RADAR_CONFIG")
            .unwrap_or_else(|_| "skill_radar.toml".to_string());

        let mut config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            Self::from_toml(&content)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(top_n) = env_parse::<usize>("SKILL_RADAR_TOP_N") {
            self.analysis.top_n = top_n;
            tracing::debug!("SKILL_RADAR_TOP_N env override applied");
        }
        if let Some(workers) = env_parse::<usize>("SKILL_RADAR_WORKERS") {
            self.analysis.workers = workers;
            tracing::debug!("SKILL_RADAR_WORKERS env override applied");
        }
        if let Ok(dir) = std::env::var("SKILL_RADAR_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
            tracing::debug!("SKILL_RADAR_OUTPUT_DIR env override applied");
        }
        if let Ok(model) = std::env::var("GROQ_MODEL") {
            self.discovery.model = model;
            tracing::debug!("GROQ_MODEL env override applied");
        }
    }

    /// Clamp out-of-range values and reject unusable ones
    pub fn validate(&mut self) -> Result<()> {
        if self.analysis.top_n == 0 {
            return Err(SkillRadarError::Config {
                message: "analysis.top_n must be at least 1".to_string(),
            });
        }
        if self.analysis.chart_top_n == 0 {
            self.analysis.chart_top_n = CHART_TOP_N;
        }
        if self.analysis.workers == 0 {
            self.analysis.workers = 1;
        } else if self.analysis.workers > MAX_WORKERS {
            tracing::warn!(
                "analysis.workers {} exceeds max {}, clamping",
                self.analysis.workers,
                MAX_WORKERS
            );
            self.analysis.workers = MAX_WORKERS;
        }
        if self.discovery.chunk_size == 0 {
            tracing::warn!("discovery.chunk_size 0 is invalid, using 15");
            self.discovery.chunk_size = 15;
        }
        if !(0.0..=2.0).contains(&self.discovery.temperature) {
            tracing::warn!(
                "discovery.temperature {} out of range, clamping to [0, 2]",
                self.discovery.temperature
            );
            self.discovery.temperature = self.discovery.temperature.clamp(0.0, 2.0);
        }
        if !self.discovery.base_url.starts_with("http://")
            && !self.discovery.base_url.starts_with("https://")
        {
            return Err(SkillRadarError::Config {
                message: format!(
                    "discovery.base_url '{}' must start with http:// or https://",
                    self.discovery.base_url
                ),
            });
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [analysis]
            top_n = 20

            [discovery]
            enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.top_n, 20);
        assert_eq!(config.analysis.chart_top_n, CHART_TOP_N);
        assert!(config.discovery.enabled);
        assert_eq!(config.discovery.chunk_size, 15);
        assert_eq!(config.output.dir, PathBuf::from("output"));
    }

    #[test]
    fn validate_clamps_workers_and_rejects_zero_top_n() {
        let mut config = Config::default();
        config.analysis.workers = 0;
        config.validate().unwrap();
        assert_eq!(config.analysis.workers, 1);

        config.analysis.workers = 1000;
        config.validate().unwrap();
        assert_eq!(config.analysis.workers, MAX_WORKERS);

        config.analysis.top_n = 0;
        assert!(matches!(
            config.validate(),
            Err(SkillRadarError::Config { .. })
        ));
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let mut config = Config::default();
        config.discovery.base_url = "api.groq.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(matches!(
            Config::from_toml("[analysis\ntop_n = 1"),
            Err(SkillRadarError::Config { .. })
        ));
    }
}
