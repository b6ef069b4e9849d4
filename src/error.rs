//! Domain-specific error types for skill-radar

use thiserror::Error;

/// Main error type for the skill-radar library
#[derive(Error, Debug)]
pub enum SkillRadarError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Lexicon error: {message}")]
    Lexicon { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("CSV error: {message}")]
    Csv { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Skill discovery error: {message}")]
    Discovery { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl From<std::io::Error> for SkillRadarError {
    fn from(err: std::io::Error) -> Self {
        SkillRadarError::Io {
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for SkillRadarError {
    fn from(err: csv::Error) -> Self {
        SkillRadarError::Csv {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SkillRadarError {
    fn from(err: serde_json::Error) -> Self {
        SkillRadarError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SkillRadarError {
    fn from(err: toml::de::Error) -> Self {
        SkillRadarError::Config {
            message: err.to_string(),
        }
    }
}

impl From<regex::Error> for SkillRadarError {
    fn from(err: regex::Error) -> Self {
        SkillRadarError::Lexicon {
            message: format!("invalid pattern: {}", err),
        }
    }
}

impl From<reqwest::Error> for SkillRadarError {
    fn from(err: reqwest::Error) -> Self {
        SkillRadarError::Discovery {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

/// Result type alias for skill-radar operations
pub type Result<T> = std::result::Result<T, SkillRadarError>;
