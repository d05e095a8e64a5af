use crate::config::resolution::ResolutionParseError;

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Resolution(ResolutionParseError),
    Threshold(f64),
    MissingParameter(&'static str),
    UnknownMode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
            ConfigError::Resolution(e) => write!(f, "{}", e),
            ConfigError::Threshold(t) => {
                write!(f, "threshold should be between 0 and 1, got {}", t)
            }
            ConfigError::MissingParameter(name) => {
                write!(f, "{} needs to be set for this cloud mask mode", name)
            }
            ConfigError::UnknownMode(mode) => write!(
                f,
                "unknown cloud mask mode `{}`, expected vector, rasterized_vector or probability",
                mode
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<ResolutionParseError> for ConfigError {
    fn from(err: ResolutionParseError) -> ConfigError {
        ConfigError::Resolution(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}
