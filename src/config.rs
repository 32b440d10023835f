//! Engine configuration.

use crate::core::DEFAULT_MAX_HISTORY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Step budget used by `run`/`iterate` when the caller gives none.
pub const DEFAULT_MAX_STEPS: usize = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse engine config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid engine config: {0}")]
    Invalid(String),
}

/// Tunables applied by the builder.
///
/// ```rust
/// use flowstate::config::EngineConfig;
///
/// let config = EngineConfig::from_toml_str("max_history = 20").unwrap();
/// assert_eq!(config.max_history, 20);
/// assert_eq!(config.default_max_steps, flowstate::config::DEFAULT_MAX_STEPS);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// States retained by the application's `StateManager`.
    pub max_history: usize,
    pub default_max_steps: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            default_max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history == 0 {
            return Err(ConfigError::Invalid(
                "max_history must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
