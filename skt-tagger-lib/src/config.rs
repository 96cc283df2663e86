// Tagger configuration, loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Weights for the default length-based scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Multiplies the squared length of each recognized form.
    pub form_weight: f64,
    /// Subtracted once per character still left in the chunk.
    pub remainder_penalty: f64,
    /// Base cost of giving up on a chunk.
    pub nonform_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            form_weight: 1.0,
            remainder_penalty: 1.0,
            nonform_penalty: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    /// Upper bound on search states expanded per segment.
    pub max_expansions: usize,
    pub scoring: ScoringConfig,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            max_expansions: 50_000,
            scoring: ScoringConfig::default(),
        }
    }
}

impl TaggerConfig {
    /// Parse and validate. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: TaggerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_expansions == 0 {
            return Err(ConfigError::Invalid(
                "max_expansions must be greater than 0".to_string(),
            ));
        }
        let s = &self.scoring;
        for (name, value) in [
            ("form_weight", s.form_weight),
            ("remainder_penalty", s.remainder_penalty),
            ("nonform_penalty", s.nonform_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "scoring.{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
