//! Configuration schema types for `ecopal.toml`
//!
//! Defines the structure and validation rules for ecopal configuration.

use crate::generate::GenerationPolicy;
use crate::harmony::HarmonyStrategy;
use serde::{Deserialize, Serialize};

/// Report format for palette output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Palette generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Attempts before falling back to a random palette
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Minimum sustainability of a base color
    #[serde(default = "default_min_base_score")]
    pub min_base_score: u8,
    /// Minimum aggregate sustainability of an accepted palette
    #[serde(default = "default_min_palette_score")]
    pub min_palette_score: u8,
    /// Default harmony strategy
    #[serde(default)]
    pub harmony: HarmonyStrategy,
    /// Fixed RNG seed for reproducible output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_max_attempts() -> u32 {
    100
}

fn default_min_base_score() -> u8 {
    60
}

fn default_min_palette_score() -> u8 {
    75
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            min_base_score: default_min_base_score(),
            min_palette_score: default_min_palette_score(),
            harmony: HarmonyStrategy::default(),
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Retry-loop policy described by this section
    pub fn policy(&self) -> GenerationPolicy {
        GenerationPolicy {
            max_attempts: self.max_attempts,
            min_base_score: self.min_base_score,
            min_palette_score: self.min_palette_score,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Root configuration structure for ecopal.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EcopalConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "generation.max_attempts")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ecopal.toml: '{}' {}", self.field, self.message)
    }
}

impl EcopalConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.generation.max_attempts == 0 {
            errors.push(ConfigValidationError {
                field: "generation.max_attempts".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        for (field, value) in [
            ("generation.min_base_score", self.generation.min_base_score),
            ("generation.min_palette_score", self.generation.min_palette_score),
        ] {
            if value > 100 {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: format!("must be between 0 and 100, got {}", value),
                });
            }
        }

        errors
    }
}
