//! Configuration loading and discovery for `ecopal.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::{EcopalConfig, OutputFormat};
use crate::harmony::HarmonyStrategy;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "ecopal.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse ecopal.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub max_attempts: Option<u32>,
    pub min_base_score: Option<u8>,
    pub min_palette_score: Option<u8>,
    pub harmony: Option<HarmonyStrategy>,
    pub seed: Option<u64>,
    /// Force JSON output
    pub json: bool,
}

/// Find ecopal.toml, first walking up from the current directory, then in
/// `$XDG_CONFIG_HOME/ecopal/` (or `~/.config/ecopal/`).
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find ecopal.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("ecopal").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find ecopal.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`]; with no config file found the defaults are returned.
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("ecopal.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<EcopalConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "loading config");
            load_config_file(&p)
        }
        None => Ok(EcopalConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<EcopalConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: EcopalConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged config
/// is validated again so that flags can't sneak in out-of-range values.
pub fn merge_cli_overrides(config: &mut EcopalConfig, overrides: &CliOverrides) -> Result<(), ConfigError> {
    if let Some(max_attempts) = overrides.max_attempts {
        config.generation.max_attempts = max_attempts;
    }
    if let Some(score) = overrides.min_base_score {
        config.generation.min_base_score = score;
    }
    if let Some(score) = overrides.min_palette_score {
        config.generation.min_palette_score = score;
    }
    if let Some(harmony) = overrides.harmony {
        config.generation.harmony = harmony;
    }
    if let Some(seed) = overrides.seed {
        config.generation.seed = Some(seed);
    }
    if overrides.json {
        config.output.format = OutputFormat::Json;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents.as_bytes())
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[generation]\nmax_attempts = 5");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");

        let subdir = temp.path().join("designs").join("web");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, None);
    }

    #[test]
    #[serial]
    fn test_find_xdg_config() {
        let temp = TempDir::new().expect("should create temp dir");
        let dir = temp.path().join("ecopal");
        fs::create_dir_all(&dir).expect("should create xdg dir");
        let config_path = write_config(&dir, "");

        let previous = env::var("XDG_CONFIG_HOME").ok();
        env::set_var("XDG_CONFIG_HOME", temp.path());
        let found = find_xdg_config();
        match previous {
            Some(v) => env::set_var("XDG_CONFIG_HOME", v),
            None => env::remove_var("XDG_CONFIG_HOME"),
        }

        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_from_path() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_config(temp.path(), "[generation]\nharmony = \"analogous\"\nseed = 3\n");

        let config = load_config(Some(&path)).expect("should load config");
        assert_eq!(config.generation.harmony, HarmonyStrategy::Analogous);
        assert_eq!(config.generation.seed, Some(3));
    }

    #[test]
    fn test_load_config_parse_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_config(temp.path(), "[generation\n");
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_config(temp.path(), "[generation]\nmax_attempts = 0\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref v) if v.len() == 1));
        assert!(err.to_string().contains("generation.max_attempts"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = temp.path().join("nope.toml");
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = EcopalConfig::default();
        let overrides = CliOverrides {
            max_attempts: Some(10),
            harmony: Some(HarmonyStrategy::Complementary),
            seed: Some(99),
            json: true,
            ..Default::default()
        };
        merge_cli_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.generation.max_attempts, 10);
        assert_eq!(config.generation.min_palette_score, 75);
        assert_eq!(config.generation.harmony, HarmonyStrategy::Complementary);
        assert_eq!(config.generation.seed, Some(99));
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_merge_cli_overrides_validates() {
        let mut config = EcopalConfig::default();
        let overrides = CliOverrides { min_palette_score: Some(150), ..Default::default() };
        assert!(matches!(merge_cli_overrides(&mut config, &overrides), Err(ConfigError::Validation(_))));
    }
}
