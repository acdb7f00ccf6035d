//! Grader configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{DelimiterPair, DEFAULT_PENALTY};
use crate::parser::QuestionDefaults;

/// Top-level wordselect configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordselectConfig {
    /// Delimiters for question sets that don't declare their own.
    #[serde(default)]
    pub default_delimiters: DelimiterPair,
    /// Per-attempt penalty for question sets that don't declare their own.
    #[serde(default = "default_penalty")]
    pub default_penalty: f64,
    /// Drop an attempt identical to the one before it before grading.
    #[serde(default = "default_true")]
    pub collapse_repeated_attempts: bool,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_penalty() -> f64 {
    DEFAULT_PENALTY
}
fn default_true() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./wordselect-results")
}

impl Default for WordselectConfig {
    fn default() -> Self {
        Self {
            default_delimiters: DelimiterPair::default(),
            default_penalty: default_penalty(),
            collapse_repeated_attempts: true,
            output_dir: default_output_dir(),
        }
    }
}

impl WordselectConfig {
    /// The defaults handed to the question set parser.
    pub fn question_defaults(&self) -> QuestionDefaults {
        QuestionDefaults {
            delimiters: self.default_delimiters,
            penalty: self.default_penalty,
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var("WORDSELECT_PENALTY") {
            self.default_penalty = raw
                .trim()
                .parse::<f64>()
                .with_context(|| format!("invalid WORDSELECT_PENALTY: {raw:?}"))?;
        }
        if let Ok(raw) = std::env::var("WORDSELECT_DELIMITERS") {
            self.default_delimiters = raw
                .parse::<DelimiterPair>()
                .with_context(|| format!("invalid WORDSELECT_DELIMITERS: {raw:?}"))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.default_penalty),
            "default_penalty must be between 0.0 and 1.0, got {}",
            self.default_penalty
        );
        Ok(())
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `wordselect.toml` in the current directory
/// 2. `~/.config/wordselect/config.toml`
///
/// Environment variable overrides: `WORDSELECT_PENALTY`, `WORDSELECT_DELIMITERS`.
pub fn load_config() -> Result<WordselectConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<WordselectConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("wordselect.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<WordselectConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => WordselectConfig::default(),
    };

    config.apply_env_overrides()?;
    config.validate()?;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("wordselect"))
}
