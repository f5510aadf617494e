// src/config/mod.rs
//! Service configuration.
//!
//! Resolution order:
//! 1) `$TASTE_CONFIG_PATH`, else `config/taste_text.toml`; a missing file means defaults
//! 2) env overrides: `TASTE_BIND`, `TASTE_DATASET_PATH`, `TASTE_WORKERS`
//!
//! TOML shape:
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//! [dataset]
//! path = "data/reviews.jsonl"
//! [sentiment]
//! mode = "chunk"            # or "sentence"
//! workers = 4
//! normalize = true
//! malformed_rows = "coerce" # or "report"
//! # lexicon_path = "data/custom_lexicon.json"
//! [recommend]
//! top_n = 5
//! cuisine_from_raw_query = false
//! weights = { location = 0.55, cuisine = 0.25, quality = 0.20 }
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyze::{AspectMode, MalformedRows, DEFAULT_WORKERS};
use crate::recommend::{RankWeights, DEFAULT_TOP_N};

pub const DEFAULT_CONFIG_PATH: &str = "config/taste_text.toml";
pub const ENV_CONFIG_PATH: &str = "TASTE_CONFIG_PATH";
pub const ENV_BIND: &str = "TASTE_BIND";
pub const ENV_DATASET_PATH: &str = "TASTE_DATASET_PATH";
pub const ENV_WORKERS: &str = "TASTE_WORKERS";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub sentiment: SentimentConfig,
    pub recommend: RecommendConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/reviews.jsonl"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub mode: AspectMode,
    pub workers: usize,
    pub normalize: bool,
    pub malformed_rows: MalformedRows,
    /// Replaces the embedded lexicon (JSON or VADER text format).
    pub lexicon_path: Option<PathBuf>,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            mode: AspectMode::default(),
            workers: DEFAULT_WORKERS,
            normalize: true,
            malformed_rows: MalformedRows::default(),
            lexicon_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub top_n: usize,
    pub cuisine_from_raw_query: bool,
    pub weights: RankWeights,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            cuisine_from_raw_query: false,
            weights: RankWeights::default(),
        }
    }
}

impl AppConfig {
    /// Load using env var + fallbacks, then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
                }
                Self::load_from(&pb)?
            }
            Err(_) => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load_from(&default)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(bind) = std::env::var(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Ok(path) = std::env::var(ENV_DATASET_PATH) {
            self.dataset.path = PathBuf::from(path);
        }
        if let Ok(raw) = std::env::var(ENV_WORKERS) {
            self.sentiment.workers = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_WORKERS}={raw} is not a number"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.sentiment.workers == 0 {
            return Err(anyhow!("sentiment.workers must be at least 1"));
        }
        if !self.recommend.weights.is_valid() {
            return Err(anyhow!(
                "recommend.weights must be non-negative and sum to 1, got {:?}",
                self.recommend.weights
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
[sentiment]
mode = "sentence"
malformed_rows = "report"

[recommend]
top_n = 3
"#,
        )
        .unwrap();
        assert_eq!(cfg.sentiment.mode, AspectMode::Sentence);
        assert_eq!(cfg.sentiment.malformed_rows, MalformedRows::Report);
        assert_eq!(cfg.sentiment.workers, DEFAULT_WORKERS);
        assert_eq!(cfg.recommend.top_n, 3);
        assert_eq!(cfg.recommend.weights, RankWeights::default());
        assert_eq!(cfg.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn rejects_non_convex_weights() {
        let cfg = AppConfig::from_toml_str(
            "[recommend]\nweights = { location = 1.0, cuisine = 1.0, quality = 0.0 }\n",
        )
        .unwrap();
        assert!(cfg.validate().is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_CONFIG_PATH);
        env::remove_var(ENV_WORKERS);

        // no file → defaults
        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.recommend.top_n, DEFAULT_TOP_N);

        // ./config/taste_text.toml fallback
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        fs::write(
            tmp.path().join(DEFAULT_CONFIG_PATH),
            "[recommend]\ntop_n = 7\n",
        )
        .unwrap();
        assert_eq!(AppConfig::load().unwrap().recommend.top_n, 7);

        // env path wins, env overrides on top
        let p_env = tmp.path().join("other.toml");
        fs::write(&p_env, "[recommend]\ntop_n = 2\n").unwrap();
        env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
        env::set_var(ENV_WORKERS, "8");
        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.recommend.top_n, 2);
        assert_eq!(cfg.sentiment.workers, 8);

        env::set_var(ENV_WORKERS, "many");
        assert!(AppConfig::load().is_err());

        env::remove_var(ENV_WORKERS);
        env::remove_var(ENV_CONFIG_PATH);
        env::set_current_dir(&old).unwrap();
    }
}
