use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BrainConfig {
    pub log: LogConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub search: SearchConfig,
    pub guard: GuardConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    /// Directory scanned by `brain embed` for markdown documentation.
    pub docs_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub cache_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub n_results: usize,
    /// Markdown files smaller than this are skipped at index time.
    pub min_doc_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GuardConfig {
    /// Default cooldown window for `brain check`, in hours.
    pub cooldown_hours: f64,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            storage: StorageConfig::default(),
            embedding: EmbeddingConfig::default(),
            search: SearchConfig::default(),
            guard: GuardConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_brain_dir()
            .join("brain.db")
            .to_string_lossy()
            .into_owned();
        let docs_dir = dirs::home_dir()
            .expect("home directory must exist")
            .to_string_lossy()
            .into_owned();
        Self { db_path, docs_dir }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let cache_dir = default_brain_dir()
            .join("models")
            .to_string_lossy()
            .into_owned();
        Self {
            provider: "local".into(),
            model: "all-MiniLM-L6-v2".into(),
            cache_dir,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            n_results: 5,
            min_doc_bytes: 100,
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            cooldown_hours: crate::guard::gate::DEFAULT_COOLDOWN_HOURS,
        }
    }
}

/// Returns `~/.brain/`
pub fn default_brain_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".brain")
}

/// Returns the default config file path: `~/.brain/config.toml`
pub fn default_config_path() -> PathBuf {
    default_brain_dir().join("config.toml")
}

impl BrainConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            BrainConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (BRAIN_DB, BRAIN_DOCS_DIR, BRAIN_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("BRAIN_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("BRAIN_DOCS_DIR") {
            self.storage.docs_dir = val;
        }
        if let Ok(val) = std::env::var("BRAIN_LOG_LEVEL") {
            self.log.level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// Resolve the documentation directory, expanding `~` if needed.
    pub fn resolved_docs_dir(&self) -> PathBuf {
        expand_tilde(&self.storage.docs_dir)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
