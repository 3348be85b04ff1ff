use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use crate::constants::{
    DEFAULT_DATABASE_PATH, DEFAULT_DISALLOWED_PATH, DEFAULT_INFORMAL_PATH,
    DEFAULT_LOG_DIR, DEFAULT_METRICS_PORT, DEFAULT_PORT, ENV_DATABASE_PATH, ENV_DISALLOWED_PATH,
    ENV_INFORMAL_PATH, ENV_PORT,
};
use crate::error::{CleanseError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub lexicon: LexiconConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    pub informal_path: PathBuf,
    pub disallowed_path: PathBuf,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            informal_path: PathBuf::from(DEFAULT_INFORMAL_PATH),
            disallowed_path: PathBuf::from(DEFAULT_DISALLOWED_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: DEFAULT_METRICS_PORT,
        }
    }
}

impl Config {
    /// Load from `config_path`, then apply environment overrides. A missing
    /// file means all defaults; a file that exists but does not parse is an
    /// error.
    pub fn load_from<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let mut config = if config_path.exists() {
            let config_content = fs::read_to_string(config_path).map_err(|e| {
                CleanseError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            Self::from_toml(&config_content)?
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Override file values with any variables `lookup` resolves.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|_| CleanseError::Config(format!("{} is not a port: '{}'", ENV_PORT, port)))?;
        }
        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            self.database.path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_INFORMAL_PATH) {
            self.lexicon.informal_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_DISALLOWED_PATH) {
            self.lexicon.disallowed_path = PathBuf::from(path);
        }
        Ok(())
    }
}
