//! Runtime settings.
//!
//! Settings are layered: built-in defaults, then an optional `settings.json`
//! style file, then environment overrides. A missing file named by
//! `PGP_WORKBENCH_CONFIG` is an error; no file at all just means defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::pgp::DEFAULT_KEY_STRENGTH;

/// Env var naming the settings file when `--config` is not given.
pub const CONFIG_ENV: &str = "PGP_WORKBENCH_CONFIG";
pub const KEY_STRENGTH_ENV: &str = "PGP_WORKBENCH_KEY_STRENGTH";
pub const LOG_FILE_ENV: &str = "PGP_WORKBENCH_LOG_FILE";
pub const DEFAULT_PASSPHRASE_ENV: &str = "PGP_WORKBENCH_PASSPHRASE";

/// RSA sizes accepted for key generation.
pub const ALLOWED_KEY_STRENGTHS: [u32; 3] = [2048, 3072, 4096];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported key strength {0}; use 2048, 3072 or 4096")]
    InvalidKeyStrength(u32),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RSA modulus size for generated keys.
    pub key_strength: u32,
    /// Env var read for a non-interactive passphrase.
    pub passphrase_env: String,
    /// Append log lines here as well as to stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_strength: DEFAULT_KEY_STRENGTH,
            passphrase_env: DEFAULT_PASSPHRASE_ENV.to_string(),
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from `PGP_WORKBENCH_CONFIG` when no path
    /// is given, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut settings = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        settings.apply_env()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse a JSON settings file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(KEY_STRENGTH_ENV) {
            self.key_strength = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: KEY_STRENGTH_ENV.to_string(),
                value: value.clone(),
            })?;
        }
        if let Some(value) = std::env::var_os(LOG_FILE_ENV) {
            if !value.is_empty() {
                self.log_file = Some(PathBuf::from(value));
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ALLOWED_KEY_STRENGTHS.contains(&self.key_strength) {
            return Err(ConfigError::InvalidKeyStrength(self.key_strength));
        }
        if self.passphrase_env.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "passphrase_env".to_string(),
                value: self.passphrase_env.clone(),
            });
        }
        Ok(())
    }
}
