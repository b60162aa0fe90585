//! Configuration module
//!
//! Handles loading and managing configuration. Precedence, lowest first:
//! defaults, config file, `ACTION_BENCH_*` variables, CLI flags.

mod env;
mod file;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use env::{print_env_help, EnvConfig, ENV_PREFIX};

/// Application configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Invocations per strategy
    pub invocations: u32,

    /// Artificial delay of each invocation in milliseconds
    pub duration_ms: u64,

    /// Base URL of the HTTP echo endpoint
    pub endpoint: String,

    /// Path of the echo route on the endpoint
    pub api_path: String,

    /// HTTP request timeout in seconds (unbounded when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Upper bound on parallel calls in flight (unbounded when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_in_flight: Option<usize>,

    /// Enable the probe entry point
    pub test_mode: bool,

    /// Default output format
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            invocations: 10,
            duration_ms: 1000,
            endpoint: "http://localhost:3000".to_string(),
            api_path: "/api".to_string(),
            timeout_secs: None,
            max_in_flight: None,
            test_mode: false,
            format: "table".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: Self = file::read(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        file::write(self, path.as_ref())
    }

    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        file::find()
    }

    /// Resolve the effective configuration
    ///
    /// Uses `explicit` if given, then `ACTION_BENCH_CONFIG`, then the standard
    /// locations, and finally overlays environment overrides.
    pub fn resolve(explicit: Option<&Path>, env: &EnvConfig) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env.config_file.as_deref().map(file::expand_path))
            .or_else(Self::find);

        let mut config = match path {
            Some(path) => Self::load(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => Self::default(),
        };

        env.apply_to(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.invocations == 0 {
            anyhow::bail!("invocations must be at least 1");
        }
        if self.endpoint.trim().is_empty() {
            anyhow::bail!("endpoint must not be empty");
        }
        if !self.api_path.starts_with('/') {
            anyhow::bail!("api_path must start with '/': {}", self.api_path);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            if timeout_secs.saturating_mul(1000) <= self.duration_ms {
                anyhow::bail!(
                    "timeout_secs ({}s) must exceed the invocation delay ({}ms)",
                    timeout_secs,
                    self.duration_ms
                );
            }
        }
        if self.max_in_flight == Some(0) {
            anyhow::bail!("max_in_flight must be at least 1 when set");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.invocations, 10);
        assert_eq!(config.duration_ms, 1000);
        assert_eq!(config.api_path, "/api");
        assert!(!config.test_mode);
        assert_eq!(config.timeout_secs, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let config = AppConfig {
            invocations: 5,
            max_in_flight: Some(8),
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_save_load_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        AppConfig::default().save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "duration_ms: 250\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.duration_ms, 250);
        assert_eq!(config.invocations, 10);
    }

    #[test]
    fn test_validate_rejects_zero_invocations() {
        let config = AppConfig {
            invocations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_timeout_below_delay() {
        let config = AppConfig {
            duration_ms: 1500,
            timeout_secs: Some(1),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let zero = AppConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let roomy = AppConfig {
            duration_ms: 1500,
            timeout_secs: Some(2),
            ..Default::default()
        };
        assert!(roomy.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_in_flight() {
        let config = AppConfig {
            max_in_flight: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_applies_env_over_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "invocations: 4\nduration_ms: 100\n").unwrap();

        let env = EnvConfig::from_vars([("ACTION_BENCH_DURATION", "50")]);
        let config = AppConfig::resolve(Some(&path), &env).unwrap();

        assert_eq!(config.invocations, 4);
        assert_eq!(config.duration_ms, 50);
    }

    #[test]
    fn test_resolve_missing_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        assert!(AppConfig::resolve(Some(&path), &EnvConfig::default()).is_err());
    }
}
