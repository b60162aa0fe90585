//! Environment variable configuration
//!
//! Provides `ACTION_BENCH_*` overrides applied on top of the config file.

use std::collections::HashMap;
use std::env;

use super::AppConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ACTION_BENCH";

/// Overrides read from environment variables
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvConfig {
    /// ACTION_BENCH_INVOCATIONS
    pub invocations: Option<u32>,
    /// ACTION_BENCH_DURATION
    pub duration_ms: Option<u64>,
    /// ACTION_BENCH_ENDPOINT
    pub endpoint: Option<String>,
    /// ACTION_BENCH_TIMEOUT
    pub timeout: Option<u64>,
    /// ACTION_BENCH_TEST_MODE or ACTION_BENCH_IS_TESTING
    pub test_mode: Option<bool>,
    /// ACTION_BENCH_FORMAT
    pub format: Option<String>,
    /// ACTION_BENCH_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from the process environment
    pub fn load() -> Self {
        Self::from_vars(env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let get = |name: &str| vars.get(&format!("{ENV_PREFIX}_{name}")).cloned();

        let test_mode = match (get("TEST_MODE"), get("IS_TESTING")) {
            (None, None) => None,
            (a, b) => Some(a.is_some_and(|v| parse_bool(&v)) || b.is_some_and(|v| parse_bool(&v))),
        };

        Self {
            invocations: get("INVOCATIONS").and_then(|v| v.parse().ok()),
            duration_ms: get("DURATION").and_then(|v| v.parse().ok()),
            endpoint: get("ENDPOINT"),
            timeout: get("TIMEOUT").and_then(|v| v.parse().ok()),
            test_mode,
            format: get("FORMAT"),
            config_file: get("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        *self != Self::default()
    }

    /// Overlay the set variables onto a config
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(invocations) = self.invocations {
            config.invocations = invocations;
        }
        if let Some(duration_ms) = self.duration_ms {
            config.duration_ms = duration_ms;
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        if let Some(test_mode) = self.test_mode {
            config.test_mode = test_mode;
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
    }
}

/// Interpret an environment value as boolean
fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

/// Print all ACTION_BENCH environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_INVOCATIONS  Number of invocations per strategy");
    println!("  {ENV_PREFIX}_DURATION     Delay of each invocation in milliseconds");
    println!("  {ENV_PREFIX}_ENDPOINT     Base URL of the HTTP echo endpoint");
    println!("  {ENV_PREFIX}_TIMEOUT      HTTP request timeout in seconds (unset: none)");
    println!("  {ENV_PREFIX}_TEST_MODE    Enable the probe entry point (true/false)");
    println!("  {ENV_PREFIX}_IS_TESTING   Alias of {ENV_PREFIX}_TEST_MODE");
    println!("  {ENV_PREFIX}_FORMAT       Output format (table, json, csv, summary)");
    println!("  {ENV_PREFIX}_CONFIG       Path to configuration file");
}
