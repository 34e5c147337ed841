//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "CONNBENCH";

/// Name of the required endpoint variable
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Configuration overrides from environment variables
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvConfig {
    /// Query from CONNBENCH_QUERY
    pub query: Option<String>,
    /// Iterations from CONNBENCH_ITERATIONS
    pub iterations: Option<u32>,
    /// Pool lower bound from CONNBENCH_MIN_CONNECTIONS
    pub min_connections: Option<u32>,
    /// Pool upper bound from CONNBENCH_MAX_CONNECTIONS
    pub max_connections: Option<u32>,
    /// Acquire timeout in seconds from CONNBENCH_ACQUIRE_TIMEOUT
    pub acquire_timeout_secs: Option<u64>,
    /// Output format from CONNBENCH_FORMAT
    pub format: Option<String>,
    /// Config file from CONNBENCH_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            query: get_env("QUERY"),
            iterations: get_env_parse("ITERATIONS"),
            min_connections: get_env_parse("MIN_CONNECTIONS"),
            max_connections: get_env_parse("MAX_CONNECTIONS"),
            acquire_timeout_secs: get_env_parse("ACQUIRE_TIMEOUT"),
            format: get_env("FORMAT"),
            config_file: get_env("CONFIG"),
        }
    }
}

/// Read the required endpoint descriptor variable
pub fn database_url() -> Option<String> {
    env::var(DATABASE_URL_VAR).ok().filter(|v| !v.is_empty())
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Guard that restores environment variables on drop
#[cfg(test)]
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

#[cfg(test)]
impl EnvGuard {
    /// Set variables, remembering their previous values
    pub fn set(vars: &[(&str, &str)]) -> Self {
        let previous = vars
            .iter()
            .map(|(k, _)| (k.to_string(), env::var(k).ok()))
            .collect();
        for (key, value) in vars {
            env::set_var(key, value);
        }
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}
