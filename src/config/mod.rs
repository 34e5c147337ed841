//! Configuration module
//!
//! Handles loading and resolving configuration from CLI flags,
//! environment variables, and config files.

mod endpoint;
mod env;

pub use endpoint::EndpointDescriptor;
pub use env::{database_url, EnvConfig, DATABASE_URL_VAR};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BenchError;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Query to benchmark
    pub query: String,

    /// Iterations per strategy
    pub iterations: u32,

    /// Pool lower bound
    pub min_connections: u32,

    /// Pool upper bound
    pub max_connections: u32,

    /// Pool acquire timeout in seconds; absent preserves the reference
    /// behavior of blocking without a deadline
    pub acquire_timeout_secs: Option<u64>,

    /// Output format (json, json-pretty, table)
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            query: "SELECT 1".to_string(),
            iterations: 100,
            min_connections: 1,
            max_connections: 5,
            acquire_timeout_secs: None,
            format: "json-pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON or YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BenchError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BenchError::Configuration(format!("failed to read config file {}: {e}", path.display()))
        })?;

        let config: Self = if path
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false)
        {
            serde_yaml::from_str(&content)
                .map_err(|e| BenchError::Configuration(format!("failed to parse YAML config: {e}")))?
        } else {
            serde_json::from_str(&content)
                .map_err(|e| BenchError::Configuration(format!("failed to parse JSON config: {e}")))?
        };

        Ok(config)
    }

    /// Apply overrides in precedence order: CLI > environment > file
    pub fn resolve(file: AppConfig, env: &EnvConfig, cli: &Overrides) -> Self {
        let mut resolved = file;

        if let Some(query) = &env.query {
            resolved.query = query.clone();
        }
        if let Some(iterations) = env.iterations {
            resolved.iterations = iterations;
        }
        if let Some(min) = env.min_connections {
            resolved.min_connections = min;
        }
        if let Some(max) = env.max_connections {
            resolved.max_connections = max;
        }
        if let Some(secs) = env.acquire_timeout_secs {
            resolved.acquire_timeout_secs = Some(secs);
        }
        if let Some(format) = &env.format {
            resolved.format = format.clone();
        }

        if let Some(query) = &cli.query {
            resolved.query = query.clone();
        }
        if let Some(iterations) = cli.iterations {
            resolved.iterations = iterations;
        }
        if let Some(min) = cli.min_connections {
            resolved.min_connections = min;
        }
        if let Some(max) = cli.max_connections {
            resolved.max_connections = max;
        }
        if let Some(secs) = cli.acquire_timeout_secs {
            resolved.acquire_timeout_secs = Some(secs);
        }
        if let Some(format) = &cli.format {
            resolved.format = format.clone();
        }

        resolved
    }

    /// Pool sizing bounds for the runner
    pub fn sizing(&self) -> PoolSizing {
        PoolSizing {
            min_connections: self.min_connections,
            max_connections: self.max_connections,
            acquire_timeout_secs: self.acquire_timeout_secs,
        }
    }
}

/// Command-line overrides, all optional
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub query: Option<String>,
    pub iterations: Option<u32>,
    pub min_connections: Option<u32>,
    pub max_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub format: Option<String>,
}

/// Pool sizing bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolSizing {
    pub min_connections: u32,
    pub max_connections: u32,
    /// Absent means no deadline on pool acquisition
    pub acquire_timeout_secs: Option<u64>,
}

impl PoolSizing {
    /// Validate the bounds: `min >= 1` and `max >= min`
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.min_connections < 1 {
            return Err(BenchError::Configuration(
                "min_connections must be at least 1".to_string(),
            ));
        }
        if self.max_connections < self.min_connections {
            return Err(BenchError::Configuration(format!(
                "max_connections ({}) must not be below min_connections ({})",
                self.max_connections, self.min_connections
            )));
        }
        Ok(())
    }
}
