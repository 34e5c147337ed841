//! CLI argument parsing
//!
//! Defines command-line interface using clap. Every tunable is
//! optional here; defaults are resolved against environment variables
//! and the config file in `config`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;

/// PostgreSQL connection-strategy benchmark
#[derive(Parser, Debug)]
#[command(name = "connbench")]
#[command(version)]
#[command(about = "Compare per-query and pooled PostgreSQL connection strategies")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run both strategies and report the relative improvement
    Compare(BenchArgs),

    /// Run a single strategy
    Run(RunArgs),
}

/// Shared benchmark arguments
#[derive(Parser, Debug, Default)]
pub struct BenchArgs {
    /// SQL query to benchmark [default: SELECT 1]
    #[arg(short, long)]
    pub query: Option<String>,

    /// Iterations per strategy [default: 100]
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Pool lower bound [default: 1]
    #[arg(long)]
    pub min_connections: Option<u32>,

    /// Pool upper bound [default: 5]
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Pool acquire timeout in seconds (blocks without deadline when unset)
    #[arg(long)]
    pub acquire_timeout: Option<u64>,

    /// Output format (json, json-pretty, table) [default: json-pretty]
    #[arg(short, long)]
    pub format: Option<String>,

    /// Save the report to a file in addition to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to a JSON or YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl BenchArgs {
    /// Convert the flags into configuration overrides
    pub fn overrides(&self) -> Overrides {
        Overrides {
            query: self.query.clone(),
            iterations: self.iterations,
            min_connections: self.min_connections,
            max_connections: self.max_connections,
            acquire_timeout_secs: self.acquire_timeout,
            format: self.format.clone(),
        }
    }
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Strategy to run (uncached, pooled)
    #[arg(short, long, default_value = "uncached")]
    pub strategy: String,

    #[command(flatten)]
    pub bench: BenchArgs,
}
