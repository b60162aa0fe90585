//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Remote action invocation benchmark
#[derive(Parser, Debug)]
#[command(name = "action-bench")]
#[command(author = "hephaex@gmail.com")]
#[command(version = "0.1.0")]
#[command(about = "Compare default, parallel and HTTP invocation of remote actions")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable the probe entry point
    #[arg(long, global = true, visible_alias = "is-testing")]
    pub test_mode: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Benchmark every invocation strategy
    Run(RunArgs),

    /// Run the parallel strategy once and print raw output (test mode only)
    Probe(ProbeArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),

    /// List supported environment variables
    Env,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Invocations per strategy
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub invocations: Option<u32>,

    /// Delay of each invocation in milliseconds
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Base URL of the HTTP echo endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Path of the echo route
    #[arg(long)]
    pub path: Option<String>,

    /// Upper bound on parallel calls in flight
    #[arg(long)]
    pub max_in_flight: Option<usize>,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Save report to file (.json, .yaml or .csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for probe command
#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Invocations in the batch
    #[arg(short = 'n', long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..))]
    pub invocations: u32,

    /// Delay of each invocation in milliseconds
    #[arg(short, long)]
    pub duration: Option<u64>,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Destination file
        #[arg(long, default_value = "action-bench.yaml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
