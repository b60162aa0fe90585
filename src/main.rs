//! Action Bench - Remote Action Invocation Benchmark
//!
//! A CLI tool that runs the same batch of delayed echo calls through three
//! invocation strategies and compares their execution times.
//!
//! ## Strategies
//!
//! - HTTP endpoint: one concurrent `GET /api?n=..&duration=..` per call
//! - Parallel actions: calls dispatched as independent tasks, then collected
//! - Default actions: calls funnelled through a serializing action channel
//!
//! ## Usage
//!
//! ```bash
//! # Benchmark all strategies with 10 calls of 1s each
//! action-bench run -n 10 -d 1000
//!
//! # Compare against a custom echo server and save a CSV report
//! action-bench run --endpoint http://127.0.0.1:8080 -o report.csv
//!
//! # Raw parallel output for automated checks
//! action-bench --test-mode probe -n 3 -d 500
//!
//! # Configuration
//! action-bench config init
//! action-bench config show
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

mod benchmark;
mod cli;
mod config;
mod http;
mod invoker;
mod models;
mod output;
mod rpc;
mod utils;

use benchmark::BenchmarkOrchestrator;
use cli::Args;
use config::{AppConfig, EnvConfig};
use output::{OutputFormat, ResultFormatter};
use utils::{init_logger, LogLevel};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logger(LogLevel::from_verbose(args.verbose));

    let config = load_config(&args)?;

    match args.command {
        cli::Command::Run(run_args) => {
            run_benchmark(config, run_args).await?;
        }
        cli::Command::Probe(probe_args) => {
            run_probe(config, probe_args).await?;
        }
        cli::Command::Config(config_args) => {
            manage_config(&config, config_args)?;
        }
        cli::Command::Env => {
            config::print_env_help();
        }
    }

    Ok(())
}

/// Defaults, then file, then environment, then global flags
fn load_config(args: &Args) -> Result<AppConfig> {
    let env = EnvConfig::load();
    if env.has_any() {
        debug!("Environment overrides: {:?}", env);
    }
    let mut config = AppConfig::resolve(args.config.as_deref(), &env)?;
    if args.test_mode {
        config.test_mode = true;
    }
    Ok(config)
}

/// Log every published status snapshot until the orchestrator goes away
fn spawn_observer(orchestrator: &BenchmarkOrchestrator) -> JoinHandle<()> {
    let mut rx = orchestrator.subscribe();
    let formatter = ResultFormatter::default();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let line = formatter.format_state(&rx.borrow_and_update());
            info!("State: {}", line);
        }
    })
}

/// Wait for the observer to drain; returns false if it panicked or was cancelled
async fn stop_observer(observer: JoinHandle<()>) -> bool {
    match observer.await {
        Ok(()) => true,
        Err(e) => {
            warn!("State observer failed: {}", e);
            false
        }
    }
}

async fn run_benchmark(mut config: AppConfig, args: cli::RunArgs) -> Result<()> {
    if let Some(invocations) = args.invocations {
        config.invocations = invocations;
    }
    if let Some(duration) = args.duration {
        config.duration_ms = duration;
    }
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(path) = args.path {
        config.api_path = path;
    }
    if args.max_in_flight.is_some() {
        config.max_in_flight = args.max_in_flight;
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    config.validate()?;

    let format = OutputFormat::from_str(&config.format)
        .ok_or_else(|| anyhow::anyhow!("Unknown output format: {}", config.format))?;

    let orchestrator = BenchmarkOrchestrator::from_config(&config)?;
    let observer = spawn_observer(&orchestrator);

    info!(
        "Benchmarking {} invocations of {}ms (HTTP endpoint {}{})",
        config.invocations, config.duration_ms, config.endpoint, config.api_path
    );

    let report = orchestrator
        .run(config.invocations, config.duration_ms)
        .await?;

    drop(orchestrator);
    stop_observer(observer).await;

    let mut formatter = ResultFormatter::new(format);
    if !std::io::stdout().is_terminal() {
        formatter = formatter.no_color();
    }
    println!("{}", formatter.format_report(&report));

    if !report.all_succeeded() {
        warn!("Some strategies failed, see the report for details");
    }

    if let Some(output) = args.output {
        report
            .save(&output)
            .with_context(|| format!("Failed to save report to {}", output.display()))?;
        println!("Report saved to: {}", output.display());
    }

    Ok(())
}

async fn run_probe(config: AppConfig, args: cli::ProbeArgs) -> Result<()> {
    if !config.test_mode {
        anyhow::bail!(
            "probe is only available in test mode (--test-mode or {}_TEST_MODE=true)",
            config::ENV_PREFIX
        );
    }

    let duration = args.duration.unwrap_or(config.duration_ms);
    let orchestrator = BenchmarkOrchestrator::from_config(&config)?;
    let outcome = orchestrator.probe(args.invocations, duration).await?;

    println!("{}", ResultFormatter::default().format_probe(&outcome));
    Ok(())
}

fn manage_config(config: &AppConfig, args: cli::ConfigArgs) -> Result<()> {
    match args.action {
        cli::ConfigAction::Show => {
            println!("{}", serde_yaml::to_string(config)?);
        }

        cli::ConfigAction::Init { path, force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }

            AppConfig::default().save(&path)?;
            println!("✓ Configuration file created: {}", path.display());
        }
    }

    Ok(())
}
