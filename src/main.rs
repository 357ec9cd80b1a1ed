//! Webpage Analyzer main entry point
//!
//! This is the command-line interface: run the HTTP service, analyze a single
//! page, or check a configuration file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use webpage_analyzer::config::{load_or_default, Config};
use webpage_analyzer::{server, AnalysisService, AnalyzerError};

/// Webpage Analyzer: structural summaries of web pages
///
/// Reports the HTML version, title, heading histogram, link classes and
/// login-form presence of a page.
#[derive(Parser, Debug)]
#[command(name = "webpage-analyzer")]
#[command(version = "1.0.0")]
#[command(about = "Structural summaries of web pages", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Port to listen on, overriding the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Analyze one page and print the record as JSON
    Analyze {
        /// Absolute http:// or https:// URL
        url: String,
    },

    /// Validate the configuration and print the effective settings
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_or_default(Some(path))
        }
        None => load_or_default(None),
    }
    .context("failed to load configuration")?;

    match cli.command {
        Command::Serve { port } => {
            handle_serve(config, port).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Analyze { url } => handle_analyze(&config, &url).await,
        Command::CheckConfig => {
            print_config(&config);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webpage_analyzer=info,warn"),
            1 => EnvFilter::new("webpage_analyzer=debug,info"),
            2 => EnvFilter::new("webpage_analyzer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so `analyze` output stays clean JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the `serve` command
async fn handle_serve(mut config: Config, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let service = Arc::new(AnalysisService::from_config(&config)?);
    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;

    server::serve(listener, service, &config.server).await?;
    Ok(())
}

/// Handles the `analyze` command
///
/// Classified failures are printed as JSON on stderr with exit code 1.
async fn handle_analyze(config: &Config, url: &str) -> anyhow::Result<ExitCode> {
    let service = AnalysisService::from_config(config)?;

    match service.analyze(url).await {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(AnalyzerError::Analysis(err)) => {
            eprintln!("{}", serde_json::to_string_pretty(&err)?);
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

/// Handles the `check-config` command
fn print_config(config: &Config) {
    println!("=== Webpage Analyzer Configuration ===\n");

    println!("Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  Static files: {}", config.server.static_dir.display());
    println!("  OpenAPI document: {}", config.server.openapi_file.display());

    println!("\nFetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!("  Connect timeout: {}s", config.fetcher.connect_timeout_secs);
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Max body: {} bytes", config.fetcher.max_body_bytes);

    println!("\nAnalysis:");
    println!("  Workers: {}", config.analysis.workers);
    println!(
        "  mailto:/tel: links: {:?}",
        config.analysis.special_scheme_policy
    );

    println!("\nCache:");
    if config.cache.capacity == 0 {
        println!("  Capacity: unbounded");
    } else {
        println!("  Capacity: {} records", config.cache.capacity);
    }

    println!("\nConfiguration is valid.");
}
