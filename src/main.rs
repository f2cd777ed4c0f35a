//! Honey Launcher CLI
//!
//! Command-line front end for matching and running launcher plugins.

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use honey_launcher::plugin::{PluginOutput, PluginResult};
use honey_launcher::{
    HostServices, LauncherConfig, MatchResult, MetricsService, Result, SearchSession,
    SharedRegistry,
};

#[derive(Parser)]
#[command(name = "honey")]
#[command(author, version, about = "Honey plugin launcher", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "honey.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "honey.toml")]
        output: String,
    },

    /// List configured plugins
    List,

    /// Show the ranked matches for a query
    Match {
        /// Query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,

        /// Print Prometheus metrics after matching
        #[arg(long)]
        metrics: bool,
    },

    /// Execute a match for a query
    Run {
        /// Query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Index of the match to execute
        #[arg(short, long, default_value_t = 0)]
        index: usize,
    },
}

/// Match as printed by `honey match --json`.
#[derive(Debug, Serialize)]
struct MatchSummary<'a> {
    plugin: &'a str,
    name: &'a str,
    score: u32,
    match_type: &'static str,
    extracted_input: &'a str,
}

impl<'a> From<&'a MatchResult> for MatchSummary<'a> {
    fn from(result: &'a MatchResult) -> Self {
        Self {
            plugin: result.plugin.id(),
            name: result.plugin.name(),
            score: result.score,
            match_type: result.match_type.as_str(),
            extracted_input: &result.extracted_input,
        }
    }
}

/// Host services that write side effects to the terminal.
struct ConsoleHost;

#[async_trait]
impl HostServices for ConsoleHost {
    fn show_notification(&self, message: &str) {
        println!("{}", message);
    }

    async fn copy_to_clipboard(&self, text: &str) -> PluginResult<()> {
        println!("[clipboard] {}", text);
        Ok(())
    }

    async fn open_url(&self, url: &str) -> PluginResult<()> {
        println!("[open] {}", url);
        Ok(())
    }

    async fn hide_window(&self) -> PluginResult<()> {
        debug!("hide_window requested");
        Ok(())
    }

    fn show_result(&self, output: PluginOutput) {
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => println!("[result] {:?} ({})", output.kind, e),
        }
    }
}

fn init_logging(verbose: bool, default_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: &str) -> Result<LauncherConfig> {
    if Path::new(path).exists() {
        LauncherConfig::load(path)
    } else {
        Ok(LauncherConfig::default())
    }
}

async fn build_registry(config: &LauncherConfig) -> Result<SharedRegistry> {
    let registry = SharedRegistry::new();
    for manifest in &config.plugins {
        registry.register(manifest.to_plugin()?).await?;
    }
    info!("Loaded {} plugins", registry.len().await);
    Ok(registry)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // `init` must work even when the existing config does not parse
    if let Commands::Init { output } = &cli.command {
        let log_level = LauncherConfig::env_log_level().unwrap_or_else(|| "info".to_string());
        init_logging(cli.verbose, &log_level);

        info!("Initializing new launcher configuration at: {}", output);
        LauncherConfig::default().save(output)?;
        info!("Configuration saved successfully");
        return Ok(());
    }

    let mut config = load_config(&cli.config)?;
    let log_level =
        LauncherConfig::env_log_level().unwrap_or_else(|| config.launcher.log_level.clone());
    init_logging(cli.verbose, &log_level);
    config.apply_env_overrides();

    match cli.command {
        // handled before the config is loaded
        Commands::Init { .. } => {}

        Commands::List => {
            let registry = build_registry(&config).await?;
            let mut plugins = registry.get_all().await;
            plugins.sort_by(|a, b| a.id().cmp(b.id()));

            for plugin in plugins {
                let cfg = plugin.config();
                let mut strategies = vec![];
                if !cfg.keywords.is_empty() {
                    strategies.push(format!("keywords={}", cfg.keywords.join(",")));
                }
                if let Some(pattern) = &cfg.pattern {
                    strategies.push(format!("pattern={}", pattern.as_str()));
                }
                if cfg.fuzzy_match {
                    strategies.push("fuzzy".to_string());
                }

                println!(
                    "{:<16} {:<20} {:<8} priority={:<3} {}",
                    plugin.id(),
                    plugin.name(),
                    if plugin.is_enabled() { "enabled" } else { "disabled" },
                    plugin.priority(),
                    strategies.join(" ")
                );
            }
        }

        Commands::Match {
            query,
            json,
            metrics,
        } => {
            let registry = build_registry(&config).await?;
            let metrics_service = Arc::new(if metrics {
                MetricsService::with_defaults()
            } else {
                MetricsService::disabled()
            });
            metrics_service.plugins_registered(registry.len().await);

            let mut session = SearchSession::new(registry, Arc::new(ConsoleHost))
                .with_platform(config.launcher.platform)
                .with_max_results(config.launcher.max_results)
                .with_metrics(metrics_service.clone());

            let matches = session.set_query(query.join(" ")).await;

            if json {
                let summaries: Vec<MatchSummary> = matches.iter().map(Into::into).collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else if matches.is_empty() {
                println!("No matching plugins");
            } else {
                for (i, result) in matches.iter().enumerate() {
                    println!(
                        "{:>2}. {:<20} {:>3} {:<8} \"{}\"",
                        i,
                        result.plugin.name(),
                        result.score,
                        result.match_type.as_str(),
                        result.extracted_input
                    );
                }
            }

            if metrics {
                print!("{}", metrics_service.render());
            }
        }

        Commands::Run { query, index } => {
            let registry = build_registry(&config).await?;
            let mut session = SearchSession::new(registry, Arc::new(ConsoleHost))
                .with_platform(config.launcher.platform)
                .with_max_results(config.launcher.max_results);

            session.set_query(query.join(" ")).await;
            if !session.select(index) {
                println!("No match at index {}", index);
                return Ok(());
            }
            session.execute_selected().await?;
        }
    }

    Ok(())
}
