//! Application configuration resolver CLI.
//!
//! # Pipeline
//!
//! ```text
//!   .env files ──┐
//!   process env ─┴─▶ env::raw ──▶ env::normalize ──▶ NormalizedSettings
//!                                                          │
//!                         ┌────────────────────────────────┤
//!                         ▼                                ▼
//!                   routing (PROXY)              compose::plugins
//!                         │                                │
//!   package.json ──▶ compose::metadata                     │
//!                         │                                │
//!                         └──────▶ compose::composer ◀─────┘
//!                                        │
//!   override file ──▶ config::loader ──▶ config::merge
//!                                        │
//!                                        ▼
//!                              stdout (JSON configuration)
//! ```
//!
//! With `--watch`, every change to an input file triggers a fresh resolution.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::{Map, Value};

use app_config::compose::{compose, ComposeRequest};
use app_config::config::watcher::ConfigWatcher;
use app_config::config::{load_overrides, RunMode};
use app_config::env::{load_env, DEFAULT_ENV_PREFIX};
use app_config::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "app-config")]
#[command(about = "Resolve the build/dev-server configuration for a front-end application", long_about = None)]
struct Cli {
    /// Run mode to resolve for
    #[arg(value_enum)]
    command: RunMode,

    /// Project root (defaults to the current directory)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Env file mode (defaults to "development" for serve, "production" for build)
    #[arg(short, long)]
    mode: Option<String>,

    /// Only variables with this prefix are read; the prefix is stripped
    #[arg(long, default_value = DEFAULT_ENV_PREFIX)]
    env_prefix: String,

    /// TOML or JSON file merged on top of the resolved configuration
    #[arg(short = 'o', long = "override")]
    overrides: Option<PathBuf>,

    /// Re-resolve whenever an input file changes
    #[arg(short, long)]
    watch: bool,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let mode = cli
        .mode
        .clone()
        .unwrap_or_else(|| cli.command.default_env_mode().to_string());

    tracing::debug!(root = %root.display(), command = %cli.command, mode = %mode, "Resolving configuration");
    resolve_and_print(&cli, &root, &mode).await?;

    if cli.watch {
        let extra = cli.overrides.iter().cloned().collect();
        let (watcher, mut changes) = ConfigWatcher::new(&root, extra);
        let _watcher = watcher.run()?;

        while let Some(path) = changes.recv().await {
            tracing::info!(path = %path.display(), "Re-resolving configuration");
            if let Err(e) = resolve_and_print(&cli, &root, &mode).await {
                tracing::error!("Failed to resolve configuration: {}. Keeping previous output.", e);
            }
        }
    }

    Ok(())
}

async fn resolve_and_print(cli: &Cli, root: &Path, mode: &str) -> Result<(), Box<dyn std::error::Error>> {
    let env = load_env(root, mode, &cli.env_prefix).await?;
    let overrides = match &cli.overrides {
        Some(path) => load_overrides(path).await?,
        None => Value::Object(Map::new()),
    };

    let request = ComposeRequest::new(root, cli.command, env).with_overrides(overrides);
    let resolved = compose(request).await;

    let output = if cli.compact {
        serde_json::to_string(resolved.as_value())?
    } else {
        serde_json::to_string_pretty(resolved.as_value())?
    };
    println!("{}", output);
    Ok(())
}
