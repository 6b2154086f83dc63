use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheen_core::AppConfig;

mod commands;

use commands::trace::{TraceOptions, TraceTarget};

#[derive(Parser)]
#[command(name = "sheen")]
#[command(author, version, about = "Splash, carousel and scroll-reactive motion in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to ~/.config/sheen/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config_path: Option<PathBuf>,

    /// Prefer reduced motion regardless of the config file
    #[arg(long, global = true)]
    reduced_motion: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal preview
    Run,
    /// Drive one sequencer with a synthetic clock and print JSON frames
    Trace {
        /// Which sequencer to drive
        #[arg(value_enum)]
        target: TraceTarget,
        /// Stop after this many synthetic milliseconds
        #[arg(long, default_value_t = 6000.0)]
        until_ms: f64,
        /// Milliseconds between frames
        #[arg(long, default_value_t = 16.0)]
        step_ms: f64,
        /// Number of splash cards (defaults to the configured services)
        #[arg(long)]
        cards: Option<usize>,
        /// Number of items on the track, stepper or reveal group (defaults to the configured content)
        #[arg(long)]
        items: Option<usize>,
        /// Scroll events for the reflection trace, as `at_ms:scroll_y`
        #[arg(long = "scroll", value_parser = commands::trace::parse_scroll)]
        scrolls: Vec<(f64, f64)>,
    },
    /// Print the default config, or write it to the config path
    Config {
        /// Write the defaults to the config file instead of printing them
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config_path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load()?,
    };
    if cli.reduced_motion {
        config.motion.reduced_motion = true;
    }

    // The preview owns the terminal, so its logs go to a file
    let interactive = matches!(cli.command, Some(Commands::Run) | None);
    init_logging(&config, interactive)?;

    match cli.command {
        Some(Commands::Run) | None => commands::run::run(Arc::new(config)).await,
        Some(Commands::Trace {
            target,
            until_ms,
            step_ms,
            cards,
            items,
            scrolls,
        }) => {
            let options = TraceOptions {
                target,
                until_ms,
                step_ms,
                cards,
                items,
                scrolls,
            };
            commands::trace::run(&config, &options, &mut std::io::stdout().lock())
        }
        Some(Commands::Config { write }) => {
            commands::config::run(cli.config_path.as_deref(), write)
        }
    }
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
    Ok(())
}
