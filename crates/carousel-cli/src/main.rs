use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carousel_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "carousel")]
#[command(author, version, about = "Horizontal carousel slider engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to ~/.config/carousel/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulated slider and log its scroll state
    Demo {
        /// Number of slides
        #[arg(long, default_value_t = 8)]
        slides: usize,
        /// Viewport width in pixels
        #[arg(long, default_value_t = 960.0)]
        width: f64,
        /// Gap between slides in pixels
        #[arg(long, default_value_t = 16.0)]
        gap: f64,
        /// How long to run, in seconds
        #[arg(long, default_value_t = 10)]
        seconds: u64,
        /// Stop at the ends instead of wrapping
        #[arg(long)]
        finite: bool,
        /// Let autoplay drive the slider instead of simulated clicks
        #[arg(long)]
        autoplay: bool,
    },
    /// Print the slide width for a viewport
    Layout {
        /// Viewport width in pixels
        #[arg(long)]
        width: f64,
        /// Gap between slides in pixels
        #[arg(long, default_value_t = 0.0)]
        gap: f64,
        /// Slides visible at once (defaults to the configured value)
        #[arg(long)]
        per_view: Option<u32>,
        /// Minimum slide width in pixels
        #[arg(long, default_value_t = 0.0)]
        min_width: f64,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Some(Commands::Demo {
            slides,
            width,
            gap,
            seconds,
            finite,
            autoplay,
        }) => {
            let options = commands::demo::DemoOptions {
                slides,
                width,
                gap,
                seconds,
                finite,
                autoplay,
            };
            commands::demo::run(&config, options).await
        }
        Some(Commands::Layout {
            width,
            gap,
            per_view,
            min_width,
        }) => commands::layout::run(&config, width, gap, per_view, min_width),
        Some(Commands::Config) | None => commands::config::run(&config),
    }
}
