// crates/scrubreel-cli/src/main.rs
//
// `scrubreel`: inspect a video the way the timeline control sees it.
//   probe  – duration / frame count / rate / aspect
//   strip  – sample the thumbnail strip and save it as one PNG
//   frame  – extract the hover-preview frame at a timestamp
//   hover  – replay a synthetic hover sweep through the input throttler

mod commands;
mod helpers;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use scrubreel_core::ScrubConfig;

#[derive(Parser)]
#[command(name = "scrubreel")]
#[command(about = "Timeline thumbnails and hover previews for video files")]
#[command(version)]
struct Cli {
    /// JSON config file; missing fields take their defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log more (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print what probing a file reports
    Probe {
        file: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the thumbnail strip to a PNG
    Strip {
        file: PathBuf,
        #[arg(short, long, default_value = "strip.png")]
        output: PathBuf,
        /// Give up waiting for slow workers after this many seconds
        #[arg(long, default_value_t = 120)]
        timeout_secs: u64,
    },
    /// Extract the preview frame shown at a timestamp
    Frame {
        file: PathBuf,
        /// Position in seconds
        #[arg(long)]
        at: f64,
        /// Output height (default: thumbnail_height from config)
        #[arg(long)]
        height: Option<u32>,
        #[arg(short, long, default_value = "frame.png")]
        output: PathBuf,
    },
    /// Replay a left-to-right hover sweep and print the throttled requests
    Hover {
        /// Media duration in seconds
        #[arg(long)]
        duration: f64,
        /// Timeline control width in pixels
        #[arg(long, default_value_t = 1000.0)]
        width: f64,
        /// Spacing between pointer moves
        #[arg(long, default_value_t = 5)]
        step_ms: u64,
        /// Time from enter to leave
        #[arg(long, default_value_t = 1000)]
        span_ms: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    helpers::log::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => ScrubConfig::load(path)?,
        None       => ScrubConfig::default(),
    };

    match cli.command {
        Commands::Probe { file, json } => commands::run_probe(&file, json),
        Commands::Strip { file, output, timeout_secs } => {
            commands::run_strip(config, &file, &output, Duration::from_secs(timeout_secs))
        }
        Commands::Frame { file, at, height, output } => {
            commands::run_frame(&config, &file, at, height, &output)
        }
        Commands::Hover { duration, width, step_ms, span_ms } => {
            commands::run_hover(&config, duration, width, step_ms, span_ms)
        }
    }
}
