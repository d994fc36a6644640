//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, OutputFormat};

/// Command-line arguments for the `aether` binary.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "aether", about = "Day/night terminator for map overlays")]
pub struct CliArgs {
    /// Compute for this RFC 3339 instant instead of now (e.g. 2024-06-21T00:00:00Z).
    #[arg(long)]
    pub at: Option<String>,

    /// Samples per degree of longitude.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Seconds between recomputations in watch mode.
    #[arg(long)]
    pub interval: Option<u64>,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Fill GeoJSON properties with instant, declination and resolution.
    #[arg(long)]
    pub metadata: bool,

    /// Keep recomputing on the refresh interval, following the system clock.
    #[arg(long, conflicts_with = "at")]
    pub watch: bool,

    /// Stop watch mode after this many polygons.
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(resolution) = args.resolution {
            self.terminator.resolution = resolution;
        }
        if let Some(interval) = args.interval {
            self.terminator.refresh_interval_secs = interval;
        }
        if let Some(format) = args.format {
            self.output.format = format;
        }
        if args.pretty {
            self.output.pretty = true;
        }
        if args.metadata {
            self.output.include_metadata = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
