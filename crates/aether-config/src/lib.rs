//! Configuration for the Aether terminator host.
//!
//! Settings persist to disk as a RON file, can be hot-reloaded, and are
//! overridden by command-line flags parsed with clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, OutputConfig, OutputFormat, OverlayStyle,
    TerminatorConfig,
};
pub use error::ConfigError;
