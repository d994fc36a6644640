//! The `aether` binary: prints the night-side polygon for an instant, or keeps
//! printing a fresh one on the refresh interval.

mod output;
mod platform;

use std::io::Write;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};

use aether_astro::{InvalidInstantError, UtcInstant};
use aether_config::{CliArgs, Config, ConfigError};
use aether_terminator::{
    SystemClock, TerminatorError, TerminatorRefresher, build_terminator_polygon, run_blocking,
};
use clap::Parser;

use crate::platform::{PlatformDirs, PlatformError};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid --at: {0}")]
    Instant(#[from] InvalidInstantError),

    #[error(transparent)]
    Terminator(#[from] TerminatorError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl AppError {
    /// Process status: 2 for a rejected `--at`, 1 for everything else.
    fn status(&self) -> u8 {
        match self {
            AppError::Instant(_) => 2,
            _ => 1,
        }
    }

    fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status())
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("aether: {e}");
            e.exit_code()
        }
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(dir) => PlatformDirs::with_config_dir(dir),
        None => PlatformDirs::resolve()?,
    };
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);
    config.validate()?;

    if let Err(e) = aether_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&config),
    ) {
        eprintln!("aether: logging disabled: {e}");
    }
    tracing::debug!(
        config_dir = %dirs.config_dir.display(),
        log_dir = %dirs.log_dir.display(),
        "resolved directories"
    );

    if args.watch {
        return watch(&config, args.ticks);
    }

    let instant = match &args.at {
        Some(text) => UtcInstant::parse(text)?,
        None => UtcInstant::now(),
    };
    let polygon = build_terminator_polygon(instant, &config.terminator.options())?;
    let text = output::render(&polygon, &config)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}

/// Print a new polygon every refresh interval until `ticks` have been printed.
fn watch(config: &Config, ticks: Option<u64>) -> Result<(), AppError> {
    let schedule = config.terminator.schedule();
    let mut refresher =
        TerminatorRefresher::new(SystemClock, config.terminator.options(), schedule)?;
    tracing::info!(
        interval_secs = schedule.interval.as_secs(),
        resolution = config.terminator.resolution,
        "watching terminator"
    );

    let stop = AtomicBool::new(false);
    let mut failure: Option<AppError> = None;

    let produced = run_blocking(&mut refresher, &stop, ticks, |polygon| {
        let written = output::render(polygon, config)
            .map_err(AppError::from)
            .and_then(|text| {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{text}")?;
                stdout.flush()?;
                Ok(())
            });
        if let Err(e) = written {
            failure = Some(e);
            stop.store(true, Ordering::Relaxed);
        }
    })?;

    if let Some(e) = failure {
        return Err(e);
    }
    tracing::info!(produced, "watch finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_in(dir: &std::path::Path) -> CliArgs {
        CliArgs {
            config: Some(dir.to_path_buf()),
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_status_mapping() {
        let instant = AppError::from(InvalidInstantError::NonFinite(f64::NAN));
        assert_eq!(instant.status(), 2);

        let config = AppError::from(ConfigError::Invalid("bad".to_string()));
        assert_eq!(config.status(), 1);

        let terminator = AppError::from(TerminatorError::InvalidResolution(0));
        assert_eq!(terminator.status(), 1);
    }

    #[test]
    fn test_unparseable_at_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            at: Some("garbage".to_string()),
            ..args_in(dir.path())
        };
        let err = run(&args).unwrap_err();
        assert!(
            matches!(
                err,
                AppError::Instant(InvalidInstantError::Unparseable { .. })
            ),
            "expected an instant error, got {err:?}"
        );
        assert_eq!(err.status(), 2);
    }

    #[test]
    fn test_invalid_config_exits_with_failure() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            at: Some("2024-06-21T00:00:00Z".to_string()),
            resolution: Some(0),
            ..args_in(dir.path())
        };
        let err = run(&args).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
        assert_eq!(err.status(), 1);
    }

    #[test]
    fn test_fixed_instant_succeeds_and_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = CliArgs {
            at: Some("2024-06-21T00:00:00Z".to_string()),
            ..args_in(dir.path())
        };
        run(&args).unwrap();
        assert!(dir.path().join(aether_config::CONFIG_FILE_NAME).exists());
    }
}
