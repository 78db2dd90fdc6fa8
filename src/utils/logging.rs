use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::fmt::{format::FmtSpan, writer::MakeWriterExt};

pub const CLI_PREFIX: &str = "cli";

/// Level used when neither `--log` nor `RUST_LOG` says otherwise.
const DEFAULT_LEVEL: &str = "debug";

const MAX_LOG_FILES: usize = 5;

#[derive(Debug, Clone)]
pub struct LogOptions {
    /// File name prefix of the rotated log files.
    pub prefix: &'static str,
    pub directory: PathBuf,
    /// Overrides `RUST_LOG`.
    pub level: Option<LevelFilter>,
    /// Mirrors every event to stdout. Off by default so that command output stays readable.
    pub mirror_to_stdout: bool,
}

impl LogOptions {
    /// Logs go to `<application_dir>/logs`. `verbose` mirrors them to stdout at trace level.
    pub fn for_cli(application_dir: &Path, verbose: bool) -> Self {
        Self {
            prefix: CLI_PREFIX,
            directory: application_dir.join("logs"),
            level: verbose.then_some(LevelFilter::TRACE),
            mirror_to_stdout: verbose,
        }
    }

    /// Filter directive limited to this crate, so dependencies don't flood the log files.
    pub fn filter_directive(&self, rust_log: Option<&str>) -> String {
        let level = match self.level {
            Some(level) => level.to_string(),
            None => rust_log.unwrap_or(DEFAULT_LEVEL).to_string(),
        };
        format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_"))
    }
}

/// Installs the global subscriber: a daily rotated file plus optional stdout.
pub fn enable_logging(options: &LogOptions) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(options.prefix)
        .build(&options.directory)?;

    let show_std = options.mirror_to_stdout;
    let stdout = std::io::stdout.with_filter(move |_| show_std);

    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            options.filter_directive(rust_log.as_deref()),
        ))
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stdout.and(appender))
        .pretty()
        .init();
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_options() {
        let options = LogOptions::for_cli(Path::new("/state/focus-recommender"), false);
        assert_eq!(options.prefix, CLI_PREFIX);
        assert_eq!(options.directory, Path::new("/state/focus-recommender/logs"));
        assert_eq!(options.level, None);
        assert!(!options.mirror_to_stdout);

        let verbose = LogOptions::for_cli(Path::new("/state"), true);
        assert_eq!(verbose.level, Some(LevelFilter::TRACE));
        assert!(verbose.mirror_to_stdout);
    }

    #[test]
    fn test_filter_directive() {
        let quiet = LogOptions::for_cli(Path::new("/state"), false);
        assert_eq!(quiet.filter_directive(None), "focus_recommender=debug");
        assert_eq!(quiet.filter_directive(Some("warn")), "focus_recommender=warn");

        let verbose = LogOptions::for_cli(Path::new("/state"), true);
        assert_eq!(
            verbose.filter_directive(Some("warn")),
            format!("focus_recommender={}", LevelFilter::TRACE)
        );
    }
}
