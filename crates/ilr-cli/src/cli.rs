//! CLI argument definitions for the learner record validator.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use ilr_cli::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "ilr-validator",
    version,
    about = "Validate learner record submissions against funding rules",
    long_about = "Validate a learner record submission against the business rule catalogue.\n\n\
                  Reference data (qualifications, standards, contracts, organisations,\n\
                  postcodes, ULNs, employers, rule severities) is read from a JSON bundle\n\
                  and optionally a published rules CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include learner references in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a submission and print a summary.
    Validate(ValidateArgs),

    /// List the rule catalogue.
    Rules(RulesArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Submission JSON file.
    #[arg(value_name = "SUBMISSION")]
    pub submission: PathBuf,

    /// Reference data bundle (JSON).
    #[arg(long = "reference", value_name = "JSON")]
    pub reference: PathBuf,

    /// Rule table CSV with `Rule Name`, `Severity` and `Message` columns.
    ///
    /// Replaces any rule rows in the reference bundle.
    #[arg(long = "rules", value_name = "CSV")]
    pub rules: Option<PathBuf>,

    /// Write the full report as JSON.
    #[arg(long = "output", value_name = "JSON")]
    pub output: Option<PathBuf>,

    /// Worker threads (default: one per core).
    #[arg(long = "threads", value_name = "N")]
    pub threads: Option<usize>,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// Rule table CSV used to show each rule's severity.
    #[arg(long = "rules", value_name = "CSV")]
    pub rules: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl Cli {
    /// Logging setup from the global flags.
    ///
    /// `--log-level` beats `-v`/`-q`; `RUST_LOG` applies only when neither is
    /// given. ANSI output follows `--color`, and `auto` means a terminal
    /// stderr with no log file.
    pub fn log_config(&self) -> LogConfig {
        let level = self
            .log_level
            .map_or_else(|| self.verbosity.tracing_level_filter(), LevelFilter::from);
        let mut config = LogConfig::default()
            .with_level_filter(level)
            .with_format(self.log_format.into())
            .with_log_file(self.log_file.clone())
            .with_log_data(self.log_data);
        config.use_env_filter = !(self.verbosity.is_present() || self.log_level.is_some());
        config.with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        config
    }
}
