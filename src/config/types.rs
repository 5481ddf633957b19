//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_COOKIE_NAME, DEFAULT_GEO_ENDPOINT, DEFAULT_LOG_FILE,
    DEFAULT_PORT, GEO_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// What a delete pass does with log lines that are not valid JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MalformedLinePolicy {
    /// Discard unparseable lines while rewriting (compatible with existing deployments)
    #[default]
    Drop,
    /// Carry unparseable lines over verbatim
    Keep,
}

/// Service configuration.
///
/// Parsed from the command line by the binary; the library can also build it
/// programmatically via `Default`.
///
/// # Examples
///
/// ```no_run
/// use visitor_log::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     log_file: PathBuf::from("/var/lib/visitor_log/user_data.log"),
///     port: 8080,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "visitor_log",
    about = "Captures visitor address, geolocation and device details into a JSON Lines log."
)]
pub struct Config {
    /// Visitor log file (JSON Lines)
    #[arg(long, value_parser, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Name of the consent cookie used by the page script
    #[arg(long, default_value = DEFAULT_COOKIE_NAME)]
    pub cookie_name: String,

    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: String,

    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Base URL of the ipinfo-compatible geolocation service
    #[arg(long, default_value = DEFAULT_GEO_ENDPOINT)]
    pub geo_endpoint: String,

    /// Geolocation lookup timeout in seconds
    #[arg(long, default_value_t = GEO_TIMEOUT_SECS)]
    pub geo_timeout_seconds: u64,

    /// Handling of unparseable log lines during deletion: drop|keep
    #[arg(long, value_enum, default_value_t = MalformedLinePolicy::Drop)]
    pub malformed_lines: MalformedLinePolicy,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Config {
    /// Geolocation lookup timeout as a `Duration`.
    pub fn geo_timeout(&self) -> Duration {
        Duration::from_secs(self.geo_timeout_seconds)
    }

    /// `bind:port` socket string for the listener.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            bind: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            geo_endpoint: DEFAULT_GEO_ENDPOINT.to_string(),
            geo_timeout_seconds: GEO_TIMEOUT_SECS,
            malformed_lines: MalformedLinePolicy::Drop,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
