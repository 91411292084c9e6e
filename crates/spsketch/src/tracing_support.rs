//! Structured logging setup for sketch runs
//!
//! The core crate emits `tracing` spans and events (one `debug` span per
//! reduction, progress notices through [`LogProgress`](crate::LogProgress)).
//! This module installs a subscriber to print them.
//!
//! # Example
//!
//! ```no_run
//! use spsketch::tracing_support::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::default()).unwrap();
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directive (e.g., `RUST_LOG=spsketch_core=debug`)
//! - `SPSKETCH_LOG_FORMAT`: output format (`json`, `compact` or `pretty`, default: `pretty`)

use anyhow::Result;

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Pretty-printed human-readable format
    Pretty,
    /// JSON format for structured logging
    Json,
    /// Compact format (single line per event)
    Compact,
}

impl TracingFormat {
    /// Parse from string; unknown values fall back to `Pretty`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => TracingFormat::Json,
            "compact" => TracingFormat::Compact,
            _ => TracingFormat::Pretty,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Output format
    pub format: TracingFormat,
    /// Filter directive (e.g., "spsketch_core=debug,info")
    pub filter: String,
    /// Enable ANSI colors
    pub with_ansi: bool,
    /// Show target module paths
    pub with_target: bool,
    /// Show file locations
    pub with_file: bool,
    /// Show line numbers
    pub with_line_number: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let format = std::env::var("SPSKETCH_LOG_FORMAT")
            .map(|s| TracingFormat::parse(&s))
            .unwrap_or(TracingFormat::Pretty);

        let filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "spsketch_core=info".to_string());

        Self {
            format,
            filter,
            with_ansi: true,
            with_target: true,
            with_file: false,
            with_line_number: false,
        }
    }
}

impl TracingConfig {
    /// Set output format
    pub fn format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Set filter directive
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }
}

/// Install a global tracing subscriber
///
/// Call once at program start.
///
/// # Errors
///
/// Fails if the filter directive does not parse or a global subscriber is
/// already installed.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;

    let layer = match config.format {
        TracingFormat::Pretty => fmt::layer()
            .pretty()
            .with_ansi(config.with_ansi)
            .with_target(config.with_target)
            .with_file(config.with_file)
            .with_line_number(config.with_line_number)
            .with_filter(filter)
            .boxed(),
        TracingFormat::Json => fmt::layer()
            .json()
            .with_target(config.with_target)
            .with_file(config.with_file)
            .with_line_number(config.with_line_number)
            .with_filter(filter)
            .boxed(),
        TracingFormat::Compact => fmt::layer()
            .compact()
            .with_ansi(config.with_ansi)
            .with_target(config.with_target)
            .with_file(config.with_file)
            .with_line_number(config.with_line_number)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(layer).try_init()?;
    Ok(())
}

/// Stub for when tracing feature is disabled
#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_config: TracingConfig) -> Result<()> {
    Ok(())
}
