//! Sketch configuration
//!
//! # Environment Variables
//!
//! - `SPSKETCH_PROGRESS_INTERVAL`: rows between progress notices (`0` or `off` disables)
//! - `SPSKETCH_PARALLEL`: `0`, `false` or `off` forces the sequential scan

/// Rows between progress notices unless configured otherwise
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10_000_000;

/// Configuration for [`Sketcher`](crate::Sketcher)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SketchConfig {
    /// Rows between progress notices (None = no notices)
    pub progress_interval: Option<usize>,

    /// Allow the parallel scan (only effective with the `parallel` feature)
    pub parallel: bool,

    /// Minimum row count before the parallel scan is used (default: 100,000)
    pub min_parallel_rows: usize,

    /// Row partitions for the parallel scan (None = 4 per worker thread)
    pub num_chunks: Option<usize>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            progress_interval: Some(DEFAULT_PROGRESS_INTERVAL),
            parallel: true,
            min_parallel_rows: 100_000,
            num_chunks: None,
        }
    }
}

impl SketchConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `SPSKETCH_*` environment variables
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("SPSKETCH_PROGRESS_INTERVAL") {
            match parse_interval(&raw) {
                Some(interval) => config.progress_interval = interval,
                None => tracing::warn!(value = %raw, "ignoring SPSKETCH_PROGRESS_INTERVAL"),
            }
        }

        if let Ok(raw) = std::env::var("SPSKETCH_PARALLEL") {
            match parse_flag(&raw) {
                Some(flag) => config.parallel = flag,
                None => tracing::warn!(value = %raw, "ignoring SPSKETCH_PARALLEL"),
            }
        }

        config
    }

    /// Set rows between progress notices; `None` or `Some(0)` disables them
    pub fn progress_interval(mut self, interval: Option<usize>) -> Self {
        self.progress_interval = interval.filter(|&k| k > 0);
        self
    }

    /// Enable or disable the parallel scan
    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    /// Set minimum row count for the parallel scan
    pub fn min_parallel_rows(mut self, rows: usize) -> Self {
        self.min_parallel_rows = rows;
        self
    }

    /// Set row partitions for the parallel scan
    pub fn num_chunks(mut self, chunks: Option<usize>) -> Self {
        self.num_chunks = chunks.filter(|&c| c > 0);
        self
    }

    /// Effective progress interval
    pub(crate) fn interval(&self) -> Option<usize> {
        self.progress_interval.filter(|&k| k > 0)
    }
}

fn parse_interval(raw: &str) -> Option<Option<usize>> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("off") {
        return Some(None);
    }
    raw.replace('_', "")
        .parse::<usize>()
        .ok()
        .map(|k| (k > 0).then_some(k))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
