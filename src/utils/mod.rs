//! Utilities: logging setup (tracing, always on stderr) and KEY=VALUE parsing.
//!
//! Key items:
//!   init_logging / derive_level
//!   parse_key_value

use anyhow::{Result, bail};

/// Logging helpers.
pub mod logging {
    use std::io::IsTerminal;

    use tracing_subscriber::EnvFilter;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
    pub enum LogLevel {
        Error = 0,
        Info = 1,
        Debug = 2,
        Trace = 3,
    }

    impl LogLevel {
        /// Filter directive for this level.
        pub fn as_directive(&self) -> &'static str {
            match self {
                LogLevel::Error => "error",
                LogLevel::Info => "info",
                LogLevel::Debug => "debug",
                LogLevel::Trace => "trace",
            }
        }
    }

    pub fn derive_level(verbose: u8, quiet: bool) -> LogLevel {
        if quiet {
            return LogLevel::Error;
        }
        match verbose {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Install the global subscriber. `RUST_LOG` wins over `level` when set.
    ///
    /// Output goes to stderr: stdout carries the MCP stream in `serve` and
    /// machine-readable output in `--json` mode.
    pub fn init_logging(level: LogLevel) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .try_init();
    }
}

pub use logging::{derive_level, init_logging};

/// Split `KEY=VALUE`; the key must be non-empty, the value may be.
pub fn parse_key_value(kv: &str) -> Result<(String, String)> {
    let Some((k, v)) = kv.split_once('=') else {
        bail!("expected KEY=VALUE, got '{kv}'");
    };
    let key = k.trim();
    if key.is_empty() {
        bail!("empty key in '{kv}'");
    }
    Ok((key.to_string(), v.trim().to_string()))
}
