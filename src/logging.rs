// src/logging.rs

//! Logging setup for `scriptjob` using `tracing` + `tracing-subscriber`.
//!
//! Two sources of log lines share one subscriber: the adapter itself and
//! the guest script (through `installer.utils.debug` and friends, logged
//! under [`GUEST_LOG_TARGET`]). Each can be given its own level.
//!
//! Host level, first match wins:
//! 1. `--log-level`
//! 2. `SCRIPTJOB_LOG`, either a bare level (`debug`) or a full filter
//!    (`info,scriptjob::guest=trace`)
//! 3. `info`
//!
//! `--guest-log-level` adds a directive for the guest target on top.
//! Logs go to STDERR so that stdout carries only the job result.

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;

use crate::api::utils::GUEST_LOG_TARGET;
use crate::cli::LogLevel;

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV: &str = "SCRIPTJOB_LOG";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(host: Option<LogLevel>, guest: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(host, guest, env.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    Ok(())
}

/// Combine CLI levels and the environment value into one filter.
pub fn build_filter(
    host: Option<LogLevel>,
    guest: Option<LogLevel>,
    env: Option<&str>,
) -> Result<EnvFilter> {
    let mut filter = match (host, env.map(str::trim).filter(|s| !s.is_empty())) {
        (Some(level), _) => level_filter(level.into_level()),
        (None, Some(directives)) => match parse_level_str(directives) {
            Some(level) => level_filter(level),
            None => EnvFilter::try_new(directives)
                .with_context(|| format!("invalid {LOG_ENV} filter '{directives}'"))?,
        },
        (None, None) => level_filter(Level::INFO),
    };

    if let Some(level) = guest {
        let directive = format!("{GUEST_LOG_TARGET}={}", LevelFilter::from(level.into_level()))
            .parse()
            .with_context(|| format!("invalid guest log directive for {GUEST_LOG_TARGET}"))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from(level).into())
        .parse_lossy("")
}

impl LogLevel {
    pub fn into_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

pub fn parse_level_str(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins_over_env() {
        let filter = build_filter(Some(LogLevel::Warn), None, Some("trace")).unwrap();
        assert!(filter.to_string().contains("warn"));
        assert!(!filter.to_string().contains("trace"));
    }

    #[test]
    fn env_accepts_bare_levels_and_full_filters() {
        let bare = build_filter(None, None, Some("debug")).unwrap();
        assert!(bare.to_string().contains("debug"));

        let full = build_filter(None, None, Some("warn,scriptjob::guest=trace")).unwrap();
        assert!(full.to_string().contains("scriptjob::guest=trace"));
    }

    #[test]
    fn rejects_garbage_env_filter() {
        assert!(build_filter(None, None, Some("scriptjob=loud")).is_err());
    }

    #[test]
    fn defaults_to_info() {
        let filter = build_filter(None, None, Some("  ")).unwrap();
        assert!(filter.to_string().contains("info"));
    }

    #[test]
    fn guest_level_adds_a_directive() {
        let filter = build_filter(Some(LogLevel::Error), Some(LogLevel::Debug), None).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("scriptjob::guest=debug"));
        assert!(rendered.contains("error"));
    }
}
