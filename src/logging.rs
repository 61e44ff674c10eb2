//! Tracing setup for the CLI.
//!
//! Logs always go to stderr so stdout stays reserved for the report.
//! `MODELDEX_LOG` takes precedence over the `-v` count.

use std::io;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use is_terminal::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "MODELDEX_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Default directive for a verbosity count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "modeldex=info,warn",
        2 => "modeldex=debug,info",
        _ => "trace",
    }
}

fn build_filter(env_value: Option<String>, verbose: u8) -> EnvFilter {
    env_value
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive(verbose)))
}

/// Whether log lines on stderr may carry ANSI styling.
pub fn stderr_color() -> bool {
    io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Install the global subscriber. Call once, before any command runs.
pub fn init(verbose: u8, format: LogFormat, color: bool) -> Result<()> {
    let filter = build_filter(std::env::var(LOG_ENV).ok(), verbose);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(color)
                    .with_target(verbose > 1)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_current_span(false),
            )
            .try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}
