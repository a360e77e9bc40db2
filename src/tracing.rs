//! Tracing initialization.
//!
//! Logs go to stderr since stdout carries the MCP protocol. The filter comes
//! from `RUST_LOG`; `CATALOG_SEARCH_LOG_FORMAT=json` switches to JSON lines.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Environment variable selecting the log format (`compact` or `json`).
pub const LOG_FORMAT_ENV: &str = "CATALOG_SEARCH_LOG_FORMAT";

static INIT: Once = Once::new();

/// Initialize tracing. Safe to call multiple times.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let level = if is_test {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        let filter = EnvFilter::from_default_env().add_directive(level.into());

        if is_test {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .compact()
                .with_test_writer()
                .try_init()
                .ok();
            return;
        }

        let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format.eq_ignore_ascii_case("json"));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr);

        let result = if json {
            builder.json().try_init()
        } else {
            builder.compact().try_init()
        };
        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}
