//! Tracing setup shared by the binaries.
//!
//! Compact single-line output with RFC3339 UTC timestamps. `RUST_LOG` wins
//! when present; otherwise a default level is applied globally and a
//! (possibly more verbose) level to the workspace crates.

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Targets emitted by this workspace.
pub const WORKSPACE_TARGETS: &[&str] = &[
    "ai_llm_service",
    "rag_store",
    "rag_pipeline",
    "api",
    "travel_assistant_backend",
    "ingest",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-10-01T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Formatting layer used by every binary.
///
/// - compact format with `file:line`
/// - span close events, so `#[instrument]`ed calls report their duration
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(io::stdout().is_terminal())
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
}

/// Filter string applying `level` to every workspace target on top of `default`.
pub fn filter_spec(default: &str, level: Level) -> String {
    let level = level.as_str().to_lowercase();
    let mut spec = default.to_string();
    for target in WORKSPACE_TARGETS {
        spec.push_str(&format!(",{target}={level}"));
    }
    spec
}

/// `RUST_LOG` if set, else [`filter_spec`].
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_spec(default, level)))
}
