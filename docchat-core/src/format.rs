//! Formatting helpers shared by the TUI and the CLI.

use chrono::{DateTime, Local, Utc};

use crate::types::AnswerMetrics;

/// Local wall-clock time of a message, HH:MM.
pub fn format_message_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M").to_string()
}

/// Compact token count (e.g., "1.2K").
pub fn format_tokens(tokens: u64) -> String {
    if tokens >= 1_000_000 {
        format!("{:.1}M", tokens as f64 / 1_000_000.0)
    } else if tokens >= 1_000 {
        format!("{:.1}K", tokens as f64 / 1_000.0)
    } else {
        tokens.to_string()
    }
}

/// Latency in seconds with two decimals.
pub fn format_latency(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

/// One-line summary shown under an answer.
pub fn format_metrics(metrics: &AnswerMetrics) -> String {
    format!(
        "Response time: {} | Chunks: {} | Tokens: {} in / {} out",
        format_latency(metrics.latency_seconds),
        metrics.chunks_retrieved,
        format_tokens(metrics.tokens_in),
        format_tokens(metrics.tokens_out)
    )
}
