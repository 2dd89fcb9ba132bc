//! Logging and observability infrastructure for rfpflow
//!
//! This module provides structured logging for the pipeline: routing
//! decisions, stage start/completion, forced acceptances, and run
//! summaries all flow through tracing spans and events.

use tracing::{Level, info, span, warn};
use tracing_subscriber::{
    EnvFilter,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Initialize tracing subscriber for structured logging.
///
/// Sets up tracing with either compact (default) or verbose format.
/// Verbose format includes target paths so per-crate events can be told
/// apart when debugging routing behavior.
///
/// # Arguments
/// * `verbose` - If true, include targets and debug-level events
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            if verbose {
                EnvFilter::try_new("rfpflow=debug,info")
            } else {
                EnvFilter::try_new("rfpflow=info,warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Create a span for stage execution with structured fields.
#[must_use]
pub fn stage_span(run_id: &str, stage: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "stage_execution",
        run_id = %run_id,
        stage = %stage,
    )
}

/// Log stage start with structured fields.
pub fn log_stage_start(run_id: &str, stage: &str, iteration: u32) {
    info!(
        run_id = %run_id,
        stage = %stage,
        iteration = %iteration,
        "Starting stage execution"
    );
}

/// Log stage completion with duration.
pub fn log_stage_complete(run_id: &str, stage: &str, duration_ms: u128) {
    info!(
        run_id = %run_id,
        stage = %stage,
        duration_ms = %duration_ms,
        "Stage execution completed"
    );
}

/// Log a recovered stage failure.
///
/// Stage failures are recoverable at the orchestration level; the event is
/// a warning, not an error, and the run continues.
pub fn log_stage_failure(run_id: &str, stage: &str, error: &str) {
    warn!(
        run_id = %run_id,
        stage = %stage,
        error = %error,
        "Stage processor failed; recorded diagnostic and continuing"
    );
}
