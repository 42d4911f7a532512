//! Structured observability hooks for the relay lifecycle.
//!
//! This module provides:
//! - A run-scoped tracing span via [`run_span`]
//! - Emission functions for pipeline and stage events
//!
//! Events go to the tracing subscriber (stderr), never to the console transcript.

use tracing::{info, warn};

use crate::exchange::Exchange;
use crate::roles::AgentRole;

/// Span tagging every event of one relay with its run id.
pub fn run_span(run_id: &str) -> tracing::Span {
    tracing::info_span!("crew.run", run_id = %run_id)
}

pub fn emit_pipeline_started(run_id: &str, model: &str, task_chars: usize) {
    info!(event = "pipeline.started", run_id = %run_id, model = %model, task_chars = task_chars);
}

pub fn emit_stage_started(role: AgentRole, message_chars: usize) {
    info!(event = "stage.started", role = %role, message_chars = message_chars);
}

/// Emit event: a stage delivered its exchange.
pub fn emit_stage_finished(exchange: &Exchange) {
    let usage = exchange.usage();
    info!(
        event = "stage.finished",
        role = %exchange.role(),
        chars = exchange.text().len(),
        input_tokens = usage.input_tokens,
        output_tokens = usage.output_tokens,
        elapsed_ms = exchange.elapsed_ms(),
        stop_reason = exchange.stop_reason().unwrap_or("-"),
        digest = %exchange.short_digest(),
    );
}

pub fn emit_stage_failed(role: AgentRole, error: &dyn std::fmt::Display) {
    warn!(event = "stage.failed", role = %role, error = %error);
}

pub fn emit_pipeline_finished(run_id: &str, duration_ms: u64, total_output_tokens: u64) {
    info!(
        event = "pipeline.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        total_output_tokens = total_output_tokens,
    );
}

/// Emit event: pipeline aborted before reaching the summary (warning level).
pub fn emit_pipeline_aborted(run_id: &str, state: &str, error: &dyn std::fmt::Display) {
    warn!(event = "pipeline.aborted", run_id = %run_id, state = %state, error = %error);
}
