//! Structured observability hooks for the reconciliation pipeline.
//!
//! This module provides:
//! - An artifact-scoped tracing span via the `ReconcileSpan` RAII guard
//! - Emission functions for pipeline milestones and recovered errors
//!
//! Every event carries a stable `event` field. Filter with `RUST_LOG`; set
//! `--json` on the CLI for newline-delimited JSON output.

use tracing::{debug, info, warn};

/// RAII guard that enters an artifact-scoped span for one reconciliation.
///
/// # Example
///
/// ```ignore
/// let _span = ReconcileSpan::enter("brew-build:12345");
/// // tracing calls below are associated with artifact_id = "brew-build:12345"
/// ```
pub struct ReconcileSpan {
    _span: tracing::span::EnteredSpan,
}

impl ReconcileSpan {
    pub fn enter(artifact_id: &str) -> Self {
        let span = tracing::info_span!("gatewatch.reconcile", artifact_id = %artifact_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: reconciliation started.
pub fn emit_reconcile_started(artifact_id: &str, children: usize, has_decision: bool) {
    debug!(
        event = "reconcile.started",
        artifact_id = %artifact_id,
        children = children,
        has_decision = has_decision,
    );
}

/// Emit event: reconciliation finished with the surviving group and entry counts.
pub fn emit_reconcile_finished(artifact_id: &str, groups: usize, entries: usize) {
    info!(
        event = "reconcile.finished",
        artifact_id = %artifact_id,
        groups = groups,
        entries = entries,
    );
}

/// Emit event: gating processing skipped for a malformed decision (warning level).
pub fn emit_gating_skipped(artifact_id: &str, reason: &dyn std::fmt::Display) {
    warn!(event = "gating.skipped", artifact_id = %artifact_id, reason = %reason);
}

/// Emit event: a gating state was paired with a message record.
pub fn emit_correlation_matched(testcase: &str, basis: &str, msg_id: Option<&str>) {
    debug!(
        event = "correlation.matched",
        testcase = %testcase,
        basis = %basis,
        msg_id = msg_id.unwrap_or(""),
    );
}

/// Emit event: a record without a usable test case name (warning level).
pub fn emit_testcase_unresolved(source: &str, detail: &str) {
    warn!(event = "testcase.unresolved", source = %source, detail = %detail);
}

/// Emit event: message-only entries removed because the gating engine covers them.
pub fn emit_redundancy_removed(removed: usize, dropped_groups: usize) {
    debug!(
        event = "redundancy.removed",
        removed = removed,
        dropped_groups = dropped_groups,
    );
}
