//! Gatewatch Core Library
//!
//! Reconciles the two views of an artifact's CI results into one
//! deduplicated list of `(stage, category, entries)` groups:
//! - `classifier`: message lifecycle records grouped per stage
//! - `splitter`: gating requirements grouped per requirement type
//! - `correlator`: gating results paired with the message record of the same run
//! - `eliminator`: message-only duplicates of gated test cases removed
//! - `reconcile`: the orchestrator sequencing the steps above
//!
//! All steps are pure and synchronous; concurrent calls on different
//! snapshots share no state.

pub mod classifier;
pub mod correlator;
pub mod digest;
pub mod eliminator;
pub mod obs;
pub mod reconcile;
pub mod reporting;
pub mod splitter;
pub mod telemetry;
pub mod view;

pub use gatewatch_domain::{
    Artifact, Category, CorrelatedEntry, Entry, GatingDecision, GatingState, GatingStatus,
    MessageChild, ReconcileError, Stage, StageGroup,
};

pub use classifier::classify;
pub use correlator::{correlate, find_match, MatchBasis};
pub use digest::output_digest;
pub use eliminator::eliminate_redundant;
pub use obs::{
    emit_correlation_matched, emit_gating_skipped, emit_reconcile_finished,
    emit_reconcile_started, emit_redundancy_removed, emit_testcase_unresolved, ReconcileSpan,
};
pub use reconcile::{
    checked_decision, collect_groups, reconcile, reconcile_artifact, Reconciliation,
};
pub use reporting::{build_report, render_report_md, write_report_json, ReconcileReport};
pub use splitter::split_decision;
pub use telemetry::{default_directives, init_tracing};
pub use view::{filter_internal, sort_for_display};

/// Gatewatch version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
