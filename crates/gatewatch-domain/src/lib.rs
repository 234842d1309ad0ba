//! Gatewatch Domain Model
//!
//! Defines the in-memory snapshot of an artifact's CI results as seen by two
//! independent sources:
//! - Message-bus lifecycle records (`MessageChild`), one per event received
//! - Gating-engine decisions (`GatingDecision`): requirements, results, waivers
//!
//! and the derived, UI-ready view produced by reconciliation:
//! - `Stage` / `Category`: where an entry is displayed
//! - `Entry`: a message-only, gating-only or correlated record
//! - `StageGroup`: one (stage, category, entries) triple
//!
//! Payload schema versions are resolved once, at deserialization time, into
//! the `MessageBody` sum type. Nothing downstream re-probes version strings.

pub mod artifact;
pub mod category;
pub mod entry;
pub mod error;
pub mod gating;
pub mod message;

pub use artifact::Artifact;
pub use category::{Category, Tone};
pub use entry::{CorrelatedEntry, Entry, Stage, StageGroup};
pub use error::{ReconcileError, Result};
pub use gating::{
    GatingDecision, GatingOutcome, GatingResult, GatingState, GatingStatus, Requirement,
    RequirementType, TestcaseRef, Waiver,
};
pub use message::{
    KaiState, LifecycleState, MessageBody, MessageBodyV01, MessageBodyV1, MessageChild,
    MessageStage, RunInfo, SchemaVersion, TestInfo, TestOutcome,
};

/// Gatewatch domain version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
