//! Reconciliation orchestrator.
//!
//! `reconcile` is a stateless transform: each call rebuilds the full view
//! from the snapshot, so re-running it on unchanged input yields identical
//! output. Each step consumes the previous step's group list and returns a
//! new one.

use std::collections::BTreeMap;

use gatewatch_domain::{
    Artifact, Category, Entry, GatingDecision, GatingStatus, MessageStage, Stage, StageGroup,
};

use crate::classifier::classify;
use crate::correlator::correlate;
use crate::eliminator::eliminate_redundant;
use crate::obs::{
    emit_gating_skipped, emit_reconcile_finished, emit_reconcile_started, ReconcileSpan,
};
use crate::splitter::split_decision;

/// Reconciled view of one artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub groups: Vec<StageGroup>,
    /// Present when the artifact carried a decision that passed the sanity check.
    pub gating: Option<GatingStatus>,
}

/// Reconcile an artifact snapshot into its ordered `(stage, category, entries)` list.
pub fn reconcile(artifact: &Artifact) -> Vec<StageGroup> {
    reconcile_artifact(artifact).groups
}

pub fn reconcile_artifact(artifact: &Artifact) -> Reconciliation {
    let _span = ReconcileSpan::enter(&artifact.id);
    emit_reconcile_started(
        &artifact.id,
        artifact.children.len(),
        artifact.gating_decision.is_some(),
    );

    let decision = checked_decision(artifact);
    let groups = collect_groups(artifact, decision.as_ref());
    let groups = correlate(groups);
    let groups = eliminate_redundant(groups);

    let entries = groups.iter().map(|g| g.entries.len()).sum();
    emit_reconcile_finished(&artifact.id, groups.len(), entries);

    Reconciliation {
        groups,
        gating: decision.as_ref().map(GatingDecision::status),
    }
}

/// Classified build and test groups followed by gating groups, before
/// correlation.
pub fn collect_groups(artifact: &Artifact, decision: Option<&GatingDecision>) -> Vec<StageGroup> {
    let mut groups = Vec::new();

    for (message_stage, stage) in [
        (MessageStage::Build, Stage::Build),
        (MessageStage::Test, Stage::Test),
    ] {
        groups.extend(flatten(stage, classify(&artifact.children, message_stage)));
    }

    if let Some(decision) = decision {
        groups.extend(flatten(Stage::Greenwave, split_decision(decision)));
    }

    groups
}

/// Decode the artifact's gating decision, logging and discarding it when malformed.
pub fn checked_decision(artifact: &Artifact) -> Option<GatingDecision> {
    match artifact.decode_decision()? {
        Ok(decision) => Some(decision),
        Err(err) => {
            emit_gating_skipped(&artifact.id, &err);
            None
        }
    }
}

fn flatten<T: Into<Entry>>(
    stage: Stage,
    buckets: BTreeMap<Category, Vec<T>>,
) -> impl Iterator<Item = StageGroup> {
    buckets
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(move |(category, items)| {
            StageGroup::new(stage, category, items.into_iter().map(Into::into).collect())
        })
}
