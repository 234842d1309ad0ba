//! Cross-source correlator.
//!
//! Pairs each gating state that carries a result with the test-stage message
//! record describing the same run. The candidate bucket is the test category
//! named after the result's outcome; within it a record matches on message id
//! or on reference URL, and the first match in bucket order wins.

use std::collections::BTreeMap;

use gatewatch_domain::{
    Category, CorrelatedEntry, Entry, GatingState, MessageChild, Stage, StageGroup,
};

use crate::obs::{emit_correlation_matched, emit_testcase_unresolved};

/// Which key tied a gating result to a message record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchBasis {
    MsgId,
    RefUrl,
}

impl MatchBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchBasis::MsgId => "msg_id",
            MatchBasis::RefUrl => "ref_url",
        }
    }
}

/// Test-stage records indexed by category.
pub type TestIndex = BTreeMap<Category, Vec<MessageChild>>;

/// Replace matched gating entries with correlated entries.
///
/// Gating entries keep their position; test-stage groups pass through
/// unchanged.
pub fn correlate(groups: Vec<StageGroup>) -> Vec<StageGroup> {
    let index = index_test_stage(&groups);

    groups
        .into_iter()
        .map(|group| {
            if group.stage != Stage::Greenwave {
                return group;
            }
            let entries = group
                .entries
                .into_iter()
                .map(|entry| match entry {
                    Entry::Gating(state) => match find_match(&state, &index) {
                        Some((child, _)) => Entry::Correlated(CorrelatedEntry {
                            message: child.clone(),
                            gating: state,
                        }),
                        None => Entry::Gating(state),
                    },
                    other => other,
                })
                .collect();
            StageGroup::new(group.stage, group.category, entries)
        })
        .collect()
}

pub fn index_test_stage(groups: &[StageGroup]) -> TestIndex {
    let mut index = TestIndex::new();
    for group in groups.iter().filter(|g| g.stage == Stage::Test) {
        index
            .entry(group.category.clone())
            .or_default()
            .extend(group.entries.iter().filter_map(Entry::as_message).cloned());
    }
    index
}

/// Find the message record for a gating state, if any.
pub fn find_match<'a>(
    state: &GatingState,
    index: &'a TestIndex,
) -> Option<(&'a MessageChild, MatchBasis)> {
    let result = state.result.as_ref()?;
    let outcome = result.outcome?;
    let ref_url = result.ref_url()?;

    let Some(testcase) = state.testcase_name() else {
        emit_testcase_unresolved("gating", ref_url);
        return None;
    };

    let category = Category::for_gating_outcome(outcome)?;
    let msg_id = result.msg_id();

    let (child, basis) = index
        .get(&category)?
        .iter()
        .filter(|child| {
            let named = child.testcase_name().is_some();
            if !named {
                emit_testcase_unresolved("message", &child.kai_state().msg_id);
            }
            named
        })
        .find_map(|child| match_basis(child, msg_id, ref_url).map(|basis| (child, basis)))?;

    emit_correlation_matched(testcase, basis.as_str(), child.msg_id());
    Some((child, basis))
}

/// Message id equality or reference URL equality; either one matches.
///
/// The id is checked first only so that the reported basis prefers it.
fn match_basis(child: &MessageChild, msg_id: Option<&str>, ref_url: &str) -> Option<MatchBasis> {
    if let (Some(expected), Some(actual)) = (msg_id, child.msg_id()) {
        if expected == actual {
            return Some(MatchBasis::MsgId);
        }
    }
    if child.ref_url() == Some(ref_url) {
        return Some(MatchBasis::RefUrl);
    }
    None
}
