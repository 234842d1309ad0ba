//! Gating-decision splitter.
//!
//! Groups a decision's requirements by requirement type, attaching the result
//! and waiver recorded for the same test case, and collects results that no
//! requirement references into the synthetic `additional-tests` category.

use std::collections::{BTreeMap, HashSet};

use gatewatch_domain::{Category, GatingDecision, GatingState, Requirement};

use crate::obs::emit_testcase_unresolved;

/// Split a sanity-checked decision into categories. Empty categories are omitted.
pub fn split_decision(decision: &GatingDecision) -> BTreeMap<Category, Vec<GatingState>> {
    let mut groups: BTreeMap<Category, Vec<GatingState>> = BTreeMap::new();
    let mut required: HashSet<&str> = HashSet::new();

    for requirement in decision.requirements() {
        let name = requirement.testcase_name();
        match name {
            Some(name) => {
                required.insert(name);
            }
            None => emit_testcase_unresolved("requirement", requirement.requirement_type.as_str()),
        }

        groups
            .entry(Category::from(requirement.requirement_type.clone()))
            .or_default()
            .push(merge_requirement(requirement, decision));
    }

    let additional: Vec<GatingState> = decision
        .results
        .iter()
        .filter(|r| r.testcase_name().map_or(true, |n| !required.contains(n)))
        .cloned()
        .map(GatingState::from_result)
        .collect();

    if !additional.is_empty() {
        groups
            .entry(Category::AdditionalTests)
            .or_default()
            .extend(additional);
    }

    groups
}

/// Attach the first result and waiver recorded for the requirement's test case.
fn merge_requirement(requirement: &Requirement, decision: &GatingDecision) -> GatingState {
    let name = requirement.testcase_name();
    let result = name.and_then(|n| {
        decision
            .results
            .iter()
            .find(|r| r.testcase_name() == Some(n))
            .cloned()
    });
    let waiver = name.and_then(|n| {
        decision
            .waivers
            .iter()
            .find(|w| w.testcase_name() == Some(n))
            .cloned()
    });

    GatingState {
        requirement: Some(requirement.clone()),
        result,
        waiver,
    }
}
