//! Message-state classifier.
//!
//! Groups an artifact's lifecycle records into categories for one pipeline
//! stage. Completed test runs fan out by their decoded outcome; errored
//! builds count as failures; everything else is bucketed under its
//! lifecycle state name.

use std::collections::BTreeMap;

use gatewatch_domain::{Category, LifecycleState, MessageChild, MessageStage};

use crate::obs::emit_testcase_unresolved;

/// Classify `children` for `stage`. Empty categories are omitted.
///
/// Test-stage records without a usable test case name are logged; they still
/// bucket by lifecycle state unless they are completed runs.
pub fn classify(
    children: &[MessageChild],
    stage: MessageStage,
) -> BTreeMap<Category, Vec<MessageChild>> {
    let mut buckets: BTreeMap<Category, Vec<MessageChild>> = BTreeMap::new();

    if stage == MessageStage::Test {
        children
            .iter()
            .filter(|c| c.stage() == stage && c.testcase_name().is_none())
            .for_each(|c| emit_testcase_unresolved("message", &c.kai_state().msg_id));
    }

    for state in LifecycleState::KNOWN {
        let matching = children
            .iter()
            .filter(|c| c.stage() == stage && c.state() == state);

        match (stage, state) {
            (MessageStage::Test, LifecycleState::Complete) => {
                for child in matching {
                    if let Some(outcome) = child.outcome() {
                        buckets
                            .entry(Category::from(outcome))
                            .or_default()
                            .push(child.clone());
                    }
                }
            }
            (MessageStage::Build, LifecycleState::Error) => {
                for child in matching {
                    buckets
                        .entry(Category::Failed)
                        .or_default()
                        .push(child.clone());
                }
            }
            _ => {
                let Some(category) = Category::from_state(state) else {
                    continue;
                };
                for child in matching {
                    buckets
                        .entry(category.clone())
                        .or_default()
                        .push(child.clone());
                }
            }
        }
    }

    buckets
}
