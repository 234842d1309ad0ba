//! Redundancy eliminator.
//!
//! A test case the gating engine reports on is shown under the gating stage
//! only. Message-only entries for it are removed from test-stage groups, and
//! groups left empty are dropped.

use std::collections::BTreeSet;

use gatewatch_domain::{Entry, Stage, StageGroup};

use crate::obs::emit_redundancy_removed;

pub fn eliminate_redundant(groups: Vec<StageGroup>) -> Vec<StageGroup> {
    let gated: BTreeSet<String> = groups
        .iter()
        .filter(|g| g.stage == Stage::Greenwave)
        .flat_map(|g| g.entries.iter())
        .filter_map(Entry::gating_testcase_name)
        .map(str::to_owned)
        .collect();

    let mut removed = 0;
    let mut dropped = 0;
    let mut out = Vec::with_capacity(groups.len());

    for group in groups {
        let StageGroup {
            stage,
            category,
            entries,
        } = group;

        let kept: Vec<Entry> = if stage == Stage::Test {
            let before = entries.len();
            let kept: Vec<Entry> = entries
                .into_iter()
                .filter(|entry| !is_covered(entry, &gated))
                .collect();
            removed += before - kept.len();
            kept
        } else {
            entries
        };

        if kept.is_empty() {
            dropped += 1;
            continue;
        }
        out.push(StageGroup::new(stage, category, kept));
    }

    if removed > 0 || dropped > 0 {
        emit_redundancy_removed(removed, dropped);
    }
    out
}

fn is_covered(entry: &Entry, gated: &BTreeSet<String>) -> bool {
    match entry {
        Entry::Message(child) => child
            .testcase_name()
            .is_some_and(|name| gated.contains(&name)),
        Entry::Gating(_) | Entry::Correlated(_) => false,
    }
}
