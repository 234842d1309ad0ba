//! End-to-end reconciliation scenarios.
//!
//! Each test builds an artifact snapshot the way the dashboard receives it
//! and checks the reconciled `(stage, category, entries)` list.

use gatewatch_core::{
    classify, correlate, eliminate_redundant, reconcile, reconcile_artifact, Category, Entry,
    Stage, StageGroup,
};
use gatewatch_domain::{
    Artifact, GatingOutcome, GatingResult, GatingState, KaiState, LifecycleState, MessageChild,
    MessageStage, RequirementType,
};
use serde_json::json;

fn test_child(
    msg_id: &str,
    namespace: &str,
    test_type: &str,
    url: &str,
    result: &str,
) -> MessageChild {
    MessageChild::new(
        KaiState::new(msg_id, MessageStage::Test, LifecycleState::Complete),
        json!({
            "version": "1.0.1",
            "run": { "url": url, "log": format!("{}/log", url) },
            "test": {
                "namespace": namespace,
                "type": test_type,
                "category": "functional",
                "result": result,
            },
        }),
    )
}

fn keys(groups: &[StageGroup]) -> Vec<(Stage, Category)> {
    groups
        .iter()
        .map(|g| (g.stage, g.category.clone()))
        .collect()
}

#[test]
fn test_classifier_fans_out_completed_runs() {
    let children = vec![
        test_child("ID:1", "ns", "a", "http://ci/1", "passed"),
        test_child("ID:2", "ns", "b", "http://ci/2", "failed"),
        test_child("ID:3", "ns", "c", "http://ci/3", "info"),
    ];

    let buckets = classify(&children, MessageStage::Test);

    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets[&Category::Passed], vec![children[0].clone()]);
    assert_eq!(buckets[&Category::Failed], vec![children[1].clone()]);
    assert_eq!(buckets[&Category::Info], vec![children[2].clone()]);
}

#[test]
fn test_correlation_by_ref_url() {
    let child = test_child("ID:7", "ns", "tier1", "http://x/run/1", "failed");
    let result = GatingResult::new("ns.tier1.functional", GatingOutcome::Failed)
        .with_ref_url("http://x/run/1");

    let groups = vec![
        StageGroup::new(Stage::Test, Category::Failed, vec![Entry::Message(child.clone())]),
        StageGroup::new(
            Stage::Greenwave,
            Category::AdditionalTests,
            vec![Entry::Gating(GatingState::from_result(result.clone()))],
        ),
    ];

    let out = correlate(groups);

    let correlated: Vec<_> = out
        .iter()
        .flat_map(|g| g.entries.iter())
        .filter_map(|e| match e {
            Entry::Correlated(pair) => Some(pair),
            _ => None,
        })
        .collect();
    assert_eq!(correlated.len(), 1);
    assert_eq!(correlated[0].message, child);
    assert_eq!(correlated[0].gating.result.as_ref(), Some(&result));

    // The message record is not consumed by correlation.
    assert_eq!(out[0].entries, vec![Entry::Message(child)]);
}

#[test]
fn test_correlation_ignores_outcome_mismatch() {
    let child = test_child("ID:7", "ns", "tier1", "http://x/run/1", "passed");
    let result = GatingResult::new("ns.tier1.functional", GatingOutcome::Failed)
        .with_ref_url("http://x/run/1");

    let out = correlate(vec![
        StageGroup::new(Stage::Test, Category::Passed, vec![Entry::Message(child)]),
        StageGroup::new(
            Stage::Greenwave,
            Category::AdditionalTests,
            vec![Entry::Gating(GatingState::from_result(result))],
        ),
    ]);

    assert!(matches!(out[1].entries[0], Entry::Gating(_)));
}

#[test]
fn test_malformed_decision_yields_no_gating_groups() {
    let artifact = Artifact::new("12345", "brew-build")
        .with_children(vec![test_child("ID:1", "ns", "a", "http://ci/1", "passed")])
        .with_raw_decision(json!({
            "policies_satisfied": "true",
            "summary": "All required tests passed",
            "satisfied_requirements": [
                { "type": "test-result-passed", "testcase": "ns.a.functional" }
            ],
            "results": [
                {
                    "outcome": "PASSED",
                    "ref_url": "http://ci/1",
                    "testcase": { "name": "ns.a.functional" }
                }
            ],
        }));

    let reconciliation = reconcile_artifact(&artifact);

    assert!(reconciliation.gating.is_none());
    assert!(reconciliation
        .groups
        .iter()
        .all(|g| g.stage != Stage::Greenwave));
    assert_eq!(keys(&reconciliation.groups), vec![(Stage::Test, Category::Passed)]);
}

#[test]
fn test_elimination_keeps_ungated_entries() {
    let foo = test_child("ID:1", "foo", "bar", "http://ci/foo", "passed");
    let baz = test_child("ID:2", "baz", "qux", "http://ci/baz", "passed");

    let groups = vec![
        StageGroup::new(
            Stage::Test,
            Category::Passed,
            vec![Entry::Message(foo), Entry::Message(baz.clone())],
        ),
        StageGroup::new(
            Stage::Greenwave,
            Category::Requirement(RequirementType::TestResultPassed),
            vec![Entry::Gating(GatingState::from_result(GatingResult::new(
                "foo.bar.functional",
                GatingOutcome::Passed,
            )))],
        ),
    ];

    let out = eliminate_redundant(groups);

    assert_eq!(out[0].stage, Stage::Test);
    assert_eq!(out[0].entries, vec![Entry::Message(baz)]);
}

#[test]
fn test_full_snapshot() {
    let artifact: Artifact = serde_json::from_value(json!({
        "aid": "12345",
        "type": "brew-build",
        "states": [
            {
                "kai_state": {
                    "msg_id": "ID:b1",
                    "stage": "build",
                    "state": "complete",
                    "version": "0.1.0"
                },
                "broker_msg_body": { "run": { "url": "http://ci/build" } }
            },
            {
                "kai_state": { "msg_id": "ID:t1", "stage": "test", "state": "complete" },
                "broker_msg_body": {
                    "version": "0.1.2",
                    "run": { "url": "http://ci/t1" },
                    "namespace": "osci", "type": "tier0", "category": "functional",
                    "status": "FAILED"
                }
            },
            {
                "kai_state": { "msg_id": "ID:t2", "stage": "test", "state": "running" },
                "broker_msg_body": {
                    "version": "1.1.0",
                    "run": { "url": "http://ci/t2" },
                    "test": { "namespace": "osci", "type": "rpmdeplint", "category": "validation" }
                }
            },
            {
                "kai_state": { "msg_id": "ID:t3", "stage": "test", "state": "complete" },
                "broker_msg_body": {
                    "version": "1.1.0",
                    "run": { "url": "http://ci/t3" },
                    "test": {
                        "namespace": "osci",
                        "type": "installability",
                        "category": "functional",
                        "result": "passed"
                    }
                }
            }
        ],
        "greenwave_decision": {
            "policies_satisfied": false,
            "summary": "1 of 2 required tests failed",
            "satisfied_requirements": [
                { "type": "fetched-gating-yaml", "testcase": "fetched-gating-yaml" }
            ],
            "unsatisfied_requirements": [
                {
                    "type": "test-result-failed",
                    "testcase": "osci.tier0.functional",
                    "item": { "item": "pkg-1.0-1", "type": "brew-build" }
                }
            ],
            "results": [
                {
                    "id": 1, "outcome": "FAILED", "ref_url": "http://ci/t1",
                    "testcase": { "name": "osci.tier0.functional" },
                    "data": { "msg_id": ["ID:t1"] }
                },
                {
                    "id": 2, "outcome": "PASSED", "ref_url": "http://ci/t3",
                    "testcase": { "name": "osci.installability.functional" }
                }
            ],
            "waivers": []
        }
    }))
    .expect("artifact");

    let groups = reconcile(&artifact);

    assert_eq!(
        keys(&groups),
        vec![
            (Stage::Build, Category::Complete),
            (Stage::Test, Category::Running),
            (Stage::Greenwave, Category::Requirement(RequirementType::TestResultFailed)),
            (Stage::Greenwave, Category::Requirement(RequirementType::FetchedGatingYaml)),
            (Stage::Greenwave, Category::AdditionalTests),
        ]
    );

    // Both gated results found their message record.
    let tier0 = &groups[2].entries[0];
    assert!(matches!(tier0, Entry::Correlated(pair) if pair.message.msg_id() == Some("ID:t1")));
    let extra = &groups[4].entries[0];
    assert!(matches!(extra, Entry::Correlated(pair) if pair.message.msg_id() == Some("ID:t3")));

    // The gating yaml requirement has no result to correlate.
    assert!(matches!(groups[3].entries[0], Entry::Gating(_)));

    // Re-running on the same snapshot is a no-op.
    assert_eq!(reconcile(&artifact), groups);
}

#[test]
fn test_requirement_type_named_like_additional_tests_is_one_group() {
    let artifact = Artifact::new("12345", "brew-build").with_raw_decision(json!({
        "policies_satisfied": true,
        "satisfied_requirements": [
            { "type": "additional-tests", "testcase": "a.b.c" }
        ],
        "results": [
            { "outcome": "INFO", "ref_url": "http://ci/9", "testcase": { "name": "x.y.z" } }
        ],
    }));

    let groups = reconcile(&artifact);

    let wire: Vec<(String, String)> = groups
        .iter()
        .map(|g| (g.stage.to_string(), g.category.to_string()))
        .collect();
    assert_eq!(
        wire,
        vec![("greenwave".to_string(), "additional-tests".to_string())]
    );
    assert_eq!(groups[0].entries.len(), 2);

    // The wire form decodes back to the same list.
    let text = serde_json::to_string(&groups).expect("serialize");
    let decoded: Vec<StageGroup> = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(decoded, groups);
}

#[test]
fn test_undecodable_payload_still_surfaces_by_state() {
    let artifact = Artifact::new("1", "brew-build").with_children(vec![
        MessageChild::new(
            KaiState::new("ID:x", MessageStage::Test, LifecycleState::Queued),
            json!({ "version": "9.0.0", "whatever": true }),
        ),
        MessageChild::new(
            KaiState::new("ID:y", MessageStage::Test, LifecycleState::Complete),
            json!({ "version": "9.0.0" }),
        ),
    ]);

    let groups = reconcile(&artifact);

    assert_eq!(keys(&groups), vec![(Stage::Test, Category::Queued)]);
    assert_eq!(groups[0].entries.len(), 1);
}

#[test]
fn test_errored_build_counts_as_failed() {
    let artifact = Artifact::new("1", "redhat-module").with_children(vec![MessageChild::new(
        KaiState::new("ID:b", MessageStage::Build, LifecycleState::Error),
        json!({ "version": "1.0.0", "run": { "url": "http://ci/b" } }),
    )]);

    let groups = reconcile(&artifact);

    assert_eq!(keys(&groups), vec![(Stage::Build, Category::Failed)]);
}
