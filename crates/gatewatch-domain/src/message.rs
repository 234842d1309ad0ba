//! Message-bus lifecycle records
//!
//! Each `MessageChild` is one lifecycle event (queued, running, complete,
//! error) received for a test case on an artifact. The broker payload comes
//! in two schema generations; the generation is detected once, when the record
//! is built, and kept as a `MessageBody` variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// LIFECYCLE RECORD
// ============================================================================

/// Pipeline stage reported by the message bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStage {
    Build,
    Test,
    #[serde(other)]
    Unknown,
}

/// Lifecycle state of a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Queued,
    Running,
    Complete,
    Error,
    #[serde(other)]
    Unknown,
}

impl LifecycleState {
    /// Known states in classification order.
    pub const KNOWN: [LifecycleState; 4] = [
        LifecycleState::Error,
        LifecycleState::Queued,
        LifecycleState::Running,
        LifecycleState::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Queued => "queued",
            LifecycleState::Running => "running",
            LifecycleState::Complete => "complete",
            LifecycleState::Error => "error",
            LifecycleState::Unknown => "unknown",
        }
    }
}

/// Envelope metadata attached by the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KaiState {
    /// Broker message identifier.
    #[serde(default)]
    pub msg_id: String,

    pub stage: MessageStage,

    pub state: LifecycleState,

    /// Schema version recorded at ingestion (fallback when the payload lacks one).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// When the message was received (epoch milliseconds on the wire).
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl KaiState {
    pub fn new(msg_id: impl Into<String>, stage: MessageStage, state: LifecycleState) -> Self {
        Self {
            msg_id: msg_id.into(),
            stage,
            state,
            version: None,
            timestamp: None,
        }
    }
}

// ============================================================================
// PAYLOAD SCHEMAS
// ============================================================================

/// Extended outcome of a completed test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestOutcome {
    Passed,
    Failed,
    Info,
    NeedsInspection,
    NotApplicable,
}

impl TestOutcome {
    pub const ALL: [TestOutcome; 5] = [
        TestOutcome::Passed,
        TestOutcome::Failed,
        TestOutcome::Info,
        TestOutcome::NeedsInspection,
        TestOutcome::NotApplicable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "passed",
            TestOutcome::Failed => "failed",
            TestOutcome::Info => "info",
            TestOutcome::NeedsInspection => "needs_inspection",
            TestOutcome::NotApplicable => "not_applicable",
        }
    }

    /// Case-insensitive parse. Values outside the five outcomes yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.to_ascii_lowercase();
        Self::ALL.into_iter().find(|o| o.as_str() == lowered)
    }
}

/// Payload schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVersion {
    /// Legacy flat shape (`0.1.x`).
    V01,
    /// Nested `test` object (`0.2.x` and `1.x`).
    V1,
}

impl SchemaVersion {
    pub fn detect(version: &str) -> Option<Self> {
        if version.starts_with("0.1.") {
            Some(SchemaVersion::V01)
        } else if version.starts_with("0.2.") || version.starts_with("1.") {
            Some(SchemaVersion::V1)
        } else {
            None
        }
    }
}

/// Link to the CI run that produced a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    pub url: String,
    #[serde(default)]
    pub log: Option<String>,
}

/// Legacy flat payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBodyV01 {
    pub run: RunInfo,
    pub namespace: String,
    #[serde(rename = "type")]
    pub test_type: String,
    pub category: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Test descriptor of the nested payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInfo {
    pub namespace: String,
    #[serde(rename = "type")]
    pub test_type: String,
    pub category: String,
    #[serde(default)]
    pub result: Option<String>,
}

/// Nested payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBodyV1 {
    pub run: RunInfo,
    pub test: TestInfo,
}

/// Decoded broker payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    V01(MessageBodyV01),
    V1(MessageBodyV1),
    /// Neither schema matched; outcome, name and URL are unavailable.
    Undecodable { version: Option<String> },
}

impl MessageBody {
    /// Decode a raw payload. The version is read from the payload itself,
    /// falling back to `fallback_version`.
    pub fn decode(raw: &Value, fallback_version: Option<&str>) -> Self {
        let version = raw
            .get("version")
            .and_then(Value::as_str)
            .or(fallback_version);

        let Some(schema) = version.and_then(SchemaVersion::detect) else {
            return MessageBody::Undecodable {
                version: version.map(str::to_owned),
            };
        };

        let decoded = match schema {
            SchemaVersion::V01 => {
                serde_json::from_value::<MessageBodyV01>(raw.clone()).map(MessageBody::V01)
            }
            SchemaVersion::V1 => {
                serde_json::from_value::<MessageBodyV1>(raw.clone()).map(MessageBody::V1)
            }
        };

        decoded.unwrap_or_else(|_| MessageBody::Undecodable {
            version: version.map(str::to_owned),
        })
    }

    pub fn schema(&self) -> Option<SchemaVersion> {
        match self {
            MessageBody::V01(_) => Some(SchemaVersion::V01),
            MessageBody::V1(_) => Some(SchemaVersion::V1),
            MessageBody::Undecodable { .. } => None,
        }
    }

    /// `namespace.type.category`, or `None` when any part is empty.
    pub fn testcase_name(&self) -> Option<String> {
        match self {
            MessageBody::V01(b) => join_testcase(&b.namespace, &b.test_type, &b.category),
            MessageBody::V1(b) => {
                join_testcase(&b.test.namespace, &b.test.test_type, &b.test.category)
            }
            MessageBody::Undecodable { .. } => None,
        }
    }

    pub fn outcome(&self) -> Option<TestOutcome> {
        let raw = match self {
            MessageBody::V01(b) => b.status.as_deref(),
            MessageBody::V1(b) => b.test.result.as_deref(),
            MessageBody::Undecodable { .. } => None,
        };
        raw.and_then(TestOutcome::parse)
    }

    pub fn ref_url(&self) -> Option<&str> {
        let url = match self {
            MessageBody::V01(b) => b.run.url.as_str(),
            MessageBody::V1(b) => b.run.url.as_str(),
            MessageBody::Undecodable { .. } => return None,
        };
        (!url.is_empty()).then_some(url)
    }
}

fn join_testcase(namespace: &str, test_type: &str, category: &str) -> Option<String> {
    if namespace.is_empty() || test_type.is_empty() || category.is_empty() {
        return None;
    }
    Some(format!("{}.{}.{}", namespace, test_type, category))
}

// ============================================================================
// MESSAGE CHILD
// ============================================================================

#[derive(Deserialize)]
struct RawMessageChild {
    kai_state: KaiState,
    #[serde(default)]
    broker_msg_body: Value,
}

impl From<RawMessageChild> for MessageChild {
    fn from(raw: RawMessageChild) -> Self {
        MessageChild::new(raw.kai_state, raw.broker_msg_body)
    }
}

/// One lifecycle event for a test case on an artifact.
///
/// Serializes as `{ kai_state, broker_msg_body }`; the decoded body is
/// rebuilt on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMessageChild")]
pub struct MessageChild {
    kai_state: KaiState,
    broker_msg_body: Value,
    #[serde(skip_serializing)]
    body: MessageBody,
}

impl MessageChild {
    pub fn new(kai_state: KaiState, broker_msg_body: Value) -> Self {
        let body = MessageBody::decode(&broker_msg_body, kai_state.version.as_deref());
        Self {
            kai_state,
            broker_msg_body,
            body,
        }
    }

    pub fn kai_state(&self) -> &KaiState {
        &self.kai_state
    }

    pub fn payload(&self) -> &Value {
        &self.broker_msg_body
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    pub fn stage(&self) -> MessageStage {
        self.kai_state.stage
    }

    pub fn state(&self) -> LifecycleState {
        self.kai_state.state
    }

    /// Broker message id, `None` when empty.
    pub fn msg_id(&self) -> Option<&str> {
        let id = self.kai_state.msg_id.as_str();
        (!id.is_empty()).then_some(id)
    }

    pub fn testcase_name(&self) -> Option<String> {
        self.body.testcase_name()
    }

    pub fn outcome(&self) -> Option<TestOutcome> {
        self.body.outcome()
    }

    pub fn ref_url(&self) -> Option<&str> {
        self.body.ref_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v01_body(status: &str) -> Value {
        json!({
            "version": "0.1.0",
            "run": { "url": "http://ci/run/7", "log": "http://ci/run/7/log" },
            "namespace": "osci",
            "type": "tier0",
            "category": "functional",
            "status": status,
        })
    }

    fn v1_body(result: &str) -> Value {
        json!({
            "version": "1.1.14",
            "run": { "url": "http://ci/run/9" },
            "test": {
                "namespace": "fedora-ci",
                "type": "rpminspect",
                "category": "static-analysis",
                "result": result,
            },
        })
    }

    #[test]
    fn test_schema_detection() {
        assert_eq!(SchemaVersion::detect("0.1.0"), Some(SchemaVersion::V01));
        assert_eq!(SchemaVersion::detect("0.2.3"), Some(SchemaVersion::V1));
        assert_eq!(SchemaVersion::detect("1.0.0"), Some(SchemaVersion::V1));
        assert_eq!(SchemaVersion::detect("2.0.0"), None);
        assert_eq!(SchemaVersion::detect("0.1"), None);
    }

    #[test]
    fn test_decode_legacy_payload() {
        let body = MessageBody::decode(&v01_body("PASSED"), None);
        assert_eq!(body.schema(), Some(SchemaVersion::V01));
        assert_eq!(body.testcase_name().as_deref(), Some("osci.tier0.functional"));
        assert_eq!(body.outcome(), Some(TestOutcome::Passed));
        assert_eq!(body.ref_url(), Some("http://ci/run/7"));
    }

    #[test]
    fn test_decode_nested_payload() {
        let body = MessageBody::decode(&v1_body("needs_inspection"), None);
        assert_eq!(body.schema(), Some(SchemaVersion::V1));
        assert_eq!(
            body.testcase_name().as_deref(),
            Some("fedora-ci.rpminspect.static-analysis")
        );
        assert_eq!(body.outcome(), Some(TestOutcome::NeedsInspection));
    }

    #[test]
    fn test_version_falls_back_to_kai_state() {
        let mut raw = v1_body("info");
        raw.as_object_mut().unwrap().remove("version");

        let body = MessageBody::decode(&raw, Some("0.2.0"));
        assert_eq!(body.schema(), Some(SchemaVersion::V1));

        let body = MessageBody::decode(&raw, None);
        assert_eq!(body, MessageBody::Undecodable { version: None });
    }

    #[test]
    fn test_shape_mismatch_is_undecodable() {
        // nested shape announced as legacy
        let mut raw = v1_body("passed");
        raw["version"] = json!("0.1.9");
        let body = MessageBody::decode(&raw, None);
        assert!(matches!(body, MessageBody::Undecodable { .. }));
        assert_eq!(body.outcome(), None);
        assert_eq!(body.testcase_name(), None);
        assert_eq!(body.ref_url(), None);
    }

    #[test]
    fn test_unknown_outcome_is_excluded() {
        let body = MessageBody::decode(&v01_body("complete"), None);
        assert_eq!(body.outcome(), None);
        assert!(body.testcase_name().is_some());
    }

    #[test]
    fn test_outcome_parse_case_insensitive() {
        assert_eq!(TestOutcome::parse("FAILED"), Some(TestOutcome::Failed));
        assert_eq!(TestOutcome::parse("Not_Applicable"), Some(TestOutcome::NotApplicable));
        assert_eq!(TestOutcome::parse("skipped"), None);
    }

    #[test]
    fn test_empty_name_part_is_unresolved() {
        let mut raw = v01_body("passed");
        raw["category"] = json!("");
        let body = MessageBody::decode(&raw, None);
        assert_eq!(body.schema(), Some(SchemaVersion::V01));
        assert_eq!(body.testcase_name(), None);
    }

    #[test]
    fn test_message_child_deserialize() {
        let raw = json!({
            "kai_state": {
                "msg_id": "ID:broker-1",
                "stage": "test",
                "state": "complete",
                "timestamp": 1_600_000_000_000i64,
            },
            "broker_msg_body": v1_body("failed"),
        });

        let child: MessageChild = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(child.stage(), MessageStage::Test);
        assert_eq!(child.state(), LifecycleState::Complete);
        assert_eq!(child.msg_id(), Some("ID:broker-1"));
        assert_eq!(child.outcome(), Some(TestOutcome::Failed));
        assert!(child.kai_state().timestamp.is_some());

        let back = serde_json::to_value(&child).expect("serialize");
        assert!(back.get("body").is_none());
        let again: MessageChild = serde_json::from_value(back).expect("deserialize again");
        assert_eq!(child, again);
    }

    #[test]
    fn test_unknown_stage_and_state() {
        let raw = json!({
            "kai_state": { "msg_id": "m", "stage": "dispatch", "state": "canceled" },
            "broker_msg_body": {},
        });
        let child: MessageChild = serde_json::from_value(raw).expect("deserialize");
        assert_eq!(child.stage(), MessageStage::Unknown);
        assert_eq!(child.state(), LifecycleState::Unknown);
    }

    #[test]
    fn test_empty_msg_id_is_absent() {
        let child = MessageChild::new(
            KaiState::new("", MessageStage::Test, LifecycleState::Queued),
            v1_body("passed"),
        );
        assert_eq!(child.msg_id(), None);
    }
}
