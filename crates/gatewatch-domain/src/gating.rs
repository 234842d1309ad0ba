//! Gating-engine decision records
//!
//! A decision lists the requirements the policy engine evaluated (satisfied
//! and unsatisfied), the raw results it knows about, and any waivers. The
//! record arrives as untyped JSON; `GatingDecision::from_value` checks it
//! before decoding so that malformed data is rejected as a whole.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ReconcileError, Result};

// ============================================================================
// REQUIREMENT TYPES
// ============================================================================

/// Fulfillment state of a requirement, as reported by the gating engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequirementType {
    TestResultPassed,
    TestResultFailed,
    TestResultFailedWaived,
    TestResultMissing,
    TestResultMissingWaived,
    TestResultErrored,
    TestResultErroredWaived,
    InvalidGatingYaml,
    InvalidGatingYamlWaived,
    MissingGatingYaml,
    MissingGatingYamlWaived,
    FailedFetchGatingYaml,
    FailedFetchGatingYamlWaived,
    FetchedGatingYaml,
    Excluded,
    Blacklisted,
    /// Any type string this version does not know about.
    Other(String),
}

impl RequirementType {
    pub const KNOWN: [RequirementType; 16] = [
        RequirementType::TestResultPassed,
        RequirementType::TestResultFailed,
        RequirementType::TestResultFailedWaived,
        RequirementType::TestResultMissing,
        RequirementType::TestResultMissingWaived,
        RequirementType::TestResultErrored,
        RequirementType::TestResultErroredWaived,
        RequirementType::InvalidGatingYaml,
        RequirementType::InvalidGatingYamlWaived,
        RequirementType::MissingGatingYaml,
        RequirementType::MissingGatingYamlWaived,
        RequirementType::FailedFetchGatingYaml,
        RequirementType::FailedFetchGatingYamlWaived,
        RequirementType::FetchedGatingYaml,
        RequirementType::Excluded,
        RequirementType::Blacklisted,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            RequirementType::TestResultPassed => "test-result-passed",
            RequirementType::TestResultFailed => "test-result-failed",
            RequirementType::TestResultFailedWaived => "test-result-failed-waived",
            RequirementType::TestResultMissing => "test-result-missing",
            RequirementType::TestResultMissingWaived => "test-result-missing-waived",
            RequirementType::TestResultErrored => "test-result-errored",
            RequirementType::TestResultErroredWaived => "test-result-errored-waived",
            RequirementType::InvalidGatingYaml => "invalid-gating-yaml",
            RequirementType::InvalidGatingYamlWaived => "invalid-gating-yaml-waived",
            RequirementType::MissingGatingYaml => "missing-gating-yaml",
            RequirementType::MissingGatingYamlWaived => "missing-gating-yaml-waived",
            RequirementType::FailedFetchGatingYaml => "failed-fetch-gating-yaml",
            RequirementType::FailedFetchGatingYamlWaived => "failed-fetch-gating-yaml-waived",
            RequirementType::FetchedGatingYaml => "fetched-gating-yaml",
            RequirementType::Excluded => "excluded",
            RequirementType::Blacklisted => "blacklisted",
            RequirementType::Other(s) => s.as_str(),
        }
    }

    pub fn is_waived(&self) -> bool {
        matches!(
            self,
            RequirementType::TestResultFailedWaived
                | RequirementType::TestResultMissingWaived
                | RequirementType::TestResultErroredWaived
                | RequirementType::InvalidGatingYamlWaived
                | RequirementType::MissingGatingYamlWaived
                | RequirementType::FailedFetchGatingYamlWaived
        )
    }
}

impl From<&str> for RequirementType {
    fn from(value: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|t| t.as_str() == value)
            .unwrap_or_else(|| RequirementType::Other(value.to_string()))
    }
}

impl From<String> for RequirementType {
    fn from(value: String) -> Self {
        RequirementType::from(value.as_str())
    }
}

impl From<RequirementType> for String {
    fn from(value: RequirementType) -> Self {
        match value {
            RequirementType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for RequirementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// A test case the gating engine considers relevant to the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    #[serde(rename = "type")]
    pub requirement_type: RequirementType,

    #[serde(default)]
    pub testcase: Option<String>,

    /// Extra detail, e.g. the validation error for gating yaml states.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Value>,
}

impl Requirement {
    pub fn new(requirement_type: RequirementType, testcase: impl Into<String>) -> Self {
        Self {
            requirement_type,
            testcase: Some(testcase.into()),
            details: None,
            scenario: None,
            result_id: None,
            item: None,
        }
    }

    pub fn testcase_name(&self) -> Option<&str> {
        self.testcase.as_deref().filter(|n| !n.is_empty())
    }
}

/// Outcome of a recorded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatingOutcome {
    Info,
    Passed,
    Failed,
    Running,
    Queued,
    NotApplicable,
    NeedsInspection,
    Error,
    #[serde(other)]
    Unknown,
}

impl GatingOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatingOutcome::Info => "INFO",
            GatingOutcome::Passed => "PASSED",
            GatingOutcome::Failed => "FAILED",
            GatingOutcome::Running => "RUNNING",
            GatingOutcome::Queued => "QUEUED",
            GatingOutcome::NotApplicable => "NOT_APPLICABLE",
            GatingOutcome::NeedsInspection => "NEEDS_INSPECTION",
            GatingOutcome::Error => "ERROR",
            GatingOutcome::Unknown => "UNKNOWN",
        }
    }
}

/// Test case reference inside a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestcaseRef {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_url: Option<String>,
}

/// A recorded test outcome known to the gating engine's result store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatingResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default)]
    pub outcome: Option<GatingOutcome>,

    #[serde(default)]
    pub ref_url: Option<String>,

    #[serde(default)]
    pub testcase: Option<TestcaseRef>,

    /// Free-form result data; values are usually single-element arrays.
    #[serde(default)]
    pub data: BTreeMap<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_time: Option<String>,
}

impl GatingResult {
    pub fn new(testcase: impl Into<String>, outcome: GatingOutcome) -> Self {
        Self {
            id: None,
            outcome: Some(outcome),
            ref_url: None,
            testcase: Some(TestcaseRef {
                name: testcase.into(),
                ref_url: None,
            }),
            data: BTreeMap::new(),
            note: None,
            submit_time: None,
        }
    }

    pub fn with_ref_url(mut self, url: impl Into<String>) -> Self {
        self.ref_url = Some(url.into());
        self
    }

    pub fn with_msg_id(mut self, msg_id: impl Into<String>) -> Self {
        self.data
            .insert("msg_id".to_string(), Value::Array(vec![Value::String(msg_id.into())]));
        self
    }

    pub fn testcase_name(&self) -> Option<&str> {
        self.testcase
            .as_ref()
            .map(|t| t.name.as_str())
            .filter(|n| !n.is_empty())
    }

    /// Message id from `data.msg_id` (first element when it is a list).
    pub fn msg_id(&self) -> Option<&str> {
        let value = self.data.get("msg_id")?;
        let id = match value {
            Value::Array(items) => items.first()?.as_str()?,
            Value::String(s) => s.as_str(),
            _ => return None,
        };
        (!id.is_empty()).then_some(id)
    }

    pub fn ref_url(&self) -> Option<&str> {
        self.ref_url.as_deref().filter(|u| !u.is_empty())
    }
}

/// A human-entered override for one test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waiver {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default)]
    pub testcase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waived: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_type: Option<String>,
}

impl Waiver {
    pub fn new(testcase: impl Into<String>) -> Self {
        Self {
            id: None,
            testcase: Some(testcase.into()),
            username: None,
            comment: None,
            waived: Some(true),
            timestamp: None,
            product_version: None,
            subject_type: None,
        }
    }

    pub fn testcase_name(&self) -> Option<&str> {
        self.testcase.as_deref().filter(|n| !n.is_empty())
    }
}

// ============================================================================
// DECISION
// ============================================================================

/// The gating engine's reply for one artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatingDecision {
    pub policies_satisfied: bool,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub satisfied_requirements: Vec<Requirement>,

    #[serde(default)]
    pub unsatisfied_requirements: Vec<Requirement>,

    #[serde(default)]
    pub results: Vec<GatingResult>,

    #[serde(default)]
    pub waivers: Vec<Waiver>,

    #[serde(default)]
    pub applicable_policies: Vec<String>,
}

impl GatingDecision {
    /// Check and decode a raw decision record.
    ///
    /// `policies_satisfied` must be a JSON boolean; any failure rejects the
    /// whole record.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value.get("policies_satisfied") {
            Some(Value::Bool(_)) => {}
            Some(other) => {
                return Err(ReconcileError::MalformedDecision(format!(
                    "policies_satisfied must be a boolean, got {}",
                    other
                )))
            }
            None => {
                return Err(ReconcileError::MalformedDecision(
                    "policies_satisfied is missing".to_string(),
                ))
            }
        }

        serde_json::from_value(value.clone())
            .map_err(|e| ReconcileError::MalformedDecision(e.to_string()))
    }

    /// Satisfied then unsatisfied requirements, in record order.
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.satisfied_requirements
            .iter()
            .chain(self.unsatisfied_requirements.iter())
    }

    pub fn status(&self) -> GatingStatus {
        GatingStatus {
            policies_satisfied: self.policies_satisfied,
            summary: self.summary.clone(),
        }
    }
}

/// Headline gating status surfaced next to the grouped view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatingStatus {
    pub policies_satisfied: bool,
    pub summary: Option<String>,
}

/// A requirement merged with its result and waiver.
///
/// Entries of the synthetic `additional-tests` category carry only a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatingState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<Requirement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<GatingResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiver: Option<Waiver>,
}

impl GatingState {
    pub fn from_result(result: GatingResult) -> Self {
        Self {
            requirement: None,
            result: Some(result),
            waiver: None,
        }
    }

    /// Requirement test case, falling back to the result's.
    pub fn testcase_name(&self) -> Option<&str> {
        self.requirement
            .as_ref()
            .and_then(Requirement::testcase_name)
            .or_else(|| self.result.as_ref().and_then(GatingResult::testcase_name))
    }
}
