//! Display categories and their presentation attributes.

use serde::{Deserialize, Serialize};

use crate::gating::{GatingOutcome, RequirementType};
use crate::message::{LifecycleState, TestOutcome};

/// Bucket name within a stage.
///
/// Message-stream categories are named after lifecycle states or test
/// outcomes; gating categories after requirement types, plus the synthetic
/// `additional-tests` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Error,
    Queued,
    Running,
    Complete,
    Passed,
    Failed,
    Info,
    NeedsInspection,
    NotApplicable,
    Requirement(RequirementType),
    AdditionalTests,
}

/// Visual tone used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Failure,
    Warning,
    Pending,
    Info,
    Neutral,
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Error => "error",
            Category::Queued => "queued",
            Category::Running => "running",
            Category::Complete => "complete",
            Category::Passed => "passed",
            Category::Failed => "failed",
            Category::Info => "info",
            Category::NeedsInspection => "needs_inspection",
            Category::NotApplicable => "not_applicable",
            Category::Requirement(t) => t.as_str(),
            Category::AdditionalTests => "additional-tests",
        }
    }

    /// Category a lifecycle state is bucketed into verbatim.
    pub fn from_state(state: LifecycleState) -> Option<Self> {
        match state {
            LifecycleState::Queued => Some(Category::Queued),
            LifecycleState::Running => Some(Category::Running),
            LifecycleState::Complete => Some(Category::Complete),
            LifecycleState::Error => Some(Category::Error),
            LifecycleState::Unknown => None,
        }
    }

    /// Test-stage category whose name equals the outcome, ignoring case.
    pub fn for_gating_outcome(outcome: GatingOutcome) -> Option<Self> {
        match outcome {
            GatingOutcome::Info => Some(Category::Info),
            GatingOutcome::Passed => Some(Category::Passed),
            GatingOutcome::Failed => Some(Category::Failed),
            GatingOutcome::Running => Some(Category::Running),
            GatingOutcome::Queued => Some(Category::Queued),
            GatingOutcome::NotApplicable => Some(Category::NotApplicable),
            GatingOutcome::NeedsInspection => Some(Category::NeedsInspection),
            GatingOutcome::Error => Some(Category::Error),
            GatingOutcome::Unknown => None,
        }
    }

    pub fn display_name(&self) -> String {
        let name = match self {
            Category::Error => "Error",
            Category::Queued => "Queued",
            Category::Running => "Running",
            Category::Complete => "Complete",
            Category::Passed => "Passed",
            Category::Failed => "Failed",
            Category::Info => "Info",
            Category::NeedsInspection => "Needs inspection",
            Category::NotApplicable => "Not applicable",
            Category::AdditionalTests => "Additional tests",
            Category::Requirement(t) => match t {
                RequirementType::TestResultPassed => "Passed",
                RequirementType::TestResultFailed => "Failed",
                RequirementType::TestResultFailedWaived => "Failed (waived)",
                RequirementType::TestResultMissing => "Missing",
                RequirementType::TestResultMissingWaived => "Missing (waived)",
                RequirementType::TestResultErrored => "Errored",
                RequirementType::TestResultErroredWaived => "Errored (waived)",
                RequirementType::InvalidGatingYaml => "Invalid gating.yaml",
                RequirementType::InvalidGatingYamlWaived => "Invalid gating.yaml (waived)",
                RequirementType::MissingGatingYaml => "Missing gating.yaml",
                RequirementType::MissingGatingYamlWaived => "Missing gating.yaml (waived)",
                RequirementType::FailedFetchGatingYaml => "Failed to fetch gating.yaml",
                RequirementType::FailedFetchGatingYamlWaived => {
                    "Failed to fetch gating.yaml (waived)"
                }
                RequirementType::FetchedGatingYaml => "Fetched gating.yaml",
                RequirementType::Excluded => "Excluded",
                RequirementType::Blacklisted => "Blacklisted",
                RequirementType::Other(s) => return s.clone(),
            },
        };
        name.to_string()
    }

    pub fn tone(&self) -> Tone {
        match self {
            Category::Passed | Category::Complete => Tone::Success,
            Category::Failed | Category::Error => Tone::Failure,
            Category::NeedsInspection => Tone::Warning,
            Category::Queued | Category::Running => Tone::Pending,
            Category::Info | Category::NotApplicable | Category::AdditionalTests => Tone::Info,
            Category::Requirement(t) => match t {
                RequirementType::TestResultPassed => Tone::Success,
                RequirementType::TestResultFailed
                | RequirementType::TestResultErrored
                | RequirementType::InvalidGatingYaml
                | RequirementType::FailedFetchGatingYaml => Tone::Failure,
                RequirementType::TestResultMissing | RequirementType::MissingGatingYaml => {
                    Tone::Warning
                }
                RequirementType::FetchedGatingYaml => Tone::Info,
                RequirementType::TestResultFailedWaived
                | RequirementType::TestResultMissingWaived
                | RequirementType::TestResultErroredWaived
                | RequirementType::InvalidGatingYamlWaived
                | RequirementType::MissingGatingYamlWaived
                | RequirementType::FailedFetchGatingYamlWaived
                | RequirementType::Excluded
                | RequirementType::Blacklisted
                | RequirementType::Other(_) => Tone::Neutral,
            },
        }
    }

    /// Stable icon slug.
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Passed | Category::Complete => "check-circle",
            Category::Failed => "times-circle",
            Category::Error => "exclamation-circle",
            Category::NeedsInspection => "search",
            Category::Running => "in-progress",
            Category::Queued => "pending",
            Category::Info => "info-circle",
            Category::NotApplicable => "minus-circle",
            Category::AdditionalTests => "list",
            Category::Requirement(t) => match t {
                RequirementType::TestResultPassed => "check-circle",
                RequirementType::TestResultFailed => "times-circle",
                RequirementType::TestResultErrored => "exclamation-circle",
                RequirementType::TestResultMissing => "question-circle",
                RequirementType::TestResultFailedWaived
                | RequirementType::TestResultMissingWaived
                | RequirementType::TestResultErroredWaived
                | RequirementType::InvalidGatingYamlWaived
                | RequirementType::MissingGatingYamlWaived
                | RequirementType::FailedFetchGatingYamlWaived => "user-shield",
                RequirementType::InvalidGatingYaml
                | RequirementType::MissingGatingYaml
                | RequirementType::FailedFetchGatingYaml
                | RequirementType::FetchedGatingYaml => "file-code",
                RequirementType::Excluded | RequirementType::Blacklisted => "ban",
                RequirementType::Other(_) => "question-circle",
            },
        }
    }

    /// Sort key for display; problems first.
    pub fn display_rank(&self) -> u16 {
        match self {
            Category::Failed | Category::Error => 10,
            Category::NeedsInspection => 30,
            Category::Running => 40,
            Category::Queued => 50,
            Category::Info | Category::NotApplicable => 70,
            Category::Passed => 80,
            Category::Complete => 85,
            Category::AdditionalTests => 90,
            Category::Requirement(t) => match t {
                RequirementType::TestResultFailed
                | RequirementType::TestResultErrored
                | RequirementType::InvalidGatingYaml
                | RequirementType::FailedFetchGatingYaml => 10,
                RequirementType::TestResultMissing | RequirementType::MissingGatingYaml => 20,
                RequirementType::TestResultFailedWaived
                | RequirementType::TestResultMissingWaived
                | RequirementType::TestResultErroredWaived
                | RequirementType::InvalidGatingYamlWaived
                | RequirementType::MissingGatingYamlWaived
                | RequirementType::FailedFetchGatingYamlWaived => 60,
                RequirementType::TestResultPassed => 80,
                RequirementType::Excluded | RequirementType::Blacklisted => 95,
                RequirementType::Other(_) => 99,
                RequirementType::FetchedGatingYaml => 100,
            },
        }
    }

    /// Marker states that exist for bookkeeping and are not rendered.
    pub fn is_internal(&self) -> bool {
        matches!(self, Category::Requirement(RequirementType::FetchedGatingYaml))
    }
}

impl From<TestOutcome> for Category {
    fn from(outcome: TestOutcome) -> Self {
        match outcome {
            TestOutcome::Passed => Category::Passed,
            TestOutcome::Failed => Category::Failed,
            TestOutcome::Info => Category::Info,
            TestOutcome::NeedsInspection => Category::NeedsInspection,
            TestOutcome::NotApplicable => Category::NotApplicable,
        }
    }
}

impl From<RequirementType> for Category {
    /// Resolved through the wire name, so an unknown type spelled like a
    /// built-in category maps onto that category.
    fn from(requirement_type: RequirementType) -> Self {
        Category::from(String::from(requirement_type))
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "error" => Category::Error,
            "queued" => Category::Queued,
            "running" => Category::Running,
            "complete" => Category::Complete,
            "passed" => Category::Passed,
            "failed" => Category::Failed,
            "info" => Category::Info,
            "needs_inspection" => Category::NeedsInspection,
            "not_applicable" => Category::NotApplicable,
            "additional-tests" => Category::AdditionalTests,
            _ => Category::Requirement(RequirementType::from(value)),
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Requirement(t) => t.into(),
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
