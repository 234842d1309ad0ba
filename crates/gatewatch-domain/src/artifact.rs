//! Artifact snapshot handed to reconciliation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::gating::GatingDecision;
use crate::message::MessageChild;

/// A build or compose whose CI results are tracked.
///
/// The gating decision is kept as raw JSON: it comes from an external
/// service and is only trusted after `GatingDecision::from_value` accepts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(alias = "aid")]
    pub id: String,

    #[serde(rename = "type")]
    pub artifact_type: String,

    #[serde(default, alias = "states")]
    pub children: Vec<MessageChild>,

    #[serde(default, alias = "greenwave_decision", skip_serializing_if = "Option::is_none")]
    pub gating_decision: Option<Value>,
}

impl Artifact {
    pub fn new(id: impl Into<String>, artifact_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            artifact_type: artifact_type.into(),
            children: Vec::new(),
            gating_decision: None,
        }
    }

    pub fn with_children(mut self, children: Vec<MessageChild>) -> Self {
        self.children = children;
        self
    }

    pub fn with_raw_decision(mut self, decision: Value) -> Self {
        self.gating_decision = Some(decision);
        self
    }

    /// Attach an already-typed decision.
    pub fn with_decision(self, decision: &GatingDecision) -> Result<Self> {
        Ok(self.with_raw_decision(serde_json::to_value(decision)?))
    }

    pub fn decode_decision(&self) -> Option<Result<GatingDecision>> {
        self.gating_decision.as_ref().map(GatingDecision::from_value)
    }
}
