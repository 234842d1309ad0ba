//! Reconciled view entries.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::gating::GatingState;
use crate::message::{MessageChild, MessageStage};

/// Coarse pipeline phase an entry is displayed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Build,
    Test,
    /// Synthetic stage for gating-engine entries.
    Greenwave,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Build => "build",
            Stage::Test => "test",
            Stage::Greenwave => "greenwave",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Build => "Build",
            Stage::Test => "Test",
            Stage::Greenwave => "Gating",
        }
    }
}

impl TryFrom<MessageStage> for Stage {
    type Error = MessageStage;

    fn try_from(stage: MessageStage) -> Result<Self, Self::Error> {
        match stage {
            MessageStage::Build => Ok(Stage::Build),
            MessageStage::Test => Ok(Stage::Test),
            MessageStage::Unknown => Err(stage),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One gating-side state and one message-side record believed to describe
/// the same test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedEntry {
    pub gating: GatingState,
    pub message: MessageChild,
}

impl CorrelatedEntry {
    pub fn testcase_name(&self) -> Option<String> {
        self.gating
            .testcase_name()
            .map(str::to_owned)
            .or_else(|| self.message.testcase_name())
    }
}

/// An element of a category's entry list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Message(MessageChild),
    Gating(GatingState),
    Correlated(CorrelatedEntry),
}

impl Entry {
    pub fn testcase_name(&self) -> Option<String> {
        match self {
            Entry::Message(child) => child.testcase_name(),
            Entry::Gating(state) => state.testcase_name().map(str::to_owned),
            Entry::Correlated(pair) => pair.testcase_name(),
        }
    }

    /// Test case name taken from the gating side, if this entry has one.
    pub fn gating_testcase_name(&self) -> Option<&str> {
        match self {
            Entry::Message(_) => None,
            Entry::Gating(state) => state.testcase_name(),
            Entry::Correlated(pair) => pair.gating.testcase_name(),
        }
    }

    pub fn as_message(&self) -> Option<&MessageChild> {
        match self {
            Entry::Message(child) => Some(child),
            _ => None,
        }
    }

    pub fn as_gating(&self) -> Option<&GatingState> {
        match self {
            Entry::Gating(state) => Some(state),
            Entry::Correlated(pair) => Some(&pair.gating),
            Entry::Message(_) => None,
        }
    }
}

impl From<MessageChild> for Entry {
    fn from(child: MessageChild) -> Self {
        Entry::Message(child)
    }
}

impl From<GatingState> for Entry {
    fn from(state: GatingState) -> Self {
        Entry::Gating(state)
    }
}

impl From<CorrelatedEntry> for Entry {
    fn from(pair: CorrelatedEntry) -> Self {
        Entry::Correlated(pair)
    }
}

/// One `(stage, category, entries)` triple of the reconciled view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageGroup {
    pub stage: Stage,
    pub category: Category,
    pub entries: Vec<Entry>,
}

impl StageGroup {
    pub fn new(stage: Stage, category: Category, entries: Vec<Entry>) -> Self {
        Self {
            stage,
            category,
            entries,
        }
    }
}
