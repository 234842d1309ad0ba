use anyhow::{Context, Result};
use gatewatch_domain::{Artifact, Entry, GatingStatus, StageGroup};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::digest::output_digest;
use crate::reconcile::reconcile_artifact;
use crate::view::filter_internal;

/// Reconciled view of one artifact, ready to persist or render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReconcileReport {
    pub artifact_id: String,
    pub artifact_type: String,
    pub gating: Option<GatingStatus>,
    pub groups: Vec<StageGroup>,
    /// Digest of `groups` as reported.
    pub digest: String,
}

/// Reconcile `artifact` and package the result.
pub fn build_report(
    artifact: &Artifact,
    show_internal: bool,
) -> gatewatch_domain::Result<ReconcileReport> {
    let reconciliation = reconcile_artifact(artifact);
    let groups = if show_internal {
        reconciliation.groups
    } else {
        filter_internal(reconciliation.groups)
    };
    let digest = output_digest(&groups)?;

    Ok(ReconcileReport {
        artifact_id: artifact.id.clone(),
        artifact_type: artifact.artifact_type.clone(),
        gating: reconciliation.gating,
        groups,
        digest,
    })
}

/// Write the report in pretty JSON format.
pub fn write_report_json(path: &Path, report: &ReconcileReport) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("serialize reconcile report")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

/// Render a markdown summary of the report.
pub fn render_report_md(report: &ReconcileReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {} {}\n\n", report.artifact_type, report.artifact_id));

    match &report.gating {
        Some(status) => {
            let verdict = if status.policies_satisfied {
                "policies satisfied"
            } else {
                "policies not satisfied"
            };
            out.push_str(&format!("Gating: {}", verdict));
            if let Some(summary) = &status.summary {
                out.push_str(&format!(" ({})", summary));
            }
            out.push_str("\n\n");
        }
        None => out.push_str("Gating: no decision\n\n"),
    }

    if report.groups.is_empty() {
        out.push_str("_No results._\n");
    }

    for group in &report.groups {
        out.push_str(&format!(
            "## {} / {} ({})\n",
            group.stage.display_name(),
            group.category.display_name(),
            group.entries.len()
        ));
        for entry in &group.entries {
            out.push_str(&format!("- {}\n", render_entry(entry)));
        }
        out.push('\n');
    }

    out.push_str(&format!("digest: `{}`\n", report.digest));
    out
}

fn render_entry(entry: &Entry) -> String {
    let name = entry
        .testcase_name()
        .unwrap_or_else(|| "(unnamed)".to_string());

    let (source, url, waived) = match entry {
        Entry::Message(child) => ("message", child.ref_url().map(str::to_owned), false),
        Entry::Gating(state) => (
            "gating",
            state.result.as_ref().and_then(|r| r.ref_url()).map(str::to_owned),
            state.waiver.is_some(),
        ),
        Entry::Correlated(pair) => (
            "gating+message",
            pair.message.ref_url().map(str::to_owned),
            pair.gating.waiver.is_some(),
        ),
    };

    let mut line = format!("`{}` [{}]", name, source);
    if waived {
        line.push_str(" waived");
    }
    if let Some(url) = url {
        line.push_str(&format!(" <{}>", url));
    }
    line
}
