//! Caller-side helpers over a reconciled group list.

use gatewatch_domain::StageGroup;

/// Drop bookkeeping categories that are never rendered.
pub fn filter_internal(groups: Vec<StageGroup>) -> Vec<StageGroup> {
    groups
        .into_iter()
        .filter(|g| !g.category.is_internal())
        .collect()
}

/// Order groups for display: by stage, then problems first within a stage.
///
/// The sort is stable, so categories of equal rank keep reconciliation order.
pub fn sort_for_display(mut groups: Vec<StageGroup>) -> Vec<StageGroup> {
    groups.sort_by_key(|g| (g.stage, g.category.display_rank()));
    groups
}
