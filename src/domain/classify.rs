//! Mean-based classification of groups into typical and special.

use crate::domain::error::DomainError;
use crate::domain::grouping::{Group, GroupMapping};

/// Percentage of the mean used when none is configured.
pub const DEFAULT_PERCENTAGE_MEAN_CUTOFF: f64 = 60.0;

/// Partition of a `GroupMapping` around a single cutoff.
///
/// Every source group lands in exactly one of `typical` and `special`.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Mean group size over all groups
    pub mean: f64,
    /// Occurrence threshold; negative only for negative percentages
    pub cutoff: i64,
    /// Percentage of the mean the cutoff was derived from
    pub percentage: f64,
    /// Groups with more members than `cutoff`
    pub typical: GroupMapping,
    /// Groups with at most `cutoff` members
    pub special: GroupMapping,
}

impl Classification {
    pub fn group_count(&self) -> usize {
        self.typical.len() + self.special.len()
    }
}

/// Arithmetic mean of the group sizes.
pub fn mean_group_size(groups: &GroupMapping) -> Result<f64, DomainError> {
    if groups.is_empty() {
        return Err(DomainError::EmptyGroupSet);
    }
    let total: usize = groups.iter().map(Group::len).sum();
    Ok(total as f64 / groups.len() as f64)
}

/// `floor(mean * percentage / 100)`.
pub fn compute_cutoff(mean: f64, percentage: f64) -> i64 {
    (mean * (percentage / 100.0)).floor() as i64
}

/// Split `groups` into typical (size > cutoff) and special (size <= cutoff).
///
/// Fails with [`DomainError::EmptyGroupSet`] when there is nothing to average.
pub fn classify(groups: &GroupMapping, percentage: f64) -> Result<Classification, DomainError> {
    let mean = mean_group_size(groups)?;
    let cutoff = compute_cutoff(mean, percentage);

    let (typical, special): (Vec<Group>, Vec<Group>) = groups
        .iter()
        .cloned()
        .partition(|group| group.len() as i64 > cutoff);

    Ok(Classification {
        mean,
        cutoff,
        percentage,
        typical: typical.into_iter().collect(),
        special: special.into_iter().collect(),
    })
}
