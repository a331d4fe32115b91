//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No groups to classify: the mean group size is undefined.
    #[error("no groups to classify: mean occurrence count is undefined")]
    EmptyGroupSet,
}
