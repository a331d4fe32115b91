//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod classify;
pub mod entities;
pub mod error;
pub mod grouping;
pub mod summary;
pub mod traversal;

pub use classify::{
    classify, compute_cutoff, mean_group_size, Classification, DEFAULT_PERCENTAGE_MEAN_CUTOFF,
};
pub use entities::*;
pub use error::DomainError;
pub use grouping::{group_by_definition, Group, GroupMapping, Member};
pub use summary::{summarise, ClassLabel};
pub use traversal::find_instances;
