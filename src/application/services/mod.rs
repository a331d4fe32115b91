//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (TreeSource, Annotator)
//! but are themselves concrete structs, not traits.

mod analysis;

pub use analysis::{Analysis, RunOutcome, TypeAnalysisService};
