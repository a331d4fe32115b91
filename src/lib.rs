//! Block type analysis
//!
//! Finds repeated block instances in a scene graph, groups them by their
//! definition and classifies each group as typical or special depending on how
//! its occurrence count compares with a percentage of the mean.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
