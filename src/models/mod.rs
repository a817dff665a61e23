//! Core data types shared across modules.

pub mod plan;

pub use plan::{Issue, ReviewPlan};
