//! High-level operations.
//!
//! This module contains the implementation of Stevedore commands.

pub mod project;
pub mod stevedore_check;
pub mod stevedore_plan;

pub use project::Project;
pub use stevedore_check::{check, CheckReport};
pub use stevedore_plan::{plan, PlanOptions};
