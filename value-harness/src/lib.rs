//! value-harness library
//!
//! Feature-file driven BDD harness for the value processor.

pub mod commands;
pub mod config;
pub mod failure;
pub mod feature;
pub mod runner;
pub mod steps;
pub mod validate;

pub use config::HarnessConfig;
pub use failure::{CategorizedFailure, FailureCategory};
pub use runner::{RunOptions, RunSummary, ScenarioOutcome};
pub use steps::{StepError, StepRegistry, World};
pub use validate::{ValidationIssue, ValidationResult};
