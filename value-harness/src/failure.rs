//! Failure categorization for scenario runs
//!
//! Categorizes failures to separate broken feature files from broken behavior:
//! - Parse: the feature file could not be read or parsed
//! - Undefined: a step has no matching definition
//! - Argument: a step matched but its argument or table was unusable
//! - Assertion: the processor did not behave as the scenario expects

use std::fmt;

use serde::Serialize;

use crate::feature::Step;
use crate::steps::StepError;

/// Category of failure for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureCategory {
    Parse,
    Undefined,
    Argument,
    Assertion,
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCategory::Parse => write!(f, "Parse"),
            FailureCategory::Undefined => write!(f, "Undefined"),
            FailureCategory::Argument => write!(f, "Argument"),
            FailureCategory::Assertion => write!(f, "Assertion"),
        }
    }
}

/// A failure with category and details
#[derive(Debug, Clone, Serialize)]
pub struct CategorizedFailure {
    pub category: FailureCategory,
    /// Short description of what failed
    pub message: String,
    pub details: Option<String>,
}

impl CategorizedFailure {
    pub fn new(category: FailureCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Feature file could not be loaded
    pub fn parse_failed(path: impl fmt::Display, details: impl Into<String>) -> Self {
        Self::new(
            FailureCategory::Parse,
            format!("Could not load feature file: {}", path),
        )
        .with_details(details)
    }

    /// Map a failed step to its category, naming the step and its line
    pub fn from_step(step: &Step, error: &StepError) -> Self {
        let category = match error {
            StepError::Undefined(_) => FailureCategory::Undefined,
            StepError::BadArgument(_) => FailureCategory::Argument,
            StepError::Assertion(_) => FailureCategory::Assertion,
        };
        Self::new(category, format!("line {}: {}", step.line, step)).with_details(error.to_string())
    }
}

impl fmt::Display for CategorizedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " - {}", details)?;
        }
        Ok(())
    }
}
