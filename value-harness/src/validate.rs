//! Static checks on feature files
//!
//! Reports steps that no definition matches without running anything, and
//! flags scenarios that can never fail.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::feature::{Feature, Step, StepKeyword};
use crate::steps::StepRegistry;

/// A validation error or warning.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub path: PathBuf,
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.message)
    }
}

/// Result of validating one or more feature files.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, path: &Path, line: usize, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, path: &Path, line: usize, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        });
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

fn has_then(steps: &[Step]) -> bool {
    let mut current = None;
    for step in steps {
        if !step.keyword.is_conjunction() {
            current = Some(step.keyword);
        }
        if current == Some(StepKeyword::Then) {
            return true;
        }
    }
    false
}

/// Validate one parsed feature against the registry.
///
/// Outlines are checked after placeholder substitution, so a step is only
/// reported once even when several example rows fail to match.
pub fn validate_feature(feature: &Feature, registry: &StepRegistry) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut reported = BTreeSet::new();

    if feature.scenarios.is_empty() {
        result.add_warning(&feature.path, 1, "feature has no scenarios");
    }

    for scenario in &feature.scenarios {
        if scenario.steps.is_empty() {
            result.add_warning(
                &feature.path,
                scenario.line,
                format!("scenario '{}' has no steps", scenario.name),
            );
        } else if !has_then(&scenario.steps) {
            result.add_warning(
                &feature.path,
                scenario.line,
                format!("scenario '{}' has no Then step", scenario.name),
            );
        }

        for concrete in scenario.expand(feature.background.as_ref()) {
            for step in &concrete.steps {
                if registry.find(&step.text).is_none() && reported.insert(step.line) {
                    result.add_error(
                        &feature.path,
                        step.line,
                        format!("undefined step: {}", step),
                    );
                }
            }
        }
    }

    result
}
