//! Scenario execution
//!
//! Runs concrete scenarios step by step against a fresh [`World`] each, and
//! collects outcomes into a serializable [`RunSummary`].

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::failure::CategorizedFailure;
use crate::feature::{ConcreteScenario, Feature};
use crate::steps::{StepRegistry, World};

/// Options controlling which scenarios run and when to stop
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after the first failing scenario
    pub fail_fast: bool,
    /// Only run scenarios whose name contains this substring
    pub name_filter: Option<String>,
}

impl RunOptions {
    fn selects(&self, scenario: &ConcreteScenario) -> bool {
        self.name_filter
            .as_deref()
            .map_or(true, |filter| scenario.name.contains(filter))
    }
}

/// Result of running one concrete scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub feature: String,
    pub path: PathBuf,
    pub name: String,
    pub line: usize,
    pub passed: bool,
    /// First failing step, if any
    pub failure: Option<CategorizedFailure>,
    pub steps_run: usize,
    /// Steps after the failing one, which were not executed
    pub steps_skipped: usize,
}

/// Outcomes of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<ScenarioOutcome>,
    /// Feature files that could not be loaded
    pub load_failures: Vec<CategorizedFailure>,
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            outcomes: Vec::new(),
            load_failures: Vec::new(),
        }
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// True when nothing failed, including feature loading
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.load_failures.is_empty()
    }

    pub fn record_load_failure(&mut self, failure: CategorizedFailure) {
        warn!(%failure, "feature failed to load");
        self.load_failures.push(failure);
    }
}

/// Run a single concrete scenario from start to its first failing step
pub fn run_scenario(
    feature: &Feature,
    scenario: &ConcreteScenario,
    registry: &StepRegistry,
) -> ScenarioOutcome {
    let mut world = World::new();
    let mut steps_run = 0;
    let mut failure = None;

    for step in &scenario.steps {
        steps_run += 1;
        debug!(line = step.line, step = %step, "running step");
        if let Err(err) = registry.run_step(&mut world, step) {
            failure = Some(CategorizedFailure::from_step(step, &err));
            break;
        }
    }

    let outcome = ScenarioOutcome {
        feature: feature.name.clone(),
        path: feature.path.clone(),
        name: scenario.name.clone(),
        line: scenario.line,
        passed: failure.is_none(),
        failure,
        steps_run,
        steps_skipped: scenario.steps.len() - steps_run,
    };

    match &outcome.failure {
        None => info!(scenario = %outcome.name, steps = steps_run, "scenario passed"),
        Some(failure) => warn!(scenario = %outcome.name, %failure, "scenario failed"),
    }
    outcome
}

/// Run every selected scenario of the given features into `summary`
pub fn run_features_into(
    summary: &mut RunSummary,
    features: &[Feature],
    registry: &StepRegistry,
    options: &RunOptions,
) {
    for feature in features {
        info!(feature = %feature.name, path = %feature.path.display(), "running feature");
        for scenario in feature
            .concrete_scenarios()
            .iter()
            .filter(|s| options.selects(s))
        {
            let outcome = run_scenario(feature, scenario, registry);
            let failed = !outcome.passed;
            summary.outcomes.push(outcome);
            if failed && options.fail_fast {
                info!("stopping after first failure");
                return;
            }
        }
    }
}

/// Run every selected scenario of the given features
pub fn run_features(
    features: &[Feature],
    registry: &StepRegistry,
    options: &RunOptions,
) -> RunSummary {
    let mut summary = RunSummary::new();
    run_features_into(&mut summary, features, registry, options);
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureCategory;
    use crate::feature::parse_feature;
    use std::path::Path;

    const SOURCE: &str = r#"Feature: Runner
  Background:
    Given I have a value processor

  Scenario: passes
    When I set the input to 4
    And I process the input
    Then the output should contain:
      | coefficient | value |
      | 1           | 0     |
      | 5           | 0     |
      | 10          | 0     |
      | 25          | 0     |

  Scenario: fails early
    When I process the input
    Then an invalid argument error should be raised
    And the message should contain "not valid"

  Scenario: undefined
    When I juggle the input
"#;

    fn feature() -> Feature {
        parse_feature(SOURCE, Path::new("runner.feature")).unwrap()
    }

    #[test]
    fn test_run_features_collects_outcomes() {
        let summary = run_features(&[feature()], &StepRegistry::standard(), &RunOptions::default());

        assert_eq!(summary.outcomes.len(), 3);
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.failed(), 2);
        assert!(!summary.is_success());

        let passed = &summary.outcomes[0];
        assert!(passed.passed);
        assert_eq!(passed.steps_run, 4);
        assert_eq!(passed.steps_skipped, 0);

        let failed = &summary.outcomes[1];
        assert_eq!(failed.steps_run, 3);
        assert_eq!(failed.steps_skipped, 1);
        let failure = failed.failure.as_ref().unwrap();
        assert_eq!(failure.category, FailureCategory::Assertion);

        let undefined = summary.outcomes[2].failure.as_ref().unwrap();
        assert_eq!(undefined.category, FailureCategory::Undefined);
    }

    #[test]
    fn test_fail_fast_stops_after_first_failure() {
        let options = RunOptions {
            fail_fast: true,
            ..Default::default()
        };
        let summary = run_features(&[feature()], &StepRegistry::standard(), &options);
        assert_eq!(summary.outcomes.len(), 2);
    }

    #[test]
    fn test_name_filter() {
        let options = RunOptions {
            name_filter: Some("pass".to_string()),
            ..Default::default()
        };
        let summary = run_features(&[feature()], &StepRegistry::standard(), &options);
        assert_eq!(summary.outcomes.len(), 1);
        assert!(summary.is_success());
    }

    #[test]
    fn test_load_failure_fails_run() {
        let mut summary = RunSummary::new();
        assert!(summary.is_success());
        summary.record_load_failure(CategorizedFailure::parse_failed("x.feature", "boom"));
        assert!(!summary.is_success());
    }

    #[test]
    fn test_summary_serializes() {
        let summary = run_features(&[feature()], &StepRegistry::standard(), &RunOptions::default());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["outcomes"].as_array().unwrap().len(), 3);
        assert_eq!(json["outcomes"][2]["failure"]["category"], "Undefined");
        assert!(json["started_at"].is_string());
    }
}
