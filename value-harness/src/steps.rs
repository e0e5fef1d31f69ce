//! Step definitions
//!
//! Each definition is a regex matched against the full step text, regardless
//! of keyword. Handlers act on a [`World`] that lives for one scenario.

use regex::Regex;
use thiserror::Error;
use value_processor::{ProcessorError, ValueProcessor};

use crate::feature::{DataTable, Step};

/// Why a step did not pass
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("no step definition matches '{0}'")]
    Undefined(String),

    #[error("bad step argument: {0}")]
    BadArgument(String),

    #[error("{0}")]
    Assertion(String),
}

/// Per-scenario state shared between steps
#[derive(Debug, Default)]
pub struct World {
    pub processor: ValueProcessor,
    /// Outcome of the most recent `process` call
    pub outcome: Option<Result<Vec<i64>, ProcessorError>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    fn error(&self, expected: &str) -> Result<&ProcessorError, StepError> {
        match &self.outcome {
            None => Err(StepError::Assertion(format!(
                "expected {}, but the input was never processed",
                expected
            ))),
            Some(Ok(output)) => Err(StepError::Assertion(format!(
                "expected {}, got output {:?}",
                expected, output
            ))),
            Some(Err(err)) => Ok(err),
        }
    }
}

type StepFn = fn(&mut World, &[String], Option<&DataTable>) -> Result<(), StepError>;

/// A compiled step pattern and its handler
pub struct StepDefinition {
    pattern: Regex,
    handler: StepFn,
}

impl StepDefinition {
    fn new(pattern: &str, handler: StepFn) -> Self {
        Self {
            pattern: Regex::new(&format!("^{}$", pattern)).expect("step pattern is a valid regex"),
            handler,
        }
    }

    fn captures(&self, text: &str) -> Option<Vec<String>> {
        self.pattern.captures(text).map(|caps| {
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect()
        })
    }
}

/// The set of known step definitions
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl StepRegistry {
    /// Steps for driving a [`ValueProcessor`]
    pub fn standard() -> Self {
        Self {
            definitions: vec![
                StepDefinition::new(r"I have a value processor", given_processor),
                StepDefinition::new(r"I set the input to (-?\d+)", set_input),
                StepDefinition::new(r"I process the input", process_input),
                StepDefinition::new(r"a precondition error should be raised", expect_precondition),
                StepDefinition::new(
                    r"an invalid argument error should be raised",
                    expect_invalid_argument,
                ),
                StepDefinition::new(r#"the message should contain "(.*)""#, expect_message),
                StepDefinition::new(r"the output should contain:", expect_output),
            ],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.definitions.len()
    }

    /// First definition matching the step text, with its captured arguments
    pub fn find(&self, text: &str) -> Option<(&StepDefinition, Vec<String>)> {
        self.definitions
            .iter()
            .find_map(|def| def.captures(text).map(|args| (def, args)))
    }

    /// Execute one step against the world
    pub fn run_step(&self, world: &mut World, step: &Step) -> Result<(), StepError> {
        let (definition, args) = self
            .find(&step.text)
            .ok_or_else(|| StepError::Undefined(step.text.clone()))?;
        (definition.handler)(world, &args, step.table.as_ref())
    }
}

fn given_processor(world: &mut World, _: &[String], _: Option<&DataTable>) -> Result<(), StepError> {
    *world = World::new();
    Ok(())
}

fn set_input(world: &mut World, args: &[String], _: Option<&DataTable>) -> Result<(), StepError> {
    let value = parse_int(&args[0])?;
    world.processor.set_input(value);
    Ok(())
}

fn process_input(world: &mut World, _: &[String], _: Option<&DataTable>) -> Result<(), StepError> {
    world.outcome = Some(world.processor.process());
    Ok(())
}

fn expect_precondition(
    world: &mut World,
    _: &[String],
    _: Option<&DataTable>,
) -> Result<(), StepError> {
    match world.error("a precondition error")? {
        ProcessorError::Precondition => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected a precondition error, got {} error: {}",
            other.kind(),
            other
        ))),
    }
}

fn expect_invalid_argument(
    world: &mut World,
    _: &[String],
    _: Option<&DataTable>,
) -> Result<(), StepError> {
    match world.error("an invalid argument error")? {
        ProcessorError::InvalidArgument(_) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected an invalid argument error, got {} error: {}",
            other.kind(),
            other
        ))),
    }
}

fn expect_message(world: &mut World, args: &[String], _: Option<&DataTable>) -> Result<(), StepError> {
    let needle = &args[0];
    let err = world.error("an error")?;
    let message = err.to_string();
    if message.contains(needle.as_str()) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected message to contain {:?}, got {:?}",
            needle, message
        )))
    }
}

/// Compare the output against a `| coefficient | value |` table.
///
/// Rows are flattened to `[coeff1, value1, coeff2, value2, ...]` before
/// comparison.
fn expect_output(
    world: &mut World,
    _: &[String],
    table: Option<&DataTable>,
) -> Result<(), StepError> {
    let table = table.ok_or_else(|| StepError::BadArgument("step requires a data table".into()))?;

    let mut expected = Vec::with_capacity(table.body().len() * 2);
    for row in table.body() {
        let [coefficient, value, ..] = row.as_slice() else {
            return Err(StepError::BadArgument(format!(
                "table row {:?} needs a coefficient and a value column",
                row
            )));
        };
        expected.push(parse_int(coefficient)?);
        expected.push(parse_int(value)?);
    }

    let actual = match &world.outcome {
        None => {
            return Err(StepError::Assertion(
                "expected output, but the input was never processed".into(),
            ))
        }
        Some(Err(err)) => {
            return Err(StepError::Assertion(format!(
                "expected output, got {} error: {}",
                err.kind(),
                err
            )))
        }
        Some(Ok(actual)) => actual,
    };

    if actual.len() != expected.len() {
        return Err(StepError::Assertion(format!(
            "Expected length {}, got {}",
            expected.len(),
            actual.len()
        )));
    }

    for (i, (want, got)) in expected.chunks(2).zip(actual.chunks(2)).enumerate() {
        if want != got {
            return Err(StepError::Assertion(format!(
                "pair {}: expected {:?}, got {:?} (expected {:?}, got {:?})",
                i + 1,
                want,
                got,
                expected,
                actual
            )));
        }
    }

    Ok(())
}

fn parse_int(raw: &str) -> Result<i64, StepError> {
    raw.trim()
        .parse()
        .map_err(|_| StepError::BadArgument(format!("'{}' is not an integer", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::StepKeyword;

    fn step(text: &str) -> Step {
        Step {
            keyword: StepKeyword::When,
            text: text.to_string(),
            line: 1,
            table: None,
        }
    }

    fn output_step(rows: &[[&str; 2]]) -> Step {
        let mut table = vec![vec!["coefficient".to_string(), "value".to_string()]];
        table.extend(rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()));
        Step {
            keyword: StepKeyword::Then,
            text: "the output should contain:".to_string(),
            line: 1,
            table: Some(DataTable { rows: table }),
        }
    }

    const FIXED: [[&str; 2]; 4] = [["1", "0"], ["5", "0"], ["10", "0"], ["25", "0"]];

    fn run(world: &mut World, texts: &[&str]) -> Result<(), StepError> {
        let registry = StepRegistry::standard();
        texts
            .iter()
            .try_for_each(|t| registry.run_step(world, &step(t)))
    }

    #[test]
    fn test_find_captures_arguments() {
        let registry = StepRegistry::standard();
        let (_, args) = registry.find("I set the input to -42").unwrap();
        assert_eq!(args, vec!["-42".to_string()]);

        let (_, args) = registry.find(r#"the message should contain "not valid""#).unwrap();
        assert_eq!(args, vec!["not valid".to_string()]);

        assert!(registry.find("I set the input to ten").is_none());
        assert!(registry.find("I have a value processor twice").is_none());
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_undefined_step() {
        let mut world = World::new();
        let err = run(&mut world, &["I dance"]).unwrap_err();
        assert_eq!(err, StepError::Undefined("I dance".to_string()));
    }

    #[test]
    fn test_set_input_overflow_is_bad_argument() {
        let mut world = World::new();
        let err = run(&mut world, &["I set the input to 99999999999999999999"]).unwrap_err();
        assert!(matches!(err, StepError::BadArgument(_)));
    }

    #[test]
    fn test_successful_output() {
        let registry = StepRegistry::standard();
        let mut world = World::new();
        run(
            &mut world,
            &["I have a value processor", "I set the input to 0", "I process the input"],
        )
        .unwrap();
        registry.run_step(&mut world, &output_step(&FIXED)).unwrap();
    }

    #[test]
    fn test_output_mismatch() {
        let registry = StepRegistry::standard();
        let mut world = World::new();
        run(&mut world, &["I set the input to 1", "I process the input"]).unwrap();

        let err = registry
            .run_step(&mut world, &output_step(&[["1", "0"], ["5", "1"], ["10", "0"], ["25", "0"]]))
            .unwrap_err();
        assert!(matches!(err, StepError::Assertion(ref m) if m.starts_with("pair 2")));

        let err = registry
            .run_step(&mut world, &output_step(&[["1", "0"]]))
            .unwrap_err();
        assert_eq!(
            err,
            StepError::Assertion("Expected length 2, got 8".to_string())
        );
    }

    #[test]
    fn test_output_requires_table() {
        let mut world = World::new();
        let err = run(&mut world, &["the output should contain:"]).unwrap_err();
        assert!(matches!(err, StepError::BadArgument(_)));
    }

    #[test]
    fn test_output_rejects_non_integer_cells() {
        let registry = StepRegistry::standard();
        let mut world = World::new();
        run(&mut world, &["I set the input to 1", "I process the input"]).unwrap();
        let err = registry
            .run_step(&mut world, &output_step(&[["one", "0"]]))
            .unwrap_err();
        assert!(matches!(err, StepError::BadArgument(_)));
    }

    #[test]
    fn test_output_after_error() {
        let registry = StepRegistry::standard();
        let mut world = World::new();
        run(&mut world, &["I set the input to -1", "I process the input"]).unwrap();
        let err = registry.run_step(&mut world, &output_step(&FIXED)).unwrap_err();
        assert!(matches!(err, StepError::Assertion(ref m) if m.contains("invalid argument")));
    }

    #[test]
    fn test_precondition_error_steps() {
        let mut world = World::new();
        run(
            &mut world,
            &[
                "I have a value processor",
                "I process the input",
                "a precondition error should be raised",
                r#"the message should contain "must be called before""#,
            ],
        )
        .unwrap();

        let err = run(&mut world, &["an invalid argument error should be raised"]).unwrap_err();
        assert!(matches!(err, StepError::Assertion(_)));
    }

    #[test]
    fn test_invalid_argument_steps() {
        let mut world = World::new();
        run(
            &mut world,
            &[
                "I set the input to 5",
                "I set the input to -1",
                "I process the input",
                "an invalid argument error should be raised",
                r#"the message should contain "not valid""#,
            ],
        )
        .unwrap();

        let err = run(&mut world, &[r#"the message should contain "nope""#]).unwrap_err();
        assert!(matches!(err, StepError::Assertion(_)));
    }

    #[test]
    fn test_error_expected_but_never_processed() {
        let mut world = World::new();
        let err = run(&mut world, &["a precondition error should be raised"]).unwrap_err();
        assert!(matches!(err, StepError::Assertion(ref m) if m.contains("never processed")));
    }

    #[test]
    fn test_error_expected_but_output_returned() {
        let mut world = World::new();
        let err = run(
            &mut world,
            &[
                "I set the input to 3",
                "I process the input",
                "an invalid argument error should be raised",
            ],
        )
        .unwrap_err();
        assert!(matches!(err, StepError::Assertion(ref m) if m.contains("got output")));
    }

    #[test]
    fn test_given_resets_world() {
        let mut world = World::new();
        run(&mut world, &["I set the input to 3", "I process the input"]).unwrap();
        assert!(world.outcome.is_some());
        run(&mut world, &["I have a value processor"]).unwrap();
        assert!(world.outcome.is_none());
    }
}
