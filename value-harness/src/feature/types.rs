//! Feature file types

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^<>]+)>").expect("placeholder pattern is a valid regex"));

/// A parsed feature file
#[derive(Debug, Clone)]
pub struct Feature {
    /// Text after `Feature:`
    pub name: String,
    /// Free text between the header and the first block
    pub description: String,
    /// File the feature was parsed from
    pub path: PathBuf,
    /// Steps prepended to every scenario
    pub background: Option<Background>,
    pub scenarios: Vec<Scenario>,
}

impl Feature {
    /// Expand every scenario, with background steps prepended
    pub fn concrete_scenarios(&self) -> Vec<ConcreteScenario> {
        self.scenarios
            .iter()
            .flat_map(|s| s.expand(self.background.as_ref()))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Background {
    pub line: usize,
    pub steps: Vec<Step>,
}

/// A `Scenario` or `Scenario Outline` block
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub line: usize,
    pub steps: Vec<Step>,
    /// Present only for outlines
    pub examples: Option<Examples>,
}

/// Examples table of a scenario outline
#[derive(Debug, Clone)]
pub struct Examples {
    pub line: usize,
    pub table: DataTable,
}

impl Scenario {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
            steps: Vec::new(),
            examples: None,
        }
    }

    pub fn is_outline(&self) -> bool {
        self.examples.is_some()
    }

    /// Expand into runnable scenarios.
    ///
    /// A plain scenario yields one entry. An outline yields one entry per
    /// example row, with `<column>` placeholders substituted in step text
    /// and table cells.
    pub fn expand(&self, background: Option<&Background>) -> Vec<ConcreteScenario> {
        let prefix: Vec<Step> = background.map(|b| b.steps.clone()).unwrap_or_default();

        let Some(examples) = &self.examples else {
            return vec![ConcreteScenario {
                name: self.name.clone(),
                line: self.line,
                steps: prefix.into_iter().chain(self.steps.iter().cloned()).collect(),
            }];
        };

        let header = examples.table.header();
        examples
            .table
            .body()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let bindings: Vec<(&str, &str)> = header
                    .iter()
                    .map(String::as_str)
                    .zip(row.iter().map(String::as_str))
                    .collect();
                let steps = self.steps.iter().map(|s| s.substitute(&bindings));
                ConcreteScenario {
                    name: format!("{} (example {})", self.name, i + 1),
                    line: self.line,
                    steps: prefix.iter().cloned().chain(steps).collect(),
                }
            })
            .collect()
    }
}

/// A scenario ready to execute: background included, placeholders resolved
#[derive(Debug, Clone)]
pub struct ConcreteScenario {
    pub name: String,
    pub line: usize,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKeyword {
    Given,
    When,
    Then,
    And,
    But,
}

impl StepKeyword {
    /// Split `When I do it` into the keyword and the remaining text
    pub fn split(line: &str) -> Option<(StepKeyword, &str)> {
        let (word, rest) = line.split_once(char::is_whitespace)?;
        let keyword = match word {
            "Given" => StepKeyword::Given,
            "When" => StepKeyword::When,
            "Then" => StepKeyword::Then,
            "And" => StepKeyword::And,
            "But" => StepKeyword::But,
            _ => return None,
        };
        let rest = rest.trim();
        (!rest.is_empty()).then_some((keyword, rest))
    }

    /// `And` and `But` continue whatever keyword came before them
    pub fn is_conjunction(self) -> bool {
        matches!(self, StepKeyword::And | StepKeyword::But)
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKeyword::Given => write!(f, "Given"),
            StepKeyword::When => write!(f, "When"),
            StepKeyword::Then => write!(f, "Then"),
            StepKeyword::And => write!(f, "And"),
            StepKeyword::But => write!(f, "But"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Step {
    pub keyword: StepKeyword,
    pub text: String,
    pub line: usize,
    pub table: Option<DataTable>,
}

impl Step {
    fn substitute(&self, bindings: &[(&str, &str)]) -> Step {
        // Single pass: substituted values are never rescanned for placeholders
        let replace = |s: &str| {
            PLACEHOLDER_RE
                .replace_all(s, |caps: &Captures| {
                    bindings
                        .iter()
                        .find(|(name, _)| *name == &caps[1])
                        .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
                })
                .into_owned()
        };
        Step {
            keyword: self.keyword,
            text: replace(self.text.as_str()),
            line: self.line,
            table: self.table.as_ref().map(|t| DataTable {
                rows: t
                    .rows
                    .iter()
                    .map(|row| row.iter().map(|cell| replace(cell.as_str())).collect())
                    .collect(),
            }),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.keyword, self.text)
    }
}

/// `|`-delimited table attached to a step or an Examples block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// First row, or empty if the table has no rows
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// All rows after the header
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn width(&self) -> Option<usize> {
        self.rows.first().map(Vec::len)
    }
}
