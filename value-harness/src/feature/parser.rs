//! Line-oriented Gherkin parser

use std::mem;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::{Background, DataTable, Examples, Feature, Scenario, Step, StepKeyword};

/// Errors found while parsing a feature file. Lines are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected 'Feature:' header")]
    MissingFeature { line: usize },

    #[error("line {line}: only one 'Feature:' is allowed per file")]
    DuplicateFeature { line: usize },

    #[error("line {line}: 'Background:' must come before any scenario and appear once")]
    MisplacedBackground { line: usize },

    #[error("line {line}: step outside of a scenario or background")]
    StepOutsideScenario { line: usize },

    #[error("line {line}: table row without a preceding step or Examples")]
    OrphanTable { line: usize },

    #[error("line {line}: table row has {found} cells, expected {expected}")]
    RaggedTable {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: Scenario Outline '{name}' has no Examples rows")]
    MissingExamples { line: usize, name: String },

    #[error("line {line}: Examples outside of a Scenario Outline")]
    ExamplesOutsideOutline { line: usize },

    #[error("line {line}: unexpected text '{text}'")]
    Unexpected { line: usize, text: String },
}

/// Parse feature file source. `path` is recorded on the result only.
pub fn parse_feature(source: &str, path: &Path) -> Result<Feature, ParseError> {
    let mut parser = Parser::new(path);
    for (idx, raw) in source.lines().enumerate() {
        parser.line(idx + 1, raw.trim())?;
    }
    parser.finish()
}

enum Block {
    None,
    Background(Background),
    Scenario { scenario: Scenario, outline: bool },
}

struct Parser {
    path: PathBuf,
    name: Option<String>,
    description: Vec<String>,
    background: Option<Background>,
    scenarios: Vec<Scenario>,
    current: Block,
    in_examples: bool,
}

/// `Scenario: name` -> `Some("name")` for keyword `Scenario`
fn strip_keyword<'a>(text: &'a str, keywords: &[&str]) -> Option<&'a str> {
    keywords.iter().find_map(|kw| {
        text.strip_prefix(kw)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(str::trim)
    })
}

fn split_cells(line: usize, text: &str) -> Result<Vec<String>, ParseError> {
    let inner = text
        .strip_prefix('|')
        .and_then(|t| t.strip_suffix('|'))
        .ok_or_else(|| ParseError::Unexpected {
            line,
            text: text.to_string(),
        })?;
    Ok(inner.split('|').map(|c| c.trim().to_string()).collect())
}

fn push_row(table: &mut DataTable, line: usize, cells: Vec<String>) -> Result<(), ParseError> {
    if let Some(expected) = table.width() {
        if cells.len() != expected {
            return Err(ParseError::RaggedTable {
                line,
                expected,
                found: cells.len(),
            });
        }
    }
    table.rows.push(cells);
    Ok(())
}

impl Parser {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            name: None,
            description: Vec::new(),
            background: None,
            scenarios: Vec::new(),
            current: Block::None,
            in_examples: false,
        }
    }

    fn line(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        if text.is_empty() || text.starts_with('#') || text.starts_with('@') {
            return Ok(());
        }

        if let Some(name) = strip_keyword(text, &["Feature"]) {
            if self.name.is_some() {
                return Err(ParseError::DuplicateFeature { line });
            }
            self.name = Some(name.to_string());
            return Ok(());
        }
        if self.name.is_none() {
            return Err(ParseError::MissingFeature { line });
        }

        if strip_keyword(text, &["Background"]).is_some() {
            if self.background.is_some()
                || !self.scenarios.is_empty()
                || !matches!(self.current, Block::None)
            {
                return Err(ParseError::MisplacedBackground { line });
            }
            self.current = Block::Background(Background {
                line,
                steps: Vec::new(),
            });
            return Ok(());
        }

        if strip_keyword(text, &["Examples", "Scenarios"]).is_some() {
            return match &mut self.current {
                Block::Scenario {
                    scenario,
                    outline: true,
                } if scenario.examples.is_none() => {
                    scenario.examples = Some(Examples {
                        line,
                        table: DataTable::default(),
                    });
                    self.in_examples = true;
                    Ok(())
                }
                _ => Err(ParseError::ExamplesOutsideOutline { line }),
            };
        }

        if let Some(name) = strip_keyword(text, &["Scenario Outline", "Scenario Template"]) {
            self.open_scenario(Scenario::new(name, line), true)?;
            return Ok(());
        }
        if let Some(name) = strip_keyword(text, &["Scenario", "Example"]) {
            self.open_scenario(Scenario::new(name, line), false)?;
            return Ok(());
        }

        if text.starts_with('|') {
            return self.table_row(line, text);
        }

        if let Some((keyword, rest)) = StepKeyword::split(text) {
            let step = Step {
                keyword,
                text: rest.to_string(),
                line,
                table: None,
            };
            if self.in_examples {
                return Err(ParseError::Unexpected {
                    line,
                    text: text.to_string(),
                });
            }
            return match &mut self.current {
                Block::None => Err(ParseError::StepOutsideScenario { line }),
                Block::Background(background) => {
                    background.steps.push(step);
                    Ok(())
                }
                Block::Scenario { scenario, .. } => {
                    scenario.steps.push(step);
                    Ok(())
                }
            };
        }

        // Free text: feature description, or a block description before its first step
        match &self.current {
            Block::None if self.scenarios.is_empty() && self.background.is_none() => {
                self.description.push(text.to_string());
                Ok(())
            }
            Block::Background(b) if b.steps.is_empty() => Ok(()),
            Block::Scenario { scenario, .. } if scenario.steps.is_empty() => Ok(()),
            _ => Err(ParseError::Unexpected {
                line,
                text: text.to_string(),
            }),
        }
    }

    fn table_row(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        let cells = split_cells(line, text)?;
        let in_examples = self.in_examples;

        let table = match &mut self.current {
            Block::Scenario { scenario, .. } if in_examples => {
                scenario.examples.as_mut().map(|e| &mut e.table)
            }
            Block::Scenario { scenario, .. } => scenario
                .steps
                .last_mut()
                .map(|s| s.table.get_or_insert_with(DataTable::default)),
            Block::Background(background) => background
                .steps
                .last_mut()
                .map(|s| s.table.get_or_insert_with(DataTable::default)),
            Block::None => None,
        };

        match table {
            Some(table) => push_row(table, line, cells),
            None => Err(ParseError::OrphanTable { line }),
        }
    }

    fn open_scenario(&mut self, scenario: Scenario, outline: bool) -> Result<(), ParseError> {
        self.close_block()?;
        self.current = Block::Scenario { scenario, outline };
        Ok(())
    }

    fn close_block(&mut self) -> Result<(), ParseError> {
        self.in_examples = false;
        match mem::replace(&mut self.current, Block::None) {
            Block::None => {}
            Block::Background(background) => self.background = Some(background),
            Block::Scenario { scenario, outline } => {
                let has_rows = scenario
                    .examples
                    .as_ref()
                    .is_some_and(|e| !e.table.body().is_empty());
                if outline && !has_rows {
                    return Err(ParseError::MissingExamples {
                        line: scenario.line,
                        name: scenario.name,
                    });
                }
                self.scenarios.push(scenario);
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Feature, ParseError> {
        self.close_block()?;
        let name = self.name.ok_or(ParseError::MissingFeature { line: 1 })?;
        Ok(Feature {
            name,
            description: self.description.join("\n"),
            path: self.path,
            background: self.background,
            scenarios: self.scenarios,
        })
    }
}
