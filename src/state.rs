use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::CalcError;
use crate::eval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Input,
    Result,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // continue_with_result keeps a finished result as the left operand
    Append {
        token: String,
        continue_with_result: bool,
    },
    Backspace,
    Clear,
    Evaluate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatorState {
    buffer: String,
    // newest first, "<expression> = <result>"
    history: VecDeque<String>,
    mode: Mode,
    error: String,
}

impl Default for CalculatorState {
    fn default() -> Self {
        CalculatorState {
            buffer: "0".to_string(),
            history: VecDeque::new(),
            mode: Mode::Result,
            error: String::new(),
        }
    }
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn history(&self) -> &VecDeque<String> {
        &self.history
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn display(&self) -> &str {
        if self.error.is_empty() {
            &self.buffer
        } else {
            &self.error
        }
    }

    pub fn apply(self, command: Command) -> Self {
        trace!(?command, "applying command");
        match command {
            Command::Append {
                token,
                continue_with_result,
            } => self.append(&token, continue_with_result),
            Command::Backspace => self.backspace(),
            Command::Clear => self.clear(),
            Command::Evaluate => self.evaluate(),
        }
    }

    // No validation; a malformed buffer only shows up when it is evaluated.
    pub fn append(self, token: &str, continue_with_result: bool) -> Self {
        let buffer = match self.mode {
            Mode::Result if !continue_with_result => token.to_string(),
            _ => self.buffer + token,
        };
        CalculatorState {
            buffer,
            mode: Mode::Input,
            error: String::new(),
            ..self
        }
    }

    // One grapheme, which may span several code points.
    pub fn backspace(self) -> Self {
        let mut buffer = self.buffer;
        if let Some((idx, _)) = buffer.grapheme_indices(true).next_back() {
            buffer.truncate(idx);
        }
        CalculatorState { buffer, ..self }
    }

    pub fn clear(self) -> Self {
        CalculatorState {
            buffer: String::new(),
            ..self
        }
    }

    pub fn evaluate(self) -> Self {
        match eval::evaluate(&self.buffer).and_then(CalcError::check_finite) {
            Ok(value) => {
                let formatted = format_result(value);
                debug!(expression = %self.buffer, result = %formatted, "evaluated");
                let mut history = self.history;
                history.push_front(format!("{} = {}", self.buffer, formatted));
                CalculatorState {
                    buffer: formatted,
                    history,
                    mode: Mode::Result,
                    error: String::new(),
                }
            }
            Err(err) => {
                debug!(expression = %self.buffer, error = %err, "evaluation failed");
                CalculatorState {
                    buffer: String::new(),
                    history: self.history,
                    mode: Mode::Result,
                    error: err.to_string(),
                }
            }
        }
    }
}

/// Integral values print without a decimal point, everything else in the
/// shortest form that round-trips. Never uses exponent notation, so a result
/// can be typed back in as an operand.
pub fn format_result(value: f64) -> String {
    // -0 would otherwise print as "-0"
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}
