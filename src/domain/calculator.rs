//! The `add_numbers` tool executor
//!
//! Coerces loosely typed JSON operands to `f64`, adds them, and records the
//! outcome. Conversion failures are reported in the returned `Calculation`
//! rather than as an `Err`, so callers can surface them as a tool-level error.

use std::fmt;

use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

pub const OPERATION: &str = "addition";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("could not convert string to float: '{0}'")]
    InvalidString(String),
    #[error("unsupported operand type: {0}")]
    UnsupportedType(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Sum {
    Integer(i64),
    Float(f64),
}

impl Sum {
    /// Whole sums become integers; everything else stays a float.
    pub fn normalize(value: f64) -> Self {
        let integral = value.is_finite() && value.fract() == 0.0;
        if integral && (i64::MIN as f64..i64::MAX as f64).contains(&value) {
            Self::Integer(value as i64)
        } else {
            Self::Float(value)
        }
    }
}

impl fmt::Display for Sum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
        }
    }
}

/// An operand as recorded on the calculation: the parsed value on success,
/// the caller's input as given on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    Number(f64),
    Raw(Value),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value:?}"),
            Self::Raw(Value::String(text)) => f.write_str(text),
            Self::Raw(other) => write!(f, "{other}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationOutcome {
    Result(Sum),
    Error(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Calculation {
    pub number1: Operand,
    pub number2: Operand,
    #[serde(flatten)]
    pub outcome: CalculationOutcome,
    pub operation: &'static str,
    pub timestamp: String,
}

impl Calculation {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, CalculationOutcome::Error(_))
    }

    pub fn to_text(&self) -> String {
        let (number1, number2) = (&self.number1, &self.number2);
        match &self.outcome {
            CalculationOutcome::Result(sum) => format!(
                "Addition Result:\n{number1} + {number2} = {sum}\nTimestamp: {}",
                self.timestamp
            ),
            CalculationOutcome::Error(message) => format!(
                "Addition Error:\nNumber 1: {number1}\nNumber 2: {number2}\nError: {message}\nTimestamp: {}",
                self.timestamp
            ),
        }
    }
}

pub fn add_numbers(number1: &Value, number2: &Value) -> Calculation {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let operands = to_number(number1).and_then(|a| Ok((a, to_number(number2)?)));

    match operands {
        Ok((a, b)) => {
            let sum = Sum::normalize(a + b);
            info!(number1 = a, number2 = b, result = %sum, "addition computed");
            Calculation {
                number1: Operand::Number(a),
                number2: Operand::Number(b),
                outcome: CalculationOutcome::Result(sum),
                operation: OPERATION,
                timestamp,
            }
        }
        Err(err) => {
            error!(error = %err, "addition failed");
            Calculation {
                number1: Operand::Raw(number1.clone()),
                number2: Operand::Raw(number2.clone()),
                outcome: CalculationOutcome::Error(format!("Invalid numbers provided: {err}")),
                operation: OPERATION,
                timestamp,
            }
        }
    }
}

pub fn to_number(value: &Value) -> Result<f64, CalculationError> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or(CalculationError::UnsupportedType("number")),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| CalculationError::InvalidString(text.clone())),
        Value::Bool(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
        Value::Null => Err(CalculationError::UnsupportedType("null")),
        Value::Array(_) => Err(CalculationError::UnsupportedType("array")),
        Value::Object(_) => Err(CalculationError::UnsupportedType("object")),
    }
}
