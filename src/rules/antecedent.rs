//! Antecedent conditions over named agent variables

use crate::agent::Agent;
use crate::core::error::{Result, VolitionError};
use crate::core::types::Value;
use serde::{Deserialize, Serialize};

/// Comparison operator in a single antecedent condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AntecedentOperator {
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
}

impl AntecedentOperator {
    /// Parse a configuration token. Unknown tokens are load-time failures.
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            ">=" => Ok(Self::GreaterOrEqual),
            ">" => Ok(Self::Greater),
            "<=" => Ok(Self::LessOrEqual),
            "<" => Ok(Self::Less),
            "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            _ => Err(VolitionError::UnknownOperator(token.to_string())),
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::GreaterOrEqual => ">=",
            Self::Greater => ">",
            Self::LessOrEqual => "<=",
            Self::Less => "<",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        }
    }

    /// Compare an agent's current value against the configured operand.
    ///
    /// Ordering operators require numeric operands; equality operators
    /// require operands of the same type.
    pub fn evaluate(&self, current: &Value, configured: &Value, variable: &str) -> Result<bool> {
        match self {
            Self::Equal | Self::NotEqual => {
                if current.type_name() != configured.type_name() {
                    return Err(VolitionError::TypeMismatch {
                        variable: variable.to_string(),
                        expected: configured.type_name(),
                        found: current.type_name(),
                    });
                }
                if matches!(self, Self::Equal) {
                    Ok(current == configured)
                } else {
                    Ok(current != configured)
                }
            }
            Self::GreaterOrEqual | Self::Greater | Self::LessOrEqual | Self::Less => {
                let lhs = number_operand(current, variable)?;
                let rhs = number_operand(configured, variable)?;
                Ok(match self {
                    Self::GreaterOrEqual => lhs >= rhs,
                    Self::Greater => lhs > rhs,
                    Self::LessOrEqual => lhs <= rhs,
                    _ => lhs < rhs,
                })
            }
        }
    }
}

fn number_operand(value: &Value, variable: &str) -> Result<f64> {
    value.as_number().ok_or_else(|| VolitionError::TypeMismatch {
        variable: variable.to_string(),
        expected: "number",
        found: value.type_name(),
    })
}

/// A single typed condition over one named agent variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntecedentPart {
    /// Agent variable the condition reads
    pub param: String,
    pub operator: AntecedentOperator,
    /// Configured comparison operand
    pub value: Value,
}

impl AntecedentPart {
    pub fn new(
        param: impl Into<String>,
        operator: AntecedentOperator,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            param: param.into(),
            operator,
            value: value.into(),
        }
    }

    /// Evaluate against the agent's current state. No side effects.
    pub fn is_match<A: Agent>(&self, agent: &A) -> Result<bool> {
        let current = agent.value(&self.param)?;
        self.operator.evaluate(&current, &self.value, &self.param)
    }
}
