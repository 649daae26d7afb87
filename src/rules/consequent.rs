//! Consequent effect descriptors

use crate::core::types::Value;
use serde::{Deserialize, Serialize};

/// Typed effect descriptor: target variable, value source and propagation flags.
///
/// When `variable_value` names an agent variable, that variable's current
/// value at apply time takes precedence over the literal `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consequent {
    /// Target agent variable
    pub param: String,
    /// Literal value, written when no source variable is configured
    pub value: Value,
    /// Optional source variable overriding the literal
    #[serde(default)]
    pub variable_value: Option<String>,
    /// Store the target's pre-apply value under `Previous_<param>`
    #[serde(default)]
    pub save_previous: bool,
    /// Mirror writes into the common pool under agent-scoped keys
    #[serde(default)]
    pub copy_to_common: bool,
}

impl Consequent {
    pub fn new(param: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            param: param.into(),
            value: value.into(),
            variable_value: None,
            save_previous: false,
            copy_to_common: false,
        }
    }

    pub fn with_variable_value(mut self, variable: impl Into<String>) -> Self {
        self.variable_value = Some(variable.into());
        self
    }

    pub fn with_save_previous(mut self) -> Self {
        self.save_previous = true;
        self
    }

    pub fn with_copy_to_common(mut self) -> Self {
        self.copy_to_common = true;
        self
    }
}
