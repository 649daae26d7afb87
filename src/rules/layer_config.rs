//! Per-layer policy for decision option learning and mutation

use crate::agent::Agent;
use crate::core::error::{Result, VolitionError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Direction of the relationship between a consequent value and its goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsequentRelationship {
    Positive,
    Negative,
}

/// Immutable per-layer policy consumed by learning and mutation logic.
///
/// Created once at configuration time and never mutated afterwards; matching
/// and application do not read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionOptionLayerConfiguration {
    pub modifiable: bool,
    pub max_number_of_decision_options: u32,
    /// Static low/high bound for generated consequent values
    pub consequent_value_interval: [f64; 2],
    pub consequent_precision_digits_after_decimal_point: u32,
    /// Variable name -> sign token ("+" or "-")
    pub consequent_relationship_sign: HashMap<String, String>,
    /// Agent variable overriding the static low bound when set
    pub min_consequent_reference: Option<String>,
    /// Agent variable overriding the static high bound when set
    pub max_consequent_reference: Option<String>,
}

impl Default for DecisionOptionLayerConfiguration {
    fn default() -> Self {
        Self {
            modifiable: false,
            max_number_of_decision_options: 10,
            consequent_value_interval: [0.0, 0.0],
            consequent_precision_digits_after_decimal_point: 0,
            consequent_relationship_sign: HashMap::new(),
            min_consequent_reference: None,
            max_consequent_reference: None,
        }
    }
}

impl DecisionOptionLayerConfiguration {
    /// Maps a configuration sign token to a relationship direction.
    ///
    /// Anything but "+" or "-" is a fatal configuration error.
    pub fn convert_sign(sign: &str) -> Result<ConsequentRelationship> {
        match sign {
            "+" => Ok(ConsequentRelationship::Positive),
            "-" => Ok(ConsequentRelationship::Negative),
            _ => Err(VolitionError::UnknownRelationshipSign(sign.to_string())),
        }
    }

    /// Lower bound for generated consequent values.
    ///
    /// A configured reference variable is re-read on every call, so the bound
    /// tracks the agent's current state.
    pub fn min_value<A: Agent>(&self, agent: &A) -> Result<f64> {
        self.bound(
            agent,
            self.min_consequent_reference.as_deref(),
            self.consequent_value_interval[0],
        )
    }

    /// Upper bound for generated consequent values.
    pub fn max_value<A: Agent>(&self, agent: &A) -> Result<f64> {
        self.bound(
            agent,
            self.max_consequent_reference.as_deref(),
            self.consequent_value_interval[1],
        )
    }

    fn bound<A: Agent>(&self, agent: &A, reference: Option<&str>, fallback: f64) -> Result<f64> {
        match reference {
            Some(variable) => {
                let value = agent.value(variable)?;
                value.as_number().ok_or_else(|| VolitionError::TypeMismatch {
                    variable: variable.to_string(),
                    expected: "number",
                    found: value.type_name(),
                })
            }
            None => Ok(fallback),
        }
    }

    /// Rounds a generated consequent value to the configured precision.
    pub fn round_consequent(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.consequent_precision_digits_after_decimal_point as i32);
        (value * factor).round() / factor
    }

    /// Checks the policy for internal consistency. Run at load time.
    pub fn validate(&self) -> Result<()> {
        if self.consequent_value_interval[0] > self.consequent_value_interval[1] {
            return Err(VolitionError::InvalidConfiguration(format!(
                "consequentValueInterval low bound {} exceeds high bound {}",
                self.consequent_value_interval[0], self.consequent_value_interval[1]
            )));
        }
        if self.max_number_of_decision_options == 0 {
            return Err(VolitionError::InvalidConfiguration(
                "maxNumberOfDecisionOptions must be at least 1".to_string(),
            ));
        }
        for sign in self.consequent_relationship_sign.values() {
            Self::convert_sign(sign)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::SimAgent;
    use crate::core::types::Value;
    use crate::state::common_pool::CommonPool;
    use std::sync::Arc;

    fn agent() -> SimAgent {
        SimAgent::new("A1", Arc::new(CommonPool::new())).with_variable("cap", 25.0)
    }

    #[test]
    fn test_defaults() {
        let configuration = DecisionOptionLayerConfiguration::default();
        assert!(!configuration.modifiable);
        assert_eq!(configuration.max_number_of_decision_options, 10);
    }

    #[test]
    fn test_convert_sign() {
        assert_eq!(
            DecisionOptionLayerConfiguration::convert_sign("+").unwrap(),
            ConsequentRelationship::Positive
        );
        assert_eq!(
            DecisionOptionLayerConfiguration::convert_sign("-").unwrap(),
            ConsequentRelationship::Negative
        );
        assert!(DecisionOptionLayerConfiguration::convert_sign("±").is_err());
    }

    #[test]
    fn test_static_bounds() {
        let configuration = DecisionOptionLayerConfiguration {
            consequent_value_interval: [2.0, 8.0],
            ..Default::default()
        };
        let agent = agent();

        assert_eq!(configuration.min_value(&agent).unwrap(), 2.0);
        assert_eq!(configuration.max_value(&agent).unwrap(), 8.0);
    }

    #[test]
    fn test_referenced_bound_tracks_agent_state() {
        let configuration = DecisionOptionLayerConfiguration {
            consequent_value_interval: [2.0, 8.0],
            max_consequent_reference: Some("cap".to_string()),
            ..Default::default()
        };
        let mut agent = agent();

        assert_eq!(configuration.max_value(&agent).unwrap(), 25.0);
        // The reference is re-read on every call
        agent.set_value("cap", Value::Number(30.0));
        assert_eq!(configuration.max_value(&agent).unwrap(), 30.0);
        // The other bound still comes from the interval
        assert_eq!(configuration.min_value(&agent).unwrap(), 2.0);
    }

    #[test]
    fn test_non_numeric_reference_is_a_type_error() {
        let configuration = DecisionOptionLayerConfiguration {
            min_consequent_reference: Some("cap".to_string()),
            ..Default::default()
        };
        let mut agent = agent();
        agent.set_value("cap", Value::Text("high".to_string()));

        assert!(configuration.min_value(&agent).is_err());
    }

    #[test]
    fn test_missing_reference_variable_propagates() {
        let configuration = DecisionOptionLayerConfiguration {
            min_consequent_reference: Some("absent".to_string()),
            ..Default::default()
        };
        assert!(configuration.min_value(&agent()).is_err());
    }

    #[test]
    fn test_round_consequent() {
        let configuration = DecisionOptionLayerConfiguration {
            consequent_precision_digits_after_decimal_point: 2,
            ..Default::default()
        };
        assert_eq!(configuration.round_consequent(3.14159), 3.14);
        assert_eq!(configuration.round_consequent(0.125), 0.13);

        let integral = DecisionOptionLayerConfiguration::default();
        assert_eq!(integral.round_consequent(3.7), 4.0);
    }

    #[test]
    fn test_validate_rejects_inverted_interval() {
        let configuration = DecisionOptionLayerConfiguration {
            consequent_value_interval: [5.0, 1.0],
            ..Default::default()
        };
        assert!(configuration.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_ceiling() {
        let configuration = DecisionOptionLayerConfiguration {
            max_number_of_decision_options: 0,
            ..Default::default()
        };
        assert!(configuration.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_sign_token() {
        let mut configuration = DecisionOptionLayerConfiguration::default();
        configuration
            .consequent_relationship_sign
            .insert("yield".to_string(), "~".to_string());
        assert!(configuration.validate().is_err());
    }
}
