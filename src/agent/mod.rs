//! Agent boundary: named variable state, activation freshness, common pool access

use crate::core::error::{Result, VolitionError};
use crate::core::types::Value;
use crate::state::common_pool::CommonPool;
use ahash::AHashMap;
use std::sync::Arc;

/// Capabilities the decision core requires from an agent.
///
/// Variables are read and written by name. A missing variable is an error,
/// not a default: it means configuration and the agent's variable schema
/// have drifted apart.
pub trait Agent {
    /// Stable identifier, used to namespace common pool keys
    fn id(&self) -> &str;

    /// Current value of a named variable
    fn value(&self, variable: &str) -> Result<Value>;

    /// Write a named variable, creating it if absent
    fn set_value(&mut self, variable: &str, value: Value);

    /// Reset the activation freshness counter for a decision option id to 0
    fn reset_activation_freshness(&mut self, option_id: &str);

    /// Write into the simulation-wide common pool under an explicit key
    fn set_to_common(&self, key: String, value: Value);
}

/// Reference agent implementation backed by hash maps.
#[derive(Debug, Clone)]
pub struct SimAgent {
    id: String,
    variables: AHashMap<String, Value>,
    activation_freshness: AHashMap<String, u32>,
    common: Arc<CommonPool>,
}

impl SimAgent {
    pub fn new(id: impl Into<String>, common: Arc<CommonPool>) -> Self {
        Self {
            id: id.into(),
            variables: AHashMap::new(),
            activation_freshness: AHashMap::new(),
            common,
        }
    }

    /// Builder-style variable initialization
    pub fn with_variable(mut self, variable: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(variable.into(), value.into());
        self
    }

    /// Freshness counter for a decision option id, if the option was ever applied
    pub fn activation_freshness(&self, option_id: &str) -> Option<u32> {
        self.activation_freshness.get(option_id).copied()
    }

    /// Increment every tracked freshness counter.
    ///
    /// The learning loop calls this once per step, so recently applied
    /// options read as fresher than long-dormant ones.
    pub fn age_activation_freshness(&mut self) {
        for counter in self.activation_freshness.values_mut() {
            *counter += 1;
        }
    }

    pub fn common(&self) -> &Arc<CommonPool> {
        &self.common
    }
}

impl Agent for SimAgent {
    fn id(&self) -> &str {
        &self.id
    }

    fn value(&self, variable: &str) -> Result<Value> {
        self.variables
            .get(variable)
            .cloned()
            .ok_or_else(|| VolitionError::UnknownVariable {
                agent: self.id.clone(),
                variable: variable.to_string(),
            })
    }

    fn set_value(&mut self, variable: &str, value: Value) {
        self.variables.insert(variable.to_string(), value);
    }

    fn reset_activation_freshness(&mut self, option_id: &str) {
        self.activation_freshness.insert(option_id.to_string(), 0);
    }

    fn set_to_common(&self, key: String, value: Value) {
        self.common.set(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> SimAgent {
        SimAgent::new("A1", Arc::new(CommonPool::new()))
    }

    #[test]
    fn test_variable_get_set() {
        let mut agent = agent().with_variable("yield", 10.0);

        assert_eq!(agent.value("yield").unwrap(), Value::Number(10.0));

        agent.set_value("yield", Value::Number(5.0));
        assert_eq!(agent.value("yield").unwrap(), Value::Number(5.0));
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let agent = agent();
        let err = agent.value("yield").unwrap_err();
        assert!(err.to_string().contains("yield"));
        assert!(err.to_string().contains("A1"));
    }

    #[test]
    fn test_freshness_reset_and_aging() {
        let mut agent = agent();

        assert_eq!(agent.activation_freshness("MM1-1_DO1"), None);

        agent.reset_activation_freshness("MM1-1_DO1");
        agent.reset_activation_freshness("MM1-1_DO2");
        assert_eq!(agent.activation_freshness("MM1-1_DO1"), Some(0));

        agent.age_activation_freshness();
        agent.age_activation_freshness();
        assert_eq!(agent.activation_freshness("MM1-1_DO1"), Some(2));
        assert_eq!(agent.activation_freshness("MM1-1_DO2"), Some(2));

        agent.reset_activation_freshness("MM1-1_DO2");
        assert_eq!(agent.activation_freshness("MM1-1_DO2"), Some(0));
    }

    #[test]
    fn test_set_to_common_goes_through_shared_pool() {
        let pool = Arc::new(CommonPool::new());
        let agent = SimAgent::new("A1", Arc::clone(&pool));

        agent.set_to_common("Agent_A1_yield".into(), Value::Number(5.0));
        assert_eq!(pool.get("Agent_A1_yield"), Some(Value::Number(5.0)));
    }
}
