//! Simulation-wide shared state

use crate::core::types::Value;
use ahash::AHashMap;
use std::sync::RwLock;

/// Prefix for previous-value keys
pub const PREVIOUS_PREFIX: &str = "Previous";

/// Prefix for agent-scoped common pool keys
pub const AGENT_PREFIX: &str = "Agent";

/// Key under which a variable's pre-apply value is stored on the agent
pub fn previous_key(param: &str) -> String {
    format!("{}_{}", PREVIOUS_PREFIX, param)
}

/// Agent-scoped common pool key.
///
/// The agent id prefix keeps writers from different agents on disjoint keys;
/// callers must build common pool keys through this function.
pub fn agent_key(agent_id: &str, key: &str) -> String {
    format!("{}_{}_{}", AGENT_PREFIX, agent_id, key)
}

/// Thread-safe key-value store shared across all agents in a simulation.
///
/// Writes arrive through the agent-scoped key scheme, so concurrent passes
/// over different agents never contend on the same key; the lock covers the
/// case where they still write in the same instant.
#[derive(Debug, Default)]
pub struct CommonPool {
    entries: RwLock<AHashMap<String, Value>>,
}

impl CommonPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: String, value: Value) {
        self.entries
            .write()
            .expect("common pool lock poisoned")
            .insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .expect("common pool lock poisoned")
            .get(key)
            .cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .read()
            .expect("common pool lock poisoned")
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("common pool lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current contents, for downstream reporting
    pub fn snapshot(&self) -> AHashMap<String, Value> {
        self.entries
            .read()
            .expect("common pool lock poisoned")
            .clone()
    }
}
