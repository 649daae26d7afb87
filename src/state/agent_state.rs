//! Per-step decision state: histories and taken actions by site

use crate::core::types::Value;
use crate::rules::decision_option::DecisionOption;
use ahash::AHashMap;
use serde::Serialize;
use std::hash::Hash;

/// Record of one applied decision option: which rule wrote which value where.
///
/// Created once per apply and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TakenAction {
    pub decision_option_id: String,
    pub variable_name: String,
    pub applied_value: Value,
}

impl TakenAction {
    pub fn new(decision_option_id: String, variable_name: String, applied_value: Value) -> Self {
        Self {
            decision_option_id,
            variable_name,
            applied_value,
        }
    }
}

/// Decision options matched and activated for one site in the current step.
///
/// Goal prioritization fills both lists; only `activated` feeds action taking.
#[derive(Debug, Clone, Default)]
pub struct DecisionOptionsHistory {
    pub matched: Vec<DecisionOption>,
    pub activated: Vec<DecisionOption>,
}

impl DecisionOptionsHistory {
    pub fn new(matched: Vec<DecisionOption>, activated: Vec<DecisionOption>) -> Self {
        Self { matched, activated }
    }
}

/// Per-agent bookkeeping for one simulation step, keyed by site.
///
/// Both maps are rebuilt each step; a site with no entry reads as empty.
#[derive(Debug)]
pub struct AgentState<S> {
    histories: AHashMap<S, DecisionOptionsHistory>,
    taken_actions: AHashMap<S, Vec<TakenAction>>,
}

impl<S: Eq + Hash + Clone> AgentState<S> {
    pub fn new() -> Self {
        Self {
            histories: AHashMap::new(),
            taken_actions: AHashMap::new(),
        }
    }

    pub fn history(&self, site: &S) -> Option<&DecisionOptionsHistory> {
        self.histories.get(site)
    }

    pub fn history_mut(&mut self, site: &S) -> &mut DecisionOptionsHistory {
        self.histories.entry(site.clone()).or_default()
    }

    /// Marks an option as activated for a site this step
    pub fn activate(&mut self, site: &S, option: DecisionOption) {
        self.history_mut(site).activated.push(option);
    }

    /// Taken actions recorded for a site this step, in application order
    pub fn taken_actions(&self, site: &S) -> &[TakenAction] {
        self.taken_actions
            .get(site)
            .map(|actions| actions.as_slice())
            .unwrap_or(&[])
    }

    /// Installs a fresh, empty taken-action list for a site
    pub(crate) fn begin_actions(&mut self, site: &S) {
        self.taken_actions.insert(site.clone(), Vec::new());
    }

    pub(crate) fn record_action(&mut self, site: &S, action: TakenAction) {
        self.taken_actions
            .entry(site.clone())
            .or_default()
            .push(action);
    }

    /// Clears all per-step state ahead of the next step
    pub fn reset_step(&mut self) {
        self.histories.clear();
        self.taken_actions.clear();
    }
}

impl<S: Eq + Hash + Clone> Default for AgentState<S> {
    fn default() -> Self {
        Self::new()
    }
}
