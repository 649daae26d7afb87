//! Action taking: ordered application of activated decision options.
//!
//! Action taking may involve doing nothing or engaging in an individual or a
//! collective action. Within one agent's pass options are applied strictly
//! sequentially, so later options observe every write of earlier ones; across
//! agents, passes touch disjoint state and may run simultaneously.

use crate::agent::Agent;
use crate::core::error::Result;
use crate::state::agent_state::AgentState;
use rayon::prelude::*;
use std::hash::Hash;

/// Whether a group of agents acts one after another or all at once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    Simultaneous,
}

/// Action taking process implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ActionTaking;

impl ActionTaking {
    pub fn new() -> Self {
        Self
    }

    /// Applies every activated decision option for `site`, in hierarchy
    /// order, and appends the results to the site's taken-action list.
    ///
    /// Options are ordered by (set, layer) ascending; within a layer the
    /// stable sort preserves activation order. An empty or absent activated
    /// collection produces an empty taken-action list.
    pub fn execute<A, S>(&self, agent: &mut A, state: &mut AgentState<S>, site: &S) -> Result<()>
    where
        A: Agent,
        S: Eq + Hash + Clone,
    {
        let mut activated = state
            .history(site)
            .map(|history| history.activated.clone())
            .unwrap_or_default();

        activated.sort_by_key(|option| option.layer);

        state.begin_actions(site);

        for option in &activated {
            let result = option.apply(agent)?;
            state.record_action(site, result);
        }

        tracing::debug!(
            agent = agent.id(),
            applied = activated.len(),
            "action taking pass complete"
        );

        Ok(())
    }

    /// Runs one pass per agent over the same site.
    ///
    /// `Sequential` applies agents in slice order; `Simultaneous` fans the
    /// passes out in parallel. Each pass only touches its own agent and
    /// state; the common pool is the only shared resource.
    pub fn execute_all<A, S>(
        &self,
        mode: ExecutionMode,
        passes: &mut [(A, AgentState<S>)],
        site: &S,
    ) -> Result<()>
    where
        A: Agent + Send,
        S: Eq + Hash + Clone + Send + Sync,
    {
        match mode {
            ExecutionMode::Sequential => {
                for (agent, state) in passes.iter_mut() {
                    self.execute(agent, state, site)?;
                }
                Ok(())
            }
            ExecutionMode::Simultaneous => passes
                .par_iter_mut()
                .try_for_each(|(agent, state)| self.execute(agent, state, site)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::SimAgent;
    use crate::core::types::{LayerRef, Value};
    use crate::rules::consequent::Consequent;
    use crate::rules::decision_option::DecisionOption;
    use crate::state::common_pool::CommonPool;
    use std::sync::Arc;

    fn option(set: u32, layer: u32, position: u32, value: f64) -> DecisionOption {
        DecisionOption::new(
            LayerRef::new(set, layer),
            position,
            vec![],
            Consequent::new("yield", value),
        )
    }

    #[test]
    fn test_empty_activated_produces_empty_list() {
        let mut agent = SimAgent::new("A1", Arc::new(CommonPool::new()));
        let mut state: AgentState<u32> = AgentState::new();

        ActionTaking::new().execute(&mut agent, &mut state, &1).unwrap();

        assert!(state.taken_actions(&1).is_empty());
    }

    #[test]
    fn test_options_apply_in_set_then_layer_order() {
        let mut agent = SimAgent::new("A1", Arc::new(CommonPool::new()));
        let mut state: AgentState<u32> = AgentState::new();

        // Activated out of order on purpose
        state.activate(&1, option(2, 1, 1, 3.0));
        state.activate(&1, option(1, 2, 1, 2.0));
        state.activate(&1, option(1, 1, 1, 1.0));

        ActionTaking::new().execute(&mut agent, &mut state, &1).unwrap();

        let ids: Vec<&str> = state
            .taken_actions(&1)
            .iter()
            .map(|action| action.decision_option_id.as_str())
            .collect();
        assert_eq!(ids, vec!["MM1-1_DO1", "MM1-2_DO1", "MM2-1_DO1"]);

        // The last applied option owns the final value
        assert_eq!(agent.value("yield").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_within_layer_activation_order_is_preserved() {
        let mut agent = SimAgent::new("A1", Arc::new(CommonPool::new()));
        let mut state: AgentState<u32> = AgentState::new();

        state.activate(&1, option(1, 1, 3, 3.0));
        state.activate(&1, option(1, 1, 1, 1.0));
        state.activate(&1, option(1, 1, 2, 2.0));

        ActionTaking::new().execute(&mut agent, &mut state, &1).unwrap();

        let ids: Vec<&str> = state
            .taken_actions(&1)
            .iter()
            .map(|action| action.decision_option_id.as_str())
            .collect();
        assert_eq!(ids, vec!["MM1-1_DO3", "MM1-1_DO1", "MM1-1_DO2"]);
    }

    #[test]
    fn test_later_option_reads_earlier_write() {
        let mut agent = SimAgent::new("A1", Arc::new(CommonPool::new()));
        let mut state: AgentState<u32> = AgentState::new();

        // First option writes yield; second copies yield into quota
        state.activate(&1, option(1, 1, 1, 7.0));
        state.activate(
            &1,
            DecisionOption::new(
                LayerRef::new(1, 2),
                1,
                vec![],
                Consequent::new("quota", 0.0).with_variable_value("yield"),
            ),
        );

        ActionTaking::new().execute(&mut agent, &mut state, &1).unwrap();

        assert_eq!(agent.value("quota").unwrap(), Value::Number(7.0));
    }

    #[test]
    fn test_failed_apply_keeps_prior_actions() {
        let mut agent = SimAgent::new("A1", Arc::new(CommonPool::new()));
        let mut state: AgentState<u32> = AgentState::new();

        state.activate(&1, option(1, 1, 1, 1.0));
        // save_previous on a variable the agent never had
        state.activate(
            &1,
            DecisionOption::new(
                LayerRef::new(1, 2),
                1,
                vec![],
                Consequent::new("absent", 0.0).with_save_previous(),
            ),
        );

        let result = ActionTaking::new().execute(&mut agent, &mut state, &1);

        assert!(result.is_err());
        assert_eq!(state.taken_actions(&1).len(), 1);
    }

    #[test]
    fn test_simultaneous_matches_sequential() {
        let pool = Arc::new(CommonPool::new());
        let taking = ActionTaking::new();

        let mut passes: Vec<(SimAgent, AgentState<u32>)> = (0..8)
            .map(|i| {
                let agent = SimAgent::new(format!("A{}", i), Arc::clone(&pool));
                let mut state = AgentState::new();
                state.activate(
                    &1,
                    DecisionOption::new(
                        LayerRef::new(1, 1),
                        1,
                        vec![],
                        Consequent::new("yield", i as f64).with_copy_to_common(),
                    ),
                );
                (agent, state)
            })
            .collect();

        taking
            .execute_all(ExecutionMode::Simultaneous, &mut passes, &1)
            .unwrap();

        for (i, (agent, state)) in passes.iter().enumerate() {
            assert_eq!(agent.value("yield").unwrap(), Value::Number(i as f64));
            assert_eq!(state.taken_actions(&1).len(), 1);
            assert_eq!(
                pool.get(&format!("Agent_A{}_yield", i)),
                Some(Value::Number(i as f64))
            );
        }
    }
}
