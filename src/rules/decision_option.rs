//! Decision options: condition-action rules with hierarchy-derived identity

use crate::agent::Agent;
use crate::core::error::Result;
use crate::core::types::LayerRef;
use crate::rules::antecedent::AntecedentPart;
use crate::rules::consequent::Consequent;
use crate::state::agent_state::TakenAction;
use crate::state::common_pool::{agent_key, previous_key};
use std::fmt;

/// A condition-action rule an agent may apply.
///
/// The antecedent/consequent pair is fixed at construction. Learned variants
/// are derived through [`DecisionOption::renew`], never by in-place mutation,
/// so every variant's provenance stays auditable through `origin`.
#[derive(Debug, Clone)]
pub struct DecisionOption {
    /// Hierarchy position of the owning layer
    pub layer: LayerRef,
    /// Position of this option within its layer
    pub position: u32,
    antecedent: Vec<AntecedentPart>,
    consequent: Consequent,
    /// Whether learning may derive variants of this option
    pub is_modifiable: bool,
    /// More than one participant makes this a collective action
    pub required_participants: u32,
    /// Scope tag restricting where the option applies
    pub scope: Option<String>,
    /// Whether this option was generated rather than configured
    pub auto_generated: bool,
    origin: Option<String>,
}

impl DecisionOption {
    pub fn new(
        layer: LayerRef,
        position: u32,
        antecedent: Vec<AntecedentPart>,
        consequent: Consequent,
    ) -> Self {
        Self {
            layer,
            position,
            antecedent,
            consequent,
            is_modifiable: false,
            required_participants: 1,
            scope: None,
            auto_generated: false,
            origin: None,
        }
    }

    /// Identity derived from the option's place in the hierarchy.
    ///
    /// Computed, never stored: moving an option between layers changes its
    /// identity.
    pub fn id(&self) -> String {
        format!("MM{}-{}_DO{}", self.layer.set, self.layer.layer, self.position)
    }

    pub fn antecedent(&self) -> &[AntecedentPart] {
        &self.antecedent
    }

    pub fn consequent(&self) -> &Consequent {
        &self.consequent
    }

    /// Id of the option this one was derived from, if any
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn is_collective_action(&self) -> bool {
        self.required_participants > 1
    }

    /// Checks agent variables against every antecedent condition.
    ///
    /// An empty antecedent always matches. No side effects.
    pub fn is_match<A: Agent>(&self, agent: &A) -> Result<bool> {
        for part in &self.antecedent {
            if !part.is_match(agent)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Applies the consequent to the agent.
    ///
    /// Resolves the value to write (source variable over literal), stores the
    /// previous target value and mirrors into the common pool as flagged,
    /// writes the target variable and resets this option's activation
    /// freshness. Returns the record of what was written.
    pub fn apply<A: Agent>(&self, agent: &mut A) -> Result<TakenAction> {
        let id = self.id();

        let value = match &self.consequent.variable_value {
            Some(source) => agent.value(source)?,
            None => self.consequent.value.clone(),
        };

        if self.consequent.save_previous {
            let key = previous_key(&self.consequent.param);
            let previous = agent.value(&self.consequent.param)?;
            agent.set_value(&key, previous.clone());

            if self.consequent.copy_to_common {
                let common = agent_key(agent.id(), &key);
                agent.set_to_common(common, previous);
            }
        }

        if self.consequent.copy_to_common {
            let common = agent_key(agent.id(), &self.consequent.param);
            agent.set_to_common(common, value.clone());
        }

        agent.set_value(&self.consequent.param, value.clone());
        agent.reset_activation_freshness(&id);

        tracing::trace!(option = %id, param = %self.consequent.param, "applied decision option");

        Ok(TakenAction::new(id, self.consequent.param.clone(), value))
    }

    /// Derives a new option with replaced antecedent and consequent.
    ///
    /// Scalar fields are copied from `old`, `origin` records `old`'s id, and
    /// `old` itself is left untouched.
    pub fn renew(
        old: &DecisionOption,
        antecedent: Vec<AntecedentPart>,
        consequent: Consequent,
    ) -> DecisionOption {
        DecisionOption {
            layer: old.layer,
            position: old.position,
            antecedent,
            consequent,
            is_modifiable: old.is_modifiable,
            required_participants: old.required_participants,
            scope: old.scope.clone(),
            auto_generated: old.auto_generated,
            origin: Some(old.id()),
        }
    }
}

/// Structural equality: matching id, equal consequent, and an
/// order-independent containment check over antecedents of equal length.
///
/// The containment check is weaker than multiset equality (duplicated
/// antecedents can collide), so the relation is not transitive in the
/// degenerate case. No `Eq` and no `Hash`: identity containers must key by
/// [`DecisionOption::id`] instead.
impl PartialEq for DecisionOption {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
            && self.consequent == other.consequent
            && self.antecedent.len() == other.antecedent.len()
            && self
                .antecedent
                .iter()
                .all(|part| other.antecedent.contains(part))
    }
}

impl fmt::Display for DecisionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}
