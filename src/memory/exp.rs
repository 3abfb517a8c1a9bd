use std::fmt;

use crate::env::Environment;

/// Represents a single experience or transition in the environment
pub struct Exp<E: Environment> {
    /// The state of the environment before taking the action
    pub state: E::State,
    /// The action taken in the given state
    pub action: E::Action,
    /// The state of the environment after the action is taken
    pub next_state: E::State,
    /// The reward received after taking the action
    pub reward: f32,
}

impl<E: Environment> Clone for Exp<E>
where
    E::State: Clone,
    E::Action: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            action: self.action.clone(),
            next_state: self.next_state.clone(),
            reward: self.reward,
        }
    }
}

impl<E: Environment> PartialEq for Exp<E>
where
    E::State: PartialEq,
    E::Action: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
            && self.action == other.action
            && self.next_state == other.next_state
            && self.reward == other.reward
    }
}

impl<E: Environment> fmt::Debug for Exp<E>
where
    E::State: fmt::Debug,
    E::Action: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exp")
            .field("state", &self.state)
            .field("action", &self.action)
            .field("next_state", &self.next_state)
            .field("reward", &self.reward)
            .finish()
    }
}
