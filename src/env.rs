use crate::error::Result;

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time, continuing MDP with
/// one agent. Episodes are delimited by the caller, who decides how many steps to take
/// between calls to [`reset`](Environment::reset).
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// The state the environment is currently in
    fn state(&self) -> Self::State;

    /// Update the environment in response to an action taken by an agent, producing a new state and associated reward
    ///
    /// **Returns** `(next_state, reward)`
    ///
    /// **Errors** if the action is not legal in the current state, in which case the
    /// environment is left unchanged
    fn step(&mut self, action: Self::Action) -> Result<(Self::State, f32)>;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the state
    fn reset(&mut self) -> Self::State;
}

/// An environment with a finite, enumerable set of states
pub trait DiscreteStateSpace: Environment {
    /// Every state the environment can be in
    fn states(&self) -> Vec<Self::State>;
}

/// An environment with a finite set of actions available in each state
pub trait DiscreteActionSpace: Environment {
    /// Get the actions that are legal in `state`
    ///
    /// The returned vector should never be empty, instead specify an action that represents doing nothing if necessary.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;
}
