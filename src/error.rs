use std::fmt::Display;

/// Errors raised by environments, agents and the training driver
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The action is not legal in the given state
    #[error("Invalid action: `{action}` is not available in state `{state}`")]
    InvalidAction { state: String, action: String },
    /// The state is not part of the environment's state space
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// A configuration value violates its constraints
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn invalid_action(state: impl Display, action: impl Display) -> Self {
        Self::InvalidAction {
            state: state.to_string(),
            action: action.to_string(),
        }
    }
}

/// Convenience alias for results using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
