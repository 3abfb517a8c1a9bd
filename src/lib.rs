/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Experience records
pub mod memory;

/// Environments
pub mod gym;

/// Training loop and reward bookkeeping
pub mod train;

mod util;

pub use error::{Error, Result};
