pub mod q_table;

pub use q_table::{Parameters, QTable, QTableAgent, QTableAgentConfig};

/// A trait for state and action types that can be used as keys in a [`HashMap`](std::collections::HashMap)
/// and named in error messages
pub trait TableKey: Copy + Eq + std::hash::Hash + std::fmt::Debug + std::fmt::Display {}

impl<T> TableKey for T where T: Copy + Eq + std::hash::Hash + std::fmt::Debug + std::fmt::Display {}
