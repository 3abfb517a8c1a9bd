/// Tabular methods, which keep one estimate per state-action pair
pub mod tabular;
