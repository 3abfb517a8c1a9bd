use rand::Rng;

use crate::{
    decay::Decay,
    ensure_interval,
    error::Result,
};

use super::Choice;

/// Epsilon greedy exploration policy with a decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    ///
    /// **Errors** if the initial epsilon is not in the interval `[0,1]`
    pub fn new(decay: D) -> Result<Self> {
        let epsilon = decay.value();
        ensure_interval!(epsilon, 0.0, 1.0);
        Ok(Self { epsilon: decay })
    }

    /// The current exploration probability
    pub fn epsilon(&self) -> f32 {
        self.epsilon.value()
    }

    /// Explore with probability epsilon, otherwise exploit
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Choice {
        if rng.gen::<f32>() < self.epsilon.value() {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }

    /// Advance the epsilon schedule by one update
    pub fn decay(&mut self) {
        self.epsilon.decay();
    }
}
