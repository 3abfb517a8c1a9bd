use crate::{ensure_config, error::Result};

/// A hyperparameter that decays each time the agent learns
pub trait Decay {
    /// The current value
    fn value(&self) -> f32;

    /// Advance the schedule by one update
    fn decay(&mut self);
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn value(&self) -> f32 {
        self.value
    }

    fn decay(&mut self) {}
}

/// v<sub>t+1</sub> = max(v<sub>t</sub> * r, v<sub>f</sub>)
///
/// The value never increases and never drops below the floor `vf`.
#[derive(Debug, Clone, PartialEq)]
pub struct Multiplicative {
    rate: f32,
    value: f32,
    vf: f32,
}

impl Multiplicative {
    /// Start at `vi` and shrink by a factor of `rate` per update down to `vf`
    ///
    /// **Errors** unless `rate` is in `(0,1]` and `0 <= vf <= vi`, with a strictly
    /// positive `vf` whenever `rate < 1` so the value can never decay to zero
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self> {
        ensure_config!(
            rate > 0.0 && rate <= 1.0,
            "Decay rate must be in the interval (0, 1], got {}",
            rate
        );
        ensure_config!(vf >= 0.0, "Decay floor must be non-negative, got {}", vf);
        ensure_config!(
            rate == 1.0 || vf > 0.0,
            "A decaying value needs a positive floor, got rate {} with floor {}",
            rate,
            vf
        );
        ensure_config!(
            vi >= vf,
            "Initial value {} must not be below the decay floor {}",
            vi,
            vf
        );
        Ok(Self { rate, value: vi, vf })
    }
}

impl Decay for Multiplicative {
    fn value(&self) -> f32 {
        self.value
    }

    fn decay(&mut self) {
        self.value = (self.value * self.rate).max(self.vf);
    }
}

/// Either a fixed value or a [`Multiplicative`] schedule
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    Constant(Constant),
    Multiplicative(Multiplicative),
}

impl Schedule {
    /// A constant schedule when `rate` is exactly 1, otherwise a multiplicative one
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self> {
        let decay = Multiplicative::new(rate, vi, vf)?;
        if rate == 1.0 {
            Ok(Self::Constant(Constant::new(vi)))
        } else {
            Ok(Self::Multiplicative(decay))
        }
    }
}

impl Decay for Schedule {
    fn value(&self) -> f32 {
        match self {
            Self::Constant(c) => c.value(),
            Self::Multiplicative(m) => m.value(),
        }
    }

    fn decay(&mut self) {
        match self {
            Self::Constant(c) => c.decay(),
            Self::Multiplicative(m) => m.decay(),
        }
    }
}
