use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Bernoulli, Distribution};
use strum::{Display, VariantArray};

use crate::{
    ensure_config, ensure_interval,
    env::{DiscreteActionSpace, DiscreteStateSpace, Environment},
    error::{Error, Result},
};

/// Reward for recharging the battery
pub const R_RECHARGE: f32 = 0.0;

/// Reward for running the battery flat and having to be rescued
pub const R_DEPLETED: f32 = -100.0;

/// Charge level of the robot's battery
#[derive(Display, VariantArray, Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum BatteryLevel {
    High,
    Low,
}

/// What the robot does on a step
#[derive(Display, VariantArray, Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum RobotAction {
    /// Actively look for cans
    Search,
    /// Stay put and wait for someone to bring a can
    Wait,
    /// Head back to the docking station, only possible on a low battery
    Recharge,
}

impl BatteryLevel {
    /// The actions the robot may take at this charge level
    pub const fn actions(self) -> &'static [RobotAction] {
        match self {
            BatteryLevel::High => &[RobotAction::Search, RobotAction::Wait],
            BatteryLevel::Low => &[RobotAction::Search, RobotAction::Wait, RobotAction::Recharge],
        }
    }
}

/// Configuration for the [`RecyclingRobot`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecyclingRobotConfig {
    /// Probability that searching on a high battery leaves it high
    pub p_stay_high: f32,
    /// Probability that searching on a low battery does not deplete it
    pub p_stay_low: f32,
    /// Reward for a search
    pub r_search: f32,
    /// Reward for waiting
    pub r_wait: f32,
}

impl Default for RecyclingRobotConfig {
    fn default() -> Self {
        Self {
            p_stay_high: 0.6,
            p_stay_low: 0.8,
            r_search: 10.0,
            r_wait: 2.0,
        }
    }
}

/// The recycling robot from Sutton & Barto, example 3.3
///
/// A mobile robot collects empty cans. On each step it decides whether to search for
/// cans, wait for one to be brought to it, or (on a low battery) go recharge. Searching
/// drains the battery; searching on a low battery risks running flat, in which case the
/// robot is carried back to its charger and receives [`R_DEPLETED`].
///
/// ### Generics
/// - `R` - The random number generator driving the stochastic transitions
pub struct RecyclingRobot<R: Rng = StdRng> {
    battery: BatteryLevel,
    config: RecyclingRobotConfig,
    stay_high: Bernoulli,
    stay_low: Bernoulli,
    rng: R,
}

impl RecyclingRobot<StdRng> {
    /// Initialize a new robot seeded from system entropy
    pub fn new(config: RecyclingRobotConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Initialize a new robot with reproducible dynamics
    pub fn seeded(config: RecyclingRobotConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RecyclingRobot<R> {
    /// Initialize a new robot drawing its transitions from `rng`
    ///
    /// **Errors** if either probability is not in the interval `[0,1]` or a reward is not finite
    pub fn with_rng(config: RecyclingRobotConfig, rng: R) -> Result<Self> {
        ensure_interval!(config.p_stay_high, 0.0, 1.0);
        ensure_interval!(config.p_stay_low, 0.0, 1.0);
        ensure_config!(
            config.r_search.is_finite() && config.r_wait.is_finite(),
            "Rewards must be finite, got r_search = {}, r_wait = {}",
            config.r_search,
            config.r_wait
        );

        let stay_high = bernoulli(config.p_stay_high)?;
        let stay_low = bernoulli(config.p_stay_low)?;
        Ok(Self {
            battery: BatteryLevel::High,
            config,
            stay_high,
            stay_low,
            rng,
        })
    }
}

fn bernoulli(p: f32) -> Result<Bernoulli> {
    Bernoulli::new(p as f64).map_err(|e| Error::Config(e.to_string()))
}

impl<R: Rng> Environment for RecyclingRobot<R> {
    type State = BatteryLevel;
    type Action = RobotAction;

    fn state(&self) -> Self::State {
        self.battery
    }

    fn step(&mut self, action: Self::Action) -> Result<(Self::State, f32)> {
        use BatteryLevel::*;
        use RobotAction::*;

        let (next_state, reward) = match (self.battery, action) {
            (High, Search) => {
                let next = if self.stay_high.sample(&mut self.rng) {
                    High
                } else {
                    Low
                };
                (next, self.config.r_search)
            }
            (High, Wait) => (High, self.config.r_wait),
            (Low, Search) => {
                if self.stay_low.sample(&mut self.rng) {
                    (Low, self.config.r_search)
                } else {
                    // ran flat, carried back to the charger
                    (High, R_DEPLETED)
                }
            }
            (Low, Wait) => (Low, self.config.r_wait),
            (Low, Recharge) => (High, R_RECHARGE),
            (High, Recharge) => return Err(Error::invalid_action(self.battery, action)),
        };

        trace!(
            "{} --{}--> {} (reward {})",
            self.battery,
            action,
            next_state,
            reward
        );
        self.battery = next_state;

        Ok((next_state, reward))
    }

    fn reset(&mut self) -> Self::State {
        self.battery = BatteryLevel::High;
        self.battery
    }
}

impl<R: Rng> DiscreteStateSpace for RecyclingRobot<R> {
    fn states(&self) -> Vec<Self::State> {
        BatteryLevel::VARIANTS.to_vec()
    }
}

impl<R: Rng> DiscreteActionSpace for RecyclingRobot<R> {
    fn actions(&self, state: &Self::State) -> Vec<Self::Action> {
        state.actions().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robot(p_stay_high: f32, p_stay_low: f32) -> RecyclingRobot {
        let config = RecyclingRobotConfig {
            p_stay_high,
            p_stay_low,
            r_search: 10.0,
            r_wait: 2.0,
        };
        RecyclingRobot::seeded(config, 42).unwrap()
    }

    /// Drive a fresh robot into the low battery state
    fn low_robot(p_stay_low: f32) -> RecyclingRobot {
        let mut env = robot(0.0, p_stay_low);
        env.reset();
        assert_eq!(env.step(RobotAction::Search), Ok((BatteryLevel::Low, 10.0)));
        env
    }

    #[test]
    fn rejects_invalid_probabilities() {
        let config = RecyclingRobotConfig {
            p_stay_high: 1.2,
            ..Default::default()
        };
        assert!(matches!(
            RecyclingRobot::new(config),
            Err(Error::Config(_))
        ));
        let config = RecyclingRobotConfig {
            p_stay_low: -0.1,
            ..Default::default()
        };
        assert!(RecyclingRobot::new(config).is_err());
        let config = RecyclingRobotConfig {
            r_wait: f32::INFINITY,
            ..Default::default()
        };
        assert!(RecyclingRobot::new(config).is_err());
    }

    #[test]
    fn action_space() {
        let env = robot(0.5, 0.5);
        assert_eq!(env.states(), vec![BatteryLevel::High, BatteryLevel::Low]);
        assert_eq!(
            env.actions(&BatteryLevel::High),
            vec![RobotAction::Search, RobotAction::Wait]
        );
        assert_eq!(
            env.actions(&BatteryLevel::Low),
            vec![RobotAction::Search, RobotAction::Wait, RobotAction::Recharge]
        );
    }

    #[test]
    fn reset_returns_high() {
        let mut env = low_robot(1.0);
        assert_eq!(env.state(), BatteryLevel::Low);
        assert_eq!(env.reset(), BatteryLevel::High);
        assert_eq!(env.state(), BatteryLevel::High);
    }

    #[test]
    fn wait_on_high_is_deterministic() {
        let mut env = robot(1.0, 0.5);
        env.reset();
        for _ in 0..100 {
            assert_eq!(env.step(RobotAction::Wait), Ok((BatteryLevel::High, 2.0)));
        }
    }

    #[test]
    fn search_on_high_with_certain_stay() {
        let mut env = robot(1.0, 0.5);
        env.reset();
        for _ in 0..100 {
            assert_eq!(env.step(RobotAction::Search), Ok((BatteryLevel::High, 10.0)));
        }
    }

    #[test]
    fn search_on_low_always_depletes() {
        let mut env = low_robot(0.0);
        for _ in 0..100 {
            assert_eq!(
                env.step(RobotAction::Search),
                Ok((BatteryLevel::High, R_DEPLETED))
            );
            // back down to low for the next round
            env.step(RobotAction::Search).unwrap();
        }
    }

    #[test]
    fn search_on_low_never_depletes() {
        let mut env = low_robot(1.0);
        for _ in 0..100 {
            assert_eq!(env.step(RobotAction::Search), Ok((BatteryLevel::Low, 10.0)));
        }
    }

    #[test]
    fn wait_and_recharge_on_low() {
        let mut env = low_robot(0.5);
        assert_eq!(env.step(RobotAction::Wait), Ok((BatteryLevel::Low, 2.0)));
        assert_eq!(
            env.step(RobotAction::Recharge),
            Ok((BatteryLevel::High, R_RECHARGE))
        );
    }

    #[test]
    fn recharge_on_high_is_invalid() {
        let mut env = robot(0.5, 0.5);
        env.reset();
        assert_eq!(
            env.step(RobotAction::Recharge),
            Err(Error::InvalidAction {
                state: String::from("High"),
                action: String::from("Recharge"),
            })
        );
        assert_eq!(env.state(), BatteryLevel::High, "state unchanged");
    }

    #[test]
    fn search_on_high_follows_probability() {
        let mut env = robot(0.6, 0.5);
        let trials = 20_000;
        let stayed = (0..trials)
            .filter(|_| {
                env.reset();
                env.step(RobotAction::Search).unwrap().0 == BatteryLevel::High
            })
            .count();
        let ratio = stayed as f32 / trials as f32;
        assert!((ratio - 0.6).abs() < 0.02, "stay ratio was {}", ratio);
    }

    #[test]
    fn seeded_robots_agree() {
        let mut a = robot(0.5, 0.5);
        let mut b = robot(0.5, 0.5);
        for _ in 0..200 {
            assert_eq!(a.step(RobotAction::Search), b.step(RobotAction::Search));
        }
    }
}
