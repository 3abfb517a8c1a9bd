use std::collections::HashMap;

use log::{debug, trace};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{
    decay::{Decay, Schedule},
    ensure_config, ensure_interval,
    env::{DiscreteActionSpace, DiscreteStateSpace},
    error::{Error, Result},
    exploration::{Choice, EpsilonGreedy},
    memory::Exp,
};

use super::TableKey;

/// Action-value estimates for every legal state-action pair
///
/// The set of entries is fixed at construction from the environment's action space;
/// updates change values, never keys. Rows keep the order in which the action space
/// lists its actions, so iteration and tie-breaking are reproducible.
#[derive(Debug, Clone)]
pub struct QTable<S, A> {
    states: Vec<S>,
    rows: HashMap<S, Vec<(A, f32)>>,
}

impl<S: TableKey, A: TableKey> PartialEq for QTable<S, A> {
    fn eq(&self, other: &Self) -> bool {
        self.states == other.states && self.rows == other.rows
    }
}

impl<S: TableKey, A: TableKey> QTable<S, A> {
    /// Build a zero-initialized table from `(state, legal actions)` pairs
    ///
    /// **Errors** if a state is listed twice, has no legal actions, or lists an action twice
    pub fn new(action_space: impl IntoIterator<Item = (S, Vec<A>)>) -> Result<Self> {
        let mut states = Vec::new();
        let mut rows = HashMap::new();

        for (state, actions) in action_space {
            if actions.is_empty() {
                return Err(Error::InvalidState(format!(
                    "`{}` has no legal actions",
                    state
                )));
            }
            for (i, action) in actions.iter().enumerate() {
                ensure_config!(
                    !actions[..i].contains(action),
                    "Action `{}` is listed twice for state `{}`",
                    action,
                    state
                );
            }

            let row: Vec<(A, f32)> = actions.into_iter().map(|a| (a, 0.0)).collect();
            if rows.insert(state, row).is_some() {
                return Err(Error::InvalidState(format!("`{}` is listed twice", state)));
            }
            states.push(state);
        }

        Ok(Self { states, rows })
    }

    /// Build a zero-initialized table covering the action space of `env`
    pub fn from_env<E>(env: &E) -> Result<Self>
    where
        E: DiscreteStateSpace<State = S, Action = A> + DiscreteActionSpace,
    {
        Self::new(env.states().into_iter().map(|s| {
            let actions = env.actions(&s);
            (s, actions)
        }))
    }

    /// Every state in the table, in action space order
    pub fn states(&self) -> &[S] {
        &self.states
    }

    /// The legal actions of `state` paired with their estimates
    pub fn row(&self, state: &S) -> Result<&[(A, f32)]> {
        self.rows
            .get(state)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::InvalidState(format!("`{}` is not in the table", state)))
    }

    /// The legal actions of `state`
    pub fn actions(&self, state: &S) -> Result<Vec<A>> {
        Ok(self.row(state)?.iter().map(|&(a, _)| a).collect())
    }

    /// The estimate for taking `action` in `state`
    pub fn get(&self, state: &S, action: &A) -> Result<f32> {
        self.row(state)?
            .iter()
            .find(|(a, _)| a == action)
            .map(|&(_, q)| q)
            .ok_or_else(|| Error::invalid_action(state, action))
    }

    fn get_mut(&mut self, state: &S, action: &A) -> Result<&mut f32> {
        let row = self
            .rows
            .get_mut(state)
            .ok_or_else(|| Error::InvalidState(format!("`{}` is not in the table", state)))?;
        row.iter_mut()
            .find(|(a, _)| a == action)
            .map(|(_, q)| q)
            .ok_or_else(|| Error::invalid_action(state, action))
    }

    /// The highest estimate among the legal actions of `state`
    pub fn max_value(&self, state: &S) -> Result<f32> {
        Ok(max_of(self.row(state)?))
    }

    /// Every legal action of `state` whose estimate equals the maximum
    pub fn maximizers(&self, state: &S) -> Result<Vec<A>> {
        Ok(maximizers_of(self.row(state)?))
    }

    /// The greedy action for `state`, preferring the first listed on ties
    pub fn best_action(&self, state: &S) -> Result<A> {
        self.maximizers(state)?
            .first()
            .copied()
            .ok_or_else(|| Error::InvalidState(format!("`{}` has no legal actions", state)))
    }

    /// The greedy action for every state, in table order
    pub fn greedy_policy(&self) -> Result<Vec<(S, A)>> {
        self.states
            .iter()
            .map(|s| Ok((*s, self.best_action(s)?)))
            .collect()
    }

    /// Iterate over `(state, row)` pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (S, &[(A, f32)])> + '_ {
        self.states
            .iter()
            .filter_map(|s| self.rows.get(s).map(|row| (*s, row.as_slice())))
    }
}

fn max_of<A>(row: &[(A, f32)]) -> f32 {
    row.iter().map(|&(_, q)| q).fold(f32::NEG_INFINITY, f32::max)
}

/// Actions achieving the maximum, compared against the maximum found over the same values
fn maximizers_of<A: Copy>(row: &[(A, f32)]) -> Vec<A> {
    let max = max_of(row);
    let mut best = Vec::with_capacity(row.len());
    best.extend(row.iter().filter(|&&(_, q)| q == max).map(|&(a, _)| a));
    best
}

/// Configuration for the [`QTableAgent`]
///
/// A decay factor of exactly `1.0` keeps the corresponding parameter constant.
#[derive(Debug, Clone, PartialEq)]
pub struct QTableAgentConfig {
    /// Initial step size, in `(0,1]`
    pub learning_rate: f32,
    /// Discount factor, in `[0,1]`
    pub discount_factor: f32,
    /// Initial exploration probability, in `[0,1]`
    pub epsilon: f32,
    /// Factor applied to epsilon after every update, in `(0,1]`
    pub epsilon_decay: f32,
    /// Epsilon never decays below this, must be positive when `epsilon_decay < 1`
    pub epsilon_min: f32,
    /// Factor applied to the learning rate after every update, in `(0,1]`
    pub lr_decay: f32,
    /// The learning rate never decays below this, must be positive when `lr_decay < 1`
    pub lr_min: f32,
}

impl Default for QTableAgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            epsilon: 0.1,
            epsilon_decay: 1.0,
            epsilon_min: 0.0,
            lr_decay: 1.0,
            lr_min: 0.0,
        }
    }
}

/// A snapshot of the agent's learning parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    pub epsilon: f32,
    pub learning_rate: f32,
    /// Number of updates performed so far
    pub step_count: u64,
}

/// A Q-learning agent that utilizes a Q-table to learn its environment
///
/// ### Generics
/// - `E` - The [`Environment`](crate::env::Environment) in which the agent will learn
///     - The environment's state and action spaces must both be discrete because a Q value will be recorded for each legal state action pair
///     - For the same reason, the state and action types must be [`TableKey`]s
/// - `R` - The random number generator used for exploration and tie-breaking
pub struct QTableAgent<E, R = StdRng>
where
    E: DiscreteStateSpace + DiscreteActionSpace,
    E::State: TableKey,
    E::Action: TableKey,
    R: Rng,
{
    q_table: QTable<E::State, E::Action>,
    exploration: EpsilonGreedy<Schedule>,
    alpha: Schedule, // learning rate
    gamma: f32,      // discount factor
    step_count: u64,
    rng: R,
}

impl<E> QTableAgent<E, StdRng>
where
    E: DiscreteStateSpace + DiscreteActionSpace,
    E::State: TableKey,
    E::Action: TableKey,
{
    /// Initialize a new agent for `env`, seeded from system entropy
    pub fn new(env: &E, config: QTableAgentConfig) -> Result<Self> {
        Self::with_rng(env, config, StdRng::from_entropy())
    }

    /// Initialize a new agent for `env` with reproducible choices
    pub fn seeded(env: &E, config: QTableAgentConfig, seed: u64) -> Result<Self> {
        Self::with_rng(env, config, StdRng::seed_from_u64(seed))
    }
}

impl<E, R> QTableAgent<E, R>
where
    E: DiscreteStateSpace + DiscreteActionSpace,
    E::State: TableKey,
    E::Action: TableKey,
    R: Rng,
{
    /// Initialize a new agent whose Q-table covers the action space of `env`
    ///
    /// **Errors** if a parameter is out of range (see [`QTableAgentConfig`]) or the
    /// environment's action space is malformed
    pub fn with_rng(env: &E, config: QTableAgentConfig, rng: R) -> Result<Self> {
        ensure_config!(
            config.learning_rate > 0.0 && config.learning_rate <= 1.0,
            "Invalid value for `config.learning_rate`: {}. Must be in the interval (0, 1].",
            config.learning_rate
        );
        ensure_interval!(config.discount_factor, 0.0, 1.0);
        ensure_interval!(config.epsilon, 0.0, 1.0);
        ensure_interval!(config.epsilon_min, 0.0, 1.0);

        let epsilon = Schedule::new(config.epsilon_decay, config.epsilon, config.epsilon_min)?;
        let alpha = Schedule::new(config.lr_decay, config.learning_rate, config.lr_min)?;
        let q_table: QTable<E::State, E::Action> = QTable::from_env(env)?;

        debug!(
            "Q-table agent over {} states: {:?}",
            q_table.states().len(),
            config
        );

        Ok(Self {
            q_table,
            exploration: EpsilonGreedy::new(epsilon)?,
            alpha,
            gamma: config.discount_factor,
            step_count: 0,
            rng,
        })
    }

    pub fn q_table(&self) -> &QTable<E::State, E::Action> {
        &self.q_table
    }

    /// Consume the agent, keeping its learned estimates
    pub fn into_q_table(self) -> QTable<E::State, E::Action> {
        self.q_table
    }

    /// Choose an action for `state` with the epsilon greedy policy
    ///
    /// When exploiting, ties between maximal estimates are broken uniformly at random.
    pub fn choose_action(&mut self, state: &E::State) -> Result<E::Action> {
        let row = self.q_table.row(state)?;
        let choice = self.exploration.choose(&mut self.rng);
        let action = match choice {
            Choice::Explore => row.choose(&mut self.rng).map(|&(a, _)| a),
            Choice::Exploit => maximizers_of(row).choose(&mut self.rng).copied(),
        };

        action.ok_or_else(|| Error::InvalidState(format!("`{}` has no legal actions", state)))
    }

    /// Apply the one-step Q-learning update for a transition, then decay the learning parameters
    ///
    /// The bootstrap maximum is taken over the legal actions of `next_state` only.
    ///
    /// **Errors** if `action` is not legal in `state` or either state is unknown, leaving the agent unchanged
    pub fn update_value(
        &mut self,
        state: &E::State,
        action: &E::Action,
        reward: f32,
        next_state: &E::State,
    ) -> Result<()> {
        let max_next_q = self.q_table.max_value(next_state)?;
        let alpha = self.alpha.value();
        let gamma = self.gamma;

        let q_value = self.q_table.get_mut(state, action)?;
        let td_error = reward + gamma * max_next_q - *q_value;
        *q_value += alpha * td_error;
        trace!(
            "Q({}, {}) <- {} (td error {}, alpha {})",
            state,
            action,
            *q_value,
            td_error,
            alpha
        );

        self.step_count += 1;
        self.exploration.decay();
        self.alpha.decay();

        Ok(())
    }

    /// Learn from a given experience
    pub fn learn(&mut self, experience: &Exp<E>) -> Result<()> {
        let Exp {
            state,
            action,
            next_state,
            reward,
        } = experience;

        self.update_value(state, action, *reward, next_state)
    }

    /// A read-only snapshot of the current learning parameters
    pub fn current_parameters(&self) -> Parameters {
        Parameters {
            epsilon: self.exploration.epsilon(),
            learning_rate: self.alpha.value(),
            step_count: self.step_count,
        }
    }
}
