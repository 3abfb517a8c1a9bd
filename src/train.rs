use log::debug;
use rand::Rng;

use crate::{
    algo::tabular::{QTableAgent, TableKey},
    ensure_config,
    env::{DiscreteActionSpace, DiscreteStateSpace},
    error::Result,
    memory::Exp,
};

/// Length of a training run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingConfig {
    pub episodes: usize,
    pub steps_per_episode: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            steps_per_episode: 1000,
        }
    }
}

/// Cumulative reward of every episode of a training run, in order
///
/// Owned by whoever drives training; the agent and environment never see it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardLog {
    totals: Vec<f32>,
}

impl RewardLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the total reward of the next episode
    pub fn push(&mut self, total: f32) {
        self.totals.push(total);
    }

    pub fn totals(&self) -> &[f32] {
        &self.totals
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn last(&self) -> Option<f32> {
        self.totals.last().copied()
    }

    /// Mean episode reward, or `None` before the first episode
    pub fn mean(&self) -> Option<f32> {
        (!self.is_empty()).then(|| self.totals.iter().sum::<f32>() / self.len() as f32)
    }

    /// Mean of every run of `window` consecutive episodes
    ///
    /// **Errors** if `window` is zero
    pub fn moving_average(&self, window: usize) -> Result<Vec<f32>> {
        ensure_config!(window > 0, "Moving average window must be positive");
        Ok(self
            .totals
            .windows(window)
            .map(|w| w.iter().sum::<f32>() / window as f32)
            .collect())
    }
}

/// Run one episode of `steps` transitions, letting `agent` learn from each
///
/// The environment is reset first. `on_step` sees every transition after the agent has
/// learned from it.
///
/// **Returns** the cumulative reward of the episode
pub fn run_episode<E, R>(
    agent: &mut QTableAgent<E, R>,
    env: &mut E,
    steps: usize,
    mut on_step: impl FnMut(&Exp<E>),
) -> Result<f32>
where
    E: DiscreteStateSpace + DiscreteActionSpace,
    E::State: TableKey,
    E::Action: TableKey,
    R: Rng,
{
    let mut state = env.reset();
    let mut total = 0.0;

    for _ in 0..steps {
        let action = agent.choose_action(&state)?;
        let (next_state, reward) = env.step(action)?;
        let exp = Exp {
            state,
            action,
            next_state,
            reward,
        };
        agent.learn(&exp)?;
        on_step(&exp);

        total += reward;
        state = next_state;
    }

    Ok(total)
}

/// Train `agent` in `env` for a full run, appending each episode's total reward to `log`
pub fn train<E, R>(
    agent: &mut QTableAgent<E, R>,
    env: &mut E,
    config: &TrainingConfig,
    log: &mut RewardLog,
) -> Result<()>
where
    E: DiscreteStateSpace + DiscreteActionSpace,
    E::State: TableKey,
    E::Action: TableKey,
    R: Rng,
{
    ensure_config!(
        config.episodes > 0 && config.steps_per_episode > 0,
        "Training needs at least one episode of at least one step, got {:?}",
        config
    );

    for episode in 0..config.episodes {
        let total = run_episode(agent, env, config.steps_per_episode, |_| {})?;
        log.push(total);

        let params = agent.current_parameters();
        debug!(
            "Episode {}/{}: total reward = {}, epsilon = {}, alpha = {}",
            episode + 1,
            config.episodes,
            total,
            params.epsilon,
            params.learning_rate
        );
    }

    Ok(())
}
