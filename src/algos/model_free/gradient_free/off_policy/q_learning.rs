use crate::algos::model_free::MdpSimulator;
use crate::common::defs::*;
use crate::config::TrainingConfig;
use crate::error::{Result, TaxiError};
use rand::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Action values for every (state, action) pair, stored row-major by state.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    n_s: usize,
    n_a: usize,
    q: Vec<Continous>,
}

impl QTable {
    pub fn new(n_s: usize, n_a: usize) -> Self {
        Self {
            n_s,
            n_a,
            q: vec![0.; n_s * n_a],
        }
    }

    pub fn n_s(&self) -> usize {
        self.n_s
    }

    pub fn n_a(&self) -> usize {
        self.n_a
    }

    pub fn get(&self, s: Discrete, a: Discrete) -> Continous {
        self.row(s)[a]
    }

    pub fn set(&mut self, s: Discrete, a: Discrete, v: Continous) {
        assert!(a < self.n_a, "action {a} out of 0..{}", self.n_a);
        self.q[s * self.n_a + a] = v;
    }

    pub fn row(&self, s: Discrete) -> &[Continous] {
        &self.q[s * self.n_a..(s + 1) * self.n_a]
    }

    pub fn max_q(&self, s: Discrete) -> Continous {
        self.row(s)[self.best_action(s)]
    }

    /// Greedy action. Ties go to the lowest action index.
    pub fn best_action(&self, s: Discrete) -> Discrete {
        self.row(s)
            .iter()
            .enumerate()
            .fold((0, Continous::NEG_INFINITY), |(best, best_q), (a, &q)| {
                if q > best_q {
                    (a, q)
                } else {
                    (best, best_q)
                }
            })
            .0
    }

    /// Ref: Sutton & Barto 2018, eq. 6.8.
    ///
    /// Q(s,a) ← (1 − α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
    ///
    /// Terminal successors are not special-cased: their row is used as is.
    pub fn update(
        &mut self,
        s: Discrete,
        a: Discrete,
        r: Continous,
        s_next: Discrete,
        alpha: Continous,
        gamma: Continous,
    ) -> Continous {
        let target = r + gamma * self.max_q(s_next);
        let v = (1. - alpha) * self.get(s, a) + alpha * target;
        self.set(s, a, v);
        v
    }
}

impl Policy for QTable {
    fn policy(&self, s: Discrete) -> Discrete {
        self.best_action(s)
    }

    fn shape(&self) -> Option<(usize, usize)> {
        Some((self.n_s, self.n_a))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EpisodeStats {
    pub steps: usize,
    pub total_reward: Continous,
    /// Steps that drew the illegal pickup/dropoff penalty.
    pub penalties: usize,
    pub terminated: bool,
}

impl EpisodeStats {
    pub(crate) fn record(&mut self, si: &StepInfo) {
        self.steps += 1;
        self.total_reward += si.reward;
        if si.reward <= PENALTY_THRESHOLD {
            self.penalties += 1;
        }
        self.terminated = si.terminated;
    }
}

/// Rewards at or below this count as a penalty.
pub(crate) const PENALTY_THRESHOLD: Continous = -10.;

/// Epsilon-greedy Q-learning. Sole writer of its table.
#[derive(Debug, Clone)]
pub struct QLearner<R: Rng = StdRng> {
    config: TrainingConfig,
    q: QTable,
    rng: R,
}

impl QLearner<StdRng> {
    pub fn seeded(config: TrainingConfig, n_s: usize, n_a: usize, seed: u64) -> Result<Self> {
        Self::new(config, n_s, n_a, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> QLearner<R> {
    pub fn new(config: TrainingConfig, n_s: usize, n_a: usize, rng: R) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            q: QTable::new(n_s, n_a),
            rng,
        })
    }

    pub fn q_table(&self) -> &QTable {
        &self.q
    }

    pub fn into_q_table(self) -> QTable {
        self.q
    }

    /// Random action with probability ε, else greedy. With a mask, random
    /// actions are drawn from the allowed ones only.
    pub fn select_action(&mut self, s: Discrete, mask: Option<&[bool]>) -> Discrete {
        if !self.rng.gen_bool(self.config.exploration_rate) {
            return self.q.best_action(s);
        }

        let n_a = self.q.n_a();
        mask.and_then(|m| {
            (0..n_a)
                .filter(|&a| m.get(a).copied().unwrap_or(false))
                .choose(&mut self.rng)
        })
        .unwrap_or_else(|| self.rng.gen_range(0..n_a))
    }

    pub fn train_one_episode<E: MdpSimulator>(&mut self, env: &mut E) -> Result<EpisodeStats> {
        if env.n_s() != self.q.n_s() || env.n_a() != self.q.n_a() {
            return Err(TaxiError::InvalidOperation(format!(
                "'{}' has {}x{} state-actions, table has {}x{}",
                env.name(),
                env.n_s(),
                env.n_a(),
                self.q.n_s(),
                self.q.n_a()
            )));
        }

        let alpha = self.config.learning_rate;
        let gamma = self.config.discount_factor;
        let mut stats = EpisodeStats::default();
        let mut s = env.reset();
        loop {
            if self.config.max_steps_per_episode.is_some_and(|cap| stats.steps >= cap) {
                warn!(steps = stats.steps, "episode hit the step cap");
                break;
            }

            let mask = if self.config.masked_exploration {
                Some(env.action_mask(s)?)
            } else {
                None
            };
            let a = self.select_action(s, mask.as_deref());
            let si = env.step(a)?;
            self.q.update(s, a, si.reward, si.observation, alpha, gamma);
            stats.record(&si);

            s = si.observation;
            if si.terminated {
                break;
            }
        }

        Ok(stats)
    }

    pub fn train<E: MdpSimulator>(
        &mut self,
        env: &mut E,
        episodes: usize,
    ) -> Result<Vec<EpisodeStats>> {
        if episodes == 0 {
            return Err(TaxiError::Configuration(
                "episodes must be positive".to_string(),
            ));
        }

        let mut history = Vec::with_capacity(episodes);
        for e in 0..episodes {
            let stats = self.train_one_episode(env)?;
            debug!(
                episode = e,
                steps = stats.steps,
                penalties = stats.penalties,
                terminated = stats.terminated,
                "episode finished"
            );
            history.push(stats);
        }

        let truncated = history.iter().filter(|h| !h.terminated).count();
        let tail = &history[history.len().saturating_sub(100)..];
        info!(
            env = %env.name(),
            episodes,
            truncated,
            recent_mean_steps = tail.iter().map(|h| h.steps).sum::<usize>() as Continous
                / tail.len() as Continous,
            "training finished"
        );

        Ok(history)
    }
}
