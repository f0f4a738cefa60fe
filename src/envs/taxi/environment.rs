use super::action::*;
use super::state_space::*;
use super::transition_model::*;
use crate::algos::model_free::MdpSimulator;
use crate::common::defs::*;
use crate::error::{Result, TaxiError};
use rand::prelude::*;

/// Taxi episode driver. Owns the current state and the random source used to
/// draw initial states; nothing else in the environment is random.
#[derive(Debug, Clone)]
pub struct TaxiEnv<R: Rng = StdRng> {
    model: TransitionModel,
    rng: R,
    state: Option<Discrete>,
    terminated: bool,
}

impl TaxiEnv<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> TaxiEnv<R> {
    pub fn new(rng: R) -> Self {
        Self {
            model: TransitionModel,
            rng,
            state: None,
            terminated: false,
        }
    }

    /// Current state index, `None` until the first reset.
    pub fn state(&self) -> Option<Discrete> {
        self.state
    }

    /// Decoded copy of the current state for presentation layers.
    pub fn snapshot(&self) -> Option<TaxiState> {
        self.state.and_then(|s| decode(s).ok())
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Uniform taxi cell, uniform waiting passenger, and a destination that
    /// differs from the passenger's site.
    pub fn reset(&mut self) -> Discrete {
        let taxi_row = self.rng.gen_range(0..ROWS);
        let taxi_col = self.rng.gen_range(0..COLS);
        let passenger = self.rng.gen_range(0..NUM_SITES);
        let destination = (0..NUM_SITES)
            .filter(|&d| d != passenger)
            .choose(&mut self.rng)
            .unwrap_or(passenger);

        let s = match encode(taxi_row, taxi_col, passenger, destination) {
            Ok(s) => s,
            Err(e) => unreachable!("sampled fields are in range: {e}"),
        };

        self.state = Some(s);
        self.terminated = false;
        s
    }

    pub fn step(&mut self, a: Action) -> Result<StepInfo> {
        let Some(s) = self.state else {
            return Err(TaxiError::InvalidOperation(
                "step called before reset".to_string(),
            ));
        };
        if self.terminated {
            return Err(TaxiError::InvalidOperation(
                "step called on a terminated episode without reset".to_string(),
            ));
        }

        let si = self.model.step(s, a)?;
        self.state = Some(si.observation);
        self.terminated = si.terminated;

        Ok(si)
    }
}

impl<R: Rng> MdpSimulator for TaxiEnv<R> {
    fn name(&self) -> String {
        "Taxi".to_string()
    }

    fn n_s(&self) -> usize {
        N_STATES
    }

    fn n_a(&self) -> usize {
        N_ACTIONS
    }

    fn action_mask(&self, s: Discrete) -> Result<Vec<bool>> {
        Ok(self.model.action_mask(s)?.to_vec())
    }

    fn reset(&mut self) -> Discrete {
        TaxiEnv::reset(self)
    }

    fn step(&mut self, a: Discrete) -> Result<StepInfo> {
        TaxiEnv::step(self, Action::try_from(a)?)
    }
}
