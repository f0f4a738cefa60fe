pub mod evaluation;
pub mod gradient_free;

use crate::common::defs::*;
use crate::error::Result;

/// An episodic environment a model-free learner can interact with.
pub trait MdpSimulator {
    fn name(&self) -> String;

    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    /// Actions worth trying from `s`. Defaults to every action.
    fn action_mask(&self, _s: Discrete) -> Result<Vec<bool>> {
        Ok(vec![true; self.n_a()])
    }

    fn reset(&mut self) -> Discrete;

    fn step(&mut self, a: Discrete) -> Result<StepInfo>;
}
