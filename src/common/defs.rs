use serde::Serialize;
use std::collections::HashMap;

pub type Discrete = usize;
pub type Continous = f64;

pub trait Policy {
    fn policy(&self, s: Discrete) -> Discrete;

    /// `(n_s, n_a)` for table-backed policies.
    fn shape(&self) -> Option<(usize, usize)> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub next_state: Discrete,
    pub probability: Continous,
    pub reward: Continous,
    pub done: bool,
}

pub type Transitions = HashMap<(Discrete, Discrete), Vec<Transition>>;

/// Outcome of applying one action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepInfo {
    pub observation: Discrete,
    pub reward: Continous,
    pub terminated: bool,
}
