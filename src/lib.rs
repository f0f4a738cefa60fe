//! Tabular Q-learning for the Taxi grid world.
//!
//! Refer: https://gymnasium.farama.org/environments/toy_text/taxi/
//!
//! The crate is single-threaded. A [`QLearner`] is the only writer of its
//! [`QTable`]; evaluation borrows the table immutably.

pub mod algos;
pub mod common;
pub mod config;
pub mod envs;
pub mod error;

pub use algos::model_free::evaluation::{evaluate, EvaluationReport};
pub use algos::model_free::gradient_free::off_policy::q_learning::{
    EpisodeStats, QLearner, QTable,
};
pub use algos::model_free::MdpSimulator;
pub use common::defs::*;
pub use config::{Config, EvaluationConfig, TrainingConfig};
pub use envs::taxi::{Action, TaxiEnv, TaxiState, TransitionModel};
pub use error::{Result, TaxiError};
