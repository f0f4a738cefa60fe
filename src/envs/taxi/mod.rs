pub mod action;
pub mod environment;
pub mod state_space;
pub mod transition_model;

pub use action::*;
pub use environment::*;
pub use state_space::*;
pub use transition_model::*;
