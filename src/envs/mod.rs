pub mod taxi;
