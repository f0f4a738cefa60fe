use taxi_rl::envs::taxi::{N_ACTIONS, N_STATES};
use taxi_rl::*;

#[allow(dead_code)]
pub fn train(config: TrainingConfig, seed: u64) -> (QTable, Vec<EpisodeStats>) {
    let env = &mut TaxiEnv::seeded(seed);
    let mut learner = QLearner::seeded(config.clone(), N_STATES, N_ACTIONS, seed + 1).unwrap();
    let history = learner.train(env, config.episodes).unwrap();

    (learner.into_q_table(), history)
}

#[allow(dead_code)]
pub fn short_config(episodes: usize) -> TrainingConfig {
    TrainingConfig {
        episodes,
        max_steps_per_episode: Some(500),
        ..Default::default()
    }
}
