use crate::common::defs::Continous;
use crate::error::{Result, TaxiError};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// α, in (0, 1].
    pub learning_rate: Continous,
    /// γ, in [0, 1].
    pub discount_factor: Continous,
    /// ε, in [0, 1].
    pub exploration_rate: Continous,
    pub episodes: usize,
    /// Upper bound on steps in one training episode.
    pub max_steps_per_episode: Option<usize>,
    /// Explore only among actions that change the state.
    pub masked_exploration: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.6,
            exploration_rate: 0.1,
            episodes: 10_000,
            max_steps_per_episode: Some(2_000),
            masked_exploration: false,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0. && self.learning_rate <= 1.) {
            return Err(TaxiError::Configuration(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        if !(0. ..=1.).contains(&self.discount_factor) {
            return Err(TaxiError::Configuration(format!(
                "discount_factor must be in [0, 1], got {}",
                self.discount_factor
            )));
        }
        if !(0. ..=1.).contains(&self.exploration_rate) {
            return Err(TaxiError::Configuration(format!(
                "exploration_rate must be in [0, 1], got {}",
                self.exploration_rate
            )));
        }
        if self.episodes == 0 {
            return Err(TaxiError::Configuration(
                "episodes must be positive".to_string(),
            ));
        }
        if self.max_steps_per_episode == Some(0) {
            return Err(TaxiError::Configuration(
                "max_steps_per_episode must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub trips: usize,
    pub max_steps_per_trip: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            trips: 100,
            max_steps_per_trip: 200,
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trips == 0 {
            return Err(TaxiError::Configuration(
                "trips must be positive".to_string(),
            ));
        }
        if self.max_steps_per_trip == 0 {
            return Err(TaxiError::Configuration(
                "max_steps_per_trip must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub training: TrainingConfig,
    pub evaluation: EvaluationConfig,
    pub seed: u64,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.training.validate()?;
        self.evaluation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[rstest]
    #[case::zero_alpha(TrainingConfig { learning_rate: 0., ..Default::default() })]
    #[case::big_alpha(TrainingConfig { learning_rate: 1.5, ..Default::default() })]
    #[case::nan_alpha(TrainingConfig { learning_rate: Continous::NAN, ..Default::default() })]
    #[case::negative_gamma(TrainingConfig { discount_factor: -0.1, ..Default::default() })]
    #[case::big_gamma(TrainingConfig { discount_factor: 1.01, ..Default::default() })]
    #[case::big_epsilon(TrainingConfig { exploration_rate: 2., ..Default::default() })]
    #[case::no_episodes(TrainingConfig { episodes: 0, ..Default::default() })]
    #[case::zero_cap(TrainingConfig { max_steps_per_episode: Some(0), ..Default::default() })]
    fn invalid_training_config_is_rejected(#[case] config: TrainingConfig) {
        assert!(matches!(config.validate(), Err(TaxiError::Configuration(_))));
    }

    #[test]
    fn boundary_values_are_accepted() {
        let config = TrainingConfig {
            learning_rate: 1.,
            discount_factor: 0.,
            exploration_rate: 1.,
            max_steps_per_episode: None,
            ..Default::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn invalid_evaluation_config_is_rejected() {
        let config = Config {
            evaluation: EvaluationConfig { trips: 0, ..Default::default() },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TaxiError::Configuration(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "seed": 42, "training": { "episodes": 500 } }"#).unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.training.episodes, 500);
        assert_eq!(config.training.discount_factor, 0.6);
        assert_eq!(config.evaluation, EvaluationConfig::default());
    }
}
