use super::gradient_free::off_policy::q_learning::EpisodeStats;
use super::MdpSimulator;
use crate::common::defs::*;
use crate::error::{Result, TaxiError};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub per_trip_steps: Vec<usize>,
    pub average_steps: Continous,
    pub per_trip_penalties: Vec<usize>,
    pub average_penalties: Continous,
    /// Trips that ended in a successful dropoff within the step cap.
    pub completed: usize,
}

impl EvaluationReport {
    fn from_trips(trips: &[EpisodeStats]) -> Self {
        let per_trip_steps: Vec<_> = trips.iter().map(|t| t.steps).collect();
        let per_trip_penalties: Vec<_> = trips.iter().map(|t| t.penalties).collect();

        Self {
            average_steps: mean(&per_trip_steps),
            average_penalties: mean(&per_trip_penalties),
            completed: trips.iter().filter(|t| t.terminated).count(),
            per_trip_steps,
            per_trip_penalties,
        }
    }

    pub fn success_rate(&self) -> Continous {
        self.completed as Continous / self.per_trip_steps.len().max(1) as Continous
    }
}

fn mean(xs: &[usize]) -> Continous {
    if xs.is_empty() {
        0.
    } else {
        xs.iter().sum::<usize>() as Continous / xs.len() as Continous
    }
}

/// Greedy rollouts of `policy`. Never explores and never writes to the policy.
pub fn evaluate<E, P>(
    env: &mut E,
    policy: &P,
    trip_count: usize,
    max_steps_per_trip: usize,
) -> Result<EvaluationReport>
where
    E: MdpSimulator,
    P: Policy + ?Sized,
{
    if trip_count == 0 || max_steps_per_trip == 0 {
        return Err(TaxiError::Configuration(format!(
            "trip_count ({trip_count}) and max_steps_per_trip ({max_steps_per_trip}) must be positive"
        )));
    }

    if let Some((n_s, n_a)) = policy.shape() {
        if (n_s, n_a) != (env.n_s(), env.n_a()) {
            return Err(TaxiError::InvalidOperation(format!(
                "'{}' has {}x{} state-actions, policy table has {n_s}x{n_a}",
                env.name(),
                env.n_s(),
                env.n_a()
            )));
        }
    }

    let mut trips = Vec::with_capacity(trip_count);
    for _ in 0..trip_count {
        let mut stats = EpisodeStats::default();
        let mut s = env.reset();
        while stats.steps < max_steps_per_trip {
            let si = env.step(policy.policy(s))?;
            stats.record(&si);
            s = si.observation;
            if si.terminated {
                break;
            }
        }
        trips.push(stats);
    }

    let report = EvaluationReport::from_trips(&trips);
    info!(
        env = %env.name(),
        trips = trip_count,
        completed = report.completed,
        average_steps = report.average_steps,
        average_penalties = report.average_penalties,
        "evaluation finished"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;

    /// Needs `len` advances to finish; anything else is penalised.
    struct Line {
        len: usize,
        s: Discrete,
    }

    impl MdpSimulator for Line {
        fn name(&self) -> String {
            "Line".to_string()
        }

        fn n_s(&self) -> usize {
            self.len + 1
        }

        fn n_a(&self) -> usize {
            2
        }

        fn reset(&mut self) -> Discrete {
            self.s = 0;
            self.s
        }

        fn step(&mut self, a: Discrete) -> Result<StepInfo> {
            let reward = if a == 0 {
                self.s += 1;
                -1.
            } else {
                -10.
            };
            Ok(StepInfo {
                observation: self.s,
                reward,
                terminated: self.s == self.len,
            })
        }
    }

    struct Always(Discrete);

    impl Policy for Always {
        fn policy(&self, _s: Discrete) -> Discrete {
            self.0
        }
    }

    #[test]
    fn reports_steps_of_completed_trips() {
        let env = &mut Line { len: 4, s: 0 };

        let report = evaluate(env, &Always(0), 3, 10).unwrap();

        assert_eq!(report.per_trip_steps, vec![4, 4, 4]);
        assert_float_eq!(report.average_steps, 4., abs <= 1e-12);
        assert_eq!(report.per_trip_penalties, vec![0, 0, 0]);
        assert_eq!(report.completed, 3);
        assert_float_eq!(report.success_rate(), 1., abs <= 1e-12);
    }

    #[test]
    fn trips_are_capped() {
        let env = &mut Line { len: 4, s: 0 };

        let report = evaluate(env, &Always(1), 2, 7).unwrap();

        assert_eq!(report.per_trip_steps, vec![7, 7]);
        assert_eq!(report.per_trip_penalties, vec![7, 7]);
        assert_float_eq!(report.average_penalties, 7., abs <= 1e-12);
        assert_eq!(report.completed, 0);
    }

    #[test]
    fn zero_trips_is_a_configuration_error() {
        let env = &mut Line { len: 1, s: 0 };
        assert!(matches!(
            evaluate(env, &Always(0), 0, 10),
            Err(TaxiError::Configuration(_))
        ));
        assert!(matches!(
            evaluate(env, &Always(0), 1, 0),
            Err(TaxiError::Configuration(_))
        ));
    }
}
