use super::action::*;
use super::state_space::*;
use crate::common::defs::*;
use crate::error::Result;
use itertools::iproduct;

pub const STEP_REWARD: Continous = -1.;
pub const ILLEGAL_ACTION_REWARD: Continous = -10.;
pub const DROPOFF_REWARD: Continous = 20.;

/// Deterministic dynamics of the taxi grid. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionModel;

impl TransitionModel {
    pub fn step(&self, s: Discrete, a: Action) -> Result<StepInfo> {
        let state = decode(s)?;
        Ok(self.apply(state, a))
    }

    pub fn apply(&self, state: TaxiState, a: Action) -> StepInfo {
        let (next, reward, terminated) = match a {
            Action::North | Action::South | Action::East | Action::West => (
                state.with_taxi(Self::moved(state.taxi(), a)),
                STEP_REWARD,
                false,
            ),

            Action::Pickup => {
                if Self::can_pickup(&state) {
                    (state.with_passenger(IN_TAXI), STEP_REWARD, false)
                } else {
                    (state, ILLEGAL_ACTION_REWARD, false)
                }
            }

            Action::Dropoff => {
                if Self::can_dropoff(&state) {
                    (state.with_passenger(state.destination()), DROPOFF_REWARD, true)
                } else {
                    (state, ILLEGAL_ACTION_REWARD, false)
                }
            }
        };

        StepInfo {
            observation: next.encode(),
            reward,
            terminated,
        }
    }

    /// Actions that change the state. Blocked moves and illegal
    /// pickups/dropoffs are masked out.
    pub fn action_mask(&self, s: Discrete) -> Result<[bool; N_ACTIONS]> {
        let state = decode(s)?;
        let mut mask = [false; N_ACTIONS];
        for a in Action::ALL {
            mask[a.index()] = match a {
                Action::Pickup => Self::can_pickup(&state),
                Action::Dropoff => Self::can_dropoff(&state),
                _ => Self::moved(state.taxi(), a) != state.taxi(),
            };
        }

        Ok(mask)
    }

    /// Full transition table in the same shape the gymnasium server exposes
    /// for discrete environments. Every entry is a single certain outcome.
    pub fn transitions(&self) -> Transitions {
        iproduct!(0..N_STATES, Action::ALL)
            .map(|(s, a)| {
                let si = self.apply(decode_valid(s), a);
                (
                    (s, a.index()),
                    vec![Transition {
                        next_state: si.observation,
                        probability: 1.,
                        reward: si.reward,
                        done: si.terminated,
                    }],
                )
            })
            .collect()
    }

    fn moved(taxi: Coordinate, a: Action) -> Coordinate {
        let Some((dr, dc)) = a.delta() else {
            return taxi;
        };
        let (Some(row), Some(col)) = (
            taxi.row.checked_add_signed(dr),
            taxi.col.checked_add_signed(dc),
        ) else {
            return taxi;
        };

        let next = Coordinate::new(row, col);
        if !next.in_bounds() || wall_between(taxi, next) {
            taxi
        } else {
            next
        }
    }

    fn can_pickup(state: &TaxiState) -> bool {
        !state.passenger_in_taxi() && site_at(state.taxi()) == Some(state.passenger())
    }

    fn can_dropoff(state: &TaxiState) -> bool {
        state.passenger_in_taxi() && site_at(state.taxi()) == Some(state.destination())
    }
}

fn decode_valid(s: Discrete) -> TaxiState {
    match decode(s) {
        Ok(state) => state,
        Err(e) => unreachable!("{s} enumerated from 0..{N_STATES}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaxiError;
    use float_eq::*;
    use rstest::rstest;

    fn state(r: usize, c: usize, p: usize, d: usize) -> Discrete {
        encode(r, c, p, d).unwrap()
    }

    #[rstest]
    #[case::north((2, 2), Action::North, (1, 2))]
    #[case::south((2, 2), Action::South, (3, 2))]
    #[case::east((2, 2), Action::East, (2, 3))]
    #[case::west((2, 2), Action::West, (2, 1))]
    #[case::north_edge((0, 3), Action::North, (0, 3))]
    #[case::south_edge((4, 4), Action::South, (4, 4))]
    #[case::east_edge((1, 4), Action::East, (1, 4))]
    #[case::west_edge((2, 0), Action::West, (2, 0))]
    #[case::wall_east_row0((0, 1), Action::East, (0, 1))]
    #[case::wall_west_row1((1, 2), Action::West, (1, 2))]
    #[case::wall_east_row3((3, 0), Action::East, (3, 0))]
    #[case::wall_west_row4((4, 3), Action::West, (4, 3))]
    #[case::open_row4((4, 3), Action::East, (4, 4))]
    fn movement_costs_one_step(
        #[case] from: (usize, usize),
        #[case] a: Action,
        #[case] to: (usize, usize),
    ) {
        let si = TransitionModel.step(state(from.0, from.1, 1, 2), a).unwrap();

        let next = decode(si.observation).unwrap();
        assert_eq!(next.taxi(), Coordinate::new(to.0, to.1));
        assert_eq!((next.passenger(), next.destination()), (1, 2));
        assert_float_eq!(si.reward, STEP_REWARD, abs <= 1e-12);
        assert!(!si.terminated);
    }

    #[test]
    fn pickup_at_passenger_site_boards_passenger() {
        let si = TransitionModel.step(state(4, 3, 3, 0), Action::Pickup).unwrap();

        assert_eq!(si.observation, state(4, 3, IN_TAXI, 0));
        assert_float_eq!(si.reward, -1., abs <= 1e-12);
        assert!(!si.terminated);
    }

    #[rstest]
    #[case::not_a_site(state(2, 2, 0, 1))]
    #[case::other_site(state(0, 4, 0, 1))]
    #[case::already_aboard(state(0, 0, IN_TAXI, 1))]
    fn illegal_pickup_is_penalised(#[case] s: Discrete) {
        let si = TransitionModel.step(s, Action::Pickup).unwrap();

        assert_eq!(si.observation, s);
        assert_float_eq!(si.reward, -10., abs <= 1e-12);
        assert!(!si.terminated);
    }

    #[test]
    fn dropoff_at_destination_ends_episode() {
        let si = TransitionModel.step(state(0, 4, IN_TAXI, 1), Action::Dropoff).unwrap();

        assert_eq!(si.observation, state(0, 4, 1, 1));
        assert_float_eq!(si.reward, 20., abs <= 1e-12);
        assert!(si.terminated);
    }

    #[rstest]
    #[case::not_aboard_at_destination(state(0, 4, 2, 1))]
    #[case::wrong_site(state(4, 0, IN_TAXI, 1))]
    #[case::not_a_site(state(2, 2, IN_TAXI, 1))]
    #[case::reference_not_aboard(state(2, 3, 2, 0))]
    #[case::state_368(368)]
    fn illegal_dropoff_is_penalised(#[case] s: Discrete) {
        let si = TransitionModel.step(s, Action::Dropoff).unwrap();

        assert_eq!(si.observation, s);
        assert_float_eq!(si.reward, -10., abs <= 1e-12);
        assert!(!si.terminated);
    }

    #[test]
    fn step_rejects_bad_state() {
        assert!(matches!(
            TransitionModel.step(N_STATES, Action::North),
            Err(TaxiError::InvalidStateEncoding(_))
        ));
    }

    #[test]
    fn action_mask_matches_state_changes() {
        for s in 0..N_STATES {
            let mask = TransitionModel.action_mask(s).unwrap();
            for a in Action::ALL {
                let si = TransitionModel.step(s, a).unwrap();
                assert_eq!(mask[a.index()], si.observation != s, "state {s}, {a:?}");
            }
        }
    }

    #[test]
    fn transition_table_agrees_with_step() {
        let ts = TransitionModel.transitions();
        assert_eq!(ts.len(), N_STATES * N_ACTIONS);

        for ((s, a), t) in &ts {
            let si = TransitionModel.step(*s, Action::try_from(*a).unwrap()).unwrap();
            assert_eq!(
                t,
                &vec![Transition {
                    next_state: si.observation,
                    probability: 1.,
                    reward: si.reward,
                    done: si.terminated,
                }]
            );
        }
    }
}
