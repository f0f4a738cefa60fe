use crate::common::defs::Discrete;
use crate::error::TaxiError;
use serde::Serialize;

pub const N_ACTIONS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
    Pickup = 4,
    Dropoff = 5,
}

impl Action {
    pub const ALL: [Action; N_ACTIONS] = [
        Action::North,
        Action::South,
        Action::East,
        Action::West,
        Action::Pickup,
        Action::Dropoff,
    ];

    pub fn index(self) -> Discrete {
        self as Discrete
    }

    /// Row and column delta for movement actions.
    pub fn delta(self) -> Option<(isize, isize)> {
        match self {
            Action::North => Some((-1, 0)),
            Action::South => Some((1, 0)),
            Action::East => Some((0, 1)),
            Action::West => Some((0, -1)),
            Action::Pickup | Action::Dropoff => None,
        }
    }
}

impl TryFrom<Discrete> for Action {
    type Error = TaxiError;

    fn try_from(a: Discrete) -> Result<Self, Self::Error> {
        Action::ALL
            .get(a)
            .copied()
            .ok_or(TaxiError::InvalidAction(a))
    }
}
