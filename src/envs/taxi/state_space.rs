use crate::common::defs::*;
use crate::error::{Result, TaxiError};
use serde::Serialize;

pub const ROWS: usize = 5;
pub const COLS: usize = 5;
pub const NUM_SITES: usize = 4;

/// Passenger location sentinel: the passenger is riding in the taxi.
pub const IN_TAXI: usize = NUM_SITES;

pub const N_STATES: usize = ROWS * COLS * (NUM_SITES + 1) * NUM_SITES;

/// Refer: https://gymnasium.farama.org/environments/toy_text/taxi/
///
/// `|` separates cells that a taxi cannot cross, `:` separates open cells.
const MAP: [&str; ROWS + 2] = [
    "+---------+",
    "|R: | : :G|",
    "| : | : : |",
    "| : : : : |",
    "| | : | : |",
    "|Y| : |B: |",
    "+---------+",
];

/// R, G, Y, B.
const SITES: [Coordinate; NUM_SITES] = [
    Coordinate { row: 0, col: 0 },
    Coordinate { row: 0, col: 4 },
    Coordinate { row: 4, col: 0 },
    Coordinate { row: 4, col: 3 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < ROWS && self.col < COLS
    }
}

/// Decoded state. Always holds fields within their ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TaxiState {
    taxi: Coordinate,
    passenger: usize,
    destination: usize,
}

impl TaxiState {
    pub fn new(
        taxi_row: usize,
        taxi_col: usize,
        passenger: usize,
        destination: usize,
    ) -> Result<Self> {
        if taxi_row >= ROWS || taxi_col >= COLS {
            return Err(TaxiError::InvalidStateEncoding(format!(
                "taxi ({taxi_row}, {taxi_col}) is outside the {ROWS}x{COLS} grid"
            )));
        }
        if passenger > IN_TAXI {
            return Err(TaxiError::InvalidStateEncoding(format!(
                "passenger location {passenger} is outside 0..={IN_TAXI}"
            )));
        }
        if destination >= NUM_SITES {
            return Err(TaxiError::InvalidStateEncoding(format!(
                "destination {destination} is outside 0..{NUM_SITES}"
            )));
        }

        Ok(Self {
            taxi: Coordinate::new(taxi_row, taxi_col),
            passenger,
            destination,
        })
    }

    pub fn taxi(&self) -> Coordinate {
        self.taxi
    }

    pub fn passenger(&self) -> usize {
        self.passenger
    }

    pub fn destination(&self) -> usize {
        self.destination
    }

    pub fn passenger_in_taxi(&self) -> bool {
        self.passenger == IN_TAXI
    }

    pub fn with_taxi(self, taxi: Coordinate) -> Self {
        debug_assert!(taxi.in_bounds());
        Self { taxi, ..self }
    }

    pub fn with_passenger(self, passenger: usize) -> Self {
        debug_assert!(passenger <= IN_TAXI);
        Self { passenger, ..self }
    }

    pub fn encode(&self) -> Discrete {
        ((self.taxi.row * COLS + self.taxi.col) * (NUM_SITES + 1) + self.passenger) * NUM_SITES
            + self.destination
    }
}

pub fn encode(
    taxi_row: usize,
    taxi_col: usize,
    passenger: usize,
    destination: usize,
) -> Result<Discrete> {
    TaxiState::new(taxi_row, taxi_col, passenger, destination).map(|s| s.encode())
}

pub fn decode(s: Discrete) -> Result<TaxiState> {
    if s >= N_STATES {
        return Err(TaxiError::InvalidStateEncoding(format!(
            "state {s} is outside 0..{N_STATES}"
        )));
    }

    let destination = s % NUM_SITES;
    let s = s / NUM_SITES;
    let passenger = s % (NUM_SITES + 1);
    let s = s / (NUM_SITES + 1);
    let taxi_col = s % COLS;
    let taxi_row = s / COLS;

    TaxiState::new(taxi_row, taxi_col, passenger, destination)
}

/// True when `a` and `b` are horizontal neighbours with a wall between them.
/// The reference map has no horizontal wall segments, so vertical neighbours
/// are never separated and non-adjacent cells have no wall "between" them.
pub fn wall_between(a: Coordinate, b: Coordinate) -> bool {
    if !a.in_bounds() || !b.in_bounds() || a.row != b.row || a.col.abs_diff(b.col) != 1 {
        return false;
    }

    let col = a.col.min(b.col);
    MAP[1 + a.row].as_bytes()[2 * col + 2] == b'|'
}

pub fn pickup_sites() -> &'static [Coordinate] {
    &SITES
}

pub fn dropoff_sites() -> &'static [Coordinate] {
    &SITES
}

pub fn site_at(c: Coordinate) -> Option<usize> {
    SITES.iter().position(|&s| s == c)
}
