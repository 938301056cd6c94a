use super::Projection;
use crate::events::{CoinsChanged, Event, EventLog};
use crate::reduction::{Reduction, ScalarSum};
use crate::value_objects::CoinPurse;

/// Field-wise sum of every coin delta.
impl Projection<CoinsChanged> for CoinPurse {
    fn project(log: &EventLog<CoinsChanged>) -> Self {
        ScalarSum::new(|e: &Event<CoinsChanged>| e.payload.delta).reduce(log)
    }
}
