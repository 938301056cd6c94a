use serde::Serialize;

use super::Projection;
use crate::events::{Event, EventLog, HitPointsChanged};
use crate::reduction::{Reduction, ScalarSum};

/// Net damage and healing relative to maximum hit points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HitPointOffset(i64);

impl HitPointOffset {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Current hit points for a given maximum, kept within `0..=max`.
    pub fn current(&self, max_hit_points: i32) -> i32 {
        let max = i64::from(max_hit_points.max(0));
        (max + self.0).clamp(0, max) as i32
    }
}

impl Projection<HitPointsChanged> for HitPointOffset {
    fn project(log: &EventLog<HitPointsChanged>) -> Self {
        Self(ScalarSum::new(|e: &Event<HitPointsChanged>| i64::from(e.payload.delta)).reduce(log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::{ev, log};

    fn hp(delta: i32) -> HitPointsChanged {
        HitPointsChanged { delta }
    }

    #[test]
    fn damage_then_healing() {
        let offset = HitPointOffset::project(&log(vec![ev(1, hp(-15)), ev(2, hp(5))]));
        assert_eq!(offset.value(), -10);
        assert_eq!(offset.current(30), 20);
    }

    #[test]
    fn current_is_clamped() {
        let overhealed = HitPointOffset::project(&log(vec![ev(1, hp(12))]));
        assert_eq!(overhealed.current(30), 30);
        let downed = HitPointOffset::project(&log(vec![ev(1, hp(-50))]));
        assert_eq!(downed.current(30), 0);
        assert_eq!(HitPointOffset::default().current(30), 30);
    }
}
