//! Coin denominations.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// An amount of coin split across the five denominations.
///
/// Used both as the delta carried by a coin event and as the running
/// total produced by summing those deltas. Amounts are signed; keeping the
/// total non-negative is the writer's concern. Sums saturate at the `i64`
/// bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinPurse {
    pub pp: i64,
    pub gp: i64,
    pub ep: i64,
    pub sp: i64,
    pub cp: i64,
}

impl CoinPurse {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for CoinPurse {
    fn add_assign(&mut self, rhs: Self) {
        self.pp = self.pp.saturating_add(rhs.pp);
        self.gp = self.gp.saturating_add(rhs.gp);
        self.ep = self.ep.saturating_add(rhs.ep);
        self.sp = self.sp.saturating_add(rhs.sp);
        self.cp = self.cp.saturating_add(rhs.cp);
    }
}

#[cfg(test)]
impl CoinPurse {
    pub(crate) fn gold(gp: i64) -> Self {
        Self {
            gp,
            ..Self::default()
        }
    }
}
