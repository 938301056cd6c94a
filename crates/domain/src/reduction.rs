//! Generic event reduction strategies.
//!
//! Each strategy turns one domain's [`EventLog`] into that domain's current
//! value. Projections are thin configurations of these three strategies and
//! never re-implement the walk themselves:
//!
//! - [`LatestWins`]: the chronologically last event per key
//! - [`SignedSum`]: a running total of deltas per key
//! - [`MembershipCount`]: set membership from paired +1/−1 actions, with an
//!   optional sticky override carried by the latest event for the key
//!
//! All strategies are pure. An empty log yields an empty map or set.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use serde::Serialize;

use crate::events::{Event, EventLog};

/// A reduction from an ordered event log to a current-state value.
pub trait Reduction<T> {
    type Output;

    fn reduce(&self, log: &EventLog<T>) -> Self::Output;
}

// =============================================================================
// Latest-wins keyed reduction
// =============================================================================

/// Keeps the value of the chronologically last event for each key.
pub struct LatestWins<K, V> {
    key: K,
    value: V,
}

impl<K, V> LatestWins<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<T, Key, Value, K, V> Reduction<T> for LatestWins<K, V>
where
    Key: Ord,
    K: Fn(&Event<T>) -> Key,
    V: Fn(&Event<T>) -> Value,
{
    type Output = BTreeMap<Key, Value>;

    fn reduce(&self, log: &EventLog<T>) -> Self::Output {
        log.iter()
            .map(|event| ((self.key)(event), (self.value)(event)))
            .collect()
    }
}

// =============================================================================
// Signed cumulative reduction
// =============================================================================

/// Sums a delta per key. Scalar domains use the unit key.
pub struct SignedSum<K, D> {
    key: K,
    delta: D,
}

impl<K, D> SignedSum<K, D> {
    pub fn new(key: K, delta: D) -> Self {
        Self { key, delta }
    }
}

impl<T, Key, Total, K, D> Reduction<T> for SignedSum<K, D>
where
    Key: Ord,
    Total: Default + AddAssign,
    K: Fn(&Event<T>) -> Key,
    D: Fn(&Event<T>) -> Total,
{
    type Output = BTreeMap<Key, Total>;

    fn reduce(&self, log: &EventLog<T>) -> Self::Output {
        let mut totals: BTreeMap<Key, Total> = BTreeMap::new();
        for event in log {
            *totals.entry((self.key)(event)).or_default() += (self.delta)(event);
        }
        totals
    }
}

/// [`SignedSum`] without a key: every event adds to one total.
pub struct ScalarSum<D> {
    delta: D,
}

impl<D> ScalarSum<D> {
    pub fn new(delta: D) -> Self {
        Self { delta }
    }
}

impl<T, Total, D> Reduction<T> for ScalarSum<D>
where
    Total: Default + AddAssign,
    D: Fn(&Event<T>) -> Total,
{
    type Output = Total;

    fn reduce(&self, log: &EventLog<T>) -> Self::Output {
        let mut total = Total::default();
        for event in log {
            total += (self.delta)(event);
        }
        total
    }
}

// =============================================================================
// Signed membership-counting reduction
// =============================================================================

/// Whether an event adds to or removes from a key's membership count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipSign {
    Add,
    Remove,
}

impl MembershipSign {
    fn value(self) -> i64 {
        match self {
            Self::Add => 1,
            Self::Remove => -1,
        }
    }
}

/// What one event contributes to its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipVote {
    pub sign: MembershipSign,
    /// Forces membership while this is the latest event for the key.
    pub sticky: bool,
}

impl MembershipVote {
    pub fn add() -> Self {
        Self {
            sign: MembershipSign::Add,
            sticky: false,
        }
    }

    pub fn remove() -> Self {
        Self {
            sign: MembershipSign::Remove,
            sticky: false,
        }
    }

    pub fn sticky(mut self, sticky: bool) -> Self {
        self.sticky = sticky;
        self
    }
}

/// Tally for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub net: i64,
    pub sticky: bool,
}

impl Membership {
    pub fn is_member(&self) -> bool {
        self.net > 0 || self.sticky
    }
}

/// Keys currently holding membership, in the order each key first appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipSet<K> {
    members: Vec<(K, Membership)>,
}

impl<K: PartialEq> MembershipSet<K> {
    pub fn contains(&self, key: &K) -> bool {
        self.members.iter().any(|(k, _)| k == key)
    }
}

impl<K> MembershipSet<K> {
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Membership)> {
        self.members.iter().map(|(k, m)| (k, m))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.members.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<K> Default for MembershipSet<K> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
        }
    }
}

/// Counts +1/−1 votes per key; a key is a member while its net count is
/// positive or its latest vote is sticky.
pub struct MembershipCount<K, A> {
    key: K,
    vote: A,
}

impl<K, A> MembershipCount<K, A> {
    pub fn new(key: K, vote: A) -> Self {
        Self { key, vote }
    }
}

impl<T, Key, K, A> Reduction<T> for MembershipCount<K, A>
where
    Key: Ord + Clone,
    K: Fn(&Event<T>) -> Key,
    A: Fn(&Event<T>) -> MembershipVote,
{
    type Output = MembershipSet<Key>;

    fn reduce(&self, log: &EventLog<T>) -> Self::Output {
        let mut first_seen: BTreeMap<Key, usize> = BTreeMap::new();
        let mut tallies: Vec<(Key, Membership)> = Vec::new();

        for event in log {
            let key = (self.key)(event);
            let vote = (self.vote)(event);
            let index = *first_seen.entry(key.clone()).or_insert_with(|| {
                tallies.push((
                    key,
                    Membership {
                        net: 0,
                        sticky: false,
                    },
                ));
                tallies.len() - 1
            });
            let tally = &mut tallies[index].1;
            tally.net += vote.sign.value();
            tally.sticky = vote.sticky;
        }

        MembershipSet {
            members: tallies.into_iter().filter(|(_, m)| m.is_member()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::{ev, ev_at, log};

    #[derive(Debug, Clone, PartialEq)]
    struct Set {
        key: &'static str,
        value: i32,
    }

    fn latest() -> LatestWins<impl Fn(&Event<Set>) -> &'static str, impl Fn(&Event<Set>) -> i32> {
        LatestWins::new(|e: &Event<Set>| e.payload.key, |e: &Event<Set>| e.payload.value)
    }

    #[test]
    fn latest_wins_keeps_last_per_key() {
        let events = log(vec![
            ev(1, Set { key: "a", value: 1 }),
            ev(2, Set { key: "b", value: 2 }),
            ev(3, Set { key: "a", value: 3 }),
        ]);
        let state = latest().reduce(&events);
        assert_eq!(state.get("a"), Some(&3));
        assert_eq!(state.get("b"), Some(&2));
    }

    #[test]
    fn latest_wins_ignores_input_order() {
        // Later timestamp wins even when listed first; on a tie the later id wins.
        let events = log(vec![
            ev_at(5, 20, Set { key: "a", value: 20 }),
            ev_at(4, 10, Set { key: "a", value: 10 }),
            ev_at(9, 30, Set { key: "b", value: 1 }),
            ev_at(8, 30, Set { key: "b", value: 2 }),
        ]);
        let state = latest().reduce(&events);
        assert_eq!(state.get("a"), Some(&20));
        assert_eq!(state.get("b"), Some(&1));
    }

    #[test]
    fn signed_sum_per_key_and_scalar() {
        let events = log(vec![
            ev(1, Set { key: "gp", value: 50 }),
            ev(2, Set { key: "gp", value: -20 }),
            ev(3, Set { key: "gp", value: 5 }),
            ev(4, Set { key: "sp", value: 7 }),
        ]);
        let keyed = SignedSum::new(
            |e: &Event<Set>| e.payload.key,
            |e: &Event<Set>| i64::from(e.payload.value),
        )
        .reduce(&events);
        assert_eq!(keyed.get("gp"), Some(&35));
        assert_eq!(keyed.get("sp"), Some(&7));

        let total = ScalarSum::new(|e: &Event<Set>| i64::from(e.payload.value)).reduce(&events);
        assert_eq!(total, 42);
    }

    #[test]
    fn reductions_of_empty_log_are_zero_values() {
        let events = log::<Set>(vec![]);
        assert!(latest().reduce(&events).is_empty());
        assert_eq!(
            ScalarSum::new(|e: &Event<Set>| i64::from(e.payload.value)).reduce(&events),
            0
        );
    }

    fn counting() -> MembershipCount<
        impl Fn(&Event<(&'static str, MembershipVote)>) -> &'static str,
        impl Fn(&Event<(&'static str, MembershipVote)>) -> MembershipVote,
    > {
        MembershipCount::new(
            |e: &Event<(&'static str, MembershipVote)>| e.payload.0,
            |e: &Event<(&'static str, MembershipVote)>| e.payload.1,
        )
    }

    #[test]
    fn membership_requires_positive_net_count() {
        let known = log(vec![
            ev(1, ("a", MembershipVote::add())),
            ev(2, ("a", MembershipVote::add())),
            ev(3, ("a", MembershipVote::remove())),
        ]);
        assert!(counting().reduce(&known).contains(&"a"));

        let forgotten = log(vec![
            ev(1, ("a", MembershipVote::add())),
            ev(2, ("a", MembershipVote::remove())),
            ev(3, ("a", MembershipVote::remove())),
        ]);
        let set = counting().reduce(&forgotten);
        assert!(!set.contains(&"a"));
        assert!(set.is_empty());
    }

    #[test]
    fn sticky_latest_vote_forces_membership() {
        let events = log(vec![
            ev(1, ("a", MembershipVote::remove())),
            ev(2, ("a", MembershipVote::add().sticky(true))),
            ev(3, ("b", MembershipVote::add().sticky(true))),
            ev(4, ("b", MembershipVote::remove())),
        ]);
        let set = counting().reduce(&events);
        // a: net 0 but latest sticky -> member
        assert!(set.contains(&"a"));
        // b: net 0 and latest not sticky -> not a member
        assert!(!set.contains(&"b"));
    }

    #[test]
    fn membership_keeps_first_seen_order() {
        let events = log(vec![
            ev(1, ("z", MembershipVote::add())),
            ev(2, ("a", MembershipVote::add())),
            ev(3, ("m", MembershipVote::add())),
        ]);
        let keys: Vec<_> = counting().reduce(&events).keys().copied().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn reducing_twice_or_with_empty_suffix_is_stable() {
        let events = log(vec![
            ev(1, ("a", MembershipVote::add())),
            ev(2, ("b", MembershipVote::add())),
            ev(3, ("a", MembershipVote::remove())),
        ]);
        let once = counting().reduce(&events);
        let twice = counting().reduce(&events);
        let mut extended = events.clone().into_events();
        extended.extend(Vec::new());
        assert_eq!(once, twice);
        assert_eq!(once, counting().reduce(&log(extended)));
    }
}
