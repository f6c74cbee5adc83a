//! Daily reward throttle
//!
//! Remembers, per action key (a [`RewardAction`] for characters), the
//! calendar date of the last grant so the same reward cannot be collected
//! twice on one day. Dates are whatever the
//! caller considers "today"; no timezone normalization happens here.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::value_objects::RewardAction;

/// View over a map of last-grant dates, one entry per action key
pub struct DailyThrottle<'a, K = RewardAction> {
    last_granted: &'a mut BTreeMap<K, NaiveDate>,
}

impl<'a, K: Ord + Copy> DailyThrottle<'a, K> {
    pub fn new(last_granted: &'a mut BTreeMap<K, NaiveDate>) -> Self {
        Self { last_granted }
    }

    /// Whether `action` was already granted on `today`
    pub fn is_throttled(&self, action: K, today: NaiveDate) -> bool {
        self.last_granted.get(&action) == Some(&today)
    }

    /// Record a grant of `action` on `today`.
    ///
    /// Returns `false` without touching anything if it was already granted
    /// that day.
    pub fn try_grant(&mut self, action: K, today: NaiveDate) -> bool {
        if self.is_throttled(action, today) {
            return false;
        }
        self.last_granted.insert(action, today);
        true
    }
}
