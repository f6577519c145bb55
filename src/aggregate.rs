//! Global aggregation state. Implement `Aggregator` for a run's state and the
//! orchestrators fold every processor partial into it.

use crate::frequency::FrequencyTable;
use crate::processor::DatePartial;
use ahash::AHashMap;
use time::Date;

pub trait Aggregator: Default {
    type Partial;

    /// Fold one partial into the running totals. Order of merges never
    /// changes the resulting counts.
    fn merge(&mut self, part: Self::Partial);
}

/// A single key → count ranking (emojis, mentions).
#[derive(Debug, Default)]
pub struct CountAggregator {
    counts: FrequencyTable<String>,
}

impl Aggregator for CountAggregator {
    type Partial = FrequencyTable<String>;

    fn merge(&mut self, part: Self::Partial) {
        self.counts.merge(part);
    }
}

impl CountAggregator {
    pub fn top_n(&self, n: usize) -> Vec<(String, u64)> {
        self.counts.top_n(n).into_iter().map(|(k, c)| (k.clone(), c)).collect()
    }

    pub fn counts(&self) -> &FrequencyTable<String> {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.total()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Posts per day, plus who posted on each day.
#[derive(Debug, Default)]
pub struct DateUserAggregator {
    dates: FrequencyTable<Date>,
    users: AHashMap<Date, FrequencyTable<String>>,
}

impl Aggregator for DateUserAggregator {
    type Partial = DatePartial;

    fn merge(&mut self, part: Self::Partial) {
        self.dates.merge(part.dates);
        for (day, users) in part.users {
            self.users.entry(day).or_default().merge(users);
        }
    }
}

impl DateUserAggregator {
    pub fn top_dates(&self, n: usize) -> Vec<(Date, u64)> {
        self.dates.top_n(n).into_iter().map(|(d, c)| (*d, c)).collect()
    }

    /// Most frequent username on `day`, or `None` when nobody is attributable.
    pub fn top_user_for(&self, day: Date) -> Option<&str> {
        self.users
            .get(&day)
            .and_then(|t| t.most_common())
            .map(|(name, _)| name.as_str())
    }

    pub fn date_count(&self, day: Date) -> u64 {
        self.dates.get(&day)
    }

    pub fn user_count(&self, day: Date, username: &str) -> u64 {
        self.users.get(&day).map_or(0, |t| t.get(username))
    }

    pub fn dates(&self) -> &FrequencyTable<Date> {
        &self.dates
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
