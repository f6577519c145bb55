//! Frequency tables: key → count with first-insertion rank for stable top-N.

use ahash::AHashMap;
use std::borrow::Borrow;
use std::hash::Hash;

#[derive(Clone, Copy, Debug)]
struct Slot {
    count: u64,
    rank: u64,
}

/// Key → occurrence count. Counts only grow. Each key remembers when it was
/// first inserted, so equal counts rank in first-seen order.
#[derive(Clone, Debug)]
pub struct FrequencyTable<K> {
    slots: AHashMap<K, Slot>,
    next_rank: u64,
    total: u64,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self { slots: AHashMap::new(), next_rank: 0, total: 0 }
    }
}

impl<K: Eq + Hash> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`.
    #[inline]
    pub fn add(&mut self, key: K) {
        self.add_n(key, 1);
    }

    pub fn add_n(&mut self, key: K, n: u64) {
        let next_rank = &mut self.next_rank;
        let slot = self.slots.entry(key).or_insert_with(|| {
            let rank = *next_rank;
            *next_rank += 1;
            Slot { count: 0, rank }
        });
        slot.count += n;
        self.total += n;
    }

    /// Count one occurrence of a borrowed key, allocating only on first sight.
    pub fn add_ref<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(slot) = self.slots.get_mut(key) {
            slot.count += 1;
            self.total += 1;
        } else {
            self.add(key.to_owned());
        }
    }

    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.get(key).map_or(0, |s| s.count)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Fold `other` into `self`. Keys new to `self` are ranked after existing
    /// ones, in `other`'s own first-seen order.
    pub fn merge(&mut self, other: FrequencyTable<K>) {
        if self.is_empty() {
            // Adopt wholesale; ranks are already dense from zero.
            *self = other;
            return;
        }
        let mut incoming: Vec<(K, Slot)> = other.slots.into_iter().collect();
        incoming.sort_unstable_by_key(|(_, s)| s.rank);
        for (key, slot) in incoming {
            self.add_n(key, slot.count);
        }
    }

    /// The `n` highest counts, descending; ties by first-seen order.
    pub fn top_n(&self, n: usize) -> Vec<(&K, u64)> {
        let mut ranked: Vec<(&K, &Slot)> = self.slots.iter().collect();
        let by_count = |a: &(&K, &Slot), b: &(&K, &Slot)| {
            b.1.count.cmp(&a.1.count).then(a.1.rank.cmp(&b.1.rank))
        };
        if n < ranked.len() {
            if n == 0 {
                return Vec::new();
            }
            ranked.select_nth_unstable_by(n - 1, by_count);
            ranked.truncate(n);
        }
        ranked.sort_unstable_by(by_count);
        ranked.into_iter().map(|(k, s)| (k, s.count)).collect()
    }

    /// The single most frequent key, if any.
    pub fn most_common(&self) -> Option<(&K, u64)> {
        self.slots
            .iter()
            .min_by(|a, b| b.1.count.cmp(&a.1.count).then(a.1.rank.cmp(&b.1.rank)))
            .map(|(k, s)| (k, s.count))
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        let mut v: Vec<(&K, &Slot)> = self.slots.iter().collect();
        v.sort_unstable_by_key(|(_, s)| s.rank);
        v.into_iter().map(|(k, s)| (k, s.count))
    }
}

impl<K: Eq + Hash> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut t = Self::new();
        for k in iter {
            t.add(k);
        }
        t
    }
}

impl<K: Eq + Hash> Extend<K> for FrequencyTable<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            self.add(k);
        }
    }
}
