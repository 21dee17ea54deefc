//! Exact and bounded top-K selection over monotone frequency streams.
//!
//! Both modes keep the complete per-key count table; only the candidate
//! *ranking* structure is bounded. The bounded mode caps its candidates with
//! an indexed min-heap that updates a key's entry in place on every count
//! change, so a key never has more than one live entry and no stale-duplicate
//! cleanup pass exists.
//!
//! Ranking order everywhere: count descending, ties to the lexicographically
//! smaller key. Bounded displacement uses the same order, which makes the two
//! modes agree on the final ranking, ties included.

use ahash::AHashMap;
use std::cmp::Ordering;
use std::hash::Hash;

#[inline]
fn rank_cmp<K: Ord>(a: &(K, u64), b: &(K, u64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Select the top `k` entries of a finished frequency table.
pub fn top_k_of<K: Ord + Clone>(counts: &AHashMap<K, u64>, k: usize) -> Vec<(K, u64)> {
    let mut rows: Vec<(K, u64)> = counts.iter().map(|(key, &n)| (key.clone(), n)).collect();
    rows.sort_unstable_by(rank_cmp);
    rows.truncate(k);
    rows
}

// ----------------------------- Exact mode ----------------------------------

/// Exact mode: a complete frequency table, selection deferred to `finish`.
/// Memory is O(distinct keys).
#[derive(Clone, Debug)]
pub struct ExactTopK<K> {
    counts: AHashMap<K, u64>,
}

impl<K> ExactTopK<K> {
    pub fn new() -> Self {
        Self { counts: AHashMap::new() }
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<K> Default for ExactTopK<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Ord + Clone> ExactTopK<K> {
    #[inline]
    pub fn observe(&mut self, key: K) {
        self.observe_n(key, 1);
    }

    #[inline]
    pub fn observe_n(&mut self, key: K, n: u64) {
        *self.counts.entry(key).or_insert(0) += n;
    }

    pub fn count_of(&self, key: &K) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Sum another table into this one, per key. Commutative and
    /// associative, so parallel partials may merge in any order.
    pub fn merge(&mut self, other: Self) {
        for (key, n) in other.counts {
            self.observe_n(key, n);
        }
    }

    pub fn finish(self, k: usize) -> Vec<(K, u64)> {
        top_k_of(&self.counts, k)
    }
}

// ----------------------------- Bounded mode --------------------------------

/// Bounded mode: the complete count table plus a capacity-K candidate heap
/// re-evaluated on every increment. Auxiliary ranking memory never exceeds
/// O(K) regardless of distinct-key cardinality.
#[derive(Clone, Debug)]
pub struct BoundedTopK<K> {
    counts: AHashMap<K, u64>,
    candidates: IndexedMinHeap<K>,
}

impl<K: Eq + Hash + Ord + Clone> BoundedTopK<K> {
    pub fn new(capacity: usize) -> Self {
        Self { counts: AHashMap::new(), candidates: IndexedMinHeap::new(capacity) }
    }

    #[inline]
    pub fn observe(&mut self, key: K) {
        self.observe_n(key, 1);
    }

    pub fn observe_n(&mut self, key: K, n: u64) {
        if n == 0 {
            return;
        }
        let count = match self.counts.get_mut(&key) {
            Some(c) => {
                *c += n;
                *c
            }
            None => {
                self.counts.insert(key.clone(), n);
                n
            }
        };
        self.candidates.offer(&key, count);
    }

    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Live candidate count; never exceeds the configured capacity.
    pub fn candidate_len(&self) -> usize {
        self.candidates.len()
    }

    pub fn finish(self) -> Vec<(K, u64)> {
        let mut rows = self.candidates.into_entries();
        rows.sort_unstable_by(rank_cmp);
        rows
    }
}

/// Fixed-capacity min-heap over (count, key) with a key-to-slot index so an
/// existing candidate's count is bumped in place rather than re-pushed.
/// Between equal counts the lexicographically larger key sits closer to the
/// root (evicted first).
#[derive(Clone, Debug)]
struct IndexedMinHeap<K> {
    entries: Vec<(u64, K)>,
    pos: AHashMap<K, usize>,
    capacity: usize,
}

impl<K: Eq + Hash + Ord + Clone> IndexedMinHeap<K> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            pos: AHashMap::with_capacity(capacity),
            capacity,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when `a` orders below `b`, i.e. closer to eviction.
    #[inline]
    fn below(a: &(u64, K), b: &(u64, K)) -> bool {
        a.0 < b.0 || (a.0 == b.0 && a.1 > b.1)
    }

    /// Re-evaluate membership for `key` at its updated running `count`.
    /// Counts are monotone, so an in-place bump only ever sifts down.
    fn offer(&mut self, key: &K, count: u64) {
        if self.capacity == 0 {
            return;
        }
        if let Some(&i) = self.pos.get(key) {
            self.entries[i].0 = count;
            self.sift_down(i);
            return;
        }
        if self.entries.len() < self.capacity {
            self.entries.push((count, key.clone()));
            let i = self.entries.len() - 1;
            self.pos.insert(key.clone(), i);
            self.sift_up(i);
            return;
        }
        // Full: displace the minimum only when the new entry orders above it.
        let root = &self.entries[0];
        if root.0 < count || (root.0 == count && root.1 > *key) {
            let old = std::mem::replace(&mut self.entries[0], (count, key.clone()));
            self.pos.remove(&old.1);
            self.pos.insert(key.clone(), 0);
            self.sift_down(0);
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if Self::below(&self.entries[i], &self.entries[parent]) {
                self.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut lowest = i;
            if left < self.entries.len() && Self::below(&self.entries[left], &self.entries[lowest]) {
                lowest = left;
            }
            if right < self.entries.len() && Self::below(&self.entries[right], &self.entries[lowest]) {
                lowest = right;
            }
            if lowest == i {
                break;
            }
            self.swap(i, lowest);
            i = lowest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        if let Some(p) = self.pos.get_mut(&self.entries[a].1) {
            *p = a;
        }
        if let Some(p) = self.pos.get_mut(&self.entries[b].1) {
            *p = b;
        }
    }

    fn into_entries(self) -> Vec<(K, u64)> {
        self.entries.into_iter().map(|(n, k)| (k, n)).collect()
    }
}

// ----------------------------- Mode front ----------------------------------

/// Mode-parameterized front over the two engines, so each query driver is
/// written once and handed whichever mode its profile calls for.
pub enum TopKAggregator<K> {
    Exact(ExactTopK<K>),
    Bounded(BoundedTopK<K>),
}

impl<K: Eq + Hash + Ord + Clone> TopKAggregator<K> {
    pub fn exact() -> Self {
        Self::Exact(ExactTopK::new())
    }

    pub fn bounded(capacity: usize) -> Self {
        Self::Bounded(BoundedTopK::new(capacity))
    }

    #[inline]
    pub fn observe(&mut self, key: K) {
        match self {
            Self::Exact(agg) => agg.observe(key),
            Self::Bounded(agg) => agg.observe(key),
        }
    }

    pub fn distinct(&self) -> usize {
        match self {
            Self::Exact(agg) => agg.distinct(),
            Self::Bounded(agg) => agg.distinct(),
        }
    }

    pub fn finish(self, k: usize) -> Vec<(K, u64)> {
        match self {
            Self::Exact(agg) => agg.finish(k),
            Self::Bounded(agg) => {
                let mut rows = agg.finish();
                rows.truncate(k);
                rows
            }
        }
    }
}

// ----------------------------- Nested counter ------------------------------

/// Two-level table for the date query: primary key to (sub-key to count).
#[derive(Clone, Debug)]
pub struct NestedCounter<K, S> {
    table: AHashMap<K, AHashMap<S, u64>>,
}

impl<K, S> NestedCounter<K, S> {
    pub fn new() -> Self {
        Self { table: AHashMap::new() }
    }

    pub fn distinct(&self) -> usize {
        self.table.len()
    }
}

impl<K, S> Default for NestedCounter<K, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, S: Eq + Hash + Ord + Clone> NestedCounter<K, S> {
    pub fn observe(&mut self, key: K, sub: S) {
        *self.table.entry(key).or_default().entry(sub).or_insert(0) += 1;
    }

    /// Highest-count sub-key under `key`, ties to the lexicographically
    /// smaller sub-key. `None` when the key was never observed.
    pub fn leader(&self, key: &K) -> Option<(S, u64)> {
        let inner = self.table.get(key)?;
        let mut best: Option<(&S, u64)> = None;
        for (sub, &n) in inner {
            let better = match &best {
                None => true,
                Some((b, bn)) => n > *bn || (n == *bn && sub < *b),
            };
            if better {
                best = Some((sub, n));
            }
        }
        best.map(|(sub, n)| (sub.clone(), n))
    }
}
