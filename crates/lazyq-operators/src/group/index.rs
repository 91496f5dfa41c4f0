//! Hash arena keyed through an injected equality comparer.
//!
//! Entries live in an insertion-ordered arena; `heads` holds one chain per
//! bucket (`hash & mask`), linked through `Entry::next`. Arena order is the
//! first-occurrence order every grouping/set operator relies on, so nothing
//! depends on a map's iteration order.

use lazyq_core::comparer::EqRef;
use lazyq_core::config::{QueryConfig, MAX_LOAD_PERCENT};

struct Entry<K> {
    key: K,
    hash: u64,
    next: Option<usize>,
    removed: bool,
}

pub struct KeyIndex<K> {
    comparer: EqRef<K>,
    heads: Vec<Option<usize>>,
    entries: Vec<Entry<K>>,
    live: usize,
    max_load_percent: usize,
}

impl<K> KeyIndex<K> {
    pub fn new(comparer: EqRef<K>) -> Self {
        Self::with_config(comparer, QueryConfig::global())
    }

    pub fn with_config(comparer: EqRef<K>, cfg: &QueryConfig) -> Self {
        Self {
            comparer,
            heads: vec![None; cfg.bucket_heads()],
            entries: Vec::new(),
            live: 0,
            max_load_percent: cfg.max_load_percent.clamp(1, MAX_LOAD_PERCENT),
        }
    }

    /// Live (not removed) keys.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Arena slots ever allocated, removed ones included.
    pub fn slots(&self) -> usize {
        self.entries.len()
    }

    pub fn key(&self, slot: usize) -> &K {
        &self.entries[slot].key
    }

    fn bucket(&self, hash: u64) -> usize {
        (hash as usize) & (self.heads.len() - 1)
    }

    fn find_hashed(&self, key: &K, hash: u64) -> Option<usize> {
        let mut cur = self.heads[self.bucket(hash)];
        while let Some(slot) = cur {
            let entry = &self.entries[slot];
            if !entry.removed && entry.hash == hash && self.comparer.equals(&entry.key, key) {
                return Some(slot);
            }
            cur = entry.next;
        }
        None
    }

    /// Slot of a live key equal to `key` under the comparer.
    pub fn find(&self, key: &K) -> Option<usize> {
        self.find_hashed(key, self.comparer.hash(key))
    }

    /// Returns `(slot, inserted)`. An existing live key keeps its slot.
    pub fn find_or_insert(&mut self, key: K) -> (usize, bool) {
        let hash = self.comparer.hash(&key);
        if let Some(slot) = self.find_hashed(&key, hash) {
            return (slot, false);
        }
        let load = (self.entries.len() + 1).saturating_mul(100);
        if load > self.heads.len().saturating_mul(self.max_load_percent) {
            self.grow();
        }
        let slot = self.entries.len();
        let bucket = self.bucket(hash);
        self.entries.push(Entry {
            key,
            hash,
            next: self.heads[bucket],
            removed: false,
        });
        self.heads[bucket] = Some(slot);
        self.live += 1;
        (slot, true)
    }

    /// Insert when absent; reports whether the key was new.
    pub fn insert(&mut self, key: K) -> bool {
        self.find_or_insert(key).1
    }

    /// Remove a live key. The slot stays allocated but is never matched again.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.find(key) {
            Some(slot) => {
                self.entries[slot].removed = true;
                self.live -= 1;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Keys in arena order, removed ones skipped.
    pub fn into_keys(self) -> Vec<K> {
        self.entries
            .into_iter()
            .filter(|e| !e.removed)
            .map(|e| e.key)
            .collect()
    }

    fn grow(&mut self) {
        let new_len = self.heads.len() * 2;
        self.heads = vec![None; new_len];
        for slot in 0..self.entries.len() {
            let bucket = self.bucket(self.entries[slot].hash);
            self.entries[slot].next = self.heads[bucket];
            self.heads[bucket] = Some(slot);
        }
    }
}
