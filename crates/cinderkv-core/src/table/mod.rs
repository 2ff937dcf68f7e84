//! The key table.
//!
//! A separately-chained hash table from key to [`Value`]. Buckets are
//! selected by the MurmurHash3 fingerprint of the key modulo the bucket
//! count, and the table doubles its capacity whenever the load factor
//! crosses the threshold.

use log::{debug, info};

use crate::hash::murmur3_32;
use crate::value::Value;

/// Bucket count a table starts with unless the caller chooses otherwise.
pub const DEFAULT_BUCKETS: usize = 1024;

/// Load factor above which the table doubles.
pub const LOAD_FACTOR_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    value: Value,
}

/// Separately-chained fingerprint-indexed map of keys to values.
#[derive(Debug)]
pub struct KeyTable {
    buckets: Vec<Vec<Entry>>,
    capacity: usize,
    count: usize,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Create a table with `buckets` initial buckets (clamped to at least 1).
    pub fn with_buckets(buckets: usize) -> Self {
        let capacity = buckets.max(1);
        Self {
            buckets: vec![Vec::new(); capacity],
            capacity,
            count: 0,
        }
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current bucket count.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert `key`, overwriting any existing value. Doubles the table if
    /// the insert pushes the load factor over the threshold.
    pub fn add(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        let idx = self.bucket_index(&key);
        if let Some(entry) = self.buckets[idx].iter_mut().find(|e| e.key == key) {
            debug!("add: overwrote {key:?} in bucket {idx}");
            entry.value = value;
            return true;
        }

        self.buckets[idx].push(Entry { key, value });
        self.count += 1;
        if self.load_factor() > LOAD_FACTOR_THRESHOLD {
            self.resize(self.capacity * 2);
        }
        true
    }

    /// Borrow the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }

    /// Mutably borrow the value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .iter_mut()
            .find(|e| e.key == key)
            .map(|e| &mut e.value)
    }

    /// Remove `key`. Returns whether an entry was removed.
    pub fn del(&mut self, key: &str) -> bool {
        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];
        match bucket.iter().position(|e| e.key == key) {
            Some(pos) => {
                bucket.remove(pos);
                self.count -= 1;
                debug!("del: removed {key:?}, {} entries remain", self.count);
                true
            }
            None => false,
        }
    }

    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Move the value under `old` to `new`. Returns false when `old` is
    /// absent. An existing `new` is displaced first so the count stays
    /// exact.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if !self.exists(old) {
            return false;
        }
        if old == new {
            return true;
        }

        let old_idx = self.bucket_index(old);
        let bucket = &mut self.buckets[old_idx];
        let Some(pos) = bucket.iter().position(|e| e.key == old) else {
            return false;
        };
        let entry = bucket.remove(pos);
        self.count -= 1;
        self.add(new, entry.value);
        true
    }

    /// Deep-copy the value under `src` into `dst`. Returns false when `src`
    /// is absent.
    pub fn copy(&mut self, src: &str, dst: &str) -> bool {
        let Some(value) = self.get(src).cloned() else {
            return false;
        };
        self.add(dst, value);
        true
    }

    fn bucket_index(&self, key: &str) -> usize {
        murmur3_32(key.as_bytes(), 0) as usize % self.capacity
    }

    fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity as f64
    }

    /// Rehash every entry into a table of `new_capacity` buckets.
    fn resize(&mut self, new_capacity: usize) {
        info!(
            "resize: {} -> {new_capacity} buckets with {} entries",
            self.capacity, self.count
        );
        let mut new_buckets: Vec<Vec<Entry>> = vec![Vec::new(); new_capacity];
        for bucket in std::mem::take(&mut self.buckets) {
            for entry in bucket {
                let idx = murmur3_32(entry.key.as_bytes(), 0) as usize % new_capacity;
                new_buckets[idx].push(entry);
            }
        }
        self.buckets = new_buckets;
        self.capacity = new_capacity;
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::new()
    }
}
