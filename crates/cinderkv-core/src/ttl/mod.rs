//! Key expiration.
//!
//! `TtlQueue` tracks `(key, expire_at)` pairs in a binary min-heap ordered
//! by expiry, with an auxiliary key-to-index map so updates and removals
//! are O(log n) instead of a scan. A background worker wakes every sweep
//! interval (or on a stop signal) and deletes every due key from the
//! store.
//!
//! Lock discipline: the queue mutex is never held across a store call.
//! The sweep pops one due key under the queue lock, releases it, deletes
//! the key, and reacquires. Store locks are likewise never held while
//! calling into the queue.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use parking_lot::{Condvar, Mutex};

use crate::store::Store;

/// Period of the background sweep unless the caller chooses otherwise.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
struct TtlEntry {
    key: String,
    expire_at: Instant,
}

/// Min-heap plus key-to-heap-index map. Both live under one mutex.
#[derive(Debug, Default)]
struct Heap {
    entries: Vec<TtlEntry>,
    index: HashMap<String, usize>,
}

impl Heap {
    fn insert_or_update(&mut self, key: &str, expire_at: Instant) {
        if let Some(&idx) = self.index.get(key) {
            self.entries[idx].expire_at = expire_at;
            self.sift_up(idx);
            self.sift_down(idx);
            return;
        }
        self.entries.push(TtlEntry {
            key: key.to_owned(),
            expire_at,
        });
        let idx = self.entries.len() - 1;
        self.index.insert(key.to_owned(), idx);
        self.sift_up(idx);
    }

    fn remove(&mut self, key: &str) -> bool {
        let Some(&idx) = self.index.get(key) else {
            return false;
        };
        let last = self.entries.len() - 1;
        if idx != last {
            self.swap(idx, last);
        }
        self.index.remove(key);
        self.entries.pop();
        if idx < self.entries.len() {
            self.sift_up(idx);
            self.sift_down(idx);
        }
        true
    }

    /// Pop the minimum entry and return its key.
    fn pop_root(&mut self) -> Option<String> {
        let root = self.entries.first()?;
        let key = root.key.clone();
        let last = self.entries.len() - 1;
        if last > 0 {
            self.swap(0, last);
        }
        self.index.remove(&key);
        self.entries.pop();
        self.sift_down(0);
        Some(key)
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.index.insert(self.entries[a].key.clone(), a);
        self.index.insert(self.entries[b].key.clone(), b);
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.entries[idx].expire_at < self.entries[parent].expire_at {
                self.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let n = self.entries.len();
        loop {
            let left = 2 * idx + 1;
            let right = 2 * idx + 2;
            let mut smallest = idx;
            if left < n && self.entries[left].expire_at < self.entries[smallest].expire_at {
                smallest = left;
            }
            if right < n && self.entries[right].expire_at < self.entries[smallest].expire_at {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap(idx, smallest);
            idx = smallest;
        }
    }
}

/// Expiration queue with a background worker.
///
/// Constructed around a [`Store`] handle; `start` launches the worker and
/// `stop` (or dropping the queue) signals and joins it. One instance
/// serves the whole server and is injected into the handlers that need it.
#[derive(Debug)]
pub struct TtlQueue {
    heap: Mutex<Heap>,
    db: Store,
    interval: Duration,
    running: AtomicBool,
    park: Mutex<()>,
    wakeup: Condvar,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl TtlQueue {
    pub fn new(db: Store) -> Arc<Self> {
        Self::with_interval(db, DEFAULT_SWEEP_INTERVAL)
    }

    pub fn with_interval(db: Store, interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            heap: Mutex::new(Heap::default()),
            db,
            interval,
            running: AtomicBool::new(false),
            park: Mutex::new(()),
            wakeup: Condvar::new(),
            worker: Mutex::new(None),
        })
    }

    /// Launch the background worker. A no-op when already running.
    pub fn start(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let queue = Arc::downgrade(self);
        let spawned = thread::Builder::new()
            .name("cinderkv-ttl".into())
            .spawn(move || Self::worker_loop(queue));
        match spawned {
            Ok(handle) => {
                *self.worker.lock() = Some(handle);
                info!("ttl worker started, sweeping every {:?}", self.interval);
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                error!("failed to spawn ttl worker: {e}");
            }
        }
    }

    /// Signal the worker and join it. A no-op when already stopped.
    pub fn stop(&self) {
        {
            let _parked = self.park.lock();
            if !self.running.swap(false, Ordering::SeqCst) {
                return;
            }
            self.wakeup.notify_all();
        }
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            // The worker itself may run this through Drop; joining our own
            // thread would deadlock.
            if handle.thread().id() != thread::current().id() {
                if handle.join().is_err() {
                    warn!("ttl worker terminated by panic");
                }
            }
            info!("ttl worker stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Attach a TTL of `seconds` to `key`, or refresh an existing one.
    ///
    /// Returns false (and records nothing) when the key is not in the
    /// store. `seconds ≤ 0` makes the entry due immediately; it is removed
    /// on the next sweep.
    pub fn insert_or_update(&self, key: &str, seconds: i64) -> bool {
        if !self.db.exists(key) {
            return false;
        }
        let expire_at = expiry_from_now(seconds);
        self.heap.lock().insert_or_update(key, expire_at);
        true
    }

    /// Drop the TTL for `key` without touching the store. Returns false if
    /// the key had no TTL.
    pub fn remove(&self, key: &str) -> bool {
        self.heap.lock().remove(key)
    }

    /// Remaining TTL in whole seconds, rounded up.
    ///
    /// Returns −2 when the key is not in the store, −1 when it has no TTL,
    /// and 0 when the entry is due but the sweep has not collected it yet.
    pub fn ttl_seconds(&self, key: &str) -> i64 {
        if !self.db.exists(key) {
            return -2;
        }
        let heap = self.heap.lock();
        let Some(&idx) = heap.index.get(key) else {
            return -1;
        };
        let now = Instant::now();
        let expire_at = heap.entries[idx].expire_at;
        if expire_at <= now {
            return 0;
        }
        let remaining = expire_at - now;
        let mut secs = remaining.as_secs() as i64;
        if remaining.subsec_nanos() > 0 {
            secs += 1;
        }
        secs
    }

    /// Number of keys currently carrying a TTL.
    pub fn size(&self) -> usize {
        self.heap.lock().entries.len()
    }

    /// Delete every due key from the store. The queue mutex is released
    /// around each store delete.
    pub fn sweep_expired(&self) {
        loop {
            let due = {
                let mut heap = self.heap.lock();
                match heap.entries.first() {
                    Some(root) if root.expire_at <= Instant::now() => heap.pop_root(),
                    _ => None,
                }
            };
            match due {
                Some(key) => {
                    info!("ttl expire: deleting {key:?}");
                    self.db.del(&key);
                }
                None => break,
            }
        }
    }

    fn worker_loop(queue: Weak<TtlQueue>) {
        loop {
            let Some(q) = queue.upgrade() else {
                break;
            };
            {
                let mut parked = q.park.lock();
                if !q.running.load(Ordering::SeqCst) {
                    break;
                }
                q.wakeup.wait_for(&mut parked, q.interval);
            }
            if !q.running.load(Ordering::SeqCst) {
                break;
            }
            q.sweep_expired();
        }
    }
}

impl Drop for TtlQueue {
    fn drop(&mut self) {
        self.stop();
    }
}

fn expiry_from_now(seconds: i64) -> Instant {
    let now = Instant::now();
    if seconds <= 0 {
        now
    } else {
        now + Duration::from_secs(seconds as u64)
    }
}
