//! Shared store handle.
//!
//! `Store` is the thread-safe handle to the one mutable resource in the
//! system. Cloning it clones the handle, not the table; every command
//! thread and the TTL worker hold their own clone. A single coarse
//! read/write lock makes each dispatched command atomic with respect to
//! every other command and to TTL-driven deletions.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::table::KeyTable;

/// Cloneable, thread-safe handle to the key table.
#[derive(Debug, Clone, Default)]
pub struct Store {
    shared: Arc<RwLock<KeyTable>>,
}

impl Store {
    pub fn new(table: KeyTable) -> Self {
        Self {
            shared: Arc::new(RwLock::new(table)),
        }
    }

    /// Acquire the read lock for the duration of one command.
    pub fn read(&self) -> RwLockReadGuard<'_, KeyTable> {
        self.shared.read()
    }

    /// Acquire the write lock for the duration of one command.
    pub fn write(&self) -> RwLockWriteGuard<'_, KeyTable> {
        self.shared.write()
    }

    /// Key presence check; takes and releases the read lock.
    pub fn exists(&self, key: &str) -> bool {
        self.read().exists(key)
    }

    /// Delete a key; takes and releases the write lock. Callers must not
    /// hold any table guard when calling this.
    pub fn del(&self, key: &str) -> bool {
        self.write().del(key)
    }
}
