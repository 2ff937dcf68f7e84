//! Shared state handed to every handler.

use std::sync::Arc;

use cinderkv_core::store::Store;
use cinderkv_core::ttl::TtlQueue;

/// The store handle and the TTL queue, cloned into each connection thread.
///
/// Both are explicit dependencies; nothing in the server reaches for a
/// global.
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub store: Store,
    pub ttl: Arc<TtlQueue>,
}

impl ServerContext {
    pub fn new(store: Store, ttl: Arc<TtlQueue>) -> Self {
        Self { store, ttl }
    }
}
