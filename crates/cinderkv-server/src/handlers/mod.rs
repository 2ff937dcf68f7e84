//! Command handlers, one module per data type.
//!
//! Every handler receives the shared context and the full token slice
//! (command name included, arity already validated by the dispatcher) and
//! returns a typed reply or error. Handlers that mutate take the store's
//! write lock for their whole body; read-only handlers take the read lock.

pub mod hashes;
pub mod lists;
pub mod sets;
pub mod strings;
pub mod ttl;

use crate::reply::CommandError;

/// Parse a token as a signed 64-bit integer, Redis-strict.
pub(crate) fn parse_i64(token: &str) -> Result<i64, CommandError> {
    token.parse().map_err(|_| CommandError::NotInteger)
}
