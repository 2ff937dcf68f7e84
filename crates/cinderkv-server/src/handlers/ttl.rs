//! Expiration commands, backed by the injected TTL queue.

use crate::context::ServerContext;
use crate::handlers::parse_i64;
use crate::reply::{CommandResult, Reply};

/// EXPIRE key seconds — `:1` when a TTL was set or refreshed, `:0` when the
/// key does not exist. Non-positive seconds expire on the next sweep.
pub fn expire(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let seconds = parse_i64(args[2])?;
    Ok(Reply::Int(i64::from(
        ctx.ttl.insert_or_update(args[1], seconds),
    )))
}

/// TTL key — `:-2` absent, `:-1` no TTL, otherwise seconds remaining.
pub fn ttl(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    Ok(Reply::Int(ctx.ttl.ttl_seconds(args[1])))
}
