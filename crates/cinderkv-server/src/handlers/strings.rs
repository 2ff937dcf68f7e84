//! String, integer, and key-lifecycle commands.

use cinderkv_core::value::Value;

use crate::context::ServerContext;
use crate::handlers::parse_i64;
use crate::reply::{CommandError, CommandResult, Reply};

/// SET key value — unconditional overwrite.
pub fn set(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    ctx.store.write().add(args[1], Value::from(args[2]));
    Ok(Reply::Ok)
}

/// SETNX key value — insert only when the key is absent (any type counts).
pub fn setnx(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let mut table = ctx.store.write();
    if table.exists(args[1]) {
        return Ok(Reply::Int(0));
    }
    table.add(args[1], Value::from(args[2]));
    Ok(Reply::Int(1))
}

/// GET key — the stored string, `$-1` when absent.
pub fn get(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    match table.get(args[1]) {
        None => Ok(Reply::Nil),
        Some(value) => match value.as_str() {
            Some(s) => Ok(Reply::Raw(s.to_owned())),
            None => Err(CommandError::WrongType),
        },
    }
}

/// MSET key value [key value ...] — set every pair.
pub fn mset(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let pairs = &args[1..];
    if pairs.is_empty() || pairs.len() % 2 != 0 {
        return Err(CommandError::WrongArity("MSET".into()));
    }
    let mut table = ctx.store.write();
    for pair in pairs.chunks_exact(2) {
        table.add(pair[0], Value::from(pair[1]));
    }
    Ok(Reply::Ok)
}

/// MGET key [key ...] — space-joined values, `$-1` per missing key.
pub fn mget(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    let mut parts = Vec::with_capacity(args.len() - 1);
    for key in &args[1..] {
        match table.get(key) {
            None => parts.push("$-1".to_owned()),
            Some(value) => match value.as_str() {
                Some(s) => parts.push(s.to_owned()),
                None => return Err(CommandError::WrongType),
            },
        }
    }
    Ok(Reply::Raw(parts.join(" ")))
}

/// APPEND key value — create or extend, reply with the new length.
pub fn append(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let mut table = ctx.store.write();
    match table.get_mut(args[1]) {
        None => {
            table.add(args[1], Value::from(args[2]));
            Ok(Reply::Int(args[2].len() as i64))
        }
        Some(value) => match value.as_str_mut() {
            Some(s) => {
                s.push_str(args[2]);
                Ok(Reply::Int(s.len() as i64))
            }
            None => Err(CommandError::WrongType),
        },
    }
}

/// STRLEN key — byte length, `:0` when absent.
pub fn strlen(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    match table.get(args[1]) {
        None => Ok(Reply::Int(0)),
        Some(value) => match value.as_str() {
            Some(s) => Ok(Reply::Int(s.len() as i64)),
            None => Err(CommandError::WrongType),
        },
    }
}

pub fn incr(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    apply_delta(ctx, args[1], 1)
}

pub fn decr(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    apply_delta(ctx, args[1], -1)
}

pub fn incrby(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    apply_delta(ctx, args[1], parse_i64(args[2])?)
}

pub fn decrby(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    apply_delta(ctx, args[1], parse_i64(args[2])?.wrapping_neg())
}

/// Shared INCR/DECR body: an absent key counts from zero, the stored text
/// must parse as i64, and the new value is stored back in string form.
fn apply_delta(ctx: &ServerContext, key: &str, delta: i64) -> CommandResult {
    let mut table = ctx.store.write();
    let current = match table.get(key) {
        None => 0,
        Some(value) => match value.as_str() {
            Some(s) => parse_i64(s)?,
            None => return Err(CommandError::WrongType),
        },
    };
    let next = current.wrapping_add(delta);
    table.add(key, Value::Str(next.to_string()));
    Ok(Reply::Int(next))
}

/// DEL key — `:1` when an entry was removed.
pub fn del(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    Ok(Reply::Int(i64::from(ctx.store.write().del(args[1]))))
}

/// EXISTS key
pub fn exists(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    Ok(Reply::Int(i64::from(ctx.store.read().exists(args[1]))))
}

/// RENAME old new
pub fn rename(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    if ctx.store.write().rename(args[1], args[2]) {
        Ok(Reply::Ok)
    } else {
        Err(CommandError::NoSuchKey)
    }
}

/// COPY src dst — deep copy.
pub fn copy(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    if ctx.store.write().copy(args[1], args[2]) {
        Ok(Reply::Ok)
    } else {
        Err(CommandError::NoSuchKey)
    }
}
