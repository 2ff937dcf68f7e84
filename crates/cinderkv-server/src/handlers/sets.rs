//! Set commands: unordered unique string members under a single key.

use std::collections::HashSet;

use cinderkv_core::value::Value;
use rand::Rng;

use crate::context::ServerContext;
use crate::reply::{CommandError, CommandResult, Reply};

/// SADD key member — `:1` when inserted, `:0` when already present.
pub fn sadd(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let (key, member) = (args[1], args[2]);
    let mut table = ctx.store.write();
    match table.get_mut(key) {
        None => {
            let mut set = HashSet::new();
            set.insert(member.to_owned());
            table.add(key, Value::Set(set));
            Ok(Reply::Int(1))
        }
        Some(stored) => match stored.as_set_mut() {
            Some(set) => Ok(Reply::Int(i64::from(set.insert(member.to_owned())))),
            None => Err(CommandError::NotASet),
        },
    }
}

/// SREM key member — `:0` covers an absent key and a non-set key alike.
pub fn srem(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let mut table = ctx.store.write();
    match table.get_mut(args[1]).and_then(Value::as_set_mut) {
        Some(set) => Ok(Reply::Int(i64::from(set.remove(args[2])))),
        None => Ok(Reply::Int(0)),
    }
}

/// SMEMBERS key — members space-joined.
pub fn smembers(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    match table.get(args[1]).and_then(Value::as_set) {
        Some(set) => Ok(Reply::Raw(join(set.iter()))),
        None => Err(CommandError::NoSuchSet),
    }
}

/// SCARD key — member count, `:0` for an absent or non-set key.
pub fn scard(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    match table.get(args[1]).and_then(Value::as_set) {
        Some(set) => Ok(Reply::Int(set.len() as i64)),
        None => Ok(Reply::Int(0)),
    }
}

/// SPOP key — remove and return a uniformly-random member.
pub fn spop(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let mut table = ctx.store.write();
    match table.get_mut(args[1]).and_then(Value::as_set_mut) {
        None => Err(CommandError::NoSuchSet),
        Some(set) => {
            if set.is_empty() {
                return Err(CommandError::EmptySet);
            }
            let pick = rand::thread_rng().gen_range(0..set.len());
            match set.iter().nth(pick).cloned() {
                Some(member) => {
                    set.remove(&member);
                    Ok(Reply::Raw(member))
                }
                None => Err(CommandError::EmptySet),
            }
        }
    }
}

/// SISMEMBER key member
pub fn sismember(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    match table.get(args[1]).and_then(Value::as_set) {
        Some(set) => Ok(Reply::Int(i64::from(set.contains(args[2])))),
        None => Ok(Reply::Int(0)),
    }
}

/// SUNION key1 key2 — missing or non-set operands contribute nothing.
pub fn sunion(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    let mut result: HashSet<&String> = HashSet::new();
    for key in [args[1], args[2]] {
        if let Some(set) = table.get(key).and_then(Value::as_set) {
            result.extend(set.iter());
        }
    }
    Ok(Reply::Raw(join(result.into_iter())))
}

/// SINTER key1 key2 — empty when either operand is missing or not a set.
pub fn sinter(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    let (Some(first), Some(second)) = (
        table.get(args[1]).and_then(Value::as_set),
        table.get(args[2]).and_then(Value::as_set),
    ) else {
        return Ok(Reply::Raw(String::new()));
    };
    Ok(Reply::Raw(join(
        first.iter().filter(|member| second.contains(*member)),
    )))
}

/// SDIFF key1 key2 — members of the first set absent from the second.
pub fn sdiff(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    let Some(first) = table.get(args[1]).and_then(Value::as_set) else {
        return Ok(Reply::Raw(String::new()));
    };
    match table.get(args[2]).and_then(Value::as_set) {
        Some(second) => Ok(Reply::Raw(join(
            first.iter().filter(|member| !second.contains(*member)),
        ))),
        None => Ok(Reply::Raw(join(first.iter()))),
    }
}

fn join<'a>(members: impl Iterator<Item = &'a String>) -> String {
    let parts: Vec<&str> = members.map(String::as_str).collect();
    parts.join(" ")
}
