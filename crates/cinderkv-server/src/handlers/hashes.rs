//! Hash commands: field-to-value maps stored under a single key.

use std::collections::HashMap;

use cinderkv_core::value::Value;

use crate::context::ServerContext;
use crate::reply::{CommandError, CommandResult, Reply};

/// HSET key field value — `:1` for a new field, `:0` for an update.
pub fn hset(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let (key, field, value) = (args[1], args[2], args[3]);
    let mut table = ctx.store.write();
    match table.get_mut(key) {
        None => {
            let mut fields = HashMap::new();
            fields.insert(field.to_owned(), Value::from(value));
            table.add(key, Value::Hash(fields));
            Ok(Reply::Int(1))
        }
        Some(stored) => match stored.as_hash_mut() {
            Some(fields) => {
                let is_new = fields.insert(field.to_owned(), Value::from(value)).is_none();
                Ok(Reply::Int(i64::from(is_new)))
            }
            None => Err(CommandError::WrongType),
        },
    }
}

/// HGET key field — `$-1` for an absent key or field.
pub fn hget(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    match table.get(args[1]) {
        None => Ok(Reply::Nil),
        Some(stored) => match stored.as_hash() {
            Some(fields) => match fields.get(args[2]) {
                Some(value) => Ok(Reply::Raw(scalar_repr(value))),
                None => Ok(Reply::Nil),
            },
            None => Err(CommandError::WrongType),
        },
    }
}

/// HDEL key field [field ...] — count of fields actually removed.
pub fn hdel(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let mut table = ctx.store.write();
    match table.get_mut(args[1]) {
        None => Ok(Reply::Int(0)),
        Some(stored) => match stored.as_hash_mut() {
            Some(fields) => {
                let mut deleted = 0;
                for field in &args[2..] {
                    if fields.remove(*field).is_some() {
                        deleted += 1;
                    }
                }
                Ok(Reply::Int(deleted))
            }
            None => Err(CommandError::WrongType),
        },
    }
}

/// HEXISTS key field
pub fn hexists(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    match table.get(args[1]) {
        None => Ok(Reply::Int(0)),
        Some(stored) => match stored.as_hash() {
            Some(fields) => Ok(Reply::Int(i64::from(fields.contains_key(args[2])))),
            None => Err(CommandError::WrongType),
        },
    }
}

/// HLEN key — field count, `:0` when absent.
pub fn hlen(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    match table.get(args[1]) {
        None => Ok(Reply::Int(0)),
        Some(stored) => match stored.as_hash() {
            Some(fields) => Ok(Reply::Int(fields.len() as i64)),
            None => Err(CommandError::WrongType),
        },
    }
}

/// HGETALL key — `{f1: v1, f2: v2}`, `$-1` when absent.
pub fn hgetall(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    match table.get(args[1]) {
        None => Ok(Reply::Nil),
        Some(stored) => match stored.as_hash() {
            Some(fields) => {
                let body: Vec<String> = fields
                    .iter()
                    .map(|(field, value)| format!("{field}: {}", scalar_repr(value)))
                    .collect();
                Ok(Reply::Raw(format!("{{{}}}", body.join(", "))))
            }
            None => Err(CommandError::WrongType),
        },
    }
}

/// Text form of a field value. Fields written through the command surface
/// are always strings; the scalar variants are covered for completeness.
fn scalar_repr(value: &Value) -> String {
    match value {
        Value::Str(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
