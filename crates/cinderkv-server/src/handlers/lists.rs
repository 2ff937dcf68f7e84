//! List commands.
//!
//! Pushes auto-create the list; every other command distinguishes an
//! absent key from a key of the wrong type.

use cinderkv_core::list::{ListContainer, ListError};
use cinderkv_core::value::Value;

use crate::context::ServerContext;
use crate::handlers::parse_i64;
use crate::reply::{CommandError, CommandResult, Reply};

/// LPUSH key value — reply with the new length.
pub fn lpush(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    push(ctx, args, true)
}

/// RPUSH key value — reply with the new length.
pub fn rpush(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    push(ctx, args, false)
}

fn push(ctx: &ServerContext, args: &[&str], front: bool) -> CommandResult {
    let mut table = ctx.store.write();
    match table.get_mut(args[1]) {
        None => {
            let mut list = ListContainer::new();
            if front {
                list.push_front(args[2]);
            } else {
                list.push_back(args[2]);
            }
            table.add(args[1], Value::List(list));
            Ok(Reply::Int(1))
        }
        Some(value) => match value.as_list_mut() {
            Some(list) => {
                if front {
                    list.push_front(args[2]);
                } else {
                    list.push_back(args[2]);
                }
                Ok(Reply::Int(list.len() as i64))
            }
            None => Err(CommandError::WrongType),
        },
    }
}

/// LPOP key — `$-1` when the key is absent or the list is empty.
pub fn lpop(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    pop(ctx, args, true)
}

/// RPOP key — `$-1` when the key is absent or the list is empty.
pub fn rpop(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    pop(ctx, args, false)
}

fn pop(ctx: &ServerContext, args: &[&str], front: bool) -> CommandResult {
    let mut table = ctx.store.write();
    match table.get_mut(args[1]) {
        None => Ok(Reply::Nil),
        Some(value) => match value.as_list_mut() {
            Some(list) => {
                let popped = if front { list.pop_front() } else { list.pop_back() };
                match popped {
                    Ok(v) => Ok(Reply::Raw(v)),
                    Err(ListError::Empty) => Ok(Reply::Nil),
                    Err(_) => Err(CommandError::OutOfRange),
                }
            }
            None => Err(CommandError::WrongType),
        },
    }
}

/// LLEN key — `:0` when absent.
pub fn llen(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    match table.get(args[1]) {
        None => Ok(Reply::Int(0)),
        Some(value) => match value.as_list() {
            Some(list) => Ok(Reply::Int(list.len() as i64)),
            None => Err(CommandError::WrongType),
        },
    }
}

/// LINDEX key index — negative indices wrap from the tail.
pub fn lindex(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let index = parse_i64(args[2])?;
    let table = ctx.store.read();
    match table.get(args[1]) {
        None => Ok(Reply::Nil),
        Some(value) => match value.as_list() {
            Some(list) => match list.get(index) {
                Ok(v) => Ok(Reply::Raw(v.to_owned())),
                Err(_) => Err(CommandError::OutOfRange),
            },
            None => Err(CommandError::WrongType),
        },
    }
}

/// LSET key index value
pub fn lset(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let index = parse_i64(args[2])?;
    let mut table = ctx.store.write();
    match table.get_mut(args[1]) {
        None => Err(CommandError::NoSuchKey),
        Some(value) => match value.as_list_mut() {
            Some(list) => match list.set(index, args[3]) {
                Ok(()) => Ok(Reply::Ok),
                Err(_) => Err(CommandError::OutOfRange),
            },
            None => Err(CommandError::WrongType),
        },
    }
}

/// LSORT key order — order 1 sorts ascending, 2 descending; elements must
/// all be integers.
pub fn lsort(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let ascending = match args[2] {
        "1" => true,
        "2" => false,
        _ => return Err(CommandError::InvalidSortOrder),
    };
    let mut table = ctx.store.write();
    match table.get_mut(args[1]) {
        None => Err(CommandError::NoSuchKey),
        Some(value) => match value.as_list_mut() {
            Some(list) => match list.sort(ascending) {
                Ok(()) => Ok(Reply::Ok),
                Err(ListError::NonNumeric) => Err(CommandError::NotInteger),
                Err(_) => Err(CommandError::OutOfRange),
            },
            None => Err(CommandError::WrongType),
        },
    }
}

/// LPRINT key — `[v1, v2, …]`, `$-1` when absent.
pub fn lprint(ctx: &ServerContext, args: &[&str]) -> CommandResult {
    let table = ctx.store.read();
    match table.get(args[1]) {
        None => Ok(Reply::Nil),
        Some(value) => match value.as_list() {
            Some(list) => {
                let joined: Vec<&str> = list.iter().collect();
                Ok(Reply::Raw(format!("[{}]", joined.join(", "))))
            }
            None => Err(CommandError::WrongType),
        },
    }
}
