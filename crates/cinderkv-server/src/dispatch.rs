//! Command dispatch.
//!
//! One process-wide table maps the uppercased command name to its handler,
//! its token-count bounds, and a usage string. The dispatcher owns the
//! request hygiene (CR/LF stripping, tokenizing, arity) and wraps every
//! handler call in a panic barrier so a faulty handler answers with an
//! error instead of dropping the connection.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use log::error;

use crate::context::ServerContext;
use crate::handlers::{hashes, lists, sets, strings, ttl};
use crate::reply::{render, CommandError, CommandResult, Reply};

pub type Handler = fn(&ServerContext, &[&str]) -> CommandResult;

/// One dispatch-table row. Token counts include the command name;
/// `max_tokens == -1` means unbounded.
pub struct CommandSpec {
    pub name: &'static str,
    pub handler: Handler,
    pub min_tokens: usize,
    pub max_tokens: i32,
    pub help: &'static str,
}

const fn spec(
    name: &'static str,
    handler: Handler,
    min_tokens: usize,
    max_tokens: i32,
    help: &'static str,
) -> CommandSpec {
    CommandSpec {
        name,
        handler,
        min_tokens,
        max_tokens,
        help,
    }
}

/// The full command surface.
pub static COMMANDS: &[CommandSpec] = &[
    // Strings and keys
    spec("SET", strings::set, 3, 3, "SET key value"),
    spec("SETNX", strings::setnx, 3, 3, "SETNX key value"),
    spec("GET", strings::get, 2, 2, "GET key"),
    spec("MSET", strings::mset, 3, -1, "MSET key value [key value ...]"),
    spec("MGET", strings::mget, 2, -1, "MGET key [key ...]"),
    spec("APPEND", strings::append, 3, 3, "APPEND key value"),
    spec("STRLEN", strings::strlen, 2, 2, "STRLEN key"),
    spec("INCR", strings::incr, 2, 2, "INCR key"),
    spec("INCRBY", strings::incrby, 3, 3, "INCRBY key amount"),
    spec("DECR", strings::decr, 2, 2, "DECR key"),
    spec("DECRBY", strings::decrby, 3, 3, "DECRBY key amount"),
    spec("DEL", strings::del, 2, 2, "DEL key"),
    spec("EXISTS", strings::exists, 2, 2, "EXISTS key"),
    spec("RENAME", strings::rename, 3, 3, "RENAME oldkey newkey"),
    spec("COPY", strings::copy, 3, 3, "COPY sourcekey destkey"),
    // Lists
    spec("LPUSH", lists::lpush, 3, 3, "LPUSH list value"),
    spec("RPUSH", lists::rpush, 3, 3, "RPUSH list value"),
    spec("LPOP", lists::lpop, 2, 2, "LPOP list"),
    spec("RPOP", lists::rpop, 2, 2, "RPOP list"),
    spec("LLEN", lists::llen, 2, 2, "LLEN list"),
    spec("LINDEX", lists::lindex, 3, 3, "LINDEX list index"),
    spec("LSET", lists::lset, 4, 4, "LSET list index value"),
    spec("LSORT", lists::lsort, 3, 3, "LSORT list order"),
    spec("LPRINT", lists::lprint, 2, 2, "LPRINT list"),
    // Hashes
    spec("HSET", hashes::hset, 4, 4, "HSET key field value"),
    spec("HGET", hashes::hget, 3, 3, "HGET key field"),
    spec("HDEL", hashes::hdel, 3, -1, "HDEL key field [field ...]"),
    spec("HEXISTS", hashes::hexists, 3, 3, "HEXISTS key field"),
    spec("HLEN", hashes::hlen, 2, 2, "HLEN key"),
    spec("HGETALL", hashes::hgetall, 2, 2, "HGETALL key"),
    // Sets
    spec("SADD", sets::sadd, 3, 3, "SADD set value"),
    spec("SREM", sets::srem, 3, 3, "SREM set value"),
    spec("SMEMBERS", sets::smembers, 2, 2, "SMEMBERS set"),
    spec("SCARD", sets::scard, 2, 2, "SCARD set"),
    spec("SPOP", sets::spop, 2, 2, "SPOP set"),
    spec("SISMEMBER", sets::sismember, 3, 3, "SISMEMBER set value"),
    spec("SUNION", sets::sunion, 3, 3, "SUNION set1 set2"),
    spec("SINTER", sets::sinter, 3, 3, "SINTER set1 set2"),
    spec("SDIFF", sets::sdiff, 3, 3, "SDIFF set1 set2"),
    // Expiration
    spec("EXPIRE", ttl::expire, 3, 3, "EXPIRE key seconds"),
    spec("TTL", ttl::ttl, 2, 2, "TTL key"),
    // Introspection
    spec("HELP", help, 1, 2, "HELP [command]"),
];

fn lookup(name: &str) -> Option<&'static CommandSpec> {
    static INDEX: OnceLock<HashMap<&'static str, &'static CommandSpec>> = OnceLock::new();
    INDEX
        .get_or_init(|| COMMANDS.iter().map(|spec| (spec.name, spec)).collect())
        .get(name)
        .copied()
}

/// HELP — list every command, or show one command's usage.
fn help(_ctx: &ServerContext, args: &[&str]) -> CommandResult {
    if let Some(wanted) = args.get(1) {
        let name = wanted.to_ascii_uppercase();
        return match lookup(&name) {
            Some(spec) => Ok(Reply::Raw(spec.help.to_owned())),
            None => Err(CommandError::UnknownCommand),
        };
    }
    let names: Vec<&str> = COMMANDS.iter().map(|spec| spec.name).collect();
    Ok(Reply::Raw(names.join(" ")))
}

/// Entry point for one raw request line; returns the rendered wire chunk.
pub fn route(ctx: &ServerContext, raw: &str) -> String {
    if raw.is_empty() {
        return render(&Err(CommandError::EmptyRequest));
    }
    let clean: String = raw.chars().filter(|c| *c != '\r' && *c != '\n').collect();
    let tokens: Vec<&str> = clean.split_whitespace().collect();
    if tokens.is_empty() {
        return render(&Err(CommandError::EmptyCommand));
    }
    render(&process_command(ctx, &tokens))
}

/// Table lookup, arity check, and the panic-contained handler call.
pub fn process_command(ctx: &ServerContext, tokens: &[&str]) -> CommandResult {
    let name = tokens[0].to_ascii_uppercase();
    let Some(spec) = lookup(&name) else {
        return Err(CommandError::UnknownCommand);
    };

    let count = tokens.len();
    if count < spec.min_tokens || (spec.max_tokens >= 0 && count > spec.max_tokens as usize) {
        return Err(CommandError::WrongArity(name));
    }

    match panic::catch_unwind(AssertUnwindSafe(|| (spec.handler)(ctx, tokens))) {
        Ok(result) => result,
        Err(payload) => {
            let detail = panic_detail(payload);
            error!("handler for {name} panicked: {detail}");
            Err(CommandError::HandlerPanic(detail))
        }
    }
}

fn panic_detail(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_owned()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_owned()
    }
}
