//! Reply and error model.
//!
//! Handlers return `Result<Reply, CommandError>`; the dispatcher renders
//! either side to the wire at the last moment.

use std::fmt;

use thiserror::Error;

/// A successful reply, rendered with its wire marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `+OK`
    Ok,
    /// `:<int>`
    Int(i64),
    /// `$-1`
    Nil,
    /// Bare text: a value, a member list, a formatted container.
    Raw(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => f.write_str("+OK"),
            Reply::Int(i) => write!(f, ":{i}"),
            Reply::Nil => f.write_str("$-1"),
            Reply::Raw(text) => f.write_str(text),
        }
    }
}

/// Everything a command can fail with, rendered as `-ERR <message>`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("wrong number of arguments for {0}")]
    WrongArity(String),
    #[error("unknown command")]
    UnknownCommand,
    #[error("empty request")]
    EmptyRequest,
    #[error("empty command")]
    EmptyCommand,
    #[error("wrong type")]
    WrongType,
    #[error("value is not an integer or out of range")]
    NotInteger,
    #[error("index out of range")]
    OutOfRange,
    #[error("no such key")]
    NoSuchKey,
    #[error("no such set")]
    NoSuchSet,
    #[error("Key exists but is not a set")]
    NotASet,
    #[error("set empty")]
    EmptySet,
    #[error("sort order must be 1 (asc) or 2 (desc)")]
    InvalidSortOrder,
    #[error("handler exception: {0}")]
    HandlerPanic(String),
}

pub type CommandResult = Result<Reply, CommandError>;

/// Render a handler outcome as the wire chunk sent to the client.
pub fn render(result: &CommandResult) -> String {
    match result {
        Ok(reply) => reply.to_string(),
        Err(err) => format!("-ERR {err}"),
    }
}
