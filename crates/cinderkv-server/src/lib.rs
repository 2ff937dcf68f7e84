//! # cinderkv-server
//!
//! The wire surface over `cinderkv-core`: reply rendering, per-data-type
//! command handlers, the dispatch table, and the TCP server loop.
//!
//! A request is one line of whitespace-separated tokens; a reply is one
//! unframed chunk using the RESP-adjacent markers (`+OK`, `-ERR …`,
//! `:<int>`, `$-1`, bare text).

#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod dispatch;
pub mod handlers;
pub mod net;
pub mod reply;
