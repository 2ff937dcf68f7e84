//! Server configuration.
//!
//! Every flag defaults to the engine's compiled-in value, so running the
//! binary with no arguments serves the classic port.

use clap::Parser;

/// In-memory Redis-style cache server.
#[derive(Debug, Parser)]
#[command(name = "cinderkv-server")]
#[command(about = "In-memory key-value store speaking a Redis-style line protocol")]
pub struct Config {
    /// TCP port to listen on.
    #[arg(long, default_value_t = 6379)]
    pub port: u16,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Initial bucket count of the key table.
    #[arg(long, default_value_t = cinderkv_core::table::DEFAULT_BUCKETS)]
    pub buckets: usize,

    /// Seconds between TTL worker sweeps.
    #[arg(long, default_value_t = 10)]
    pub sweep_interval: u64,
}
