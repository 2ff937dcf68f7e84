//! CLI entrypoint for the cinderkv server.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::error;

use cinderkv_core::store::Store;
use cinderkv_core::table::KeyTable;
use cinderkv_core::ttl::TtlQueue;
use cinderkv_server::config::Config;
use cinderkv_server::context::ServerContext;
use cinderkv_server::net::Server;

fn main() -> ExitCode {
    env_logger::init();
    let config = Config::parse();

    let store = Store::new(KeyTable::with_buckets(config.buckets));
    let ttl = TtlQueue::with_interval(store.clone(), Duration::from_secs(config.sweep_interval));
    ttl.start();

    let ctx = ServerContext::new(store, ttl.clone());
    let outcome = Server::bind((config.bind.as_str(), config.port), ctx)
        .and_then(|server| server.serve());

    // Only reached when binding or accepting fails; stop the worker before
    // the store goes away.
    ttl.stop();
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
