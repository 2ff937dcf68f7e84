//! Command semantics driven through the dispatcher, including the
//! end-to-end scenarios from the acceptance checklist.

use std::time::Duration;

use cinderkv_core::store::Store;
use cinderkv_core::table::KeyTable;
use cinderkv_core::ttl::TtlQueue;
use cinderkv_server::context::ServerContext;
use cinderkv_server::dispatch::route;

fn ctx() -> ServerContext {
    let store = Store::new(KeyTable::new());
    let ttl = TtlQueue::with_interval(store.clone(), Duration::from_secs(3600));
    ServerContext::new(store, ttl)
}

/// Split a space-joined member reply into sorted members.
fn members(reply: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = reply.split(' ').filter(|p| !p.is_empty()).collect();
    parts.sort_unstable();
    parts
}

// ---------------------------------------------------------------------
// Strings and counters
// ---------------------------------------------------------------------

#[test]
fn test_scenario_set_incr_get() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "SET a 1"), "+OK");
    assert_eq!(route(&ctx, "INCR a"), ":2");
    assert_eq!(route(&ctx, "INCR a"), ":3");
    assert_eq!(route(&ctx, "GET a"), "3");
}

#[test]
fn test_set_is_idempotent() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "SET k v"), "+OK");
    assert_eq!(route(&ctx, "SET k v"), "+OK");
    assert_eq!(route(&ctx, "GET k"), "v");
}

#[test]
fn test_setnx_only_first_wins() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "SETNX k first"), ":1");
    assert_eq!(route(&ctx, "SETNX k second"), ":0");
    assert_eq!(route(&ctx, "GET k"), "first");
}

#[test]
fn test_get_absent_is_nil() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "GET nothing"), "$-1");
}

#[test]
fn test_mget_mixes_hits_and_misses() {
    let ctx = ctx();
    route(&ctx, "SET a 1");
    route(&ctx, "SET c 3");
    assert_eq!(route(&ctx, "MGET a b c"), "1 $-1 3");
}

#[test]
fn test_mget_wrong_type_aborts_reply() {
    let ctx = ctx();
    route(&ctx, "SET a 1");
    route(&ctx, "LPUSH l x");
    assert_eq!(route(&ctx, "MGET a l"), "-ERR wrong type");
}

#[test]
fn test_append_and_strlen() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "APPEND k hello"), ":5");
    assert_eq!(route(&ctx, "APPEND k world"), ":10");
    assert_eq!(route(&ctx, "GET k"), "helloworld");
    assert_eq!(route(&ctx, "STRLEN k"), ":10");
    assert_eq!(route(&ctx, "STRLEN missing"), ":0");
}

#[test]
fn test_counter_family() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "INCR fresh"), ":1");
    assert_eq!(route(&ctx, "INCRBY fresh 10"), ":11");
    assert_eq!(route(&ctx, "DECR fresh"), ":10");
    assert_eq!(route(&ctx, "DECRBY fresh 7"), ":3");
    assert_eq!(route(&ctx, "GET fresh"), "3");

    route(&ctx, "SET words abc");
    assert_eq!(
        route(&ctx, "INCR words"),
        "-ERR value is not an integer or out of range"
    );
    assert_eq!(
        route(&ctx, "INCRBY fresh nope"),
        "-ERR value is not an integer or out of range"
    );
}

#[test]
fn test_incr_handles_negative_values() {
    let ctx = ctx();
    route(&ctx, "SET n -5");
    assert_eq!(route(&ctx, "INCR n"), ":-4");
    assert_eq!(route(&ctx, "DECRBY n -6"), ":2");
}

#[test]
fn test_del_exists_rename_copy() {
    let ctx = ctx();
    route(&ctx, "SET k v");
    assert_eq!(route(&ctx, "EXISTS k"), ":1");
    assert_eq!(route(&ctx, "DEL k"), ":1");
    assert_eq!(route(&ctx, "DEL k"), ":0");
    assert_eq!(route(&ctx, "EXISTS k"), ":0");

    route(&ctx, "SET old v");
    assert_eq!(route(&ctx, "RENAME old new"), "+OK");
    assert_eq!(route(&ctx, "GET new"), "v");
    assert_eq!(route(&ctx, "RENAME ghost x"), "-ERR no such key");

    assert_eq!(route(&ctx, "COPY new other"), "+OK");
    assert_eq!(route(&ctx, "GET other"), "v");
    assert_eq!(route(&ctx, "COPY ghost x"), "-ERR no such key");
}

// ---------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------

#[test]
fn test_scenario_rpush_lprint_lpop() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "RPUSH L x"), ":1");
    assert_eq!(route(&ctx, "RPUSH L y"), ":2");
    assert_eq!(route(&ctx, "LPRINT L"), "[x, y]");
    assert_eq!(route(&ctx, "LPOP L"), "x");
    assert_eq!(route(&ctx, "LLEN L"), ":1");
}

#[test]
fn test_lpush_is_lifo() {
    let ctx = ctx();
    route(&ctx, "LPUSH L a");
    route(&ctx, "LPUSH L b");
    assert_eq!(route(&ctx, "LPOP L"), "b");
    assert_eq!(route(&ctx, "LPOP L"), "a");
    assert_eq!(route(&ctx, "LPOP L"), "$-1");
}

#[test]
fn test_lindex_and_lset() {
    let ctx = ctx();
    for v in ["a", "b", "c"] {
        route(&ctx, &format!("RPUSH L {v}"));
    }
    assert_eq!(route(&ctx, "LINDEX L 0"), "a");
    assert_eq!(route(&ctx, "LINDEX L -1"), "c");
    assert_eq!(route(&ctx, "LINDEX L 9"), "-ERR index out of range");
    assert_eq!(
        route(&ctx, "LINDEX L one"),
        "-ERR value is not an integer or out of range"
    );

    assert_eq!(route(&ctx, "LSET L 1 mid"), "+OK");
    assert_eq!(route(&ctx, "LINDEX L 1"), "mid");
    assert_eq!(route(&ctx, "LSET L 9 x"), "-ERR index out of range");
    assert_eq!(route(&ctx, "LSET missing 0 x"), "-ERR no such key");
}

#[test]
fn test_lsort_orders() {
    let ctx = ctx();
    for v in ["5", "-2", "9", "0"] {
        route(&ctx, &format!("RPUSH nums {v}"));
    }
    assert_eq!(route(&ctx, "LSORT nums 1"), "+OK");
    assert_eq!(route(&ctx, "LPRINT nums"), "[-2, 0, 5, 9]");
    assert_eq!(route(&ctx, "LSORT nums 2"), "+OK");
    assert_eq!(route(&ctx, "LPRINT nums"), "[9, 5, 0, -2]");
    assert_eq!(
        route(&ctx, "LSORT nums 3"),
        "-ERR sort order must be 1 (asc) or 2 (desc)"
    );

    route(&ctx, "RPUSH nums pear");
    assert_eq!(
        route(&ctx, "LSORT nums 1"),
        "-ERR value is not an integer or out of range"
    );
}

// ---------------------------------------------------------------------
// Hashes
// ---------------------------------------------------------------------

#[test]
fn test_scenario_hash_basics() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "HSET h f1 v1"), ":1");
    assert_eq!(route(&ctx, "HSET h f2 v2"), ":1");
    assert_eq!(route(&ctx, "HLEN h"), ":2");
    assert_eq!(route(&ctx, "HGET h f1"), "v1");
    assert_eq!(route(&ctx, "HDEL h f1 f3"), ":1");
    assert_eq!(route(&ctx, "HLEN h"), ":1");
}

#[test]
fn test_hset_update_returns_zero() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "HSET h f a"), ":1");
    assert_eq!(route(&ctx, "HSET h f b"), ":0");
    assert_eq!(route(&ctx, "HGET h f"), "b");
}

#[test]
fn test_hash_misses() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "HGET nohash f"), "$-1");
    assert_eq!(route(&ctx, "HGETALL nohash"), "$-1");
    assert_eq!(route(&ctx, "HDEL nohash f"), ":0");
    assert_eq!(route(&ctx, "HEXISTS nohash f"), ":0");
    assert_eq!(route(&ctx, "HLEN nohash"), ":0");

    route(&ctx, "HSET h f v");
    assert_eq!(route(&ctx, "HGET h other"), "$-1");
    assert_eq!(route(&ctx, "HEXISTS h f"), ":1");
}

#[test]
fn test_hgetall_formatting() {
    let ctx = ctx();
    route(&ctx, "HSET h f1 v1");
    route(&ctx, "HSET h f2 v2");
    let reply = route(&ctx, "HGETALL h");
    assert!(reply.starts_with('{') && reply.ends_with('}'));
    let inner = &reply[1..reply.len() - 1];
    let mut pairs: Vec<&str> = inner.split(", ").collect();
    pairs.sort_unstable();
    assert_eq!(pairs, ["f1: v1", "f2: v2"]);
}

// ---------------------------------------------------------------------
// Sets
// ---------------------------------------------------------------------

#[test]
fn test_scenario_sadd_scard_sismember() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "SADD S a"), ":1");
    assert_eq!(route(&ctx, "SADD S b"), ":1");
    assert_eq!(route(&ctx, "SADD S a"), ":0");
    assert_eq!(route(&ctx, "SCARD S"), ":2");
    assert_eq!(route(&ctx, "SISMEMBER S c"), ":0");
    assert_eq!(route(&ctx, "SISMEMBER S a"), ":1");
    assert_eq!(members(&route(&ctx, "SMEMBERS S")), ["a", "b"]);
}

#[test]
fn test_scenario_set_algebra() {
    let ctx = ctx();
    route(&ctx, "SADD A 1");
    route(&ctx, "SADD A 2");
    route(&ctx, "SADD B 2");
    route(&ctx, "SADD B 3");

    assert_eq!(members(&route(&ctx, "SINTER A B")), ["2"]);
    assert_eq!(members(&route(&ctx, "SDIFF A B")), ["1"]);
    assert_eq!(members(&route(&ctx, "SUNION A B")), ["1", "2", "3"]);
}

#[test]
fn test_set_algebra_with_missing_operands() {
    let ctx = ctx();
    route(&ctx, "SADD A x");
    assert_eq!(members(&route(&ctx, "SUNION A none")), ["x"]);
    assert_eq!(route(&ctx, "SINTER A none"), "");
    assert_eq!(members(&route(&ctx, "SDIFF A none")), ["x"]);
    assert_eq!(route(&ctx, "SDIFF none A"), "");
}

#[test]
fn test_srem_and_spop() {
    let ctx = ctx();
    route(&ctx, "SADD S only");
    assert_eq!(route(&ctx, "SREM S only"), ":1");
    assert_eq!(route(&ctx, "SREM S only"), ":0");
    assert_eq!(route(&ctx, "SREM missing m"), ":0");

    route(&ctx, "SADD P a");
    let popped = route(&ctx, "SPOP P");
    assert_eq!(popped, "a");
    assert_eq!(route(&ctx, "SPOP P"), "-ERR set empty");
    assert_eq!(route(&ctx, "SPOP missing"), "-ERR no such set");
    assert_eq!(route(&ctx, "SMEMBERS missing"), "-ERR no such set");
}

#[test]
fn test_spop_drains_every_member_exactly_once() {
    let ctx = ctx();
    for m in ["a", "b", "c", "d"] {
        route(&ctx, &format!("SADD S {m}"));
    }
    let mut popped: Vec<String> = (0..4).map(|_| route(&ctx, "SPOP S")).collect();
    popped.sort_unstable();
    assert_eq!(popped, ["a", "b", "c", "d"]);
    assert_eq!(route(&ctx, "SCARD S"), ":0");
}

#[test]
fn test_sadd_on_non_set_key() {
    let ctx = ctx();
    route(&ctx, "SET s plain");
    assert_eq!(route(&ctx, "SADD s m"), "-ERR Key exists but is not a set");
}

// ---------------------------------------------------------------------
// Wrong-type safety
// ---------------------------------------------------------------------

#[test]
fn test_wrong_type_rejections_leave_value_intact() {
    let ctx = ctx();
    route(&ctx, "SET k v");
    assert_eq!(route(&ctx, "LPUSH k x"), "-ERR wrong type");
    assert_eq!(route(&ctx, "HSET k f v"), "-ERR wrong type");
    assert_eq!(route(&ctx, "LLEN k"), "-ERR wrong type");
    assert_eq!(route(&ctx, "GET k"), "v");

    route(&ctx, "LPUSH L x");
    assert_eq!(route(&ctx, "GET L"), "-ERR wrong type");
    assert_eq!(route(&ctx, "APPEND L y"), "-ERR wrong type");
    assert_eq!(route(&ctx, "INCR L"), "-ERR wrong type");
    assert_eq!(route(&ctx, "STRLEN L"), "-ERR wrong type");
    assert_eq!(route(&ctx, "LPOP L"), "x");
}

// ---------------------------------------------------------------------
// Expiration
// ---------------------------------------------------------------------

#[test]
fn test_scenario_expire_ttl_lifecycle() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "SET k v"), "+OK");
    assert_eq!(route(&ctx, "EXPIRE k 1"), ":1");
    assert_eq!(route(&ctx, "TTL k"), ":1");

    // Let the deadline lapse, then run a sweep the way the worker would.
    std::thread::sleep(Duration::from_millis(1100));
    assert_eq!(route(&ctx, "TTL k"), ":0");
    ctx.ttl.sweep_expired();
    assert_eq!(route(&ctx, "EXISTS k"), ":0");
    assert_eq!(route(&ctx, "TTL k"), ":-2");
}

#[test]
fn test_ttl_status_codes() {
    let ctx = ctx();
    assert_eq!(route(&ctx, "TTL ghost"), ":-2");
    route(&ctx, "SET k v");
    assert_eq!(route(&ctx, "TTL k"), ":-1");
    assert_eq!(route(&ctx, "EXPIRE k 100"), ":1");
    assert_eq!(route(&ctx, "TTL k"), ":100");
    assert_eq!(route(&ctx, "EXPIRE ghost 5"), ":0");
    assert_eq!(
        route(&ctx, "EXPIRE k soon"),
        "-ERR value is not an integer or out of range"
    );
}
