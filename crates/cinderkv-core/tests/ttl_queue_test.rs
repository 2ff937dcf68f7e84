//! Background-worker behavior of the TTL queue against a live store.

use std::time::Duration;

use cinderkv_core::store::Store;
use cinderkv_core::table::KeyTable;
use cinderkv_core::ttl::TtlQueue;
use cinderkv_core::value::Value;

const SWEEP: Duration = Duration::from_millis(25);

fn seeded_store(keys: &[&str]) -> Store {
    let store = Store::new(KeyTable::new());
    {
        let mut table = store.write();
        for key in keys {
            table.add(*key, Value::from("v"));
        }
    }
    store
}

#[test]
fn test_worker_expires_due_keys() {
    let store = seeded_store(&["short", "long"]);
    let ttl = TtlQueue::with_interval(store.clone(), SWEEP);
    ttl.start();

    assert!(ttl.insert_or_update("short", 0));
    assert!(ttl.insert_or_update("long", 3600));

    // Give the worker a few sweeps to collect the due key.
    std::thread::sleep(SWEEP * 8);
    assert!(!store.exists("short"));
    assert!(store.exists("long"));
    assert_eq!(ttl.ttl_seconds("short"), -2);
    assert!(ttl.ttl_seconds("long") > 0);

    ttl.stop();
}

#[test]
fn test_start_twice_and_stop_twice_are_noops() {
    let store = seeded_store(&[]);
    let ttl = TtlQueue::with_interval(store, SWEEP);
    ttl.start();
    ttl.start();
    assert!(ttl.is_running());
    ttl.stop();
    ttl.stop();
    assert!(!ttl.is_running());
}

#[test]
fn test_stop_returns_promptly_despite_long_interval() {
    let store = seeded_store(&[]);
    let ttl = TtlQueue::with_interval(store, Duration::from_secs(600));
    ttl.start();

    let begun = std::time::Instant::now();
    ttl.stop();
    assert!(
        begun.elapsed() < Duration::from_secs(5),
        "stop must interrupt the sleeping worker"
    );
}

#[test]
fn test_refresh_defers_expiry() {
    let store = seeded_store(&["key"]);
    let ttl = TtlQueue::with_interval(store.clone(), SWEEP);
    ttl.start();

    assert!(ttl.insert_or_update("key", 3600));
    // Refreshing with a long TTL must survive several sweeps.
    std::thread::sleep(SWEEP * 4);
    assert!(store.exists("key"));
    assert_eq!(ttl.size(), 1);

    ttl.stop();
}

#[test]
fn test_deleted_key_reports_absent() {
    let store = seeded_store(&["gone"]);
    let ttl = TtlQueue::with_interval(store.clone(), SWEEP);
    assert!(ttl.insert_or_update("gone", 3600));

    store.del("gone");
    // The queue entry may linger, but the status code follows the store.
    assert_eq!(ttl.ttl_seconds("gone"), -2);
}
