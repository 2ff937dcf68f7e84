//! Shared fixtures for the cinderkv benchmarks.

/// Deterministic key set, shaped like real cache keys.
pub fn sample_keys(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("user:{:06}:session:{}", i, i % 17))
        .collect()
}
