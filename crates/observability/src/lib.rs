//! Tracing/logging setup shared by the catalog binaries and tests.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize human-readable logging for tests (captured by the test harness).
pub fn init_for_tests() {
    tracing::init_pretty();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
