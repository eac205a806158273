//! Tracing and logging setup shared by the ledger binaries and tests.

/// Initialize process-wide tracing with the format named by
/// `LEDGERLY_LOG_FORMAT` (JSON unless set to `pretty`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use self::tracing::{init_for_tests, LogFormat};
