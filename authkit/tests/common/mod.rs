//! Common test utilities for integration tests
//!
//! - Tracing setup driven by `RUST_LOG`
//! - Unique identifiers so tests sharing the process-wide limiter never
//!   observe each other's attempts

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// bcrypt cost used where the default cost is not what's being tested
pub const TEST_ROUNDS: u32 = 4;

/// Installs a tracing subscriber once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authkit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// Returns an identifier no other test in this binary will use
pub fn unique_identifier(prefix: &str) -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!(
        "{}-{}-{}",
        prefix,
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}
