//! Test support: one-time tracing setup and relation fixtures.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::RelationEntry;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
    if env::var("RUST_LOG").is_err() {
        debug!("RUST_LOG not set, defaulting to debug");
    }
}

/// Shorthand for a bare entry: `entry("u2", Some("u1"), 2)`.
pub fn entry(id: &str, referrer_id: Option<&str>, level: u32) -> RelationEntry {
    RelationEntry::new(id, referrer_id, level)
}

/// The four-entry network used throughout the tests.
///
/// ```text
/// u1
/// ├── u2
/// │   └── u4
/// └── u3
/// ```
pub fn sample_entries() -> Vec<RelationEntry> {
    vec![
        entry("u1", None, 1)
            .with_name("Uma One")
            .with_email("uma@example.com")
            .qualified(true),
        entry("u2", Some("u1"), 2)
            .with_name("Ugo Two")
            .with_email("ugo@example.com"),
        entry("u3", Some("u1"), 2)
            .with_name("Ulla Three")
            .with_email("ulla@example.org")
            .qualified(true),
        entry("u4", Some("u2"), 3)
            .with_name("Uwe Four")
            .with_email("uwe@example.net"),
    ]
}
