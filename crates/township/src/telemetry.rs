//! Logging setup for binaries built on Township.
//!
//! Libraries only emit `tracing` events; whoever owns `main` decides where
//! they go. This installs the usual console subscriber.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a console subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` (e.g. `"info,township_room=debug"`) when it is unset
/// or invalid.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .try_init()
        .is_ok()
}
