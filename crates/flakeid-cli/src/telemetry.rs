//! Logging setup for the `flakeid` binary.
//!
//! Events go to stderr so stdout carries nothing but IDs and can be piped.
//! The filter comes from `RUST_LOG` and defaults to `info`; set
//! `RUST_LOG=flakeid=trace` to see a span per generated ID.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_file(true),
        )
        .init();
}
