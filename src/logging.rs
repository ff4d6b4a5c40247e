//! Diagnostic tracing for the CLI.
//!
//! Reads `RUST_LOG`, defaulting to `warn`. Output goes to stderr so stdout
//! stays reserved for the printed plan.
//!
//! ```bash
//! RUST_LOG=taskplan=debug taskplan --goal "Learn Rust"
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber. Call once from `main`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
