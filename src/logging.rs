//! Logging and tracing configuration
//!
//! Structured logging through the `tracing` crate. Call [`init`] once at
//! startup; the level is taken from `RUST_LOG` when set:
//!
//! ```bash
//! RUST_LOG=debug studio-extract scene.png
//! RUST_LOG=studio_extract::playhome=trace studio-extract scene.png
//! ```
//!
//! Without `RUST_LOG` the crate logs at `info` (`debug` in debug builds or
//! with the `debug-logging` feature).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose || cfg!(debug_assertions) || cfg!(feature = "debug-logging") {
        EnvFilter::new("studio_extract=debug")
    } else {
        EnvFilter::new("studio_extract=info")
    }
}

/// Initialize the global subscriber. `verbose` raises the default level
/// to debug when `RUST_LOG` is not set.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .compact(),
    );

    // Ignore error if already set
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Verbose output with file:line and thread IDs, for development
pub fn init_verbose() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .pretty(),
    );

    let _ = tracing::subscriber::set_global_default(subscriber);
}
