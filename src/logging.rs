//! Logging prelude module for convenient access to tracing macros.
//!
//! Diagnostics (skipped entries, per-file failures, pass summaries) go
//! through `tracing` to stderr. State changes are written separately to the
//! action journal, see [`crate::journal`].
//!
//! # Usage
//!
//! ```ignore
//! use crate::logging::*;
//!
//! info!("Pass complete");
//! warn!("Skipping symbolic link");
//! ```

pub use tracing::{debug, error, info, warn};

/// Initialize the tracing subscriber with environment filter support.
///
/// By default, logs at INFO level and above are displayed. Control the log level
/// with the `RUST_LOG` environment variable:
///
/// ```bash
/// RUST_LOG=debug dirmirror ./source ./replica
/// RUST_LOG=dirmirror::inventory=debug dirmirror
/// ```
pub fn init_tracing() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.init();
}

// vim: ts=4
