//! Periodic pass scheduling
//!
//! Passes never overlap: the next sleep starts only after the current pass
//! has returned. A failed or panicked pass is logged and the loop carries on;
//! only shutdown ends it.

use std::sync::Arc;

use crate::callbacks::EventSink;
use crate::config::Config;
use crate::error::SyncError;
use crate::logging::*;
use crate::reconcile::{PassReport, Reconciler};
use crate::utils::Shutdown;

/// Run one pass on the blocking thread pool
pub async fn run_pass(
	config: &Config,
	sink: Arc<dyn EventSink>,
	shutdown: Shutdown,
) -> Result<PassReport, SyncError> {
	let source = config.source.clone();
	let replica = config.replica.clone();

	tokio::task::spawn_blocking(move || {
		Reconciler::new(source, replica, &*sink).with_shutdown(&shutdown).reconcile()
	})
	.await
	.map_err(|e| SyncError::Other { message: format!("Pass task failed: {}", e) })?
}

/// Mirror forever, sleeping `config.interval()` between passes
///
/// Returns the number of passes started once `shutdown` is triggered.
pub async fn run(config: Config, sink: Arc<dyn EventSink>, shutdown: Shutdown) -> usize {
	info!(
		"Mirroring {} to {} every {} seconds",
		config.source.display(),
		config.replica.display(),
		config.interval_secs
	);

	let mut passes = 0;
	loop {
		if shutdown.is_triggered() {
			break;
		}

		debug!("Starting pass {}", passes + 1);
		passes += 1;
		match run_pass(&config, sink.clone(), shutdown.clone()).await {
			Ok(report) if !report.failures.is_empty() => {
				warn!("Pass finished with {} failed items", report.failures.len());
			}
			Ok(_) => {}
			Err(e) => {
				error!("Pass aborted: {}", e);
				sink.on_abort(&e);
			}
		}

		if shutdown.is_triggered() {
			break;
		}
		info!("Next pass in {} seconds", config.interval_secs);

		tokio::select! {
			_ = tokio::time::sleep(config.interval()) => {}
			_ = shutdown.wait() => break,
		}
	}

	info!("Stopped after {} passes", passes);
	passes
}

// vim: ts=4
