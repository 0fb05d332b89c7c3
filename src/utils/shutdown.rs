//! Graceful termination on SIGINT/SIGTERM

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, warn};

/// Shared shutdown request, checked by passes and awaited by the scheduler
#[derive(Clone, Default)]
pub struct Shutdown {
	flag: Arc<AtomicBool>,
	notify: Arc<Notify>,
}

impl Shutdown {
	pub fn new() -> Self {
		Self::default()
	}

	/// Request shutdown and wake every waiter
	pub fn trigger(&self) {
		self.flag.store(true, Ordering::SeqCst);
		self.notify.notify_waiters();
	}

	pub fn is_triggered(&self) -> bool {
		self.flag.load(Ordering::SeqCst)
	}

	/// Resolve once shutdown has been requested
	pub async fn wait(&self) {
		loop {
			let notified = self.notify.notified();
			tokio::pin!(notified);
			// Register before checking the flag so a trigger in between is not lost
			notified.as_mut().enable();
			if self.is_triggered() {
				return;
			}
			notified.await;
		}
	}
}

/// Trigger `shutdown` when the process receives SIGTERM or SIGINT
pub fn setup_signal_handlers(shutdown: Shutdown) {
	tokio::spawn(async move {
		#[cfg(unix)]
		{
			use tokio::signal::unix::{signal, SignalKind};

			let mut sigterm = match signal(SignalKind::terminate()) {
				Ok(stream) => stream,
				Err(e) => {
					warn!("Failed to setup SIGTERM handler: {}. Process will not handle SIGTERM gracefully.", e);
					return;
				}
			};

			let mut sigint = match signal(SignalKind::interrupt()) {
				Ok(stream) => stream,
				Err(e) => {
					warn!("Failed to setup SIGINT handler: {}. Process will not handle SIGINT gracefully.", e);
					return;
				}
			};

			tokio::select! {
				_ = sigterm.recv() => debug!("Received SIGTERM, shutting down..."),
				_ = sigint.recv() => debug!("Received SIGINT, shutting down..."),
			}
		}

		#[cfg(not(unix))]
		{
			if let Err(e) = tokio::signal::ctrl_c().await {
				warn!("Failed to listen for ctrl-c: {}", e);
				return;
			}
			debug!("Received ctrl-c, shutting down...");
		}

		shutdown.trigger();
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[tokio::test]
	async fn test_wait_after_trigger_returns() {
		let shutdown = Shutdown::new();
		shutdown.trigger();
		tokio::time::timeout(Duration::from_secs(1), shutdown.wait())
			.await
			.expect("wait should return immediately");
	}

	#[tokio::test]
	async fn test_trigger_wakes_waiter() {
		let shutdown = Shutdown::new();
		let waiter = {
			let shutdown = shutdown.clone();
			tokio::spawn(async move { shutdown.wait().await })
		};
		tokio::time::sleep(Duration::from_millis(20)).await;
		assert!(!shutdown.is_triggered());
		shutdown.trigger();
		tokio::time::timeout(Duration::from_secs(1), waiter)
			.await
			.expect("waiter should wake")
			.unwrap();
	}
}

// vim: ts=4
