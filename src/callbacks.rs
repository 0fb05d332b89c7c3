//! Events emitted by a pass and the sinks that receive them

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{FileError, SyncError};

/// A state change applied to the replica tree
///
/// Paths are replica-side absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
	/// A directory was created (replica root or an intermediate directory)
	DirCreated { path: PathBuf },

	/// A file absent from the replica was copied from the source
	FileCopied { path: PathBuf },

	/// A replica file whose fingerprint differed was overwritten
	FileUpdated { path: PathBuf },

	/// A replica file absent from the source was deleted
	FileRemoved { path: PathBuf },

	/// An empty replica directory was pruned
	DirRemoved { path: PathBuf },
}

impl SyncEvent {
	pub fn path(&self) -> &Path {
		match self {
			SyncEvent::DirCreated { path }
			| SyncEvent::FileCopied { path }
			| SyncEvent::FileUpdated { path }
			| SyncEvent::FileRemoved { path }
			| SyncEvent::DirRemoved { path } => path,
		}
	}
}

impl fmt::Display for SyncEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncEvent::DirCreated { path } => write!(f, "Directory created: {}", path.display()),
			SyncEvent::FileCopied { path } => write!(f, "File copied: {}", path.display()),
			SyncEvent::FileUpdated { path } => write!(f, "File updated: {}", path.display()),
			SyncEvent::FileRemoved { path } => write!(f, "File removed: {}", path.display()),
			SyncEvent::DirRemoved { path } => write!(f, "Directory removed: {}", path.display()),
		}
	}
}

/// Receiver for pass events
pub trait EventSink: Send + Sync {
	/// Called after each state change is applied
	fn on_event(&self, event: &SyncEvent);

	/// Called when a single file or directory operation fails
	fn on_failure(&self, _error: &FileError) {}

	/// Called when a whole pass is abandoned before converging
	fn on_abort(&self, _error: &SyncError) {}
}

impl<T: Fn(&SyncEvent) + Send + Sync> EventSink for T {
	fn on_event(&self, event: &SyncEvent) {
		self(event);
	}
}

/// Sink that discards everything
pub struct NoEventSink;

impl EventSink for NoEventSink {
	fn on_event(&self, _event: &SyncEvent) {}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Mutex;

	#[test]
	fn test_event_messages() {
		let path = PathBuf::from("/replica/img/pic.bin");
		assert_eq!(
			SyncEvent::FileCopied { path: path.clone() }.to_string(),
			"File copied: /replica/img/pic.bin"
		);
		assert_eq!(
			SyncEvent::DirRemoved { path: PathBuf::from("/replica/img") }.to_string(),
			"Directory removed: /replica/img"
		);
		assert_eq!(SyncEvent::FileRemoved { path: path.clone() }.path(), path.as_path());
	}

	#[test]
	fn test_closure_is_sink() {
		let seen = Mutex::new(Vec::new());
		let sink = |e: &SyncEvent| seen.lock().unwrap().push(e.clone());
		sink.on_event(&SyncEvent::DirCreated { path: PathBuf::from("/r") });
		assert_eq!(seen.lock().unwrap().len(), 1);
	}
}

// vim: ts=4
