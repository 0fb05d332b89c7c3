//! Error types for mirroring passes

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::validation::ValidationError;

/// Pass-level error: aborts the current pass (or startup), never a single file
#[derive(Debug)]
pub enum SyncError {
	/// The replica root does not exist and could not be created
	ReplicaRoot { path: PathBuf, source: io::Error },

	/// The source root is missing or not a directory
	SourceMissing { path: PathBuf },

	/// Invalid configuration
	InvalidConfig { message: String },

	/// Generic error message
	Other { message: String },
}

impl fmt::Display for SyncError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncError::ReplicaRoot { path, source } => {
				write!(f, "Cannot create replica root {}: {}", path.display(), source)
			}
			SyncError::SourceMissing { path } => {
				write!(f, "Source directory not found: {}", path.display())
			}
			SyncError::InvalidConfig { message } => {
				write!(f, "Invalid configuration: {}", message)
			}
			SyncError::Other { message } => write!(f, "{}", message),
		}
	}
}

impl Error for SyncError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			SyncError::ReplicaRoot { source, .. } => Some(source),
			_ => None,
		}
	}
}

impl From<ValidationError> for SyncError {
	fn from(e: ValidationError) -> Self {
		SyncError::InvalidConfig { message: e.to_string() }
	}
}

/// Operation that failed on a single file or directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
	Copy,
	Delete,
	Prune,
	CreateDir,
}

impl fmt::Display for FileOp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FileOp::Copy => write!(f, "copy"),
			FileOp::Delete => write!(f, "delete"),
			FileOp::Prune => write!(f, "remove directory"),
			FileOp::CreateDir => write!(f, "create directory"),
		}
	}
}

/// Per-item failure, recorded in the pass report while the pass continues
#[derive(Debug)]
pub struct FileError {
	pub op: FileOp,
	pub path: PathBuf,
	pub source: io::Error,
}

impl FileError {
	pub fn new(op: FileOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
		FileError { op, path: path.into(), source }
	}
}

impl fmt::Display for FileError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Failed to {} {}: {}", self.op, self.path.display(), self.source)
	}
}

impl Error for FileError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.source)
	}
}


// vim: ts=4
