//! Path validation functions

use std::path::{Component, Path, PathBuf};

use super::ValidationError;

/// Lexically normalize a path against the current directory
///
/// Resolves `.` and `..` components without touching the filesystem, so it
/// also works for a replica root that does not exist yet.
pub fn normalize_path(path: &Path) -> PathBuf {
	let absolute = if path.is_absolute() {
		path.to_path_buf()
	} else {
		std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
	};

	let mut out = PathBuf::new();
	for component in absolute.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				out.pop();
			}
			other => out.push(other.as_os_str()),
		}
	}
	out
}

/// Check if path is within a root directory (or equal to it)
pub fn is_path_within_root(path: &Path, root: &Path) -> bool {
	path.starts_with(root)
}

/// Validate that source and replica trees do not overlap
///
/// A replica nested inside its source would mirror itself on every pass;
/// a source nested inside its replica would be deleted by the first pass.
pub fn validate_disjoint_roots(source: &Path, replica: &Path) -> Result<(), ValidationError> {
	let source = normalize_path(source);
	let replica = normalize_path(replica);

	if is_path_within_root(&replica, &source) {
		return Err(ValidationError::PathError(format!(
			"Replica {:?} is inside source {:?}",
			replica, source
		)));
	}
	if is_path_within_root(&source, &replica) {
		return Err(ValidationError::PathError(format!(
			"Source {:?} is inside replica {:?}",
			source, replica
		)));
	}
	Ok(())
}


// vim: ts=4
