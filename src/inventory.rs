//! Tree inventories: relative path -> absolute path for every regular file
//!
//! An inventory is rebuilt from scratch on every pass and dropped afterwards.
//! Symbolic links are never followed. Links, sockets, FIFOs and device files
//! are skipped with a warning and listed in [`Inventory::skipped`], as are
//! entries that cannot be read. Paths whose contents are unknown because of
//! a read error are also kept in [`Inventory::unreadable`]: a file missing
//! below one of them may still exist.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::*;

/// Why an entry was left out of the inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
	Symlink,
	Special,
	Unreadable(String),
}

impl fmt::Display for SkipReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SkipReason::Symlink => write!(f, "symbolic link"),
			SkipReason::Special => write!(f, "special file"),
			SkipReason::Unreadable(e) => write!(f, "unreadable: {}", e),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
	pub path: PathBuf,
	pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct Inventory {
	root: PathBuf,
	files: BTreeMap<PathBuf, PathBuf>,
	dirs: Vec<PathBuf>,
	skipped: Vec<SkippedEntry>,
	unreadable: Vec<PathBuf>,
}

impl Inventory {
	/// Walk `root` recursively and collect its regular files
	///
	/// A root that cannot be listed yields an empty inventory with the root
	/// recorded as skipped.
	pub fn scan(root: &Path) -> Self {
		let mut inventory = Inventory { root: root.to_path_buf(), ..Default::default() };
		inventory.walk(root);
		debug!(
			"Scanned {}: {} files, {} dirs, {} skipped",
			root.display(),
			inventory.files.len(),
			inventory.dirs.len(),
			inventory.skipped.len()
		);
		inventory
	}

	fn walk(&mut self, dir: &Path) {
		let entries = match fs::read_dir(dir) {
			Ok(e) => e,
			Err(e) => {
				warn!("Cannot read directory {}: {}", dir.display(), e);
				self.mark_unreadable(dir);
				self.skip(dir.to_path_buf(), SkipReason::Unreadable(e.to_string()));
				return;
			}
		};

		for entry_result in entries {
			let entry = match entry_result {
				Ok(e) => e,
				Err(e) => {
					warn!("Error reading entry in {}: {}", dir.display(), e);
					// The listing is incomplete
					self.mark_unreadable(dir);
					continue;
				}
			};

			let path = entry.path();
			let meta = match fs::symlink_metadata(&path) {
				Ok(m) => m,
				Err(e) => {
					warn!("Cannot access {}: {}", path.display(), e);
					self.mark_unreadable(&path);
					self.skip(path, SkipReason::Unreadable(e.to_string()));
					continue;
				}
			};

			let relative = match path.strip_prefix(&self.root) {
				Ok(r) => r.to_path_buf(),
				Err(_) => continue,
			};

			let file_type = meta.file_type();
			if file_type.is_file() {
				self.files.insert(relative, path);
			} else if file_type.is_dir() {
				self.dirs.push(relative);
				self.walk(&path);
			} else if file_type.is_symlink() {
				warn!("Skipping symbolic link {}", path.display());
				self.skip(path, SkipReason::Symlink);
			} else {
				warn!("Skipping special file {}", path.display());
				self.skip(path, SkipReason::Special);
			}
		}
	}

	fn skip(&mut self, path: PathBuf, reason: SkipReason) {
		self.skipped.push(SkippedEntry { path, reason });
	}

	fn mark_unreadable(&mut self, path: &Path) {
		if let Ok(relative) = path.strip_prefix(&self.root) {
			if !self.unreadable.iter().any(|p| p == relative) {
				self.unreadable.push(relative.to_path_buf());
			}
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Absolute path of the file stored under `relative`
	pub fn get(&self, relative: &Path) -> Option<&Path> {
		self.files.get(relative).map(PathBuf::as_path)
	}

	pub fn contains(&self, relative: &Path) -> bool {
		self.files.contains_key(relative)
	}

	pub fn len(&self) -> usize {
		self.files.len()
	}

	pub fn is_empty(&self) -> bool {
		self.files.is_empty()
	}

	/// (relative, absolute) pairs in path order
	pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
		self.files.iter().map(|(rel, abs)| (rel.as_path(), abs.as_path()))
	}

	/// Relative paths of every directory below the root, parents before children
	pub fn dirs(&self) -> &[PathBuf] {
		&self.dirs
	}

	pub fn skipped(&self) -> &[SkippedEntry] {
		&self.skipped
	}

	/// Relative paths that could not be listed or inspected
	///
	/// An unreadable root shows up as the empty path.
	pub fn unreadable(&self) -> &[PathBuf] {
		&self.unreadable
	}

	/// `relative` lies at or below a path whose contents are unknown
	pub fn is_unknown(&self, relative: &Path) -> bool {
		self.unreadable.iter().any(|p| relative.starts_with(p))
	}
}


// vim: ts=4
