//! One-way tree reconciliation
//!
//! A pass converges the replica tree onto the source tree in four ordered
//! steps: inventory, create/update, delete, prune. Only a replica root that
//! cannot be created (or a vanished source root) aborts the pass; every
//! other failure is recorded per item in the [`PassReport`] and the pass
//! moves on to the next file.

use filetime::FileTime;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::callbacks::{EventSink, SyncEvent};
use crate::error::{FileError, FileOp, SyncError};
use crate::fingerprint::fingerprint_file;
use crate::inventory::{Inventory, SkippedEntry};
use crate::logging::*;
use crate::utils::Shutdown;

/// Suffix of the sibling file a copy is written to before the final rename
pub const TEMP_SUFFIX: &str = ".dirmirror-tmp";

/// Outcome of one pass
#[derive(Debug, Default)]
pub struct PassReport {
	/// State changes applied, in order
	pub events: Vec<SyncEvent>,

	/// Per-item failures; the pass continued past each of them
	pub failures: Vec<FileError>,

	/// Entries left out of either inventory
	pub skipped: Vec<SkippedEntry>,

	/// The pass stopped early on shutdown
	pub cancelled: bool,
}

impl PassReport {
	fn count(&self, pred: impl Fn(&SyncEvent) -> bool) -> usize {
		self.events.iter().filter(|&e| pred(e)).count()
	}

	pub fn files_copied(&self) -> usize {
		self.count(|e| matches!(e, SyncEvent::FileCopied { .. }))
	}

	pub fn files_updated(&self) -> usize {
		self.count(|e| matches!(e, SyncEvent::FileUpdated { .. }))
	}

	pub fn files_removed(&self) -> usize {
		self.count(|e| matches!(e, SyncEvent::FileRemoved { .. }))
	}

	pub fn dirs_created(&self) -> usize {
		self.count(|e| matches!(e, SyncEvent::DirCreated { .. }))
	}

	pub fn dirs_removed(&self) -> usize {
		self.count(|e| matches!(e, SyncEvent::DirRemoved { .. }))
	}

	/// Nothing was changed and nothing failed
	pub fn is_noop(&self) -> bool {
		self.events.is_empty() && self.failures.is_empty()
	}

	/// The pass ran to completion without per-item failures
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty() && !self.cancelled
	}
}

/// Mirrors `source` onto `replica`, reporting every change to a sink
pub struct Reconciler<'a> {
	source: PathBuf,
	replica: PathBuf,
	sink: &'a dyn EventSink,
	shutdown: Option<&'a Shutdown>,
}

impl<'a> Reconciler<'a> {
	pub fn new(
		source: impl Into<PathBuf>,
		replica: impl Into<PathBuf>,
		sink: &'a dyn EventSink,
	) -> Self {
		Reconciler { source: source.into(), replica: replica.into(), sink, shutdown: None }
	}

	/// Stop between file operations once `shutdown` is triggered
	pub fn with_shutdown(mut self, shutdown: &'a Shutdown) -> Self {
		self.shutdown = Some(shutdown);
		self
	}

	pub fn source(&self) -> &Path {
		&self.source
	}

	pub fn replica(&self) -> &Path {
		&self.replica
	}

	/// Run one complete pass
	pub fn reconcile(&self) -> Result<PassReport, SyncError> {
		// An empty source inventory would wipe the replica
		if !self.source.is_dir() {
			return Err(SyncError::SourceMissing { path: self.source.clone() });
		}

		let mut pass = Pass::new(self);
		pass.ensure_replica_root()?;

		let source_inv = Inventory::scan(&self.source);
		let replica_inv = Inventory::scan(&self.replica);
		pass.report.skipped.extend_from_slice(source_inv.skipped());
		pass.report.skipped.extend_from_slice(replica_inv.skipped());

		pass.update_pass(&source_inv, &replica_inv);
		pass.delete_pass(&source_inv, &replica_inv);
		pass.prune_pass(&source_inv);

		let report = pass.report;
		info!(
			"Pass complete: {} copied, {} updated, {} removed, {} dirs pruned, {} failures{}",
			report.files_copied(),
			report.files_updated(),
			report.files_removed(),
			report.dirs_removed(),
			report.failures.len(),
			if report.cancelled { " (cancelled)" } else { "" }
		);
		Ok(report)
	}
}

/// Run a single pass without cancellation support
pub fn reconcile(
	source: &Path,
	replica: &Path,
	sink: &dyn EventSink,
) -> Result<PassReport, SyncError> {
	Reconciler::new(source, replica, sink).reconcile()
}

/// Mutable state of a pass in flight
struct Pass<'r, 'a> {
	reconciler: &'r Reconciler<'a>,
	report: PassReport,
	/// Directories this pass created; never pruned by the same pass
	created_dirs: HashSet<PathBuf>,
	/// Replica entries removed to make way for the source layout
	cleared: Vec<PathBuf>,
}

impl<'r, 'a> Pass<'r, 'a> {
	fn new(reconciler: &'r Reconciler<'a>) -> Self {
		Pass {
			reconciler,
			report: PassReport::default(),
			created_dirs: HashSet::new(),
			cleared: Vec::new(),
		}
	}

	fn emit(&mut self, event: SyncEvent) {
		self.reconciler.sink.on_event(&event);
		self.report.events.push(event);
	}

	fn fail(&mut self, error: FileError) {
		warn!("{}", error);
		self.reconciler.sink.on_failure(&error);
		self.report.failures.push(error);
	}

	fn interrupted(&mut self) -> bool {
		if !self.report.cancelled
			&& self.reconciler.shutdown.is_some_and(|s| s.is_triggered())
		{
			info!("Shutdown requested, stopping pass early");
			self.report.cancelled = true;
		}
		self.report.cancelled
	}

	fn ensure_replica_root(&mut self) -> Result<(), SyncError> {
		let reconciler = self.reconciler;
		let root = &reconciler.replica;
		match fs::metadata(root) {
			Ok(meta) if meta.is_dir() => Ok(()),
			Ok(_) => Err(SyncError::ReplicaRoot {
				path: root.clone(),
				source: io::Error::new(io::ErrorKind::AlreadyExists, "exists and is not a directory"),
			}),
			Err(e) if e.kind() == io::ErrorKind::NotFound => {
				fs::create_dir_all(root)
					.map_err(|source| SyncError::ReplicaRoot { path: root.clone(), source })?;
				self.emit(SyncEvent::DirCreated { path: root.clone() });
				Ok(())
			}
			Err(source) => Err(SyncError::ReplicaRoot { path: root.clone(), source }),
		}
	}

	fn update_pass(&mut self, source_inv: &Inventory, replica_inv: &Inventory) {
		for (rel, src) in source_inv.iter() {
			if self.interrupted() {
				return;
			}

			let event = match replica_inv.get(rel) {
				None => SyncEvent::FileCopied { path: self.reconciler.replica.join(rel) },
				Some(dst) if differs(src, dst) => {
					SyncEvent::FileUpdated { path: self.reconciler.replica.join(rel) }
				}
				Some(_) => continue,
			};

			if let Err(e) = self.create_parent_dirs(rel) {
				self.fail(e);
				continue;
			}
			if let Err(e) = self.clear_directory_at(event.path()) {
				self.fail(e);
				continue;
			}

			match copy_with_metadata(src, event.path()) {
				Ok(()) => self.emit(event),
				Err(e) => self.fail(FileError::new(FileOp::Copy, event.path(), e)),
			}
		}
	}

	fn delete_pass(&mut self, source_inv: &Inventory, replica_inv: &Inventory) {
		for (rel, dst) in replica_inv.iter() {
			if self.interrupted() {
				return;
			}
			if source_inv.contains(rel) {
				continue;
			}
			if source_inv.is_unknown(rel) {
				debug!("Keeping {}: source side could not be read", dst.display());
				continue;
			}
			// Already gone with an obstruction, or now a directory of the same name
			if self.cleared.iter().any(|c| dst.starts_with(c)) {
				continue;
			}

			match fs::remove_file(dst) {
				Ok(()) => self.emit(SyncEvent::FileRemoved { path: dst.to_path_buf() }),
				Err(e) if e.kind() == io::ErrorKind::NotFound => {
					debug!("{} already gone", dst.display());
				}
				Err(e) => self.fail(FileError::new(FileOp::Delete, dst, e)),
			}
		}
	}

	/// Remove empty replica directories, deepest first
	///
	/// The replica is walked again here so directories emptied by the delete
	/// pass and directories created by the update pass are both seen.
	/// Directories mirroring an unreadable source directory are kept.
	fn prune_pass(&mut self, source_inv: &Inventory) {
		if self.interrupted() {
			return;
		}

		let replica = self.reconciler.replica.clone();
		let current = Inventory::scan(&replica);

		// Pre-order listing reversed puts every child before its parent
		for rel in current.dirs().iter().rev() {
			if self.interrupted() {
				return;
			}

			let dir = replica.join(rel);
			if self.created_dirs.contains(&dir) || source_inv.is_unknown(rel) {
				continue;
			}

			match is_dir_empty(&dir) {
				Ok(true) => {}
				Ok(false) => continue,
				Err(e) => {
					self.fail(FileError::new(FileOp::Prune, &dir, e));
					continue;
				}
			}

			match fs::remove_dir(&dir) {
				Ok(()) => self.emit(SyncEvent::DirRemoved { path: dir }),
				Err(e) if e.kind() == io::ErrorKind::NotFound => {}
				// Re-evaluated on the next pass
				Err(e) => self.fail(FileError::new(FileOp::Prune, &dir, e)),
			}
		}
	}

	/// Create the missing replica directories between the root and `rel`
	///
	/// A file, symlink or special file standing where a directory belongs is
	/// removed first.
	fn create_parent_dirs(&mut self, rel: &Path) -> Result<(), FileError> {
		let parent = match rel.parent() {
			Some(p) => p,
			None => return Ok(()),
		};

		let mut dir = self.reconciler.replica.clone();
		for component in parent.components() {
			dir.push(component);
			match fs::symlink_metadata(&dir) {
				Ok(meta) if meta.is_dir() => continue,
				Ok(_) => {
					fs::remove_file(&dir).map_err(|e| FileError::new(FileOp::Delete, &dir, e))?;
					self.cleared.push(dir.clone());
					self.emit(SyncEvent::FileRemoved { path: dir.clone() });
				}
				Err(e) if e.kind() == io::ErrorKind::NotFound => {}
				Err(e) => return Err(FileError::new(FileOp::CreateDir, &dir, e)),
			}

			fs::create_dir(&dir).map_err(|e| FileError::new(FileOp::CreateDir, &dir, e))?;
			self.created_dirs.insert(dir.clone());
			self.emit(SyncEvent::DirCreated { path: dir.clone() });
		}
		Ok(())
	}

	/// Remove a replica directory occupying the path of a source file
	///
	/// Anything else at `target` is replaced by the final rename of the copy.
	fn clear_directory_at(&mut self, target: &Path) -> Result<(), FileError> {
		match fs::symlink_metadata(target) {
			Ok(meta) if meta.is_dir() => {
				info!("Replacing directory {} with a file", target.display());
				fs::remove_dir_all(target).map_err(|e| FileError::new(FileOp::Prune, target, e))?;
				self.cleared.push(target.to_path_buf());
				self.emit(SyncEvent::DirRemoved { path: target.to_path_buf() });
				Ok(())
			}
			_ => Ok(()),
		}
	}
}

/// Compare two files by fingerprint; an unreadable side counts as different
fn differs(source: &Path, replica: &Path) -> bool {
	match (fingerprint_file(source), fingerprint_file(replica)) {
		(Ok(a), Ok(b)) => a != b,
		(Err(e), _) => {
			warn!("Cannot fingerprint {}: {}", source.display(), e);
			true
		}
		(_, Err(e)) => {
			warn!("Cannot fingerprint {}: {}", replica.display(), e);
			true
		}
	}
}

fn is_dir_empty(dir: &Path) -> io::Result<bool> {
	Ok(fs::read_dir(dir)?.next().is_none())
}

fn temp_path_for(target: &Path) -> PathBuf {
	let mut name = target.file_name().map(OsString::from).unwrap_or_default();
	name.push(TEMP_SUFFIX);
	target.with_file_name(name)
}

/// Copy bytes, permissions and timestamps, replacing `target` atomically
///
/// The data lands in a temporary sibling first so a failed copy never
/// leaves a truncated file under the final name.
pub fn copy_with_metadata(source: &Path, target: &Path) -> io::Result<()> {
	let tmp = temp_path_for(target);
	let result = write_temp_and_rename(source, &tmp, target);
	if result.is_err() {
		let _ = fs::remove_file(&tmp);
	}
	result
}

fn write_temp_and_rename(source: &Path, tmp: &Path, target: &Path) -> io::Result<()> {
	// std::fs::copy carries the permission bits over
	fs::copy(source, tmp)?;

	let meta = fs::metadata(source)?;
	filetime::set_file_times(
		tmp,
		FileTime::from_last_access_time(&meta),
		FileTime::from_last_modification_time(&meta),
	)?;

	fs::rename(tmp, target)
}


// vim: ts=4
