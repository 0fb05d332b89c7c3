//! Append-only action journal
//!
//! Every state change is written as `[YYYY-MM-DD HH:MM:SS] <message>` to the
//! journal file and echoed to stdout. The file is opened in append mode and
//! never truncated. Its parent directory must already exist.

use chrono::{DateTime, Local, TimeZone};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::callbacks::{EventSink, SyncEvent};
use crate::error::{FileError, SyncError};
use crate::logging::*;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format one journal line for `message` at time `at`
pub fn format_line<Tz: TimeZone>(at: &DateTime<Tz>, message: &str) -> String
where
	Tz::Offset: std::fmt::Display,
{
	format!("[{}] {}", at.format(TIMESTAMP_FORMAT), message)
}

pub struct Journal {
	path: PathBuf,
	file: Mutex<File>,
	echo: bool,
}

impl Journal {
	/// Open `path` for appending, creating the file if needed
	pub fn open(path: &Path) -> io::Result<Self> {
		let file = OpenOptions::new().create(true).append(true).open(path)?;
		Ok(Journal { path: path.to_path_buf(), file: Mutex::new(file), echo: true })
	}

	/// Disable or enable the stdout copy of each line
	pub fn with_echo(mut self, echo: bool) -> Self {
		self.echo = echo;
		self
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Timestamp and record a message
	pub fn record(&self, message: &str) {
		let line = format_line(&Local::now(), message);
		if self.echo {
			println!("{}", line);
		}

		let mut file = match self.file.lock() {
			Ok(f) => f,
			Err(poisoned) => poisoned.into_inner(),
		};
		if let Err(e) = writeln!(file, "{}", line) {
			warn!("Cannot write to journal {}: {}", self.path.display(), e);
		}
	}
}

impl EventSink for Journal {
	fn on_event(&self, event: &SyncEvent) {
		self.record(&event.to_string());
	}

	fn on_failure(&self, error: &FileError) {
		self.record(&error.to_string());
	}

	fn on_abort(&self, error: &SyncError) {
		self.record(&format!("Pass aborted: {}", error));
	}
}


// vim: ts=4
