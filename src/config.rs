//! Configuration for the mirror process
//!
//! The configuration follows a priority chain:
//! 1. Built-in defaults (Config::default())
//! 2. Config file (TOML, passed with --config)
//! 3. Positional CLI values (highest priority)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::SyncError;
use crate::validation::{self, ValidationError, Validator};

pub const DEFAULT_SOURCE: &str = "./source";
pub const DEFAULT_REPLICA: &str = "./replica";
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_LOG_FILE: &str = "./logs/sync.log";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
	/// Authoritative tree mirrored from
	pub source: PathBuf,

	/// Tree kept identical to the source
	pub replica: PathBuf,

	/// Whole seconds to sleep between passes
	pub interval_secs: u64,

	/// Action journal, opened in append mode
	pub log_file: PathBuf,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			source: PathBuf::from(DEFAULT_SOURCE),
			replica: PathBuf::from(DEFAULT_REPLICA),
			interval_secs: DEFAULT_INTERVAL_SECS,
			log_file: PathBuf::from(DEFAULT_LOG_FILE),
		}
	}
}

impl Config {
	/// Parse a TOML config; missing keys keep their defaults
	pub fn from_toml(text: &str) -> Result<Self, SyncError> {
		toml::from_str(text).map_err(|e| SyncError::InvalidConfig { message: e.to_string() })
	}

	pub fn load_file(path: &Path) -> Result<Self, SyncError> {
		let text = fs::read_to_string(path).map_err(|e| SyncError::InvalidConfig {
			message: format!("Cannot read config file {}: {}", path.display(), e),
		})?;
		Self::from_toml(&text)
	}

	pub fn interval(&self) -> Duration {
		Duration::from_secs(self.interval_secs)
	}

	/// Eager startup check; a failure here stops the process before the loop
	pub fn check(&self) -> Result<(), SyncError> {
		if !self.source.is_dir() {
			return Err(SyncError::SourceMissing { path: self.source.clone() });
		}
		self.validate()?;
		Ok(())
	}
}

impl Validator for Config {
	fn validate(&self) -> Result<(), ValidationError> {
		validation::validate_interval_secs(self.interval_secs)?;
		validation::validate_disjoint_roots(&self.source, &self.replica)?;
		Ok(())
	}
}


// vim: ts=4
