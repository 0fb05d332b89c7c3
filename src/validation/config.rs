//! Configuration validation functions

use super::ValidationError;

/// Longest accepted interval between passes (one week)
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 3600;

/// Validate the interval between passes
///
/// # Arguments
/// * `interval_secs` - Whole seconds to sleep between passes (1..=MAX_INTERVAL_SECS)
pub fn validate_interval_secs(interval_secs: u64) -> Result<(), ValidationError> {
	if interval_secs == 0 {
		return Err(ValidationError::ConfigError(
			"Interval must be at least 1 second".to_string(),
		));
	}
	if interval_secs > MAX_INTERVAL_SECS {
		return Err(ValidationError::ConfigError(format!(
			"Interval too large: {} seconds (max {})",
			interval_secs, MAX_INTERVAL_SECS
		)));
	}
	Ok(())
}


// vim: ts=4
