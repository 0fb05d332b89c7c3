//! Content fingerprints for change detection
//!
//! A fingerprint is a 128-bit BLAKE3 digest of a file's full byte stream,
//! read in fixed-size chunks so memory use does not grow with file size.
//! It is only ever compared for equality within a single pass.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read buffer size used while hashing
pub const CHUNK_SIZE: usize = 4096;

/// Digest length in bytes (128 bits)
pub const FINGERPRINT_LEN: usize = 16;

/// Truncated BLAKE3 digest of a file's content
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; FINGERPRINT_LEN]);

impl Fingerprint {
	/// Fingerprint an in-memory buffer
	pub fn of_bytes(data: &[u8]) -> Self {
		let mut hasher = blake3::Hasher::new();
		hasher.update(data);
		Self::from_hasher(&hasher)
	}

	fn from_hasher(hasher: &blake3::Hasher) -> Self {
		let mut out = [0u8; FINGERPRINT_LEN];
		hasher.finalize_xof().fill(&mut out);
		Fingerprint(out)
	}

	pub fn as_bytes(&self) -> &[u8; FINGERPRINT_LEN] {
		&self.0
	}

	/// Lowercase hex encoding (32 characters)
	pub fn to_hex(&self) -> String {
		hex::encode(self.0)
	}
}

impl fmt::Display for Fingerprint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl fmt::Debug for Fingerprint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Fingerprint({})", self.to_hex())
	}
}

/// Fingerprint everything a reader yields, `CHUNK_SIZE` bytes at a time
pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<Fingerprint> {
	let mut hasher = blake3::Hasher::new();
	let mut buf = [0u8; CHUNK_SIZE];
	loop {
		let n = match reader.read(&mut buf) {
			Ok(0) => break,
			Ok(n) => n,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e),
		};
		hasher.update(&buf[..n]);
	}
	Ok(Fingerprint::from_hasher(&hasher))
}

/// Fingerprint the file at `path`
///
/// Fails if the file is missing, unreadable, or disappears mid-read.
pub fn fingerprint_file(path: &Path) -> io::Result<Fingerprint> {
	let file = File::open(path)?;
	fingerprint_reader(file)
}


// vim: ts=4
