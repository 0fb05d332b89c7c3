//! # dirmirror - One-way periodic directory mirroring
//!
//! dirmirror keeps a replica directory tree identical to a source tree.
//! Each pass inventories both trees, copies files that are missing from the
//! replica or whose content fingerprint differs, deletes replica files that
//! no longer exist in the source, and prunes directories left empty.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dirmirror::callbacks::NoEventSink;
//! use dirmirror::reconcile::reconcile;
//! use std::path::Path;
//!
//! let report = reconcile(Path::new("./source"), Path::new("./replica"), &NoEventSink)?;
//! println!("Copied {} files", report.files_copied());
//! ```
//!
//! ## Journalling and shutdown
//!
//! ```rust,ignore
//! use dirmirror::{journal::Journal, reconcile::Reconciler, utils::Shutdown};
//!
//! let journal = Journal::open(Path::new("./logs/sync.log"))?;
//! let shutdown = Shutdown::new();
//! let report = Reconciler::new("./source", "./replica", &journal)
//! 	.with_shutdown(&shutdown)
//! 	.reconcile()?;
//! ```

pub mod callbacks;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod inventory;
pub mod journal;
pub mod logging;
pub mod reconcile;
pub mod schedule;
pub mod utils;
pub mod validation;

// Re-export commonly used types and functions
pub use callbacks::{EventSink, NoEventSink, SyncEvent};
pub use config::Config;
pub use error::{FileError, FileOp, SyncError};
pub use fingerprint::{fingerprint_file, Fingerprint};
pub use reconcile::{reconcile, PassReport, Reconciler};

// vim: ts=4
