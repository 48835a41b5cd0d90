//! Error types for Filepilot
//!
//! Two layers of errors exist:
//! - [`BulkOpError`]: typed, user-facing errors raised by the bulk engine
//!   before any mutation (plus `EDIT_REJECTED` after the commit)
//! - [`FsError`]: failures reported by a file-system or reference capability
//!
//! Both implement [`UnifiedError`], which exposes a stable error code for
//! programmatic handling.

mod constructors;
mod fs_error;
mod types;

pub use fs_error::FsError;
pub use types::{BulkOpError, BulkOpResult, ErrorKind, UnifiedError};
