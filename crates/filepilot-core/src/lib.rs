//! Filepilot Core Library
//!
//! This crate provides the bulk file-operation transaction engine behind
//! Filepilot. A caller hands over a list of declarative [`Action`]s (rename,
//! move, duplicate, delete, optionally with glob patterns) and the engine:
//!
//! 1. expands patterns into literal, workspace-relative actions
//! 2. validates the whole batch before touching anything
//! 3. collects cross-file reference edits for renames and moves
//! 4. applies renames/moves and their reference edits as one edit batch
//!
//! The file system and the reference resolver are injected through the
//! [`FileSystem`] and [`ReferenceResolver`] traits, so the engine runs the same
//! way against the local disk, an in-memory tree, or an editor host.

pub mod bulk;
pub mod config;
pub mod error;
pub mod fs;
pub mod references;
pub mod workspace;

// Re-export commonly used types
pub use bulk::{
    Action, ActionKind, ActionParams, BatchResult, BulkOperationOrchestrator, OperationRecord,
    ResolvedAction, perform_bulk_operations,
};
pub use config::{BulkOpsConfig, FilePilotConfig, LoggingConfig};
pub use error::{BulkOpError, BulkOpResult, ErrorKind, FsError, UnifiedError};
pub use fs::{
    EditBatch, EditOperation, FileStat, FileSystem, LocalFileSystem, MemoryFileSystem, Position,
    Range, ReferenceEdit, TextEdit,
};
pub use references::{ImportReferenceResolver, ReferenceResolver, RenameRequest};
pub use workspace::WorkspaceContext;
