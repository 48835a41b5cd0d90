//! Tool implementations

pub mod bulk_ops;
pub mod find;

pub use bulk_ops::BulkFileOperationsTool;
pub use find::FindFilesTool;
