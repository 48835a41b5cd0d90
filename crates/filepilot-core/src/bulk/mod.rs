//! Bulk-operation transaction engine
//!
//! Data flows through five phases:
//!
//! ```text
//! actions -> expand -> validate -> collect references -> build -> apply -> BatchResult
//! ```
//!
//! Everything up to and including validation is free of side effects, so any
//! error raised there leaves the workspace untouched.

mod action;
mod expand;
mod orchestrator;
mod references;
mod result;
mod transaction;
pub mod transform;
mod validate;

#[cfg(test)]
mod tests;

pub use action::{Action, ActionKind, ActionParams, ResolvedAction, ResolvedPath};
pub use orchestrator::{BulkOperationOrchestrator, ProgressFn, perform_bulk_operations};
pub use result::{BatchResult, OperationRecord};
pub use transform::transform;
