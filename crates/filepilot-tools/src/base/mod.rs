//! Base trait and types for tools
//!
//! - [`Tool`] - The trait every tool implements
//! - [`ToolError`] - Error types for tool operations
//! - [`ToolCall`], [`ToolResult`], [`ToolSchema`] - the call/response model
//!
//! # Examples
//!
//! ```no_run
//! use filepilot_tools::base::{Tool, ToolCall, ToolError, ToolResult, ToolSchema};
//! use async_trait::async_trait;
//!
//! struct MyTool;
//!
//! #[async_trait]
//! impl Tool for MyTool {
//!     fn name(&self) -> &str { "my_tool" }
//!     fn description(&self) -> &str { "A custom tool" }
//!     fn schema(&self) -> ToolSchema {
//!         ToolSchema::new(self.name(), self.description(), vec![])
//!     }
//!     async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
//!         Ok(ToolResult::success(&call.id, self.name(), "done"))
//!     }
//! }
//! ```

pub mod error;
pub mod tool_trait;
pub mod types;

pub use error::ToolError;
pub use tool_trait::{ConcurrencyMode, Tool};
pub use types::{ToolCall, ToolParameter, ToolResult, ToolSchema};
