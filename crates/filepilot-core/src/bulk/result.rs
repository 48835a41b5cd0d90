//! Structured outcome of a bulk operation

use super::action::{ActionKind, ResolvedAction};
use serde::{Deserialize, Serialize};

/// Outcome of one resolved action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationRecord {
    fn for_action(action: &ResolvedAction, error: Option<String>) -> Self {
        Self {
            kind: action.kind(),
            source: Some(action.source().relative.clone()),
            target: action.target().map(|t| t.relative.clone()),
            success: error.is_none(),
            error,
        }
    }
}

/// Aggregate result returned once a batch has been applied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub success_count: usize,
    pub failed_count: usize,
    pub total_references_updated: usize,
    pub operations: Vec<OperationRecord>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_success(&mut self, action: &ResolvedAction) {
        self.success_count += 1;
        self.operations.push(OperationRecord::for_action(action, None));
    }

    pub(crate) fn record_failure(&mut self, action: &ResolvedAction, error: impl ToString) {
        self.failed_count += 1;
        self.operations
            .push(OperationRecord::for_action(action, Some(error.to_string())));
    }

    /// Whether every operation succeeded
    pub fn is_success(&self) -> bool {
        self.failed_count == 0
    }

    /// `"X succeeded, Y failed"`
    pub fn summary(&self) -> String {
        format!(
            "{} succeeded, {} failed",
            self.success_count, self.failed_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bulk::action::ResolvedPath;
    use serde_json::json;
    use std::path::PathBuf;

    fn path(rel: &str) -> ResolvedPath {
        ResolvedPath {
            relative: rel.to_string(),
            absolute: PathBuf::from("/w").join(rel),
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut result = BatchResult::new();
        result.record_success(&ResolvedAction::transfer(
            ActionKind::Rename,
            path("old.ts"),
            path("new.ts"),
        ));
        result.record_failure(
            &ResolvedAction::Delete {
                source: path("b.log"),
            },
            "File not found: /w/b.log",
        );

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "successCount": 1,
                "failedCount": 1,
                "totalReferencesUpdated": 0,
                "operations": [
                    {"type": "rename", "source": "old.ts", "target": "new.ts", "success": true},
                    {"type": "delete", "source": "b.log", "success": false, "error": "File not found: /w/b.log"}
                ]
            })
        );
        assert_eq!(result.summary(), "1 succeeded, 1 failed");
        assert!(!result.is_success());
    }
}
