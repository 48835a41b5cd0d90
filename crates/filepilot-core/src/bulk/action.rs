//! Declarative actions and their resolved form

use crate::error::{BulkOpError, BulkOpResult};
use crate::fs::pattern::has_wildcard;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Kind of a bulk action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Rename,
    Move,
    Duplicate,
    Delete,
}

impl ActionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rename => "rename",
            Self::Move => "move",
            Self::Duplicate => "duplicate",
            Self::Delete => "delete",
        }
    }

    /// Whether the action needs a `target`
    pub const fn has_target(self) -> bool {
        !matches!(self, Self::Delete)
    }

    /// Whether the action goes through the edit batch and updates references
    pub const fn is_rename(self) -> bool {
        matches!(self, Self::Rename | Self::Move)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of an action. Paths are relative to the workspace root and may
/// contain `*` and `?` in `source` and `path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// One declarative file operation, e.g.
/// `{"type": "rename", "params": {"source": "a.ts", "target": "b.ts"}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default)]
    pub params: ActionParams,
}

impl Action {
    pub fn rename(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::transfer(ActionKind::Rename, source, target)
    }

    pub fn move_to(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::transfer(ActionKind::Move, source, target)
    }

    pub fn duplicate(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::transfer(ActionKind::Duplicate, source, target)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Delete,
            params: ActionParams {
                path: Some(path.into()),
                ..Default::default()
            },
        }
    }

    fn transfer(kind: ActionKind, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind,
            params: ActionParams {
                source: Some(source.into()),
                target: Some(target.into()),
                path: None,
            },
        }
    }

    /// Check the shape of the action and borrow its paths.
    ///
    /// `index` is the zero-based position in the batch, used in messages.
    pub(crate) fn shape(&self, index: usize) -> BulkOpResult<ActionShape<'_>> {
        let position = index + 1;
        match self.kind {
            ActionKind::Delete => {
                let path = required(self.params.path.as_deref(), "path", self.kind, position)?;
                Ok(ActionShape::Delete { path })
            }
            kind => {
                let source = required(self.params.source.as_deref(), "source", kind, position)?;
                let target = required(self.params.target.as_deref(), "target", kind, position)?;
                if has_wildcard(target) && !has_wildcard(source) {
                    return Err(BulkOpError::invalid_input_with_context(
                        format!(
                            "Action {} ({}): target '{}' contains a wildcard but source '{}' does not.",
                            position, kind, target, source
                        ),
                        "wildcard_target",
                    ));
                }
                if kind.is_rename() && source == target {
                    return Err(BulkOpError::invalid_input_with_context(
                        format!(
                            "Action {} ({}): source and target are the same path '{}'.",
                            position, kind, source
                        ),
                        "same_path",
                    ));
                }
                Ok(ActionShape::Transfer {
                    kind,
                    source,
                    target,
                })
            }
        }
    }
}

fn required<'a>(
    value: Option<&'a str>,
    name: &str,
    kind: ActionKind,
    position: usize,
) -> BulkOpResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(BulkOpError::invalid_input_with_context(
            format!("Action {} ({}): '{}' must not be empty.", position, kind, name),
            "empty_path",
        )),
        None => Err(BulkOpError::invalid_input_with_context(
            format!("Action {} ({}): missing required '{}'.", position, kind, name),
            "missing_param",
        )),
    }
}

/// Borrowed, shape-checked view of an [`Action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActionShape<'a> {
    Transfer {
        kind: ActionKind,
        source: &'a str,
        target: &'a str,
    },
    Delete {
        path: &'a str,
    },
}

/// A workspace-relative path together with its absolute form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    /// Relative to the workspace root, `/`-separated
    pub relative: String,
    #[serde(skip)]
    pub absolute: PathBuf,
}

/// An action whose paths are all literal and absolute.
///
/// Only the kinds that need a target carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResolvedAction {
    Rename {
        source: ResolvedPath,
        target: ResolvedPath,
    },
    Move {
        source: ResolvedPath,
        target: ResolvedPath,
    },
    Duplicate {
        source: ResolvedPath,
        target: ResolvedPath,
    },
    Delete {
        source: ResolvedPath,
    },
}

impl ResolvedAction {
    pub(crate) fn transfer(kind: ActionKind, source: ResolvedPath, target: ResolvedPath) -> Self {
        match kind {
            ActionKind::Rename => Self::Rename { source, target },
            ActionKind::Move => Self::Move { source, target },
            ActionKind::Duplicate => Self::Duplicate { source, target },
            ActionKind::Delete => Self::Delete { source },
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Rename { .. } => ActionKind::Rename,
            Self::Move { .. } => ActionKind::Move,
            Self::Duplicate { .. } => ActionKind::Duplicate,
            Self::Delete { .. } => ActionKind::Delete,
        }
    }

    pub fn source(&self) -> &ResolvedPath {
        match self {
            Self::Rename { source, .. }
            | Self::Move { source, .. }
            | Self::Duplicate { source, .. }
            | Self::Delete { source } => source,
        }
    }

    pub fn target(&self) -> Option<&ResolvedPath> {
        match self {
            Self::Rename { target, .. }
            | Self::Move { target, .. }
            | Self::Duplicate { target, .. } => Some(target),
            Self::Delete { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_action_deserializes_wire_shape() {
        let action: Action = serde_json::from_value(json!({
            "type": "rename",
            "params": {"source": "src/old.ts", "target": "src/new.ts"}
        }))
        .unwrap();
        assert_eq!(action, Action::rename("src/old.ts", "src/new.ts"));

        let action: Action =
            serde_json::from_value(json!({"type": "delete", "params": {"path": "*.log"}})).unwrap();
        assert_eq!(action.kind, ActionKind::Delete);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<Action, _> =
            serde_json::from_value(json!({"type": "chmod", "params": {"path": "a"}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_shape_requires_target() {
        let action = Action {
            kind: ActionKind::Move,
            params: ActionParams {
                source: Some("a.ts".into()),
                ..Default::default()
            },
        };
        let err = action.shape(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("'target'"));
    }

    #[test]
    fn test_shape_rejects_blank_path() {
        let err = Action::delete("   ").shape(2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().starts_with("Action 3 (delete)"));
    }

    #[test]
    fn test_shape_rejects_wildcard_target_for_literal_source() {
        let err = Action::rename("a.ts", "*.ts").shape(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_shape_rejects_rename_onto_itself() {
        assert!(Action::rename("a.ts", "a.ts").shape(0).is_err());
        // duplicating onto itself is caught later as ALREADY_EXISTS
        assert!(Action::duplicate("a.ts", "a.ts").shape(0).is_ok());
    }

    #[test]
    fn test_resolved_action_accessors() {
        let path = |rel: &str| ResolvedPath {
            relative: rel.to_string(),
            absolute: PathBuf::from("/w").join(rel),
        };
        let action = ResolvedAction::transfer(ActionKind::Move, path("a.ts"), path("lib/a.ts"));
        assert_eq!(action.kind(), ActionKind::Move);
        assert_eq!(action.source().relative, "a.ts");
        assert_eq!(action.target().unwrap().relative, "lib/a.ts");
        assert!(
            ResolvedAction::Delete { source: path("x") }
                .target()
                .is_none()
        );
    }
}
