//! Edit model shared by the engine and the file-system capabilities
//!
//! An [`EditBatch`] is the unit committed at the end of a bulk operation: an
//! ordered list of file renames and text edits. Reference resolvers hand back
//! [`ReferenceEdit`]s, which the engine merges into the batch.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Zero-based line and character (in `char`s) inside a text document
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Half-open range between two positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// Replace the text inside `range` with `new_text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: Range,
    pub new_text: String,
}

impl TextEdit {
    pub fn new(range: Range, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }
}

/// Text edits grouped per file, in the order the resolver produced them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEdit {
    entries: Vec<(PathBuf, Vec<TextEdit>)>,
}

impl ReferenceEdit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edit for `path`, keeping first-seen file order
    pub fn push(&mut self, path: impl Into<PathBuf>, edit: TextEdit) {
        let path = path.into();
        match self.entries.iter_mut().find(|(p, _)| *p == path) {
            Some((_, edits)) => edits.push(edit),
            None => self.entries.push((path, vec![edit])),
        }
    }

    /// Iterate `(file, edits)` pairs
    pub fn entries(&self) -> impl Iterator<Item = (&Path, &[TextEdit])> {
        self.entries
            .iter()
            .map(|(path, edits)| (path.as_path(), edits.as_slice()))
    }

    /// Number of files touched
    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of individual text edits
    pub fn edit_count(&self) -> usize {
        self.entries.iter().map(|(_, edits)| edits.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edit_count() == 0
    }
}

/// One step of an [`EditBatch`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditOperation {
    /// Rename (or move) a file or folder
    RenameFile { from: PathBuf, to: PathBuf },
    /// Edit the text of a file
    Text { path: PathBuf, edit: TextEdit },
}

/// Ordered batch of renames and text edits committed as one unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBatch {
    operations: Vec<EditOperation>,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a rename of `from` to `to`
    pub fn rename_file(&mut self, from: impl Into<PathBuf>, to: impl Into<PathBuf>) {
        self.operations.push(EditOperation::RenameFile {
            from: from.into(),
            to: to.into(),
        });
    }

    /// Queue a text edit
    pub fn replace(&mut self, path: impl Into<PathBuf>, edit: TextEdit) {
        self.operations.push(EditOperation::Text {
            path: path.into(),
            edit,
        });
    }

    /// Merge every text edit of `reference`, returning how many were added
    pub fn merge(&mut self, reference: &ReferenceEdit) -> usize {
        let mut merged = 0;
        for (path, edits) in reference.entries() {
            for edit in edits {
                self.replace(path, edit.clone());
                merged += 1;
            }
        }
        merged
    }

    pub fn operations(&self) -> &[EditOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// File renames in batch order
    pub fn renames(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.operations.iter().filter_map(|op| match op {
            EditOperation::RenameFile { from, to } => Some((from.as_path(), to.as_path())),
            EditOperation::Text { .. } => None,
        })
    }

    /// Text edits grouped per file, files in first-seen order
    pub fn text_edits_by_file(&self) -> Vec<(PathBuf, Vec<TextEdit>)> {
        let mut grouped = ReferenceEdit::new();
        for op in &self.operations {
            if let EditOperation::Text { path, edit } = op {
                grouped.push(path.clone(), edit.clone());
            }
        }
        grouped.entries
    }
}

/// Tracks renames applied so far so later edits can follow moved files.
#[derive(Debug, Default)]
pub(crate) struct RenameMap {
    moves: Vec<(PathBuf, PathBuf)>,
}

impl RenameMap {
    pub(crate) fn record(&mut self, from: &Path, to: &Path) {
        self.moves.push((from.to_path_buf(), to.to_path_buf()));
    }

    /// Where `path` lives after all recorded renames
    pub(crate) fn follow(&self, path: &Path) -> PathBuf {
        let mut current = path.to_path_buf();
        for (from, to) in &self.moves {
            if let Ok(rest) = current.strip_prefix(from) {
                current = if rest.as_os_str().is_empty() {
                    to.clone()
                } else {
                    to.join(rest)
                };
            }
        }
        current
    }
}

/// Apply text edits computed against `content` and return the new text.
///
/// Edits are applied from the end of the document backwards so that earlier
/// offsets stay valid. Overlapping edits and positions outside the document
/// are rejected.
pub fn apply_text_edits(content: &str, edits: &[TextEdit]) -> Result<String, String> {
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(content.match_indices('\n').map(|(i, _)| i + 1))
        .collect();

    let mut spans = Vec::with_capacity(edits.len());
    for edit in edits {
        let start = offset_of(content, &line_starts, edit.range.start).ok_or_else(|| {
            format!(
                "position {}:{} is outside the document",
                edit.range.start.line, edit.range.start.character
            )
        })?;
        let end = offset_of(content, &line_starts, edit.range.end).ok_or_else(|| {
            format!(
                "position {}:{} is outside the document",
                edit.range.end.line, edit.range.end.character
            )
        })?;
        if end < start {
            return Err(format!(
                "edit range {}:{}-{}:{} is reversed",
                edit.range.start.line,
                edit.range.start.character,
                edit.range.end.line,
                edit.range.end.character
            ));
        }
        spans.push((start, end, edit.new_text.as_str()));
    }

    spans.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    for pair in spans.windows(2) {
        if pair[1].0 < pair[0].1 {
            return Err("overlapping text edits".to_string());
        }
    }

    let mut result = content.to_string();
    for (start, end, text) in spans.into_iter().rev() {
        result.replace_range(start..end, text);
    }
    Ok(result)
}

fn offset_of(content: &str, line_starts: &[usize], pos: Position) -> Option<usize> {
    let start = *line_starts.get(pos.line as usize)?;
    let end = line_starts
        .get(pos.line as usize + 1)
        .copied()
        .unwrap_or(content.len());
    let mut count = 0u32;
    for (idx, ch) in content[start..end].char_indices() {
        if count == pos.character {
            return Some(start + idx);
        }
        if ch == '\n' {
            return None;
        }
        count += 1;
    }
    (count == pos.character).then_some(end)
}
