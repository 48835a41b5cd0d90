//! Import-specifier based reference resolver for JavaScript-family sources

use super::{ReferenceResolver, RenameRequest};
use crate::config::BulkOpsConfig;
use crate::error::FsError;
use crate::fs::{FileSystem, Position, Range, ReferenceEdit, TextEdit};
use crate::workspace::normalize;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Quoted module specifier following `from`, `import`, `import(` or `require(`
static IMPORT_SPECIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:\bfrom|\bimport|\brequire)\s*\(?\s*['"]([^'"\r\n]+)['"]"#)
        .expect("valid import specifier regex")
});

/// Resolves references by scanning source files for relative imports.
///
/// Every `import ... from './x'`, `export ... from './x'`, bare
/// `import './x'`, dynamic `import('./x')` and `require('./x')` whose
/// specifier resolves to the renamed file is rewritten to point at the new
/// location. Specifiers written without an extension stay without one.
pub struct ImportReferenceResolver {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    extensions: Vec<String>,
    max_files: usize,
    max_file_bytes: u64,
}

impl ImportReferenceResolver {
    /// Create a resolver for the workspace at `root` with default settings
    pub fn new(fs: Arc<dyn FileSystem>, root: impl Into<PathBuf>) -> Self {
        Self::with_config(fs, root, &BulkOpsConfig::default())
    }

    /// Create a resolver for the workspace at `root`
    pub fn with_config(
        fs: Arc<dyn FileSystem>,
        root: impl Into<PathBuf>,
        config: &BulkOpsConfig,
    ) -> Self {
        Self {
            fs,
            root: root.into(),
            extensions: config
                .reference_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            max_files: config.max_results.max(1),
            max_file_bytes: config.max_reference_file_bytes,
        }
    }

    async fn candidate_files(&self) -> Result<Vec<PathBuf>, FsError> {
        let mut files = Vec::new();
        for ext in &self.extensions {
            let pattern = format!("**/*.{}", glob::Pattern::escape(ext));
            files.extend(
                self.fs
                    .find_matches(&self.root, &pattern, self.max_files)
                    .await?,
            );
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Edits for one importing file
    fn edits_for(&self, importer: &Path, content: &str, request: &RenameRequest) -> Vec<TextEdit> {
        let Some(importer_dir) = importer.parent() else {
            return Vec::new();
        };
        let old_path = normalize(&request.old_path);
        let old_without_ext = old_path.with_extension("");

        let mut edits = Vec::new();
        for captures in IMPORT_SPECIFIER_RE.captures_iter(content) {
            let Some(specifier) = captures.get(1) else {
                continue;
            };
            let spec = specifier.as_str();
            if !spec.starts_with("./") && !spec.starts_with("../") {
                continue;
            }

            let resolved = normalize(&importer_dir.join(spec));
            let keep_extension = if resolved == old_path {
                true
            } else if resolved == old_without_ext {
                false
            } else {
                continue;
            };

            let replacement = relative_specifier(importer_dir, &request.new_path, keep_extension);
            if replacement == spec {
                continue;
            }
            let range = Range::new(
                position_at(content, specifier.start()),
                position_at(content, specifier.end()),
            );
            edits.push(TextEdit::new(range, replacement));
        }
        edits
    }
}

#[async_trait]
impl ReferenceResolver for ImportReferenceResolver {
    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }

    async fn resolve_rename_references(
        &self,
        request: &RenameRequest,
    ) -> Result<Option<ReferenceEdit>, FsError> {
        let mut result = ReferenceEdit::new();

        for file in self.candidate_files().await? {
            if file == request.old_path {
                continue;
            }
            match self.fs.stat(&file).await {
                Ok(Some(stat)) if stat.len <= self.max_file_bytes => {}
                _ => continue,
            }
            let content = match self.fs.read_to_string(&file).await {
                Ok(content) => content,
                Err(e) => {
                    debug!(path = %file.display(), error = %e, "Skipping unreadable file");
                    continue;
                }
            };
            for edit in self.edits_for(&file, &content, request) {
                result.push(file.clone(), edit);
            }
        }

        debug!(
            old = %request.old_path.display(),
            new = %request.new_path.display(),
            files = result.file_count(),
            edits = result.edit_count(),
            "Resolved import references"
        );
        Ok((!result.is_empty()).then_some(result))
    }
}

/// Module specifier leading from `from_dir` to `to`, `./`-prefixed when it
/// does not climb out of `from_dir`
fn relative_specifier(from_dir: &Path, to: &Path, keep_extension: bool) -> String {
    let to = if keep_extension {
        normalize(to)
    } else {
        normalize(to).with_extension("")
    };
    let from = normalize(from_dir);
    let from: Vec<Component<'_>> = from.components().collect();
    let target: Vec<Component<'_>> = to.components().collect();

    let common = from
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(
        target[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{}", joined)
    }
}

/// Line/character position of a byte offset
fn position_at(content: &str, offset: usize) -> Position {
    let before = &content[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let character = before[line_start..].chars().count();
    Position::new(line as u32, character as u32)
}
