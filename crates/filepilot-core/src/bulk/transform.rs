//! Target path derivation for glob-based actions

/// Literal text after the last wildcard of `glob`, if there is a wildcard
fn suffix_after_wildcard(glob: &str) -> Option<&str> {
    glob.rfind(['*', '?']).map(|i| &glob[i + 1..])
}

/// Derive the literal target for `matched` from a source/target glob pair.
///
/// Only the wildcard-plus-suffix shape is understood: with `**/*.js` and
/// `**/*.ts`, a match ending in `.js` gets `.ts` instead. In every other case
/// `matched` is returned unchanged.
pub fn transform(matched: &str, source_glob: &str, target_glob: &str) -> String {
    let (Some(from), Some(to)) = (
        suffix_after_wildcard(source_glob),
        suffix_after_wildcard(target_glob),
    ) else {
        return matched.to_string();
    };
    if from.is_empty() || to.is_empty() {
        return matched.to_string();
    }
    match matched.strip_suffix(from) {
        Some(stem) => format!("{}{}", stem, to),
        None => matched.to_string(),
    }
}
