//! Requested-name parsing and normalization.

use std::collections::HashSet;

use crate::spec::PickCopyError;

/// Split pasted text into raw requested names.
///
/// One name per line; lines are trimmed and blank lines dropped. Order is kept.
pub fn parse_requested_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate an extension and return it lower-cased without the leading dot.
pub fn normalize_extension(extension: &str) -> Result<String, PickCopyError> {
    let c_ext = extension.trim();
    let c_ext = c_ext.strip_prefix('.').unwrap_or(c_ext);
    let b_is_valid = !c_ext.is_empty()
        && c_ext
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !b_is_valid {
        return Err(PickCopyError::InvalidExtension(extension.to_string()));
    }
    Ok(c_ext.to_ascii_lowercase())
}

/// Normalize one requested name against a validated, lower-cased extension.
///
/// Returns `None` when nothing is left after trimming. Idempotent.
pub fn normalize_requested_name(name: &str, extension: &str) -> Option<String> {
    let c_name = name.trim().to_lowercase();
    if c_name.is_empty() {
        return None;
    }
    let c_suffix = format!(".{extension}");
    if c_name.ends_with(&c_suffix) {
        Some(c_name)
    } else {
        Some(c_name + &c_suffix)
    }
}

/// Normalize and deduplicate requested names, first occurrence wins.
pub(crate) fn normalize_requested_names<S: AsRef<str>>(
    names: &[S],
    extension: &str,
) -> Vec<String> {
    let mut set_seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .filter_map(|name| normalize_requested_name(name.as_ref(), extension))
        .filter(|name| set_seen.insert(name.clone()))
        .collect()
}
