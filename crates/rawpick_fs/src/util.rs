use std::fs;
use std::io;
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use thiserror::Error;

use crate::spec::{EnumPickConflictStrategy, PickCopyError};

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

/// Case-insensitive `*.<extension>` matcher for source basenames.
///
/// `extension` must already be validated by [`crate::name::normalize_extension`].
pub(crate) fn build_extension_matcher(extension: &str) -> Result<GlobMatcher, PickCopyError> {
    GlobBuilder::new(&format!("*.{extension}"))
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| PickCopyError::InvalidExtension(format!("{extension} ({e})")))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Both paths are validated directories here, so `canonicalize` only fails on
/// races; such a pair is treated as distinct.
pub(crate) fn is_same_directory(path_dir_src: &Path, path_dir_dst: &Path) -> bool {
    match (fs::canonicalize(path_dir_src), fs::canonicalize(path_dir_dst)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// What to do with one destination path before copying onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EnumDestinationDecision {
    /// Nothing at the destination path.
    Copy,
    /// A regular file is there and gets replaced.
    Replace,
    Skip(String),
    Fail(String),
}

pub(crate) fn resolve_destination_conflict(
    path_file_dst: &Path,
    rule_conflict: EnumPickConflictStrategy,
) -> EnumDestinationDecision {
    let meta_dst = match fs::symlink_metadata(path_file_dst) {
        Ok(v) => v,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return EnumDestinationDecision::Copy,
        Err(e) => {
            return EnumDestinationDecision::Fail(format!(
                "Failed to inspect destination path {} ({e})",
                path_file_dst.display()
            ));
        }
    };

    if meta_dst.file_type().is_symlink() {
        return EnumDestinationDecision::Fail(format!(
            "Unsafe destination path is an existing symlink: {}",
            path_file_dst.display()
        ));
    }
    if meta_dst.is_dir() {
        return EnumDestinationDecision::Fail(format!(
            "Destination is a directory: {}",
            path_file_dst.display()
        ));
    }

    match rule_conflict {
        EnumPickConflictStrategy::Overwrite => EnumDestinationDecision::Replace,
        EnumPickConflictStrategy::Skip => EnumDestinationDecision::Skip(format!(
            "Destination exists: {}",
            path_file_dst.display()
        )),
        EnumPickConflictStrategy::Error => EnumDestinationDecision::Fail(format!(
            "Destination exists: {}",
            path_file_dst.display()
        )),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileCopy

/// Why one RAW file did not land intact.
#[derive(Debug, Error)]
pub(crate) enum FileCopyError {
    #[error("{0}")]
    Write(io::Error),
    #[error("Copied, but failed to preserve metadata ({0})")]
    Metadata(io::Error),
}

/// Write `path_file_src` to `path_file_dst`, then carry permissions, timestamps
/// and (on Linux) xattrs over.
///
/// With `if_replace`, a read-only file left by an earlier run (RAW files from
/// cards are often 0444) is unlinked first so the write can open the path.
pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
    if_replace: bool,
) -> Result<(), FileCopyError> {
    if if_replace {
        unlink_if_read_only(path_file_dst).map_err(FileCopyError::Write)?;
    }
    fs::copy(path_file_src, path_file_dst).map_err(FileCopyError::Write)?;
    preserve_metadata(path_file_src, path_file_dst).map_err(FileCopyError::Metadata)
}

fn unlink_if_read_only(path_file_dst: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path_file_dst) {
        Ok(meta) if meta.is_file() && meta.permissions().readonly() => {
            fs::remove_file(path_file_dst)
        }
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn preserve_metadata(path_file_src: &Path, path_file_dst: &Path) -> io::Result<()> {
    use filetime::{FileTime, set_file_times};

    let meta_src = fs::metadata(path_file_src)?;
    // Times first: a read-only mode must not block them on any platform.
    set_file_times(
        path_file_dst,
        FileTime::from_last_access_time(&meta_src),
        FileTime::from_last_modification_time(&meta_src),
    )?;
    #[cfg(target_os = "linux")]
    copy_raw_xattrs(path_file_src, path_file_dst);
    fs::set_permissions(path_file_dst, meta_src.permissions())
}

// Camera tags and Finder/Lightroom labels; filesystems without xattrs keep none.
#[cfg(target_os = "linux")]
fn copy_raw_xattrs(path_file_src: &Path, path_file_dst: &Path) {
    let Ok(l_attr_names) = xattr::list(path_file_src) else {
        return;
    };
    for attr_name in l_attr_names {
        if let Ok(Some(attr_value)) = xattr::get(path_file_src, &attr_name)
            && let Err(e) = xattr::set(path_file_dst, &attr_name, &attr_value)
        {
            log::debug!(
                "Skipped xattr {} on {} ({e})",
                attr_name.to_string_lossy(),
                path_file_dst.display()
            );
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{
        EnumDestinationDecision, FileCopyError, build_extension_matcher, copy_file_with_metadata,
        is_same_directory, preserve_metadata, resolve_destination_conflict,
    };
    use crate::spec::EnumPickConflictStrategy;

    #[test]
    fn extension_matcher_ignores_case() {
        let matcher = build_extension_matcher("cr2").expect("matcher");
        assert!(matcher.is_match("IMG_001.CR2"));
        assert!(matcher.is_match("img_001.cr2"));
        assert!(matcher.is_match("img.Cr2"));
        assert!(!matcher.is_match("img_001.cr2.xmp"));
        assert!(!matcher.is_match("img_001.jpg"));
    }

    #[test]
    fn conflict_policy_applies_only_to_existing_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_new = tmp.path().join("new.cr2");
        let path_old = tmp.path().join("old.cr2");
        std::fs::write(&path_old, "old").expect("write");

        for rule in [
            EnumPickConflictStrategy::Overwrite,
            EnumPickConflictStrategy::Skip,
            EnumPickConflictStrategy::Error,
        ] {
            assert_eq!(
                resolve_destination_conflict(&path_new, rule),
                EnumDestinationDecision::Copy
            );
        }
        assert_eq!(
            resolve_destination_conflict(&path_old, EnumPickConflictStrategy::Overwrite),
            EnumDestinationDecision::Replace
        );
        assert!(matches!(
            resolve_destination_conflict(&path_old, EnumPickConflictStrategy::Skip),
            EnumDestinationDecision::Skip(_)
        ));
        assert!(matches!(
            resolve_destination_conflict(&path_old, EnumPickConflictStrategy::Error),
            EnumDestinationDecision::Fail(_)
        ));
    }

    #[test]
    fn directory_at_destination_always_fails() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_dir = tmp.path().join("clash.cr2");
        std::fs::create_dir(&path_dir).expect("mkdir");

        assert!(matches!(
            resolve_destination_conflict(&path_dir, EnumPickConflictStrategy::Overwrite),
            EnumDestinationDecision::Fail(msg) if msg.contains("is a directory")
        ));
    }

    #[test]
    fn same_directory_detects_dot_segments() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_sub = tmp.path().join("sub");
        std::fs::create_dir(&path_sub).expect("mkdir");

        assert!(is_same_directory(tmp.path(), &path_sub.join("..")));
        assert!(!is_same_directory(tmp.path(), &path_sub));
    }

    #[test]
    fn replace_overwrites_read_only_leftover() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_src = tmp.path().join("src.cr2");
        let path_dst = tmp.path().join("dst.cr2");
        std::fs::write(&path_src, "fresh").expect("write src");
        std::fs::write(&path_dst, "stale").expect("write dst");
        let mut perm_ro = std::fs::metadata(&path_dst).expect("meta").permissions();
        perm_ro.set_readonly(true);
        std::fs::set_permissions(&path_dst, perm_ro).expect("chmod dst");

        copy_file_with_metadata(&path_src, &path_dst, true).expect("replace");

        assert_eq!(std::fs::read_to_string(&path_dst).expect("read"), "fresh");
    }

    #[test]
    fn metadata_failure_names_the_stage() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_src = tmp.path().join("src.cr2");
        std::fs::write(&path_src, "raw").expect("write src");

        let err = preserve_metadata(&path_src, &tmp.path().join("gone.cr2"))
            .map_err(FileCopyError::Metadata)
            .expect_err("dst missing");
        assert!(matches!(err, FileCopyError::Metadata(_)));
        assert!(err.to_string().starts_with("Copied, but failed to preserve metadata"));

        let err = copy_file_with_metadata(&tmp.path().join("nope.cr2"), &path_src, false)
            .expect_err("src missing");
        assert!(matches!(err, FileCopyError::Write(_)));
        assert_eq!(std::fs::read_to_string(&path_src).expect("read"), "raw");
    }
}
