//! Case-insensitive index of eligible files directly under the source directory.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::ReportPickBuilder;
use crate::spec::PickCopyError;
use crate::util::build_extension_matcher;

/// One eligible on-disk file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SpecSourceEntry {
    /// Filename as stored on disk, used for the destination path.
    pub(crate) name_file_os: OsString,
    /// Lossy UTF-8 form for lookup keys and log lines.
    pub(crate) name_file: String,
    pub(crate) path_file_src: PathBuf,
}

/// Lower-cased filename -> on-disk entry. Built once per run, read-only afterward.
#[derive(Debug, Clone, Default)]
pub(crate) struct SourceIndex {
    dict_entries: HashMap<String, SpecSourceEntry>,
}

impl SourceIndex {
    /// Scan `path_dir_src` (no recursion) for files named `*.<extension>`.
    ///
    /// `extension` must be validated and lower-cased. Entries that cannot be
    /// inspected and key collisions become warnings on `builder_report`.
    pub(crate) fn build(
        path_dir_src: &Path,
        extension: &str,
        builder_report: &mut ReportPickBuilder,
    ) -> Result<Self, PickCopyError> {
        let matcher = build_extension_matcher(extension)?;
        let iter_entries =
            fs::read_dir(path_dir_src).map_err(|e| PickCopyError::SourceUnreadable {
                path: path_dir_src.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut l_entries: Vec<SpecSourceEntry> = Vec::new();
        for _entry_res in iter_entries {
            let entry = match _entry_res {
                Ok(v) => v,
                Err(e) => {
                    builder_report.add_warning(format!(
                        "Failed to read directory entry under {} ({e})",
                        path_dir_src.display()
                    ));
                    continue;
                }
            };

            let name_file_os = entry.file_name();
            let c_name = name_file_os.to_string_lossy().to_string();
            if !matcher.is_match(&c_name) {
                continue;
            }
            let path_entry = entry.path();
            // Follows symlinks: a link to a regular file is eligible.
            match fs::metadata(&path_entry) {
                Ok(meta) if meta.is_file() => l_entries.push(SpecSourceEntry {
                    name_file_os,
                    name_file: c_name,
                    path_file_src: path_entry,
                }),
                Ok(_) => {}
                Err(e) => builder_report.add_warning(format!(
                    "Failed to inspect {} ({e})",
                    path_entry.display()
                )),
            }
        }

        l_entries.sort_by(|a, b| a.name_file_os.cmp(&b.name_file_os));

        let mut dict_entries = HashMap::with_capacity(l_entries.len());
        for spec_entry in l_entries {
            match dict_entries.entry(spec_entry.name_file.to_lowercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(spec_entry);
                }
                Entry::Occupied(slot) => {
                    let spec_kept: &SpecSourceEntry = slot.get();
                    builder_report.add_warning(format!(
                        "Case-insensitive name collision: {} ignored, using {}",
                        spec_entry.name_file, spec_kept.name_file
                    ));
                }
            }
        }

        log::debug!(
            "Indexed {} *.{extension} file(s) in {}",
            dict_entries.len(),
            path_dir_src.display()
        );
        Ok(Self { dict_entries })
    }

    /// Look up a normalized (lower-cased, extension-carrying) name.
    pub(crate) fn get(&self, name_normalized: &str) -> Option<&SpecSourceEntry> {
        self.dict_entries.get(name_normalized)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.dict_entries.len()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::SourceIndex;
    use crate::report::ReportPickBuilder;

    fn touch(path: &Path) {
        std::fs::write(path, b"raw").expect("write");
    }

    #[test]
    fn index_keeps_only_direct_files_with_extension() {
        let tmp = tempfile::tempdir().expect("tempdir");
        touch(&tmp.path().join("IMG_001.CR2"));
        touch(&tmp.path().join("img_002.cr2"));
        touch(&tmp.path().join("img_003.jpg"));
        std::fs::create_dir(tmp.path().join("folder.cr2")).expect("mkdir");
        std::fs::create_dir(tmp.path().join("nested")).expect("mkdir");
        touch(&tmp.path().join("nested/img_004.cr2"));

        let mut builder = ReportPickBuilder::default();
        let index = SourceIndex::build(tmp.path(), "cr2", &mut builder).expect("index");

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("img_001.cr2").unwrap().name_file, "IMG_001.CR2");
        assert_eq!(index.get("img_002.cr2").unwrap().name_file, "img_002.cr2");
        assert!(index.get("img_003.jpg").is_none());
        assert!(index.get("folder.cr2").is_none());
        assert!(index.get("img_004.cr2").is_none());
        assert!(builder.build().warnings.is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn case_collision_keeps_first_and_warns() {
        let tmp = tempfile::tempdir().expect("tempdir");
        touch(&tmp.path().join("IMG_001.CR2"));
        touch(&tmp.path().join("img_001.cr2"));

        let mut builder = ReportPickBuilder::default();
        let index = SourceIndex::build(tmp.path(), "cr2", &mut builder).expect("index");

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("img_001.cr2").unwrap().name_file, "IMG_001.CR2");
        let report = builder.build();
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("collision"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_file_is_eligible_and_broken_link_is_not() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().expect("tempdir");
        let path_real = tmp.path().join("real.dat");
        touch(&path_real);
        symlink(&path_real, tmp.path().join("linked.cr2")).expect("symlink");
        symlink(tmp.path().join("gone.dat"), tmp.path().join("broken.cr2")).expect("symlink");

        let mut builder = ReportPickBuilder::default();
        let index = SourceIndex::build(tmp.path(), "cr2", &mut builder).expect("index");

        assert!(index.get("linked.cr2").is_some());
        assert!(index.get("broken.cr2").is_none());
        assert_eq!(builder.build().warnings.len(), 1);
    }
}
