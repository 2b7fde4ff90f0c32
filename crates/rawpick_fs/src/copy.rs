//! Requested-name matching and copy orchestration.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::index::SourceIndex;
use crate::name::{normalize_extension, normalize_requested_names};
use crate::report::{ReportPick, ReportPickBuilder};
use crate::spec::{EnumPickOutcome, PickCopyError, SpecPickItem, SpecPickOptions};
use crate::util::{
    EnumDestinationDecision, copy_file_with_metadata, is_same_directory,
    resolve_destination_conflict,
};

const C_REASON_DRY_RUN: &str = "dry run";
const C_REASON_CANCELLED: &str = "cancelled";

/// Copy every file of `dir_source` whose name matches one of `names`.
///
/// Each raw name is trimmed, given the configured extension when missing and
/// lower-cased; duplicates collapse onto their first occurrence. Matching is
/// case-insensitive against files directly inside `dir_source` (no recursion),
/// and matches are copied one at a time, in input order, under their on-disk
/// filename.
///
/// Returns [`ReportPick`] when the run completes (per-file failures are stored
/// in the report). Returns [`PickCopyError`] only for configuration and input
/// failures, before anything is written.
pub fn pick_copy<S, P, Q>(
    names: &[S],
    dir_source: P,
    dir_destination: Q,
    spec_pick_options: SpecPickOptions,
) -> Result<ReportPick, PickCopyError>
where
    S: AsRef<str>,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    pick_copy_observed(
        names,
        dir_source,
        dir_destination,
        spec_pick_options,
        None,
        |_| {},
    )
}

/// [`pick_copy`] with a cancellation flag and a per-item observer.
///
/// `flag_cancel` is checked before each copy. Once set, remaining matches are
/// recorded as skipped and the report is flagged cancelled. `on_item` sees
/// every recorded item in order, right after it is recorded.
pub fn pick_copy_observed<S, P, Q, F>(
    names: &[S],
    dir_source: P,
    dir_destination: Q,
    spec_pick_options: SpecPickOptions,
    flag_cancel: Option<&AtomicBool>,
    mut on_item: F,
) -> Result<ReportPick, PickCopyError>
where
    S: AsRef<str>,
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(&SpecPickItem),
{
    let c_extension = normalize_extension(&spec_pick_options.extension)?;
    let path_dir_src = dir_source.as_ref();
    let path_dir_dst = dir_destination.as_ref();
    validate_directories(path_dir_src, path_dir_dst)?;

    let l_names = normalize_requested_names(names, &c_extension);
    if l_names.is_empty() {
        return Err(PickCopyError::NoRequestedNames);
    }

    let mut builder_report = ReportPickBuilder::default();
    builder_report.set_requested(l_names.len() as u64);
    let source_index = SourceIndex::build(path_dir_src, &c_extension, &mut builder_report)?;

    let mut b_cancelled = false;
    for name in l_names {
        let Some(spec_entry) = source_index.get(&name) else {
            on_item(builder_report.record(name, EnumPickOutcome::NotFound));
            continue;
        };

        if !b_cancelled && flag_cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            log::warn!("Cancellation requested; remaining files are skipped.");
            builder_report.mark_cancelled();
            b_cancelled = true;
        }

        let path_file_dst = path_dir_dst.join(&spec_entry.name_file_os);
        let outcome = if b_cancelled {
            EnumPickOutcome::Skipped(C_REASON_CANCELLED.to_string())
        } else if spec_pick_options.if_dry_run {
            log::info!("Would copy: {}", spec_entry.name_file);
            EnumPickOutcome::Skipped(C_REASON_DRY_RUN.to_string())
        } else {
            match resolve_destination_conflict(&path_file_dst, spec_pick_options.rule_conflict) {
                decision @ (EnumDestinationDecision::Copy | EnumDestinationDecision::Replace) => {
                    let if_replace = decision == EnumDestinationDecision::Replace;
                    match copy_file_with_metadata(
                        &spec_entry.path_file_src,
                        &path_file_dst,
                        if_replace,
                    ) {
                        Ok(()) => {
                            log::info!("Copied: {}", spec_entry.name_file);
                            EnumPickOutcome::Copied(path_file_dst)
                        }
                        Err(e) => {
                            log::error!("Error copying {}: {e}", spec_entry.name_file);
                            EnumPickOutcome::CopyError(e.to_string())
                        }
                    }
                }
                EnumDestinationDecision::Skip(reason) => {
                    log::info!("Skipped {}: {reason}", spec_entry.name_file);
                    EnumPickOutcome::Skipped(reason)
                }
                EnumDestinationDecision::Fail(reason) => {
                    log::error!("Error copying {}: {reason}", spec_entry.name_file);
                    EnumPickOutcome::CopyError(reason)
                }
            }
        };
        on_item(builder_report.record(name, outcome));
    }

    let report = builder_report.build();
    log::info!("Total files copied: {}", report.cnt_copied);
    if !report.not_found.is_empty() {
        log::warn!("Files not found: {}", report.not_found.join(", "));
    }
    Ok(report)
}

fn validate_directories(path_dir_src: &Path, path_dir_dst: &Path) -> Result<(), PickCopyError> {
    if !path_dir_src.exists() {
        return Err(PickCopyError::SourceMissing(path_dir_src.to_path_buf()));
    }
    if !path_dir_src.is_dir() {
        return Err(PickCopyError::SourceNotDirectory(path_dir_src.to_path_buf()));
    }
    if !path_dir_dst.exists() {
        return Err(PickCopyError::DestinationMissing(path_dir_dst.to_path_buf()));
    }
    if !path_dir_dst.is_dir() {
        return Err(PickCopyError::DestinationNotDirectory(
            path_dir_dst.to_path_buf(),
        ));
    }
    if is_same_directory(path_dir_src, path_dir_dst) {
        return Err(PickCopyError::SourceDestinationSame(
            path_dir_src.to_path_buf(),
        ));
    }
    Ok(())
}
