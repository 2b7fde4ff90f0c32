//! Pick-copy report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::{EnumPickOutcome, SpecPickError, SpecPickItem};

/// Aggregate outcome of one `pick_copy` run.
#[derive(Debug, Default, Clone)]
pub struct ReportPick {
    /// Number of deduplicated normalized requested names.
    pub cnt_requested: u64,
    /// Number of requested names that resolved to a source file.
    pub cnt_matched: u64,
    /// Number of files copied successfully.
    pub cnt_copied: u64,
    /// Requested names with no source file, in input order.
    pub not_found: Vec<String>,
    /// Matched names whose copy failed.
    pub errors: Vec<SpecPickError>,
    /// Matched names intentionally left uncopied.
    pub skipped: Vec<SpecPickError>,
    /// Non-fatal warnings collected while indexing.
    pub warnings: Vec<String>,
    /// Per-name outcomes in input order.
    pub items: Vec<SpecPickItem>,
    /// Run stopped early on request; remaining matches are in `skipped`.
    pub if_cancelled: bool,
}

impl ReportPick {
    /// Number of collected copy errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of requested names without a match.
    pub fn not_found_count(&self) -> usize {
        self.not_found.len()
    }

    /// Number of matched names that were not copied on purpose.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_requested".to_string(), self.cnt_requested);
        dict_counts.insert("cnt_matched".to_string(), self.cnt_matched);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_skipped".to_string(), self.skipped_count() as u64);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_not_found".to_string(), self.not_found_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        let mut txt = format!(
            "{prefix} requested={} matched={} copied={} skipped={} errors={} not_found={}",
            dict_counts["cnt_requested"],
            dict_counts["cnt_matched"],
            dict_counts["cnt_copied"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_not_found"]
        );
        if self.if_cancelled {
            txt.push_str(" (cancelled)");
        }
        txt
    }
}

impl fmt::Display for ReportPick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[PICK]"))
    }
}

/// Mutable accumulator owned by the single worker of one run.
#[derive(Debug, Default, Clone)]
pub struct ReportPickBuilder {
    report: ReportPick,
}

impl ReportPickBuilder {
    pub fn set_requested(&mut self, cnt_requested: u64) {
        self.report.cnt_requested = cnt_requested;
    }

    pub fn add_warning(&mut self, warning: String) {
        self.report.warnings.push(warning);
    }

    /// Record one outcome, update the aggregates and return the stored item.
    pub fn record(&mut self, name: String, outcome: EnumPickOutcome) -> &SpecPickItem {
        match &outcome {
            EnumPickOutcome::NotFound => self.report.not_found.push(name.clone()),
            EnumPickOutcome::Copied(_) => {
                self.report.cnt_matched += 1;
                self.report.cnt_copied += 1;
            }
            EnumPickOutcome::Skipped(reason) => {
                self.report.cnt_matched += 1;
                self.report.skipped.push(SpecPickError {
                    name: name.clone(),
                    exception: reason.clone(),
                });
            }
            EnumPickOutcome::CopyError(exception) => {
                self.report.cnt_matched += 1;
                self.report.errors.push(SpecPickError {
                    name: name.clone(),
                    exception: exception.clone(),
                });
            }
        }
        self.report.items.push(SpecPickItem { name, outcome });
        &self.report.items[self.report.items.len() - 1]
    }

    pub fn mark_cancelled(&mut self) {
        self.report.if_cancelled = true;
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportPick {
        self.report
    }
}
