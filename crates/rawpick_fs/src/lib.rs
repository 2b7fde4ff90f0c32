//! `rawpick_fs` v1:
//! Pick a pasted list of RAW files out of one folder and copy them to another.
//!
//! Modules:
//! - `name`   : pasted-text parsing and name normalization
//! - `index`  : case-insensitive source directory index
//! - `copy`   : matching and copy orchestration
//! - `worker` : background run with event channel and cancellation
//! - `spec`   : enums/options/errors
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod copy;
mod index;
pub mod name;
pub mod report;
pub mod spec;
mod util;
pub mod worker;

pub use copy::{pick_copy, pick_copy_observed};
pub use name::{normalize_extension, normalize_requested_name, parse_requested_names};
pub use report::{ReportPick, ReportPickBuilder};
pub use spec::{
    C_EXTENSION_DEFAULT, EnumPickConflictStrategy, EnumPickErrorKind, EnumPickOutcome,
    PickCopyError, SpecPickError, SpecPickItem, SpecPickOptions,
};
pub use worker::{EnumPickEvent, HandlePickCopy, spawn_pick_copy};
