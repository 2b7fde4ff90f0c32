use std::collections::BTreeMap;

use pyo3::exceptions::{PyFileNotFoundError, PyNotADirectoryError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use rawpick_fs::{
    EnumPickConflictStrategy, PickCopyError, ReportPick, SpecPickError, SpecPickOptions,
    normalize_extension, pick_copy,
};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "rawpick.fs.pick_copy.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

#[pyclass(name = "SpecPickError")]
#[derive(Debug, Clone)]
struct PySpecPickError {
    #[pyo3(get)]
    name: String,
    #[pyo3(get)]
    exception: String,
}

impl From<SpecPickError> for PySpecPickError {
    fn from(spec_error: SpecPickError) -> Self {
        Self {
            name: spec_error.name,
            exception: spec_error.exception,
        }
    }
}

#[pyclass(name = "ReportPick")]
#[derive(Debug, Clone)]
struct PyReportPick {
    #[pyo3(get)]
    cnt_requested: u64,
    #[pyo3(get)]
    cnt_matched: u64,
    #[pyo3(get)]
    cnt_copied: u64,
    #[pyo3(get)]
    not_found: Vec<String>,
    #[pyo3(get)]
    errors: Vec<PySpecPickError>,
    #[pyo3(get)]
    skipped: Vec<PySpecPickError>,
    #[pyo3(get)]
    warnings: Vec<String>,
    #[pyo3(get)]
    if_cancelled: bool,
    summary: String,
    dict_counts: BTreeMap<String, u64>,
}

impl From<ReportPick> for PyReportPick {
    fn from(report_pick: ReportPick) -> Self {
        let summary = report_pick.to_string();
        let dict_counts = report_pick.to_dict();
        Self {
            cnt_requested: report_pick.cnt_requested,
            cnt_matched: report_pick.cnt_matched,
            cnt_copied: report_pick.cnt_copied,
            not_found: report_pick.not_found,
            errors: report_pick
                .errors
                .into_iter()
                .map(PySpecPickError::from)
                .collect(),
            skipped: report_pick
                .skipped
                .into_iter()
                .map(PySpecPickError::from)
                .collect(),
            warnings: report_pick.warnings,
            if_cancelled: report_pick.if_cancelled,
            summary,
            dict_counts,
        }
    }
}

#[pymethods]
impl PyReportPick {
    #[getter]
    fn error_count(&self) -> usize {
        self.errors.len()
    }

    fn to_dict(&self) -> BTreeMap<String, u64> {
        self.dict_counts.clone()
    }

    fn __str__(&self) -> String {
        self.summary.clone()
    }
}

fn parse_rule_conflict(value: &str) -> PyResult<EnumPickConflictStrategy> {
    match value {
        "overwrite" => Ok(EnumPickConflictStrategy::Overwrite),
        "skip" => Ok(EnumPickConflictStrategy::Skip),
        "error" => Ok(EnumPickConflictStrategy::Error),
        _ => Err(PyValueError::new_err(format!(
            "Invalid file conflict strategy: `{value}`. Expected one of: ['overwrite', 'skip', 'error']"
        ))),
    }
}

fn map_pick_copy_error(exception: PickCopyError) -> PyErr {
    let message = exception.to_string();
    match exception {
        PickCopyError::SourceMissing(_) | PickCopyError::DestinationMissing(_) => {
            PyFileNotFoundError::new_err(message)
        }
        PickCopyError::SourceNotDirectory(_) | PickCopyError::DestinationNotDirectory(_) => {
            PyNotADirectoryError::new_err(message)
        }
        PickCopyError::SourceUnreadable { .. }
        | PickCopyError::WorkerSpawnFailed(_)
        | PickCopyError::WorkerAborted => PyRuntimeError::new_err(message),
        PickCopyError::InvalidExtension(_)
        | PickCopyError::SourceDestinationSame(_)
        | PickCopyError::NoRequestedNames => PyValueError::new_err(message),
    }
}

#[pyfunction(name = "pick_copy")]
#[pyo3(signature = (
    names,
    dir_source,
    dir_destination,
    extension = "cr2",
    rule_conflict = "overwrite",
    if_dry_run = false
))]
fn pick_copy_py(
    py: Python<'_>,
    names: Vec<String>,
    dir_source: String,
    dir_destination: String,
    extension: &str,
    rule_conflict: &str,
    if_dry_run: bool,
) -> PyResult<PyReportPick> {
    let spec_pick_options = SpecPickOptions {
        extension: extension.to_string(),
        rule_conflict: parse_rule_conflict(rule_conflict)?,
        if_dry_run,
    };

    let report_pick = py.allow_threads(|| {
        pick_copy(
            names.as_slice(),
            dir_source,
            dir_destination,
            spec_pick_options,
        )
    });
    let report_pick = report_pick.map_err(map_pick_copy_error)?;
    Ok(PyReportPick::from(report_pick))
}

#[pyfunction(name = "parse_requested_names")]
fn parse_requested_names_py(text: &str) -> Vec<String> {
    rawpick_fs::parse_requested_names(text)
}

#[pyfunction(name = "normalize_requested_name")]
#[pyo3(signature = (name, extension = "cr2"))]
fn normalize_requested_name_py(name: &str, extension: &str) -> PyResult<Option<String>> {
    let c_extension = normalize_extension(extension).map_err(map_pick_copy_error)?;
    Ok(rawpick_fs::normalize_requested_name(name, &c_extension))
}

#[pymodule]
fn _rawpick_fs_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PySpecPickError>()?;
    module.add_class::<PyReportPick>()?;
    module.add_function(wrap_pyfunction!(pick_copy_py, module)?)?;
    module.add_function(wrap_pyfunction!(parse_requested_names_py, module)?)?;
    module.add_function(wrap_pyfunction!(normalize_requested_name_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
