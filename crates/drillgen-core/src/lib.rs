#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `drillgen` core — drill file, drill map and drill report generation.
//!
//! The pipeline is snapshot in, files out: the caller hands over an
//! immutable [`board::BoardSnapshot`] and a [`options::DrillJobOptions`],
//! the core classifies every drilled feature into a hole catalog, groups
//! the catalog into a numbered tool table, and runs the requested writers.
//! All three outputs of one job share the catalog, the tool numbering and
//! the origin/mirror transform, so they always agree with each other.

pub mod board;
pub mod catalog;
pub mod drill;
pub mod error;
pub mod map;
pub mod options;
pub mod report;
pub mod tools;

use std::path::{Path, PathBuf};

pub use board::BoardSnapshot;
pub use catalog::{build_catalog, HoleCatalog, HoleCounts};
pub use error::DrillError;
pub use options::DrillJobOptions;
pub use tools::{assign_tools, ToolDefinition};

/// Which outputs one generation request produces.
#[derive(Debug, Clone, Copy)]
pub struct JobRequest {
    /// Write the drill file set.
    pub drill_files: bool,
    /// Write the graphical drill map.
    pub map_file: bool,
    /// Write the plain-text drill report.
    pub report_file: bool,
}

impl Default for JobRequest {
    fn default() -> Self {
        Self {
            drill_files: true,
            map_file: false,
            report_file: false,
        }
    }
}

/// What a completed generation request produced.
#[derive(Debug, Clone)]
pub struct JobOutput {
    /// Every file written, in creation order.
    pub files: Vec<PathBuf>,
    /// Per-class hole counters of the catalog the files were built from.
    pub counts: HoleCounts,
}

/// Runs one generation request end to end.
///
/// Builds the hole catalog and tool table once and feeds them to every
/// requested writer, so the drill files, the map and the report agree on
/// tool numbers and hole counts.
///
/// # Errors
///
/// Propagates the first writer error. [`DrillError::DirectoryUnavailable`]
/// means nothing was written; a later failure leaves the files already
/// completed in place.
pub fn run_drill_job(
    board: &BoardSnapshot,
    options: &DrillJobOptions,
    request: &JobRequest,
) -> Result<JobOutput, DrillError> {
    let catalog = build_catalog(board);
    let tools = assign_tools(&catalog, options.merge_pth_npth);
    log::info!(
        "drill job for `{}`: {} holes, {} tools",
        board.name,
        catalog.counts.total(),
        tools.len()
    );

    let mut files = Vec::new();

    if request.drill_files {
        files.extend(drill::write_drill_files(board, &catalog, &tools, options)?);
    }
    if request.map_file {
        files.push(map::write_map_file(board, &catalog, &tools, options)?);
    }
    if request.report_file {
        files.push(report::write_report_file(board, &catalog, &tools, options)?);
    }

    Ok(JobOutput {
        files,
        counts: catalog.counts,
    })
}

/// Creates the output directory if it does not exist yet.
pub(crate) fn ensure_output_dir(path: &Path) -> Result<(), DrillError> {
    std::fs::create_dir_all(path).map_err(|source| DrillError::DirectoryUnavailable {
        path: path.to_path_buf(),
        source,
    })
}
