//! Plain-text drill report.
//!
//! Summarizes the same catalog and tool table the drill writers consume:
//! per-class hole counts, then one section per planned drill file listing
//! the tools (with their job-wide numbers) and hole counts that land in
//! it. The report is a human-readable cross-check, not a machine format.

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::board::BoardSnapshot;
use crate::catalog::{HoleCatalog, Plating};
use crate::drill::{drill_file_name, FileSet};
use crate::error::DrillError;
use crate::options::DrillJobOptions;
use crate::tools::ToolDefinition;

/// Report file name for a board.
pub fn report_file_name(board: &BoardSnapshot) -> String {
    format!("{}-drl.rpt", board.name)
}

/// Renders the report text.
pub fn render_report(
    board: &BoardSnapshot,
    catalog: &HoleCatalog,
    tools: &[ToolDefinition],
    options: &DrillJobOptions,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Drill report for {}", board.name);
    let _ = writeln!(
        out,
        "Created on {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    out.push('\n');

    let counts = &catalog.counts;
    out.push_str("Hole count per class:\n");
    let _ = writeln!(out, "    plated pad holes     : {}", counts.plated_pad_holes);
    let _ = writeln!(
        out,
        "    non-plated pad holes : {}",
        counts.not_plated_pad_holes
    );
    let _ = writeln!(out, "    through vias         : {}", counts.through_vias);
    let _ = writeln!(out, "    micro vias           : {}", counts.micro_vias);
    let _ = writeln!(
        out,
        "    blind/buried vias    : {}",
        counts.blind_or_buried_vias
    );
    let _ = writeln!(out, "    total                : {}", counts.total());

    for set in FileSet::plan(options.merge_pth_npth) {
        out.push('\n');
        let _ = writeln!(
            out,
            "File: {} ({})",
            drill_file_name(board, set, options.format),
            set.label()
        );

        let mut file_holes = 0usize;
        for tool in tools {
            let count = tool
                .hole_indices
                .iter()
                .filter(|&&i| set.contains(&catalog.holes[i]))
                .count();
            if count == 0 {
                continue;
            }
            file_holes += count;

            let _ = writeln!(
                out,
                "    T{}  {:.3}mm  {:.4}\"  {}  ({} hole{}{})",
                tool.index,
                tool.diameter_mm(),
                tool.diameter_inch(),
                match tool.plating {
                    Plating::Plated => "plated",
                    Plating::NotPlated => "not plated",
                },
                count,
                if count == 1 { "" } else { "s" },
                if tool.slot { ", slots" } else { "" },
            );
        }

        let _ = writeln!(
            out,
            "    total {} hole{}",
            file_holes,
            if file_holes == 1 { "" } else { "s" }
        );
    }

    out
}

/// Writes the drill report for one generation request.
///
/// # Errors
///
/// [`DrillError::DirectoryUnavailable`] when the output directory cannot
/// be created, [`DrillError::WriteFailed`] when the file cannot be
/// written.
pub fn write_report_file(
    board: &BoardSnapshot,
    catalog: &HoleCatalog,
    tools: &[ToolDefinition],
    options: &DrillJobOptions,
) -> Result<PathBuf, DrillError> {
    crate::ensure_output_dir(&options.output_dir)?;

    let path = options.output_dir.join(report_file_name(board));
    let contents = render_report(board, catalog, tools, options);

    std::fs::write(&path, contents).map_err(|source| DrillError::WriteFailed {
        path: path.clone(),
        source,
    })?;
    log::info!("created drill report `{}`", path.display());
    Ok(path)
}
