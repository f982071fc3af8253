//! NC (Excellon-style) drill file emitter.
//!
//! Emits the `M48` header with unit and zero-suppression declaration, the
//! `T<n>C<diameter>` tool table, then per-hole coordinate records. Slots
//! become a routed `G00`/`M15`/`G01`/`M16`/`G05` move in route mode, or a
//! single plunge at the slot centroid otherwise — the single-hit form is a
//! documented format compromise, not a geometric error.

use std::fmt::Write as _;
use std::path::Path;

use super::coordinate::CoordinateFormatter;
use super::{FileSet, Transform};
use crate::catalog::HoleCatalog;
use crate::error::DrillError;
use crate::options::{DrillJobOptions, DrillUnit, ZeroFormat};
use crate::tools::ToolDefinition;

/// Renders one Excellon drill file into a string buffer.
///
/// # Errors
///
/// [`DrillError::CoordinateOverflow`] when a transformed hole coordinate
/// does not fit the resolved fixed-width field.
pub fn render(
    catalog: &HoleCatalog,
    tools: &[ToolDefinition],
    set: FileSet,
    transform: &Transform,
    options: &DrillJobOptions,
    path: &Path,
) -> Result<String, DrillError> {
    let precision = options.resolved_precision();
    let formatter = CoordinateFormatter::new(options.unit, options.zero_format, precision);
    let overflow = |err: super::coordinate::FieldOverflow| DrillError::CoordinateOverflow {
        path: path.to_path_buf(),
        x: err.x,
        y: err.y,
        integer: precision.integer,
        decimal: precision.decimal,
    };

    // Tools appear in the table only when they drill holes in this file,
    // keeping their catalog-wide numbers.
    let file_tools: Vec<(&ToolDefinition, Vec<usize>)> = tools
        .iter()
        .map(|tool| {
            let holes: Vec<usize> = tool
                .hole_indices
                .iter()
                .copied()
                .filter(|&i| set.contains(&catalog.holes[i]))
                .collect();
            (tool, holes)
        })
        .filter(|(_, holes)| !holes.is_empty())
        .collect();

    let mut out = String::new();
    out.push_str("M48\n");

    if !options.minimal_header {
        let date = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(out, ";DRILL file {{drillgen-core}} date {date}");
        let _ = writeln!(
            out,
            ";FORMAT={{{} / absolute / {} / {}}}",
            precision_comment(options),
            unit_name(options.unit),
            zeros_name(options.zero_format)
        );
        out.push_str("FMAT,2\n");
    }

    let _ = writeln!(out, "{}{}", unit_name_upper(options.unit), unit_suffix(options.zero_format));

    for (tool, _) in &file_tools {
        let _ = match options.unit {
            DrillUnit::Millimetre => writeln!(out, "T{}C{:.3}", tool.index, tool.diameter_mm()),
            DrillUnit::Inch => writeln!(out, "T{}C{:.4}", tool.index, tool.diameter_inch()),
        };
    }

    out.push_str("%\nG90\nG05\n");

    for (tool, holes) in &file_tools {
        let _ = writeln!(out, "T{}", tool.index);

        for &hole_index in holes {
            let hole = &catalog.holes[hole_index];

            if hole.is_slot() && options.route_mode_for_oval_holes {
                let start = formatter
                    .format_pair(transform.apply(hole.position))
                    .map_err(overflow)?;
                let end = formatter
                    .format_pair(transform.apply(hole.slot_end()))
                    .map_err(overflow)?;
                let _ = writeln!(out, "G00{start}");
                out.push_str("M15\n");
                let _ = writeln!(out, "G01{end}");
                out.push_str("M16\n");
                out.push_str("G05\n");
            } else {
                // Round hole, or oval-as-single-hit legacy behavior.
                let record = formatter
                    .format_pair(transform.apply(hole.centroid()))
                    .map_err(overflow)?;
                let _ = writeln!(out, "{record}");
            }
        }
    }

    out.push_str("T0\nM30\n");
    Ok(out)
}

fn unit_name(unit: DrillUnit) -> &'static str {
    match unit {
        DrillUnit::Millimetre => "metric",
        DrillUnit::Inch => "inch",
    }
}

fn unit_name_upper(unit: DrillUnit) -> &'static str {
    match unit {
        DrillUnit::Millimetre => "METRIC",
        DrillUnit::Inch => "INCH",
    }
}

/// Unit-line suffix declaring which zeros the coordinate fields keep.
///
/// Suppressing leading zeros keeps the trailing ones (`TZ`) and vice
/// versa; keep-all writes every digit so either declaration holds, `TZ`
/// by convention. Decimal coordinates carry their own point.
fn unit_suffix(zero_format: ZeroFormat) -> &'static str {
    match zero_format {
        ZeroFormat::Decimal => "",
        ZeroFormat::SuppressLeading | ZeroFormat::KeepAll => ",TZ",
        ZeroFormat::SuppressTrailing => ",LZ",
    }
}

fn zeros_name(zero_format: ZeroFormat) -> &'static str {
    match zero_format {
        ZeroFormat::Decimal => "decimal",
        ZeroFormat::SuppressLeading => "suppress leading zeros",
        ZeroFormat::SuppressTrailing => "suppress trailing zeros",
        ZeroFormat::KeepAll => "keep zeros",
    }
}

fn precision_comment(options: &DrillJobOptions) -> String {
    if options.zero_format == ZeroFormat::Decimal {
        "-:-".to_owned()
    } else {
        let precision = options.resolved_precision();
        format!("{}:{}", precision.integer, precision.decimal)
    }
}
