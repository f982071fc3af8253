//! Gerber drill-layer emitter.
//!
//! Always millimetres with a fixed four-digit integer part; tools become
//! circular aperture definitions and holes become flashes referencing
//! them. Slots are always drawn as a routed move-and-interpolate pair —
//! the oval-route toggle is an NC-format concern. Zero suppression does
//! not apply: Gerber coordinates are explicit fixed-point integers scaled
//! by the decimal digit count.

use std::path::Path;

use gerber_types::{
    Aperture, ApertureDefinition, Circle, Command, CoordinateFormat, CoordinateMode,
    CoordinateNumber, Coordinates, DCode, ExtendedCode, FunctionCode, GCode, GerberCode,
    InterpolationMode, MCode, Operation, Unit, ZeroOmission,
};

use super::{FileSet, Transform};
use crate::board::Point;
use crate::catalog::HoleCatalog;
use crate::error::DrillError;
use crate::options::{DrillJobOptions, Precision};
use crate::tools::ToolDefinition;

/// First aperture D-code; codes below 10 are reserved by the format.
const FIRST_APERTURE_CODE: i32 = 10;

/// D-code assigned to a tool: `10 + index - 1`, keeping global numbering.
#[allow(clippy::cast_possible_wrap)]
pub const fn aperture_code(tool_index: u32) -> i32 {
    FIRST_APERTURE_CODE + tool_index as i32 - 1
}

/// Renders one Gerber drill-layer file into a byte buffer.
///
/// # Errors
///
/// [`DrillError::CoordinateOverflow`] when a transformed coordinate does
/// not fit the `4.<d>` field, [`DrillError::WriteFailed`] when command
/// serialization fails.
pub fn render(
    catalog: &HoleCatalog,
    tools: &[ToolDefinition],
    set: FileSet,
    transform: &Transform,
    options: &DrillJobOptions,
    path: &Path,
) -> Result<Vec<u8>, DrillError> {
    let precision = options.resolved_precision();
    let format = CoordinateFormat::new(
        ZeroOmission::Leading,
        CoordinateMode::Absolute,
        precision.integer,
        precision.decimal,
    );

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

    let mut commands: Vec<Command> = vec![
        Command::ExtendedCode(ExtendedCode::CoordinateFormat(format)),
        Command::ExtendedCode(ExtendedCode::Unit(Unit::Millimeters)),
    ];

    for (tool, _) in &file_tools {
        commands.push(Command::ExtendedCode(ExtendedCode::ApertureDefinition(
            ApertureDefinition::new(
                aperture_code(tool.index),
                Aperture::Circle(Circle::new(tool.diameter_mm())),
            ),
        )));
    }

    commands.push(Command::FunctionCode(FunctionCode::GCode(
        GCode::InterpolationMode(InterpolationMode::Linear),
    )));

    for (tool, holes) in &file_tools {
        commands.push(Command::FunctionCode(FunctionCode::DCode(
            DCode::SelectAperture(aperture_code(tool.index)),
        )));

        for &hole_index in holes {
            let hole = &catalog.holes[hole_index];

            if hole.is_slot() {
                let start = coordinates(transform.apply(hole.position), format, precision, path)?;
                let end = coordinates(transform.apply(hole.slot_end()), format, precision, path)?;
                commands.push(Command::FunctionCode(FunctionCode::DCode(DCode::Operation(
                    Operation::Move(Some(start)),
                ))));
                commands.push(Command::FunctionCode(FunctionCode::DCode(DCode::Operation(
                    Operation::Interpolate(Some(end), None),
                ))));
            } else {
                let flash = coordinates(transform.apply(hole.position), format, precision, path)?;
                commands.push(Command::FunctionCode(FunctionCode::DCode(DCode::Operation(
                    Operation::Flash(Some(flash)),
                ))));
            }
        }
    }

    commands.push(Command::FunctionCode(FunctionCode::MCode(MCode::EndOfFile)));

    let mut out = Vec::new();
    commands
        .serialize(&mut out)
        .map_err(|err| DrillError::WriteFailed {
            path: path.to_path_buf(),
            source: std::io::Error::other(err.to_string()),
        })?;
    Ok(out)
}

/// Converts a transformed point into Gerber coordinates, checking the
/// four-digit integer range before the fixed-point conversion.
fn coordinates(
    point: Point,
    format: CoordinateFormat,
    precision: Precision,
    path: &Path,
) -> Result<Coordinates, DrillError> {
    let limit = 10f64.powi(i32::from(precision.integer));
    if point.x.abs() >= limit || point.y.abs() >= limit {
        return Err(overflow(point, precision, path));
    }

    let x = CoordinateNumber::try_from(point.x).map_err(|_| overflow(point, precision, path))?;
    let y = CoordinateNumber::try_from(point.y).map_err(|_| overflow(point, precision, path))?;
    Ok(Coordinates::new(x, y, format))
}

fn overflow(point: Point, precision: Precision, path: &Path) -> DrillError {
    DrillError::CoordinateOverflow {
        path: path.to_path_buf(),
        x: point.x,
        y: point.y,
        integer: precision.integer,
        decimal: precision.decimal,
    }
}
