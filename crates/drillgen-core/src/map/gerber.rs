//! Gerber map backend.
//!
//! Outline and slot flanks are drawn with a thin line aperture, hole
//! markers are flashed with one aperture per marker diameter. The legend
//! carries its sample markers but no text: stroked text is out of scope
//! and the aperture definitions are self-describing.

use std::collections::BTreeMap;
use std::path::Path;

use gerber_types::{
    Aperture, ApertureDefinition, Circle, Command, CoordinateFormat, CoordinateMode,
    CoordinateNumber, Coordinates, DCode, ExtendedCode, FunctionCode, GCode, GerberCode,
    InterpolationMode, MCode, Operation, Unit, ZeroOmission,
};

use super::MapSketch;
use crate::board::Point;
use crate::error::DrillError;

/// Line-art aperture diameter in millimetres.
const LINE_WIDTH: f64 = 0.15;

/// D-code of the line-art aperture; marker apertures follow it.
const LINE_APERTURE: i32 = 10;

/// Renders the sketch as a Gerber layer.
///
/// # Errors
///
/// [`DrillError::WriteFailed`] when a coordinate cannot be represented or
/// command serialization fails.
pub fn render(sketch: &MapSketch, path: &Path) -> Result<Vec<u8>, DrillError> {
    let format = CoordinateFormat::new(ZeroOmission::Leading, CoordinateMode::Absolute, 4, 6);

    // One aperture per distinct marker diameter, keyed in nanometres for
    // exact grouping, numbered after the line aperture.
    let mut marker_apertures: BTreeMap<i64, i32> = BTreeMap::new();
    for &(_, diameter) in &sketch.circles {
        let key = to_nanometres(diameter);
        let next = LINE_APERTURE + 1 + marker_apertures.len() as i32;
        marker_apertures.entry(key).or_insert(next);
    }

    let mut commands: Vec<Command> = vec![
        Command::ExtendedCode(ExtendedCode::CoordinateFormat(format)),
        Command::ExtendedCode(ExtendedCode::Unit(Unit::Millimeters)),
        Command::ExtendedCode(ExtendedCode::ApertureDefinition(ApertureDefinition::new(
            LINE_APERTURE,
            Aperture::Circle(Circle::new(LINE_WIDTH)),
        ))),
    ];

    for (&key, &code) in &marker_apertures {
        commands.push(Command::ExtendedCode(ExtendedCode::ApertureDefinition(
            ApertureDefinition::new(code, Aperture::Circle(Circle::new(from_nanometres(key)))),
        )));
    }

    commands.push(Command::FunctionCode(FunctionCode::GCode(
        GCode::InterpolationMode(InterpolationMode::Linear),
    )));

    if !sketch.lines.is_empty() {
        commands.push(Command::FunctionCode(FunctionCode::DCode(
            DCode::SelectAperture(LINE_APERTURE),
        )));
        for &(from, to) in &sketch.lines {
            commands.push(Command::FunctionCode(FunctionCode::DCode(DCode::Operation(
                Operation::Move(Some(coordinates(from, format, path)?)),
            ))));
            commands.push(Command::FunctionCode(FunctionCode::DCode(DCode::Operation(
                Operation::Interpolate(Some(coordinates(to, format, path)?), None),
            ))));
        }
    }

    for &(center, diameter) in &sketch.circles {
        let code = marker_apertures[&to_nanometres(diameter)];
        commands.push(Command::FunctionCode(FunctionCode::DCode(
            DCode::SelectAperture(code),
        )));
        commands.push(Command::FunctionCode(FunctionCode::DCode(DCode::Operation(
            Operation::Flash(Some(coordinates(center, format, path)?)),
        ))));
    }

    commands.push(Command::FunctionCode(FunctionCode::MCode(MCode::EndOfFile)));

    let mut out = Vec::new();
    commands
        .serialize(&mut out)
        .map_err(|err| write_failed(path, &err.to_string()))?;
    Ok(out)
}

fn coordinates(
    point: Point,
    format: CoordinateFormat,
    path: &Path,
) -> Result<Coordinates, DrillError> {
    let x = CoordinateNumber::try_from(point.x)
        .map_err(|err| write_failed(path, &err.to_string()))?;
    let y = CoordinateNumber::try_from(point.y)
        .map_err(|err| write_failed(path, &err.to_string()))?;
    Ok(Coordinates::new(x, y, format))
}

fn write_failed(path: &Path, message: &str) -> DrillError {
    DrillError::WriteFailed {
        path: path.to_path_buf(),
        source: std::io::Error::other(message.to_owned()),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_nanometres(millimetres: f64) -> i64 {
    (millimetres * 1_000_000.0).round() as i64
}

#[allow(clippy::cast_precision_loss)]
fn from_nanometres(nanometres: i64) -> f64 {
    nanometres as f64 / 1_000_000.0
}
