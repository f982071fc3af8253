//! Fixed-width coordinate codec for NC drill output.
//!
//! The precision-critical heart of the writer: a board coordinate must
//! round-trip exactly into a fabrication-grade text field. Decimal mode
//! prints an explicit decimal point; the three suppression modes scale the
//! value into an integer field of `integer + decimal` digits and pad or
//! strip zeros to the convention. The digit arithmetic is the exact
//! inverse of what a conforming reader performs when it re-expands the
//! field.

use crate::board::Point;
use crate::options::{DrillUnit, Precision, ZeroFormat};

/// A value whose scaled magnitude does not fit the coordinate field.
///
/// Carries the out-of-range pair so the writer can attach the file path
/// and raise a full `CoordinateOverflow`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOverflow {
    /// X coordinate in output units.
    pub x: f64,
    /// Y coordinate in output units.
    pub y: f64,
}

/// Formats board-space millimetre coordinates into Excellon text fields.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateFormatter {
    unit: DrillUnit,
    zero_format: ZeroFormat,
    precision: Precision,
}

impl CoordinateFormatter {
    /// Creates a formatter for the given unit, zero format and precision.
    pub const fn new(unit: DrillUnit, zero_format: ZeroFormat, precision: Precision) -> Self {
        Self {
            unit,
            zero_format,
            precision,
        }
    }

    /// The precision this formatter emits.
    pub const fn precision(&self) -> Precision {
        self.precision
    }

    fn to_output_units(&self, millimetres: f64) -> f64 {
        match self.unit {
            DrillUnit::Millimetre => millimetres,
            DrillUnit::Inch => millimetres / 25.4,
        }
    }

    /// Formats one `X..Y..` coordinate record for a point in millimetres.
    ///
    /// # Errors
    ///
    /// Returns [`FieldOverflow`] when either scaled coordinate exceeds the
    /// fixed-width field.
    pub fn format_pair(&self, point: Point) -> Result<String, FieldOverflow> {
        let x = self.to_output_units(point.x);
        let y = self.to_output_units(point.y);
        let overflow = FieldOverflow { x, y };

        let x_text = self.format_value(x).ok_or(overflow)?;
        let y_text = self.format_value(y).ok_or(overflow)?;
        Ok(format!("X{x_text}Y{y_text}"))
    }

    /// Formats a single coordinate value already in output units.
    fn format_value(&self, value: f64) -> Option<String> {
        let decimals = usize::from(self.precision.decimal);

        if self.zero_format == ZeroFormat::Decimal {
            return Some(strip_decimal_zeros(&format!("{value:.decimals$}")));
        }

        let scale = 10f64.powi(i32::from(self.precision.decimal));
        #[allow(clippy::cast_possible_truncation)]
        let scaled = (value * scale).round() as i64;

        let width = usize::from(self.precision.integer) + decimals;
        let limit = 10i64.checked_pow(u32::from(self.precision.integer) + u32::from(self.precision.decimal))?;
        if scaled.abs() >= limit {
            return None;
        }

        let sign = if scaled < 0 { "-" } else { "" };
        let digits = format!("{:0width$}", scaled.abs());

        let field = match self.zero_format {
            ZeroFormat::KeepAll => digits,
            ZeroFormat::SuppressLeading => {
                let trimmed = digits.trim_start_matches('0');
                if trimmed.is_empty() { "0" } else { trimmed }.to_owned()
            }
            ZeroFormat::SuppressTrailing => {
                let trimmed = digits.trim_end_matches('0');
                if trimmed.is_empty() { "0" } else { trimmed }.to_owned()
            }
            ZeroFormat::Decimal => unreachable!("handled above"),
        };

        Some(format!("{sign}{field}"))
    }
}

/// Strips trailing zeros, and the point itself when nothing follows it.
fn strip_decimal_zeros(text: &str) -> String {
    if !text.contains('.') {
        return text.to_owned();
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    let cleaned = if trimmed.is_empty() { "0" } else { trimmed };
    // Avoid the "-0" artifact after rounding tiny negatives.
    if cleaned == "-0" {
        "0".to_owned()
    } else {
        cleaned.to_owned()
    }
}
