//! Job options resolved by the caller before any writer runs.
//!
//! The core holds no process-wide configuration state: the caller builds a
//! [`DrillJobOptions`] from its persisted preferences plus in-session edits
//! and passes it by reference into every operation. The only two input
//! corrections the core performs are the precision clamp
//! ([`DrillJobOptions::resolved_precision`]) and the map-format selector
//! clamp ([`MapFormat::from_selector`]); everything else fails with a typed
//! error.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk drill file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrillFormat {
    /// Numerically-controlled (Excellon-style) drill file.
    Excellon,
    /// Gerber X2 drill-layer file. Always millimetres.
    GerberX2,
}

/// Coordinate unit for Excellon output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrillUnit {
    /// Imperial inches.
    Inch,
    /// Metric millimetres.
    Millimetre,
}

/// Zero handling for Excellon coordinate fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZeroFormat {
    /// Explicit decimal point, trailing zeros stripped.
    Decimal,
    /// Fixed-width field, leading zeros stripped (`,TZ` unit suffix).
    SuppressLeading,
    /// Fixed-width field, trailing zeros stripped (`,LZ` unit suffix).
    SuppressTrailing,
    /// Fixed-width field with every digit written.
    KeepAll,
}

/// Coordinate field width as `(integer digits, decimal digits)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Precision {
    /// Digits before the implied decimal point.
    pub integer: u8,
    /// Digits after the implied decimal point.
    pub decimal: u8,
}

impl Precision {
    /// Creates a precision pair.
    pub const fn new(integer: u8, decimal: u8) -> Self {
        Self { integer, decimal }
    }
}

/// Coordinate origin for every emitted position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OriginMode {
    /// The board's absolute origin.
    Absolute,
    /// The user-designated auxiliary reference point.
    Auxiliary,
}

/// Graphical map file backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapFormat {
    /// Plotter control language.
    Hpgl,
    /// PostScript page description.
    PostScript,
    /// Gerber RS-274X.
    Gerber,
    /// DXF vector exchange.
    Dxf,
    /// Scalable vector graphics.
    Svg,
    /// Portable document format.
    Pdf,
}

impl MapFormat {
    /// Maps a stored selector index to a backend.
    ///
    /// Selector clamps to the PostScript default on out-of-range input;
    /// this is a deliberate leniency, not an error.
    pub fn from_selector(selector: u32) -> Self {
        match selector {
            0 => Self::Hpgl,
            1 => Self::PostScript,
            2 => Self::Gerber,
            3 => Self::Dxf,
            4 => Self::Svg,
            5 => Self::Pdf,
            _ => {
                log::warn!("map format selector {selector} out of range, using PostScript");
                Self::PostScript
            }
        }
    }

    /// File extension for this backend.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Hpgl => "plt",
            Self::PostScript => "ps",
            Self::Gerber => "gbr",
            Self::Dxf => "dxf",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }
}

/// Immutable configuration for one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrillJobOptions {
    /// Drill file format to emit.
    pub format: DrillFormat,
    /// Coordinate unit (Excellon only; Gerber output is always metric).
    pub unit: DrillUnit,
    /// Zero handling for coordinate fields (Excellon only).
    pub zero_format: ZeroFormat,
    /// Requested coordinate field width. Out-of-set values are clamped by
    /// [`Self::resolved_precision`] rather than emitted.
    pub precision: Precision,
    /// Negate the Y coordinate of every emitted point.
    pub mirror_y: bool,
    /// Omit descriptive comments from the Excellon header.
    pub minimal_header: bool,
    /// Emit one merged file instead of separate PTH/NPTH files.
    pub merge_pth_npth: bool,
    /// Emit oval holes as routed slots; when false a slot collapses to a
    /// single plunge at its centroid.
    pub route_mode_for_oval_holes: bool,
    /// Map file backend.
    pub map_format: MapFormat,
    /// Coordinate origin subtracted from every hole position.
    pub origin: OriginMode,
    /// Directory all output files are written into.
    pub output_dir: PathBuf,
}

impl DrillJobOptions {
    /// Returns the precision actually used for coordinate formatting.
    ///
    /// The valid set is fixed by format and unit: Excellon inches → 2.4,
    /// Excellon millimetres → 3.3, Gerber → 4.6 when six decimal digits
    /// were requested and 4.5 otherwise. Anything else clamps to the
    /// nearest valid pair so invalid coordinates are never emitted.
    pub fn resolved_precision(&self) -> Precision {
        let resolved = match (self.format, self.unit) {
            (DrillFormat::Excellon, DrillUnit::Inch) => Precision::new(2, 4),
            (DrillFormat::Excellon, DrillUnit::Millimetre) => Precision::new(3, 3),
            (DrillFormat::GerberX2, _) => {
                if self.precision.decimal == 6 {
                    Precision::new(4, 6)
                } else {
                    Precision::new(4, 5)
                }
            }
        };

        if resolved != self.precision {
            log::warn!(
                "precision {}.{} out of set for the selected format, using {}.{}",
                self.precision.integer,
                self.precision.decimal,
                resolved.integer,
                resolved.decimal
            );
        }

        resolved
    }
}

impl Default for DrillJobOptions {
    fn default() -> Self {
        Self {
            format: DrillFormat::Excellon,
            unit: DrillUnit::Millimetre,
            zero_format: ZeroFormat::Decimal,
            precision: Precision::new(3, 3),
            mirror_y: false,
            minimal_header: false,
            merge_pth_npth: false,
            route_mode_for_oval_holes: true,
            map_format: MapFormat::PostScript,
            origin: OriginMode::Absolute,
            output_dir: PathBuf::new(),
        }
    }
}
