//! Error types for the drill generation pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while generating drill, map or report files.
///
/// Every variant carries enough context (file path, offending hole where
/// applicable) for the caller to render a user-facing message. Nothing is
/// silently retried.
#[derive(Debug, Error)]
pub enum DrillError {
    /// The output directory is missing and could not be created. Fatal to
    /// the whole generation request; no files have been written.
    #[error("output directory `{}` is unavailable: {source}", path.display())]
    DirectoryUnavailable {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying filesystem error.
        source: std::io::Error,
    },

    /// A hole's scaled coordinate does not fit the fixed-width coordinate
    /// field. Fatal to the named file only; other requested outputs are
    /// unaffected.
    #[error(
        "coordinate ({x}, {y}) overflows the {integer}.{decimal} field of `{}`",
        path.display()
    )]
    CoordinateOverflow {
        /// The file that was being generated.
        path: PathBuf,
        /// X coordinate of the offending hole, in output units.
        x: f64,
        /// Y coordinate of the offending hole, in output units.
        y: f64,
        /// Integer digit count of the coordinate field.
        integer: u8,
        /// Decimal digit count of the coordinate field.
        decimal: u8,
    },

    /// The underlying storage rejected a write. Fatal to the operation.
    #[error("failed to write `{}`: {source}", path.display())]
    WriteFailed {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying filesystem error.
        source: std::io::Error,
    },
}
