//! Drill format writer front end.
//!
//! Plans the physical file set (separate PTH/NPTH files, or one merged
//! file), applies the job-wide origin and mirror transform, and hands each
//! file's hole subset to the format emitter. Each file is rendered into a
//! buffer first and written with a single filesystem call, so an error
//! never leaves a partial file on disk.

pub mod coordinate;
pub mod excellon;
pub mod gerber;

use std::path::PathBuf;

use crate::board::{BoardSnapshot, Point};
use crate::catalog::{HoleCatalog, HoleRecord, Plating};
use crate::error::DrillError;
use crate::options::{DrillFormat, DrillJobOptions, OriginMode};
use crate::tools::ToolDefinition;

/// One physical drill file: which plating classes it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSet {
    /// Single file carrying every hole.
    Merged,
    /// Plated pad holes plus all vias (vias are plated by construction).
    Pth,
    /// Non-plated pad holes.
    Npth,
}

impl FileSet {
    /// File sets produced for the given merge option.
    pub fn plan(merge_pth_npth: bool) -> Vec<Self> {
        if merge_pth_npth {
            vec![Self::Merged]
        } else {
            vec![Self::Pth, Self::Npth]
        }
    }

    /// True when the hole belongs to this file.
    pub fn contains(self, hole: &HoleRecord) -> bool {
        match self {
            Self::Merged => true,
            Self::Pth => hole.plating == Plating::Plated,
            Self::Npth => hole.plating == Plating::NotPlated,
        }
    }

    /// File name suffix appended to the board name.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Merged => "",
            Self::Pth => "-PTH",
            Self::Npth => "-NPTH",
        }
    }

    /// Human-readable label used in the report.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Merged => "all holes",
            Self::Pth => "plated through holes",
            Self::Npth => "non-plated holes",
        }
    }
}

/// The origin and mirror transform shared by every writer of one job.
///
/// The offset is subtracted before mirroring so the drill files and the
/// map stay registered when overlaid.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    offset: Point,
    mirror_y: bool,
}

impl Transform {
    /// Builds the transform for a job.
    pub fn new(board: &BoardSnapshot, options: &DrillJobOptions) -> Self {
        let offset = match options.origin {
            OriginMode::Absolute => Point::new(0.0, 0.0),
            OriginMode::Auxiliary => board.aux_origin,
        };
        Self {
            offset,
            mirror_y: options.mirror_y,
        }
    }

    /// Applies the transform to a board-space point.
    pub fn apply(&self, point: Point) -> Point {
        let y = point.y - self.offset.y;
        Point::new(
            point.x - self.offset.x,
            if self.mirror_y { -y } else { y },
        )
    }
}

/// Drill file name for a board, file set and format.
pub fn drill_file_name(board: &BoardSnapshot, set: FileSet, format: DrillFormat) -> String {
    let extension = match format {
        DrillFormat::Excellon => "drl",
        DrillFormat::GerberX2 => "gbr",
    };
    format!("{}{}.{extension}", board.name, set.suffix())
}

/// Writes the drill file set for one generation request.
///
/// Emits one file per plating class when merging is off (the NPTH file is
/// written even when it holds no holes, as a valid header-only file) and a
/// single merged file when on. Tool numbering is global: a file's tool
/// table lists only the tools with holes in that file but keeps their
/// catalog-wide numbers, so every output of the job agrees on them.
///
/// # Errors
///
/// [`DrillError::DirectoryUnavailable`] when the output directory cannot
/// be created (nothing is written), [`DrillError::CoordinateOverflow`]
/// when a hole does not fit the coordinate field (that file is skipped;
/// files already completed remain), [`DrillError::WriteFailed`] when the
/// filesystem rejects a write.
pub fn write_drill_files(
    board: &BoardSnapshot,
    catalog: &HoleCatalog,
    tools: &[ToolDefinition],
    options: &DrillJobOptions,
) -> Result<Vec<PathBuf>, DrillError> {
    crate::ensure_output_dir(&options.output_dir)?;

    let transform = Transform::new(board, options);
    let mut written = Vec::new();

    for set in FileSet::plan(options.merge_pth_npth) {
        let path = options.output_dir.join(drill_file_name(board, set, options.format));

        let contents = match options.format {
            DrillFormat::Excellon => {
                excellon::render(catalog, tools, set, &transform, options, &path)?.into_bytes()
            }
            DrillFormat::GerberX2 => {
                gerber::render(catalog, tools, set, &transform, options, &path)?
            }
        };

        std::fs::write(&path, contents).map_err(|source| DrillError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        log::info!("created drill file `{}`", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_plan_is_a_single_file() {
        assert_eq!(FileSet::plan(true), vec![FileSet::Merged]);
        assert_eq!(FileSet::plan(false), vec![FileSet::Pth, FileSet::Npth]);
    }

    #[test]
    fn mirror_negates_y_after_origin_offset() {
        let mut board = BoardSnapshot::new("test");
        board.aux_origin = Point::new(1.0, 2.0);
        let options = DrillJobOptions {
            mirror_y: true,
            origin: OriginMode::Auxiliary,
            ..DrillJobOptions::default()
        };

        let transform = Transform::new(&board, &options);
        let moved = transform.apply(Point::new(10.0, 5.0));
        assert!((moved.x - 9.0).abs() < f64::EPSILON);
        assert!((moved.y + 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn absolute_origin_leaves_coordinates_unchanged() {
        let board = BoardSnapshot::new("test");
        let transform = Transform::new(&board, &DrillJobOptions::default());
        let point = Point::new(10.0, 5.0);
        assert_eq!(transform.apply(point), point);
    }

    #[test]
    fn file_names_carry_suffix_and_extension() {
        let board = BoardSnapshot::new("widget");
        assert_eq!(
            drill_file_name(&board, FileSet::Pth, DrillFormat::Excellon),
            "widget-PTH.drl"
        );
        assert_eq!(
            drill_file_name(&board, FileSet::Merged, DrillFormat::GerberX2),
            "widget.gbr"
        );
    }
}
