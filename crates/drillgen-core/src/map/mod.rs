//! Drill map generator.
//!
//! The map is a visual cross-check against the drill files: the board
//! outline, one marker per hole sized to its tool, and a legend mapping
//! markers to tool diameters and hole counts. Everything is accumulated
//! into one backend-independent [`MapSketch`] under the same origin and
//! mirror transform as the drill files — the two must stay registered
//! when overlaid — and then rendered by one of six plot backends.

pub mod dxf;
pub mod gerber;
pub mod hpgl;
pub mod pdf;
pub mod postscript;
pub mod svg;

use std::path::PathBuf;

use crate::board::{BoardSnapshot, BoundingBox, Point};
use crate::catalog::HoleCatalog;
use crate::drill::Transform;
use crate::error::DrillError;
use crate::options::{DrillJobOptions, MapFormat};
use crate::tools::ToolDefinition;

/// Legend text height in millimetres.
const LEGEND_TEXT_HEIGHT: f64 = 1.8;

/// Vertical pitch between legend rows in millimetres.
const LEGEND_ROW_PITCH: f64 = 3.5;

/// Margin between the board outline and the legend block.
const LEGEND_GAP: f64 = 5.0;

/// Backend-independent drill map: line art, hole markers and legend text
/// in transformed board millimetres.
#[derive(Debug, Clone, Default)]
pub struct MapSketch {
    /// Straight line segments (outline, slot flanks, legend rules).
    pub lines: Vec<(Point, Point)>,
    /// Circles as `(center, diameter)` (hole markers, legend samples).
    pub circles: Vec<(Point, f64)>,
    /// Text runs as `(anchor, height, content)`; the anchor is the
    /// baseline start. Backends without native text skip these.
    pub texts: Vec<(Point, f64, String)>,
    /// Extent of all accumulated geometry.
    pub bounds: BoundingBox,
}

impl MapSketch {
    fn line(&mut self, from: Point, to: Point) {
        self.bounds.update(from.x, from.y);
        self.bounds.update(to.x, to.y);
        self.lines.push((from, to));
    }

    fn circle(&mut self, center: Point, diameter: f64) {
        let radius = diameter / 2.0;
        self.bounds.update(center.x - radius, center.y - radius);
        self.bounds.update(center.x + radius, center.y + radius);
        self.circles.push((center, diameter));
    }

    fn text(&mut self, anchor: Point, height: f64, content: String) {
        self.bounds.update(anchor.x, anchor.y);
        // Rough advance-width estimate, enough for framing the page.
        let advance = height * 0.7 * content.chars().count() as f64;
        self.bounds.update(anchor.x + advance, anchor.y + height);
        self.texts.push((anchor, height, content));
    }

    fn rectangle(&mut self, min: Point, max: Point) {
        let top_left = Point::new(min.x, max.y);
        let bottom_right = Point::new(max.x, min.y);
        self.line(min, bottom_right);
        self.line(bottom_right, max);
        self.line(max, top_left);
        self.line(top_left, min);
    }
}

/// Builds the drill map sketch for one job.
pub fn build_sketch(
    board: &BoardSnapshot,
    catalog: &HoleCatalog,
    tools: &[ToolDefinition],
    options: &DrillJobOptions,
) -> MapSketch {
    let transform = Transform::new(board, options);
    let mut sketch = MapSketch::default();

    // Hole markers first so the outline fallback can use their extent.
    for tool in tools {
        for &hole_index in &tool.hole_indices {
            let hole = &catalog.holes[hole_index];
            let diameter = tool.diameter_mm();

            if hole.is_slot() {
                let start = transform.apply(hole.position);
                let end = transform.apply(hole.slot_end());
                sketch.circle(start, diameter);
                sketch.circle(end, diameter);

                // Flank lines offset half a width from the slot axis.
                let dx = end.x - start.x;
                let dy = end.y - start.y;
                let length = dx.hypot(dy);
                if length > f64::EPSILON {
                    let ox = -dy / length * diameter / 2.0;
                    let oy = dx / length * diameter / 2.0;
                    sketch.line(
                        Point::new(start.x + ox, start.y + oy),
                        Point::new(end.x + ox, end.y + oy),
                    );
                    sketch.line(
                        Point::new(start.x - ox, start.y - oy),
                        Point::new(end.x - ox, end.y - oy),
                    );
                }
            } else {
                sketch.circle(transform.apply(hole.position), diameter);
            }
        }
    }

    // Board outline, or the hole extent with a margin when unknown.
    let outline = board.outline.map_or_else(
        || {
            let mut bounds = sketch.bounds;
            if !bounds.is_valid() {
                bounds = BoundingBox {
                    min_x: 0.0,
                    min_y: 0.0,
                    max_x: 10.0,
                    max_y: 10.0,
                };
            }
            BoundingBox {
                min_x: bounds.min_x - 2.0,
                min_y: bounds.min_y - 2.0,
                max_x: bounds.max_x + 2.0,
                max_y: bounds.max_y + 2.0,
            }
        },
        |outline| {
            // Transform the outline corners the same way as every hole.
            let a = transform.apply(Point::new(outline.min_x, outline.min_y));
            let b = transform.apply(Point::new(outline.max_x, outline.max_y));
            let mut bounds = BoundingBox::new();
            bounds.update(a.x, a.y);
            bounds.update(b.x, b.y);
            bounds
        },
    );
    sketch.rectangle(
        Point::new(outline.min_x, outline.min_y),
        Point::new(outline.max_x, outline.max_y),
    );

    // Legend block below the outline, one row per tool.
    let sample_column = outline.min_x;
    let max_diameter = tools
        .iter()
        .map(ToolDefinition::diameter_mm)
        .fold(1.0f64, f64::max);
    let text_column = sample_column + max_diameter + 3.0;
    let mut row_y = outline.min_y - LEGEND_GAP;

    for tool in tools {
        let center = Point::new(sample_column + max_diameter / 2.0, row_y);
        sketch.circle(center, tool.diameter_mm());

        let slot_note = if tool.slot { ", slots" } else { "" };
        let label = format!(
            "T{} {:.3}mm ({:.4}\") {} {} hole{}{}",
            tool.index,
            tool.diameter_mm(),
            tool.diameter_inch(),
            plating_label(tool),
            tool.hole_count(),
            if tool.hole_count() == 1 { "" } else { "s" },
            slot_note,
        );
        sketch.text(
            Point::new(text_column, row_y - LEGEND_TEXT_HEIGHT / 2.0),
            LEGEND_TEXT_HEIGHT,
            label,
        );

        row_y -= LEGEND_ROW_PITCH;
    }

    sketch
}

fn plating_label(tool: &ToolDefinition) -> &'static str {
    match tool.plating {
        crate::catalog::Plating::Plated => "plated",
        crate::catalog::Plating::NotPlated => "not plated",
    }
}

/// Map file name for a board and backend.
pub fn map_file_name(board: &BoardSnapshot, format: MapFormat) -> String {
    format!("{}-drl_map.{}", board.name, format.extension())
}

/// Writes the drill map file for one generation request.
///
/// # Errors
///
/// [`DrillError::DirectoryUnavailable`] when the output directory cannot
/// be created, [`DrillError::WriteFailed`] when the file cannot be
/// written or the Gerber backend fails to serialize.
pub fn write_map_file(
    board: &BoardSnapshot,
    catalog: &HoleCatalog,
    tools: &[ToolDefinition],
    options: &DrillJobOptions,
) -> Result<PathBuf, DrillError> {
    crate::ensure_output_dir(&options.output_dir)?;

    let sketch = build_sketch(board, catalog, tools, options);
    let path = options.output_dir.join(map_file_name(board, options.map_format));

    let contents = match options.map_format {
        MapFormat::Hpgl => hpgl::render(&sketch).into_bytes(),
        MapFormat::PostScript => postscript::render(&sketch).into_bytes(),
        MapFormat::Gerber => gerber::render(&sketch, &path)?,
        MapFormat::Dxf => dxf::render(&sketch).into_bytes(),
        MapFormat::Svg => svg::render(&sketch).into_bytes(),
        MapFormat::Pdf => pdf::render(&sketch),
    };

    std::fs::write(&path, contents).map_err(|source| DrillError::WriteFailed {
        path: path.clone(),
        source,
    })?;
    log::info!("created drill map `{}`", path.display());
    Ok(path)
}
