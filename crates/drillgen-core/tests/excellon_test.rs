//! Integration tests for the Excellon drill writer.

mod common;

use std::fs;

use drillgen_core::board::{BoardSnapshot, Pad, PadDrill, Point, Via, ViaKind};
use drillgen_core::options::{DrillJobOptions, DrillUnit, OriginMode, ZeroFormat};
use drillgen_core::{build_catalog, assign_tools, drill};

use common::parse_excellon;

fn sample_board() -> BoardSnapshot {
    let mut board = BoardSnapshot::new("sample");
    board.pads.push(Pad {
        position: Point::new(12.345, 10.0),
        drill: PadDrill::Circle { diameter: 0.8 },
        plated: true,
    });
    board.pads.push(Pad {
        position: Point::new(20.0, 15.5),
        drill: PadDrill::Circle { diameter: 3.0 },
        plated: false,
    });
    board.vias.push(Via {
        position: Point::new(5.0, 5.0),
        drill_diameter: 0.4,
        kind: ViaKind::Through,
    });
    board
}

fn write(board: &BoardSnapshot, options: &DrillJobOptions) -> Vec<std::path::PathBuf> {
    common::init_logging();
    let catalog = build_catalog(board);
    let tools = assign_tools(&catalog, options.merge_pth_npth);
    drill::write_drill_files(board, &catalog, &tools, options)
        .unwrap_or_else(|err| panic!("drill writer failed: {err}"))
}

/// Split metric decimal output → positions and tool table round-trip.
#[test]
fn metric_decimal_round_trips_positions_and_tools() {
    let dir = tempfile::tempdir().unwrap();
    let options = DrillJobOptions {
        output_dir: dir.path().to_path_buf(),
        ..DrillJobOptions::default()
    };

    let files = write(&sample_board(), &options);
    assert_eq!(files.len(), 2, "split mode writes PTH and NPTH");
    assert!(files[0].ends_with("sample-PTH.drl"));
    assert!(files[1].ends_with("sample-NPTH.drl"));

    let pth = parse_excellon(&fs::read_to_string(&files[0]).unwrap());
    assert!(pth.metric);
    assert!(pth.terminated);
    // Via tool 1 and plated pad tool 2, with their global numbers.
    assert_eq!(pth.tools, vec![(1, 0.4), (2, 0.8)]);
    assert_eq!(pth.hits.len(), 2);
    assert_eq!(pth.hits[0].tool, 1);
    assert!((pth.hits[0].x - 5.0).abs() < 1e-9);
    assert_eq!(pth.hits[1].tool, 2);
    assert!((pth.hits[1].x - 12.345).abs() < 1e-9);
    assert!((pth.hits[1].y - 10.0).abs() < 1e-9);

    let npth = parse_excellon(&fs::read_to_string(&files[1]).unwrap());
    assert_eq!(npth.tools, vec![(3, 3.0)], "NPTH keeps the global number");
    assert_eq!(npth.hits.len(), 1);
}

/// Merge option → one file with every hole, no suffix.
#[test]
fn merged_output_is_a_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let options = DrillJobOptions {
        merge_pth_npth: true,
        output_dir: dir.path().to_path_buf(),
        ..DrillJobOptions::default()
    };

    let files = write(&sample_board(), &options);
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("sample.drl"));

    let merged = parse_excellon(&fs::read_to_string(&files[0]).unwrap());
    assert_eq!(merged.hits.len(), 3);
    assert_eq!(merged.tools.len(), 3);
}

/// Board with only plated holes → NPTH file still written, header-only.
#[test]
fn empty_npth_file_is_still_written() {
    let mut board = BoardSnapshot::new("allplated");
    board.pads.push(Pad {
        position: Point::new(1.0, 1.0),
        drill: PadDrill::Circle { diameter: 0.8 },
        plated: true,
    });

    let dir = tempfile::tempdir().unwrap();
    let options = DrillJobOptions {
        output_dir: dir.path().to_path_buf(),
        ..DrillJobOptions::default()
    };

    let files = write(&board, &options);
    assert_eq!(files.len(), 2);

    let npth = parse_excellon(&fs::read_to_string(&files[1]).unwrap());
    assert!(npth.tools.is_empty(), "no tool table rows");
    assert!(npth.hits.is_empty(), "no coordinate records");
    assert!(npth.terminated, "still a valid terminated file");
}

/// Leading-zero suppression → TZ declaration, values round-trip.
#[test]
fn suppress_leading_round_trips_through_tz() {
    let dir = tempfile::tempdir().unwrap();
    let options = DrillJobOptions {
        zero_format: ZeroFormat::SuppressLeading,
        merge_pth_npth: true,
        output_dir: dir.path().to_path_buf(),
        ..DrillJobOptions::default()
    };

    let files = write(&sample_board(), &options);
    let text = fs::read_to_string(&files[0]).unwrap();
    assert!(text.contains("METRIC,TZ"));

    let parsed = parse_excellon(&text);
    let hit = parsed.hits.iter().find(|hit| hit.tool == 2).unwrap();
    assert!((hit.x - 12.345).abs() < 1e-9);
    assert!((hit.y - 10.0).abs() < 1e-9);
}

/// Trailing-zero suppression → LZ declaration, values round-trip.
#[test]
fn suppress_trailing_round_trips_through_lz() {
    let dir = tempfile::tempdir().unwrap();
    let options = DrillJobOptions {
        zero_format: ZeroFormat::SuppressTrailing,
        merge_pth_npth: true,
        output_dir: dir.path().to_path_buf(),
        ..DrillJobOptions::default()
    };

    let files = write(&sample_board(), &options);
    let text = fs::read_to_string(&files[0]).unwrap();
    assert!(text.contains("METRIC,LZ"));

    let parsed = parse_excellon(&text);
    let hit = parsed.hits.iter().find(|hit| hit.tool == 2).unwrap();
    assert!((hit.x - 12.345).abs() < 1e-9);
    assert!((hit.y - 10.0).abs() < 1e-9);
}

/// Inch unit → INCH declaration, 2.4 field, converted values.
#[test]
fn inch_output_declares_inch_and_converts() {
    let mut board = BoardSnapshot::new("imperial");
    board.pads.push(Pad {
        position: Point::new(25.4, 12.7),
        drill: PadDrill::Circle { diameter: 2.54 },
        plated: true,
    });

    let dir = tempfile::tempdir().unwrap();
    let options = DrillJobOptions {
        unit: DrillUnit::Inch,
        zero_format: ZeroFormat::KeepAll,
        merge_pth_npth: true,
        output_dir: dir.path().to_path_buf(),
        ..DrillJobOptions::default()
    };

    let files = write(&board, &options);
    let text = fs::read_to_string(&files[0]).unwrap();
    assert!(text.contains("INCH,TZ"));
    assert!(text.contains("T1C0.1000"), "tool diameter in inches");

    let parsed = parse_excellon(&text);
    assert!(!parsed.metric);
    assert!((parsed.hits[0].x - 1.0).abs() < 1e-9);
    assert!((parsed.hits[0].y - 0.5).abs() < 1e-9);
}

/// Oval hole in route mode → G00/M15/G01/M16 slot; otherwise one plunge.
#[test]
fn oval_holes_route_or_collapse_per_option() {
    let mut board = BoardSnapshot::new("oval");
    board.pads.push(Pad {
        position: Point::new(10.0, 10.0),
        drill: PadDrill::Slot {
            width: 1.0,
            length: 3.0,
            angle_degrees: 0.0,
        },
        plated: true,
    });

    let dir = tempfile::tempdir().unwrap();
    let mut options = DrillJobOptions {
        merge_pth_npth: true,
        output_dir: dir.path().to_path_buf(),
        ..DrillJobOptions::default()
    };

    let routed = parse_excellon(&fs::read_to_string(&write(&board, &options)[0]).unwrap());
    assert_eq!(routed.slots.len(), 1);
    assert!(routed.hits.is_empty());
    assert!((routed.slots[0].start.0 - 10.0).abs() < 1e-9);
    assert!((routed.slots[0].end.0 - 12.0).abs() < 1e-9, "travel is length minus width");
    assert_eq!(routed.tools, vec![(1, 1.0)], "tool diameter is the slot width");

    options.route_mode_for_oval_holes = false;
    let collapsed = parse_excellon(&fs::read_to_string(&write(&board, &options)[0]).unwrap());
    assert!(collapsed.slots.is_empty());
    assert_eq!(collapsed.hits.len(), 1);
    assert!((collapsed.hits[0].x - 11.0).abs() < 1e-9, "plunge at the slot centroid");
}

/// Auxiliary origin and mirror → offsets subtracted, Y negated.
#[test]
fn auxiliary_origin_and_mirror_transform_coordinates() {
    let mut board = sample_board();
    board.aux_origin = Point::new(5.0, 5.0);

    let dir = tempfile::tempdir().unwrap();
    let options = DrillJobOptions {
        origin: OriginMode::Auxiliary,
        mirror_y: true,
        merge_pth_npth: true,
        output_dir: dir.path().to_path_buf(),
        ..DrillJobOptions::default()
    };

    let parsed = parse_excellon(&fs::read_to_string(&write(&sample_board(), &options)[0]).unwrap());
    // Default aux origin is (0,0); rebuild with the shifted board.
    let shifted = parse_excellon(&fs::read_to_string(&write(&board, &options)[0]).unwrap());

    let hit = shifted.hits.iter().find(|hit| hit.tool == 2).unwrap();
    assert!((hit.x - 7.345).abs() < 1e-9);
    assert!((hit.y + 5.0).abs() < 1e-9, "mirror negates the offset Y");

    let unshifted = parsed.hits.iter().find(|hit| hit.tool == 2).unwrap();
    assert!((unshifted.y + 10.0).abs() < 1e-9);
}

/// Minimal header option → no comment lines, no FMAT, still parseable.
#[test]
fn minimal_header_omits_comments() {
    let dir = tempfile::tempdir().unwrap();
    let options = DrillJobOptions {
        minimal_header: true,
        merge_pth_npth: true,
        output_dir: dir.path().to_path_buf(),
        ..DrillJobOptions::default()
    };

    let files = write(&sample_board(), &options);
    let text = fs::read_to_string(&files[0]).unwrap();
    assert!(!text.contains(';'), "no comment lines");
    assert!(!text.contains("FMAT"));
    assert!(text.starts_with("M48\n"));
    assert_eq!(parse_excellon(&text).hits.len(), 3);
}

/// Hole beyond the field range → CoordinateOverflow naming the file.
#[test]
fn out_of_range_coordinate_reports_overflow() {
    let mut board = BoardSnapshot::new("huge");
    board.pads.push(Pad {
        position: Point::new(1500.0, 0.0),
        drill: PadDrill::Circle { diameter: 0.8 },
        plated: true,
    });

    let dir = tempfile::tempdir().unwrap();
    let options = DrillJobOptions {
        zero_format: ZeroFormat::KeepAll,
        merge_pth_npth: true,
        output_dir: dir.path().to_path_buf(),
        ..DrillJobOptions::default()
    };

    let catalog = build_catalog(&board);
    let tools = assign_tools(&catalog, true);
    let err = drill::write_drill_files(&board, &catalog, &tools, &options)
        .err()
        .unwrap_or_else(|| panic!("expected a coordinate overflow"));

    match err {
        drillgen_core::DrillError::CoordinateOverflow { x, integer, .. } => {
            assert!((x - 1500.0).abs() < 1e-9);
            assert_eq!(integer, 3);
        }
        other => panic!("expected CoordinateOverflow, got {other}"),
    }
}

/// Overflow in the second file of a split job → the completed PTH file
/// stays on disk, the failing NPTH file is never created.
#[test]
fn overflow_keeps_completed_sibling_files() {
    let mut board = BoardSnapshot::new("partial");
    board.pads.push(Pad {
        position: Point::new(10.0, 10.0),
        drill: PadDrill::Circle { diameter: 0.8 },
        plated: true,
    });
    board.pads.push(Pad {
        position: Point::new(1500.0, 0.0),
        drill: PadDrill::Circle { diameter: 3.0 },
        plated: false,
    });

    let dir = tempfile::tempdir().unwrap();
    let options = DrillJobOptions {
        zero_format: ZeroFormat::KeepAll,
        output_dir: dir.path().to_path_buf(),
        ..DrillJobOptions::default()
    };

    common::init_logging();
    let catalog = build_catalog(&board);
    let tools = assign_tools(&catalog, false);
    let err = drill::write_drill_files(&board, &catalog, &tools, &options)
        .err()
        .unwrap_or_else(|| panic!("expected a coordinate overflow"));

    let npth_path = dir.path().join("partial-NPTH.drl");
    match err {
        drillgen_core::DrillError::CoordinateOverflow { path, .. } => {
            assert_eq!(path, npth_path);
        }
        other => panic!("expected CoordinateOverflow, got {other}"),
    }

    let pth_path = dir.path().join("partial-PTH.drl");
    assert!(pth_path.exists(), "completed PTH file remains");
    assert!(!npth_path.exists(), "failing NPTH file is never created");

    let pth = parse_excellon(&fs::read_to_string(&pth_path).unwrap());
    assert_eq!(pth.hits.len(), 1);
    assert!(pth.terminated, "the kept sibling is a complete valid file");
}
