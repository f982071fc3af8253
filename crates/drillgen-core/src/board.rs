//! Board snapshot input contract.
//!
//! The caller hands the core an already-computed inventory of pads and
//! vias; the core never decides which holes exist electrically and never
//! mutates the snapshot.

use serde::{Deserialize, Serialize};

/// 2D point in board coordinate space, millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in board space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
}

impl BoundingBox {
    /// Creates an empty bounding box that expands with the first `update`.
    pub const fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expands the bounding box to include the given point.
    pub fn update(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// True once at least one point has been accumulated.
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Width of the box. Negative only while empty.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box. Negative only while empty.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

/// Drill description of a pad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PadDrill {
    /// Surface-mount pad, no hole.
    None,
    /// Round drilled hole.
    Circle {
        /// Drill diameter.
        diameter: f64,
    },
    /// Oval hole drilled as a routed slot.
    Slot {
        /// Slot (drill bit) width.
        width: f64,
        /// Overall slot length, end cap to end cap.
        length: f64,
        /// Slot axis angle in degrees, counter-clockwise from +X.
        angle_degrees: f64,
    },
}

/// One pad of the board snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    /// Nominal drill center, or the routed start point for a slot.
    pub position: Point,
    /// Hole geometry.
    pub drill: PadDrill,
    /// Hole-plating attribute of the pad.
    pub plated: bool,
}

/// Via construction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViaKind {
    /// Spans the full board stack.
    Through,
    /// Laser-drilled microvia.
    Micro,
    /// Blind or buried via with its copper layer span.
    BlindOrBuried {
        /// First copper layer of the span.
        start_layer: u32,
        /// Last copper layer of the span.
        end_layer: u32,
    },
}

/// One via of the board snapshot. Vias are plated by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Via {
    /// Drill center.
    pub position: Point,
    /// Drill diameter.
    pub drill_diameter: f64,
    /// Construction kind.
    pub kind: ViaKind,
}

/// Read-only snapshot of the board state a generation request runs over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Board file name without extension; output names derive from it.
    pub name: String,
    /// All pads, in the board's native traversal order.
    pub pads: Vec<Pad>,
    /// All vias, in the board's native traversal order.
    pub vias: Vec<Via>,
    /// User-designated auxiliary origin.
    pub aux_origin: Point,
    /// Board outline, when known. The map falls back to the hole extent.
    pub outline: Option<BoundingBox>,
}

impl BoardSnapshot {
    /// Creates an empty snapshot with the given base name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
