//! Hole catalog builder.
//!
//! Walks the snapshot's pad and via collections and classifies each into a
//! [`HoleRecord`]. Ordering is the board's native pad-then-via traversal;
//! it carries no meaning except that identical board state must always
//! produce the identical catalog, which the tool assigner and every writer
//! rely on.

use serde::{Deserialize, Serialize};

use crate::board::{BoardSnapshot, PadDrill, Point, ViaKind};

/// Geometry of a drilled feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HoleShape {
    /// Single round plunge.
    Circular {
        /// Drill diameter.
        diameter: f64,
    },
    /// Routed slot.
    Slot {
        /// Slot (drill bit) width.
        width: f64,
        /// Overall slot length.
        length: f64,
        /// Slot axis angle in degrees.
        angle_degrees: f64,
    },
}

/// Plating class of a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plating {
    /// Plated-through hole.
    Plated,
    /// Non-plated hole.
    NotPlated,
}

/// Via classification of a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViaClass {
    /// Pad hole, not a via.
    None,
    /// Through via.
    Through,
    /// Microvia.
    Micro,
    /// Blind or buried via with its copper layer span.
    BlindOrBuried {
        /// First copper layer of the span.
        start_layer: u32,
        /// Last copper layer of the span.
        end_layer: u32,
    },
}

/// One physical drilled feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoleRecord {
    /// Drill center, or the routed start point for a slot.
    pub position: Point,
    /// Hole geometry.
    pub shape: HoleShape,
    /// Plating class.
    pub plating: Plating,
    /// Via classification.
    pub via_class: ViaClass,
}

impl HoleRecord {
    /// Drill bit diameter: the diameter for circular holes, the slot
    /// width for slots. This is the tool grouping and sort key.
    pub fn tool_diameter(&self) -> f64 {
        match self.shape {
            HoleShape::Circular { diameter } => diameter,
            HoleShape::Slot { width, .. } => width,
        }
    }

    /// True for routed slots.
    pub const fn is_slot(&self) -> bool {
        matches!(self.shape, HoleShape::Slot { .. })
    }

    /// Routed end point of a slot, equal to the position for round holes.
    ///
    /// The slot travel is `length - width` along the slot axis so the end
    /// caps land inside the overall length.
    pub fn slot_end(&self) -> Point {
        match self.shape {
            HoleShape::Circular { .. } => self.position,
            HoleShape::Slot {
                width,
                length,
                angle_degrees,
            } => {
                let travel = (length - width).max(0.0);
                let radians = angle_degrees.to_radians();
                Point::new(
                    travel.mul_add(radians.cos(), self.position.x),
                    travel.mul_add(radians.sin(), self.position.y),
                )
            }
        }
    }

    /// Midpoint of the slot travel, used for the single-plunge fallback.
    pub fn centroid(&self) -> Point {
        let end = self.slot_end();
        Point::new(
            (self.position.x + end.x) / 2.0,
            (self.position.y + end.y) / 2.0,
        )
    }
}

/// Per-class hole counters, a pure by-product of catalog building exposed
/// for UI display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleCounts {
    /// Plated pad holes.
    pub plated_pad_holes: u32,
    /// Non-plated pad holes.
    pub not_plated_pad_holes: u32,
    /// Through vias.
    pub through_vias: u32,
    /// Microvias.
    pub micro_vias: u32,
    /// Blind or buried vias.
    pub blind_or_buried_vias: u32,
}

impl HoleCounts {
    /// Total hole count across all classes.
    pub const fn total(&self) -> u32 {
        self.plated_pad_holes
            + self.not_plated_pad_holes
            + self.through_vias
            + self.micro_vias
            + self.blind_or_buried_vias
    }
}

/// Ordered hole inventory plus its per-class counters.
#[derive(Debug, Clone, Default)]
pub struct HoleCatalog {
    /// Hole records in stable pad-then-via order.
    pub holes: Vec<HoleRecord>,
    /// Per-class counters accumulated during the walk.
    pub counts: HoleCounts,
}

impl HoleCatalog {
    /// True when the board contributed no drilled features.
    pub fn is_empty(&self) -> bool {
        self.holes.is_empty()
    }
}

/// Builds the hole catalog from a board snapshot.
///
/// Pads with a zero drill size are surface-mount pads and are excluded
/// entirely. Vias are always plated.
pub fn build_catalog(board: &BoardSnapshot) -> HoleCatalog {
    let mut catalog = HoleCatalog::default();

    for pad in &board.pads {
        let shape = match pad.drill {
            PadDrill::None => continue,
            PadDrill::Circle { diameter } => {
                if diameter <= 0.0 {
                    continue;
                }
                HoleShape::Circular { diameter }
            }
            PadDrill::Slot {
                width,
                length,
                angle_degrees,
            } => {
                if width <= 0.0 || length <= 0.0 {
                    continue;
                }
                HoleShape::Slot {
                    width,
                    length,
                    angle_degrees,
                }
            }
        };

        let plating = if pad.plated {
            catalog.counts.plated_pad_holes += 1;
            Plating::Plated
        } else {
            catalog.counts.not_plated_pad_holes += 1;
            Plating::NotPlated
        };

        catalog.holes.push(HoleRecord {
            position: pad.position,
            shape,
            plating,
            via_class: ViaClass::None,
        });
    }

    for via in &board.vias {
        if via.drill_diameter <= 0.0 {
            continue;
        }

        let via_class = match via.kind {
            ViaKind::Through => {
                catalog.counts.through_vias += 1;
                ViaClass::Through
            }
            ViaKind::Micro => {
                catalog.counts.micro_vias += 1;
                ViaClass::Micro
            }
            ViaKind::BlindOrBuried {
                start_layer,
                end_layer,
            } => {
                catalog.counts.blind_or_buried_vias += 1;
                ViaClass::BlindOrBuried {
                    start_layer,
                    end_layer,
                }
            }
        };

        catalog.holes.push(HoleRecord {
            position: via.position,
            shape: HoleShape::Circular {
                diameter: via.drill_diameter,
            },
            plating: Plating::Plated,
            via_class,
        });
    }

    catalog
}
