//! Tool assignment.
//!
//! Partitions the hole catalog into ordered tool definitions. Grouping is
//! done through an ordered map on an integer-nanometre key so that equal
//! diameters group exactly and re-running the assigner on an unchanged
//! catalog always yields the identical numbering — the drill writers, the
//! map legend and the report all share it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{HoleCatalog, Plating};

/// One row of the tool table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// 1-based tool number, assigned in ascending-diameter order.
    pub index: u32,
    /// Drill bit diameter in integer nanometres (slot width for slots).
    diameter_nm: i64,
    /// True when this tool routes slots rather than plunging round holes.
    pub slot: bool,
    /// Plating class of the group. A merged group containing any plated
    /// hole reports as plated.
    pub plating: Plating,
    /// Catalog indices of the holes drilled with this tool, in catalog
    /// order.
    pub hole_indices: Vec<usize>,
}

impl ToolDefinition {
    /// Drill bit diameter in millimetres.
    #[allow(clippy::cast_precision_loss)]
    pub fn diameter_mm(&self) -> f64 {
        self.diameter_nm as f64 / 1_000_000.0
    }

    /// Drill bit diameter in inches.
    pub fn diameter_inch(&self) -> f64 {
        self.diameter_mm() / 25.4
    }

    /// Number of holes assigned to this tool.
    pub fn hole_count(&self) -> usize {
        self.hole_indices.len()
    }
}

/// Plated groups sort before non-plated groups of the same diameter.
const fn plating_rank(plating: Plating) -> u8 {
    match plating {
        Plating::Plated => 0,
        Plating::NotPlated => 1,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_nanometres(diameter_mm: f64) -> i64 {
    (diameter_mm * 1_000_000.0).round() as i64
}

/// Groups the catalog into tool definitions.
///
/// The grouping key is `(diameter-or-width, plating-group, shape-kind)`;
/// with `merge_pth_npth` the plating group is ignored. Tools come back
/// sorted by ascending diameter with plated before not-plated on ties,
/// numbered contiguously from 1. An empty catalog yields no tools.
#[allow(clippy::cast_possible_truncation)]
pub fn assign_tools(catalog: &HoleCatalog, merge_pth_npth: bool) -> Vec<ToolDefinition> {
    // Key order drives the tool order: diameter, then plating, then shape.
    let mut groups: BTreeMap<(i64, u8, bool), Vec<usize>> = BTreeMap::new();

    for (hole_index, hole) in catalog.holes.iter().enumerate() {
        let rank = if merge_pth_npth {
            0
        } else {
            plating_rank(hole.plating)
        };
        groups
            .entry((to_nanometres(hole.tool_diameter()), rank, hole.is_slot()))
            .or_default()
            .push(hole_index);
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(position, ((diameter_nm, rank, slot), hole_indices))| {
            let plating = if rank == 0 {
                // Unmerged plated group, or a merged group: merged groups
                // report as plated as soon as one member is.
                if merge_pth_npth
                    && hole_indices
                        .iter()
                        .all(|&i| catalog.holes[i].plating == Plating::NotPlated)
                {
                    Plating::NotPlated
                } else {
                    Plating::Plated
                }
            } else {
                Plating::NotPlated
            };

            ToolDefinition {
                index: position as u32 + 1,
                diameter_nm,
                slot,
                plating,
                hole_indices,
            }
        })
        .collect()
}
