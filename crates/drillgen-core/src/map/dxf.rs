//! DXF map backend (vector exchange).
//!
//! Minimal R12-style entity section: LINE, CIRCLE and TEXT on layer 0,
//! native millimetres, no header tables.

use std::fmt::Write as _;

use super::MapSketch;

/// Renders the sketch as a DXF document.
pub fn render(sketch: &MapSketch) -> String {
    let mut out = String::from("0\nSECTION\n2\nENTITIES\n");

    for &(from, to) in &sketch.lines {
        let _ = write!(
            out,
            "0\nLINE\n8\n0\n10\n{:.4}\n20\n{:.4}\n11\n{:.4}\n21\n{:.4}\n",
            from.x, from.y, to.x, to.y
        );
    }

    for &(center, diameter) in &sketch.circles {
        let _ = write!(
            out,
            "0\nCIRCLE\n8\n0\n10\n{:.4}\n20\n{:.4}\n40\n{:.4}\n",
            center.x,
            center.y,
            diameter / 2.0
        );
    }

    for (anchor, height, content) in &sketch.texts {
        let _ = write!(
            out,
            "0\nTEXT\n8\n0\n10\n{:.4}\n20\n{:.4}\n40\n{:.4}\n1\n{}\n",
            anchor.x, anchor.y, height, content
        );
    }

    out.push_str("0\nENDSEC\n0\nEOF\n");
    out
}
