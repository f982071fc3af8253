//! PostScript map backend (page description), the fallback the selector
//! clamp lands on.

use std::fmt::Write as _;

use super::MapSketch;

/// Points per millimetre.
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Page margin in millimetres.
const MARGIN: f64 = 10.0;

/// Renders the sketch as an encapsulated PostScript page.
pub fn render(sketch: &MapSketch) -> String {
    let tx = |x: f64| (x - sketch.bounds.min_x + MARGIN) * PT_PER_MM;
    let ty = |y: f64| (y - sketch.bounds.min_y + MARGIN) * PT_PER_MM;

    let width = (sketch.bounds.width() + 2.0 * MARGIN) * PT_PER_MM;
    let height = (sketch.bounds.height() + 2.0 * MARGIN) * PT_PER_MM;

    let mut out = String::new();
    out.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
    let _ = writeln!(out, "%%BoundingBox: 0 0 {} {}", width.ceil(), height.ceil());
    out.push_str("%%Title: drill map\n%%EndComments\n0.4 setlinewidth\n");

    for &(from, to) in &sketch.lines {
        let _ = writeln!(
            out,
            "newpath {:.2} {:.2} moveto {:.2} {:.2} lineto stroke",
            tx(from.x),
            ty(from.y),
            tx(to.x),
            ty(to.y)
        );
    }

    for &(center, diameter) in &sketch.circles {
        let _ = writeln!(
            out,
            "newpath {:.2} {:.2} {:.2} 0 360 arc stroke",
            tx(center.x),
            ty(center.y),
            diameter / 2.0 * PT_PER_MM
        );
    }

    for (anchor, height_mm, content) in &sketch.texts {
        let _ = writeln!(
            out,
            "/Helvetica findfont {:.2} scalefont setfont",
            height_mm * PT_PER_MM
        );
        let _ = writeln!(
            out,
            "{:.2} {:.2} moveto ({}) show",
            tx(anchor.x),
            ty(anchor.y),
            escape(content)
        );
    }

    out.push_str("showpage\n%%EOF\n");
    out
}

/// Escapes the PostScript string delimiters.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}
