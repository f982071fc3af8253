//! HPGL map backend (plotter control language).

use super::MapSketch;

/// Plotter units per millimetre.
const UNITS_PER_MM: f64 = 40.0;

/// Page margin in millimetres.
const MARGIN: f64 = 10.0;

/// Renders the sketch as an HPGL plot.
pub fn render(sketch: &MapSketch) -> String {
    let to_units = |v: f64, min: f64| ((v - min + MARGIN) * UNITS_PER_MM).round() as i64;
    let tx = |x: f64| to_units(x, sketch.bounds.min_x);
    let ty = |y: f64| to_units(y, sketch.bounds.min_y);

    let mut out = String::from("IN;VS20;SP1;\n");

    for &(from, to) in &sketch.lines {
        out.push_str(&format!(
            "PU{},{};PD{},{};\n",
            tx(from.x),
            ty(from.y),
            tx(to.x),
            ty(to.y)
        ));
    }

    for &(center, diameter) in &sketch.circles {
        out.push_str(&format!(
            "PU{},{};CI{};\n",
            tx(center.x),
            ty(center.y),
            (diameter / 2.0 * UNITS_PER_MM).round() as i64
        ));
    }

    for (anchor, height, content) in &sketch.texts {
        // SI takes character width and height in centimetres.
        out.push_str(&format!(
            "SI{:.2},{:.2};PU{},{};LB{}\u{3};\n",
            height * 0.07,
            height * 0.1,
            tx(anchor.x),
            ty(anchor.y),
            content
        ));
    }

    out.push_str("PU0,0;SP0;IN;\n");
    out
}
