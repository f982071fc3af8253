//! SVG map backend.

use std::fmt::Write as _;

use super::MapSketch;

/// Page margin in millimetres.
const MARGIN: f64 = 10.0;

/// Renders the sketch as a standalone SVG document, millimetre units with
/// the Y axis flipped into screen space.
pub fn render(sketch: &MapSketch) -> String {
    let tx = |x: f64| x - sketch.bounds.min_x + MARGIN;
    let ty = |y: f64| sketch.bounds.max_y - y + MARGIN;

    let width = sketch.bounds.width() + 2.0 * MARGIN;
    let height = sketch.bounds.height() + 2.0 * MARGIN;

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}mm\" height=\"{height:.2}mm\" viewBox=\"0 0 {width:.2} {height:.2}\">"
    );
    out.push_str("<g fill=\"none\" stroke=\"black\" stroke-width=\"0.15\">\n");

    for &(from, to) in &sketch.lines {
        let _ = writeln!(
            out,
            "<line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\"/>",
            tx(from.x),
            ty(from.y),
            tx(to.x),
            ty(to.y)
        );
    }

    for &(center, diameter) in &sketch.circles {
        let _ = writeln!(
            out,
            "<circle cx=\"{:.3}\" cy=\"{:.3}\" r=\"{:.3}\"/>",
            tx(center.x),
            ty(center.y),
            diameter / 2.0
        );
    }

    out.push_str("</g>\n");

    for (anchor, height_mm, content) in &sketch.texts {
        let _ = writeln!(
            out,
            "<text x=\"{:.3}\" y=\"{:.3}\" font-size=\"{height_mm:.2}\" font-family=\"sans-serif\" fill=\"black\">{}</text>",
            tx(anchor.x),
            ty(anchor.y),
            escape(content)
        );
    }

    out.push_str("</svg>\n");
    out
}

/// Escapes the XML text delimiters.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
