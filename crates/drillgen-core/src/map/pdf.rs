//! PDF map backend.
//!
//! Emits a single-page uncompressed document: one content stream with the
//! line art (circles as four-arc Bezier approximations) and Helvetica
//! legend text, plus the five-object skeleton and a byte-exact xref
//! table.

use std::fmt::Write as _;

use super::MapSketch;

/// Points per millimetre.
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Page margin in millimetres.
const MARGIN: f64 = 10.0;

/// Circle-from-Beziers control point factor.
const BEZIER_K: f64 = 0.552_284_749_831;

/// Renders the sketch as a PDF document.
pub fn render(sketch: &MapSketch) -> Vec<u8> {
    let tx = |x: f64| (x - sketch.bounds.min_x + MARGIN) * PT_PER_MM;
    let ty = |y: f64| (y - sketch.bounds.min_y + MARGIN) * PT_PER_MM;

    let width = (sketch.bounds.width() + 2.0 * MARGIN) * PT_PER_MM;
    let height = (sketch.bounds.height() + 2.0 * MARGIN) * PT_PER_MM;

    let mut content = String::from("0.4 w\n");

    for &(from, to) in &sketch.lines {
        let _ = writeln!(
            content,
            "{:.2} {:.2} m {:.2} {:.2} l S",
            tx(from.x),
            ty(from.y),
            tx(to.x),
            ty(to.y)
        );
    }

    for &(center, diameter) in &sketch.circles {
        let r = diameter / 2.0 * PT_PER_MM;
        let k = BEZIER_K * r;
        let cx = tx(center.x);
        let cy = ty(center.y);
        let _ = writeln!(content, "{:.2} {cy:.2} m", cx + r);
        let _ = writeln!(
            content,
            "{:.2} {:.2} {:.2} {:.2} {cx:.2} {:.2} c",
            cx + r,
            cy + k,
            cx + k,
            cy + r,
            cy + r
        );
        let _ = writeln!(
            content,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {cy:.2} c",
            cx - k,
            cy + r,
            cx - r,
            cy + k,
            cx - r
        );
        let _ = writeln!(
            content,
            "{:.2} {:.2} {:.2} {:.2} {cx:.2} {:.2} c",
            cx - r,
            cy - k,
            cx - k,
            cy - r,
            cy - r
        );
        let _ = writeln!(
            content,
            "{:.2} {:.2} {:.2} {:.2} {:.2} {cy:.2} c S",
            cx + k,
            cy - r,
            cx + r,
            cy - k,
            cx + r
        );
    }

    for (anchor, height_mm, text) in &sketch.texts {
        let _ = writeln!(
            content,
            "BT /F1 {:.2} Tf {:.2} {:.2} Td ({}) Tj ET",
            height_mm * PT_PER_MM,
            tx(anchor.x),
            ty(anchor.y),
            escape(text)
        );
    }

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_owned(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_owned(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>",
            width, height
        ),
        format!("<< /Length {} >>\nstream\n{content}endstream", content.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_owned(),
    ];

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());

    for (number, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = write!(out, "{} 0 obj\n{body}\nendobj\n", number + 1);
    }

    let xref_offset = out.len();
    let _ = write!(out, "xref\n0 {}\n", objects.len() + 1);
    out.push_str("0000000000 65535 f \n");
    for offset in offsets {
        let _ = write!(out, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
        objects.len() + 1
    );

    out.into_bytes()
}

/// Escapes the PDF string delimiters.
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}
