//! Shared test support: a small conforming Excellon reader.
//!
//! The writer tests round-trip their output through this reader instead of
//! comparing file text, so a formatting-preserving change does not break
//! them. The reader honors the unit and zero-suppression declarations the
//! header carries.

#![allow(dead_code)]

/// Routes `log` output from the writers into the test harness capture.
/// Safe to call from every test; repeated initialization is a no-op.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZeroSuppression {
    None,
    Leading,
    Trailing,
}

/// One plunge hit: selected tool number plus position in file units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub tool: u32,
    pub x: f64,
    pub y: f64,
}

/// One routed slot: selected tool number plus start and end positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub tool: u32,
    pub start: (f64, f64),
    pub end: (f64, f64),
}

/// Structured view of one Excellon file.
#[derive(Debug, Clone, Default)]
pub struct ParsedDrill {
    /// `(tool number, declared diameter)` rows of the header tool table.
    pub tools: Vec<(u32, f64)>,
    /// Plunge hits in file order.
    pub hits: Vec<Hit>,
    /// Routed slots in file order.
    pub slots: Vec<Slot>,
    /// True when the header declared `METRIC`.
    pub metric: bool,
    /// True when `M30` terminated the file.
    pub terminated: bool,
}

/// Parses an Excellon drill file produced by the writer under test.
///
/// Panics on malformed input; a panic is the test failure.
pub fn parse_excellon(text: &str) -> ParsedDrill {
    let mut parsed = ParsedDrill::default();
    let mut suppression = ZeroSuppression::None;
    let mut integer_digits = 3u8;
    let mut decimal_digits = 3u8;
    let mut in_header = true;
    let mut current_tool = None;
    let mut slot_start: Option<(f64, f64)> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        match line {
            "M48" | "FMAT,2" | "G90" | "G05" | "M15" | "T0" => continue,
            "%" => {
                in_header = false;
                continue;
            }
            "M30" => {
                parsed.terminated = true;
                break;
            }
            _ => {}
        }

        if let Some(declaration) = line
            .strip_prefix("METRIC")
            .map(|suffix| (true, suffix))
            .or_else(|| line.strip_prefix("INCH").map(|suffix| (false, suffix)))
        {
            let (metric, suffix) = declaration;
            parsed.metric = metric;
            if metric {
                integer_digits = 3;
                decimal_digits = 3;
            } else {
                integer_digits = 2;
                decimal_digits = 4;
            }
            suppression = match suffix {
                ",TZ" => ZeroSuppression::Leading,
                ",LZ" => ZeroSuppression::Trailing,
                "" => ZeroSuppression::None,
                other => panic!("unexpected unit suffix `{other}`"),
            };
            continue;
        }

        if in_header {
            let (tool, diameter) = line
                .strip_prefix('T')
                .and_then(|rest| rest.split_once('C'))
                .unwrap_or_else(|| panic!("unexpected header line `{line}`"));
            parsed
                .tools
                .push((tool.parse().unwrap(), diameter.parse().unwrap()));
            continue;
        }

        if let Some(tool) = line.strip_prefix('T') {
            current_tool = Some(tool.parse().unwrap());
            continue;
        }

        let tool = current_tool.unwrap_or_else(|| panic!("coordinate before tool: `{line}`"));

        if let Some(rest) = line.strip_prefix("G00") {
            slot_start = Some(parse_pair(rest, suppression, integer_digits, decimal_digits));
        } else if let Some(rest) = line.strip_prefix("G01") {
            let start = slot_start
                .take()
                .unwrap_or_else(|| panic!("G01 without a preceding G00: `{line}`"));
            let end = parse_pair(rest, suppression, integer_digits, decimal_digits);
            parsed.slots.push(Slot { tool, start, end });
        } else if line == "M16" {
            // Tool-up after the routed move; G05 follows and is skipped.
        } else {
            let (x, y) = parse_pair(line, suppression, integer_digits, decimal_digits);
            parsed.hits.push(Hit { tool, x, y });
        }
    }

    parsed
}

fn parse_pair(
    record: &str,
    suppression: ZeroSuppression,
    integer_digits: u8,
    decimal_digits: u8,
) -> (f64, f64) {
    let rest = record
        .strip_prefix('X')
        .unwrap_or_else(|| panic!("record without X field: `{record}`"));
    let (x_field, y_field) = rest
        .split_once('Y')
        .unwrap_or_else(|| panic!("record without Y field: `{record}`"));
    (
        parse_value(x_field, suppression, integer_digits, decimal_digits),
        parse_value(y_field, suppression, integer_digits, decimal_digits),
    )
}

fn parse_value(
    field: &str,
    suppression: ZeroSuppression,
    integer_digits: u8,
    decimal_digits: u8,
) -> f64 {
    // A declaration without TZ/LZ means explicit-point decimal fields;
    // whole values drop the point entirely.
    if suppression == ZeroSuppression::None || field.contains('.') {
        return field.parse().unwrap();
    }

    let (sign, digits) = match field.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, field),
    };
    let scale = 10f64.powi(i32::from(decimal_digits));

    let value = match suppression {
        ZeroSuppression::None => unreachable!("handled above"),
        // Trailing zeros kept: the digit string is right-aligned.
        ZeroSuppression::Leading => digits.parse::<f64>().unwrap() / scale,
        // Leading zeros kept: pad the string back to full width first.
        ZeroSuppression::Trailing => {
            let width = usize::from(integer_digits + decimal_digits);
            let padded = format!("{digits:0<width$}");
            padded.parse::<f64>().unwrap() / scale
        }
    };

    sign * value
}
