use std::num::IntErrorKind;

/// Converts a cell of a time-use table into minutes.
///
/// Accepted shapes are clock strings (`1:30`, `01:30:15`; only hours and minutes are used),
/// plain numbers of minutes (`45`, `45.9`, truncated toward zero) and missing values (absent,
/// blank, `nan`, `None`). Anything unparseable counts as 0: self-reported logs are expected to
/// have gaps, so a bad cell must never fail the whole table.
pub fn parse_minutes(cell: Option<&str>) -> i64 {
    let Some(cell) = cell else {
        return 0;
    };
    let s = cell.trim();
    if matches!(s, "" | "nan" | "None") {
        return 0;
    }
    if s.contains(':') {
        parse_clock(s).unwrap_or(0)
    } else {
        parse_number(s).unwrap_or(0)
    }
}

fn parse_clock(s: &str) -> Option<i64> {
    let mut parts = s.split(':');
    let hours = parse_clock_part(parts.next()?)?;
    let minutes = parse_clock_part(parts.next()?)?;
    Some(hours.saturating_mul(60).saturating_add(minutes))
}

/// Integer part of a clock string. Digit strings too long for `i64` saturate instead of being
/// rejected, the cap brings them back into range.
fn parse_clock_part(s: &str) -> Option<i64> {
    match s.trim().parse::<i64>() {
        Ok(v) => Some(v),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

fn parse_number(s: &str) -> Option<i64> {
    let value = s.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    // `as` saturates out of range values, which the cap takes care of later anyway.
    Some(value.trunc() as i64)
}
