//! Scalar parsers for typed option values.
//!
//! Durations use the `1h30m` / `500ms` / `1.5h` grammar familiar from vault
//! and consul tooling: one or more decimal numbers, each with an optional
//! fraction and a mandatory unit suffix. The bare string `0` is accepted.
//! A leading `+` is allowed; a leading `-` only when the value is zero.

use std::time::Duration;

const NANOS_PER_UNIT: [(&str, u128); 8] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 3_600 * 1_000_000_000),
];

// Largest duration representable as signed 64-bit nanoseconds.
const MAX_NANOS: u128 = i64::MAX as u128;

// Fraction digits past this point cannot change the result.
const MAX_FRACTION_DIGITS: u32 = 18;

/// Parses a duration string, returning `None` when it is malformed,
/// negative, or out of range.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    if let Some(magnitude) = raw.strip_prefix('-') {
        return parse_unsigned(magnitude).filter(Duration::is_zero);
    }
    parse_unsigned(raw.strip_prefix('+').unwrap_or(raw))
}

fn parse_unsigned(raw: &str) -> Option<Duration> {
    if raw == "0" {
        return Some(Duration::ZERO);
    }
    if raw.is_empty() {
        return None;
    }

    let mut rest = raw;
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, fraction, scale, after_number) = split_number(rest)?;
        let (unit, after_unit) = split_unit(after_number)?;
        let per_unit = unit_nanos(unit)?;

        let mut nanos = whole.checked_mul(per_unit)?;
        if scale > 1 {
            nanos = nanos.checked_add(fraction * per_unit / scale)?;
        }
        total = total.checked_add(nanos)?;
        if total > MAX_NANOS {
            return None;
        }
        rest = after_unit;
    }

    u64::try_from(total).ok().map(Duration::from_nanos)
}

/// Returns `(whole, fraction, scale, rest)` where the fractional part equals
/// `fraction / scale`.
fn split_number(input: &str) -> Option<(u128, u128, u128, &str)> {
    let bytes = input.as_bytes();
    let mut idx = 0;
    let mut whole: u128 = 0;
    let mut digits = 0;

    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        whole = whole
            .checked_mul(10)?
            .checked_add(u128::from(bytes[idx] - b'0'))?;
        if whole > MAX_NANOS {
            return None;
        }
        idx += 1;
        digits += 1;
    }

    let mut fraction: u128 = 0;
    let mut scale: u128 = 1;
    if idx < bytes.len() && bytes[idx] == b'.' {
        idx += 1;
        let mut kept = 0;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            if kept < MAX_FRACTION_DIGITS {
                fraction = fraction * 10 + u128::from(bytes[idx] - b'0');
                scale *= 10;
                kept += 1;
            }
            idx += 1;
            digits += 1;
        }
    }

    if digits == 0 {
        return None;
    }
    Some((whole, fraction, scale, &input[idx..]))
}

fn split_unit(input: &str) -> Option<(&str, &str)> {
    let end = input
        .char_indices()
        .find(|(_, c)| *c == '.' || c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    Some((&input[..end], &input[end..]))
}

fn unit_nanos(unit: &str) -> Option<u128> {
    NANOS_PER_UNIT
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, nanos)| *nanos)
}

/// Parses the boolean spellings accepted on the command line.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
