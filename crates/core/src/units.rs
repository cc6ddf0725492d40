// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable unit literals.
//!
//! Parsers for the literals accepted by the filter helpers:
//!
//! - Durations: `90s`, `1h30m`, `1.5h`, plus the coarse units `d` (24h),
//!   `M` (720h) and `Y` (8640h), e.g. `2d3M1Y1h`
//! - Byte sizes in IEC units: `512 B`, `1 KiB`, `1.5GiB`
//! - Calendar dates: `2024-01-31`
//!
//! And the inverse formatters used by list and delete output.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;

use crate::error::{Error, Result};

/// Hours in one coarse day.
pub const HOURS_PER_DAY: u64 = 24;
/// Hours in one coarse month (30 days).
pub const HOURS_PER_MONTH: u64 = HOURS_PER_DAY * 30;
/// Hours in one coarse year (12 coarse months, not a calendar year).
pub const HOURS_PER_YEAR: u64 = HOURS_PER_MONTH * 12;

pub const KIBIBYTE: u64 = 1024;
pub const MEBIBYTE: u64 = KIBIBYTE * 1024;
pub const GIBIBYTE: u64 = MEBIBYTE * 1024;
pub const TEBIBYTE: u64 = GIBIBYTE * 1024;
pub const PEBIBYTE: u64 = TEBIBYTE * 1024;
pub const EXBIBYTE: u64 = PEBIBYTE * 1024;

static COARSE_DURATION_RE: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"(\d+)(d|M|Y)") {
    Ok(re) => re,
    Err(_) => unreachable!("static regex pattern"),
});

static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(
        || match Regex::new(r"^(\d+(\.?\d+)?)\s?((Ki|Mi|Gi|Ti|Pi|Ei)?B)$") {
            Ok(re) => re,
            Err(_) => unreachable!("static regex pattern"),
        },
    );

const NANOS_PER_MICRO: u64 = 1_000;
const NANOS_PER_MILLI: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;
const NANOS_PER_MINUTE: u64 = NANOS_PER_SECOND * 60;
const NANOS_PER_HOUR: u64 = NANOS_PER_MINUTE * 60;

/// Largest magnitude representable as a signed nanosecond count.
const MAX_NANOS: u64 = 1 << 63;

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

/// Rewrite every `<int>d`, `<int>M` and `<int>Y` token into its hour count.
///
/// `"2d3M1Y1h"` becomes `"48h2160h8640h1h"`.
pub fn expand_coarse_units(input: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len() + 8);
    let mut last = 0;
    for caps in COARSE_DURATION_RE.captures_iter(input) {
        let (Some(whole), Some(num), Some(unit)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let count: u64 = num
            .as_str()
            .parse()
            .map_err(|_| Error::InvalidDuration(input.to_string()))?;
        let per_unit = match unit.as_str() {
            "d" => HOURS_PER_DAY,
            "M" => HOURS_PER_MONTH,
            _ => HOURS_PER_YEAR,
        };
        let hours = count
            .checked_mul(per_unit)
            .ok_or_else(|| Error::InvalidDuration(input.to_string()))?;
        out.push_str(&input[last..whole.start()]);
        out.push_str(&format!("{hours}h"));
        last = whole.end();
    }
    out.push_str(&input[last..]);
    Ok(out)
}

/// Parse a duration literal as accepted by the `Duration()` filter helper.
///
/// Coarse units are expanded first (see [`expand_coarse_units`]), then the
/// result is parsed by [`parse_std_duration`]. Errors quote the original input.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let expanded = expand_coarse_units(input)?;
    parse_std_duration(&expanded).map_err(|err| requote_duration_error(err, input))
}

fn requote_duration_error(err: Error, original: &str) -> Error {
    match err {
        Error::InvalidDuration(_) => Error::InvalidDuration(original.to_string()),
        Error::MissingDurationUnit(_) => Error::MissingDurationUnit(original.to_string()),
        Error::UnknownDurationUnit { unit, .. } => Error::UnknownDurationUnit {
            unit,
            input: original.to_string(),
        },
        other => other,
    }
}

/// Parse a standard duration string such as `300ms`, `-1.5h` or `2h45m`.
///
/// A duration is an optionally signed sequence of decimal numbers, each with
/// an optional fraction and a unit suffix. Valid units are `ns`, `us` (or
/// `µs`), `ms`, `s`, `m`, `h`. A bare `0` is accepted.
pub fn parse_std_duration(input: &str) -> Result<Duration> {
    let invalid = || Error::InvalidDuration(input.to_string());

    let mut s = input;
    let mut negative = false;
    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }

    if s == "0" {
        return Ok(Duration::zero());
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !s.is_empty() {
        if !s.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (whole, rest) = leading_int(s).ok_or_else(invalid)?;
        let has_whole = rest.len() != s.len();
        s = rest;

        let mut fraction = 0u64;
        let mut scale = 1.0f64;
        let mut has_fraction = false;
        if let Some(rest) = s.strip_prefix('.') {
            let (f, sc, rest_after) = leading_fraction(rest);
            has_fraction = rest_after.len() != rest.len();
            fraction = f;
            scale = sc;
            s = rest_after;
        }
        if !has_whole && !has_fraction {
            return Err(invalid());
        }

        let unit_end = s
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(s.len());
        if unit_end == 0 {
            return Err(Error::MissingDurationUnit(input.to_string()));
        }
        let unit = &s[..unit_end];
        s = &s[unit_end..];
        let per_unit = unit_nanos(unit).ok_or_else(|| Error::UnknownDurationUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        if whole > MAX_NANOS / per_unit {
            return Err(invalid());
        }
        let mut value = whole * per_unit;
        if fraction > 0 {
            value += (fraction as f64 * (per_unit as f64 / scale)) as u64;
            if value > MAX_NANOS {
                return Err(invalid());
            }
        }
        total = total.checked_add(value).ok_or_else(invalid)?;
        if total > MAX_NANOS {
            return Err(invalid());
        }
    }

    let nanos = if negative {
        // -2^63 is representable, +2^63 is not
        if total == MAX_NANOS {
            i64::MIN
        } else {
            -(total as i64)
        }
    } else {
        i64::try_from(total).map_err(|_| invalid())?
    };
    Ok(Duration::nanoseconds(nanos))
}

/// Consume leading ASCII digits. Returns `None` on overflow.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    for b in s[..end].bytes() {
        value = value.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
        if value > MAX_NANOS {
            return None;
        }
    }
    Some((value, &s[end..]))
}

/// Consume leading fraction digits, dropping precision past what fits.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut value: u64 = 0;
    let mut scale = 1.0f64;
    let mut overflow = false;
    for b in s[..end].bytes() {
        if overflow {
            continue;
        }
        match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
        {
            Some(v) if v <= MAX_NANOS => {
                value = v;
                scale *= 10.0;
            }
            _ => overflow = true,
        }
    }
    (value, scale, &s[end..])
}

/// Parse an IEC byte-size literal (`1 KiB`, `2.5GiB`, `300 B`) into bytes.
///
/// Decimal SI units such as `KB` are rejected.
pub fn parse_size(input: &str) -> Result<f64> {
    let unknown = || Error::UnknownSizePattern(input.to_string());
    let caps = SIZE_RE.captures(input).ok_or_else(unknown)?;
    let number: f64 = caps
        .get(1)
        .ok_or_else(unknown)?
        .as_str()
        .parse()
        .map_err(|_| unknown())?;
    let multiplier = match caps.get(4).map(|m| m.as_str()) {
        Some("Ki") => KIBIBYTE,
        Some("Mi") => MEBIBYTE,
        Some("Gi") => GIBIBYTE,
        Some("Ti") => TEBIBYTE,
        Some("Pi") => PEBIBYTE,
        Some("Ei") => EXBIBYTE,
        _ => 1,
    };
    Ok(number * multiplier as f64)
}

/// Parse a `YYYY-MM-DD` date as midnight UTC.
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let invalid = |reason: String| Error::InvalidDate {
        input: input.to_string(),
        reason,
    };

    let bytes = input.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.get(4) == Some(&b'-')
        && bytes.get(7) == Some(&b'-')
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(invalid("does not match the pattern".to_string()));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|e| invalid(e.to_string()))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Format a byte count with IEC units, e.g. `984 B` or `505.8 MiB`.
pub fn byte_count_iec(bytes: u64) -> String {
    if bytes < KIBIBYTE {
        return format!("{bytes} B");
    }
    let mut div = KIBIBYTE;
    let mut exp = 0;
    let mut n = bytes / KIBIBYTE;
    while n >= KIBIBYTE {
        div *= KIBIBYTE;
        exp += 1;
        n /= KIBIBYTE;
    }
    let prefix = ['K', 'M', 'G', 'T', 'P', 'E'][exp];
    format!("{:.1} {prefix}iB", bytes as f64 / div as f64)
}

/// Render a duration as words, e.g. `3 days 1 second`. Sub-second parts are dropped.
pub fn humanize_duration(duration: Duration) -> String {
    let total = duration.num_seconds();
    let chunks = [
        ("day", total / 86_400),
        ("hour", (total / 3_600) % 24),
        ("minute", (total / 60) % 60),
        ("second", total % 60),
    ];

    chunks
        .iter()
        .filter(|(_, amount)| *amount != 0)
        .map(|(name, amount)| {
            if *amount == 1 {
                format!("{amount} {name}")
            } else {
                format!("{amount} {name}s")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "units_tests.rs"]
mod tests;
