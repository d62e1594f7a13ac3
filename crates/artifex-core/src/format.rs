//! Display formatting for sizes, counts and dates.

use std::fmt;

use chrono::DateTime;
use chrono::Utc;

const SI_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// A value rendered for people.
///
/// ```
/// use artifex_core::DisplayValue;
///
/// assert_eq!(DisplayValue::Bytes(10_000).to_string(), "10 kB");
/// assert_eq!(DisplayValue::Count(1_234_567).to_string(), "1,234,567");
/// assert_eq!(DisplayValue::NullableCount(None).to_string(), "none");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayValue {
    /// A byte size, shown with SI units.
    Bytes(u64),
    /// A count, shown with thousands separators.
    Count(i64),
    /// A count that may be absent.
    NullableCount(Option<i64>),
    /// A point in time, shown as `YYYY-MM-DD`.
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.write_str(&si_bytes(*bytes)),
            Self::Count(count) | Self::NullableCount(Some(count)) => {
                f.write_str(&thousands(*count))
            }
            Self::NullableCount(None) => f.write_str("none"),
            Self::Timestamp(at) => write!(f, "{}", at.format("%Y-%m-%d")),
        }
    }
}

/// `1500` becomes `1.5 kB`, `82854982` becomes `83 MB`.
fn si_bytes(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{bytes} B");
    }
    let mut scaled = bytes as f64;
    let mut unit = 0;
    while scaled >= 1000.0 && unit < SI_UNITS.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
    }
    let mut rounded = round_for_display(scaled);
    // Rounding can carry into the next unit: 999.95 kB is 1.0 MB.
    if rounded >= 1000.0 && unit < SI_UNITS.len() - 1 {
        rounded = round_for_display(rounded / 1000.0);
        unit += 1;
    }
    if rounded < 10.0 {
        format!("{rounded:.1} {}", SI_UNITS[unit])
    } else {
        format!("{rounded:.0} {}", SI_UNITS[unit])
    }
}

/// One decimal below ten, whole numbers above.
fn round_for_display(value: f64) -> f64 {
    let tenths = (value * 10.0 + 0.5).floor() / 10.0;
    if tenths < 10.0 {
        tenths
    } else {
        (value + 0.5).floor()
    }
}

fn thousands(count: i64) -> String {
    let digits = count.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if count < 0 {
        out.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}
