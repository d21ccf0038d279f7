//! Seven-day forecast by linear extrapolation from today's readings
//!
//! Temperature rises by one degree per day and radiation by half a unit per
//! day. Values are carried as one-decimal strings, with unparseable input
//! turning into `NaN` rather than an error.

use serde::Serialize;

use crate::condition::{classify, Condition};

/// Number of entries in a forecast: today plus six days ahead
pub const FORECAST_DAYS: usize = 7;

const TEMPERATURE_STEP: f64 = 1.0;
const RADIATION_STEP: f64 = 0.5;

/// Projected values for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastEntry {
    pub temperature: String,
    pub radiation: String,
}

impl ForecastEntry {
    pub fn new(temperature: f64, radiation: f64) -> Self {
        Self {
            temperature: format_one_decimal(temperature),
            radiation: format_one_decimal(radiation),
        }
    }

    /// Condition derived from this entry's own values
    pub fn condition(&self) -> Condition {
        classify(
            parse_float(&self.temperature),
            parse_float(&self.radiation),
        )
    }
}

/// Compute today's entry and the six following days.
///
/// Index 0 is today; index `n` is `n` days ahead.
pub fn forecast(temperature: f64, radiation: f64) -> [ForecastEntry; FORECAST_DAYS] {
    std::array::from_fn(|day| {
        let offset = day as f64;
        ForecastEntry::new(
            temperature + TEMPERATURE_STEP * offset,
            radiation + RADIATION_STEP * offset,
        )
    })
}

/// The forecast currently shown: nothing yet, or one complete computation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ForecastSet {
    #[default]
    Loading,
    Ready([ForecastEntry; FORECAST_DAYS]),
}

impl ForecastSet {
    /// Build a complete set from the raw temperature and radiation readings
    pub fn from_readings(temperature: &str, radiation: &str) -> Self {
        ForecastSet::Ready(forecast(parse_float(temperature), parse_float(radiation)))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ForecastSet::Loading)
    }

    pub fn entries(&self) -> Option<&[ForecastEntry; FORECAST_DAYS]> {
        match self {
            ForecastSet::Loading => None,
            ForecastSet::Ready(entries) => Some(entries),
        }
    }

    pub fn today(&self) -> Option<&ForecastEntry> {
        self.entries().map(|e| &e[0])
    }
}

/// Key used for a day offset: `today`, `day_1` .. `day_6`
pub fn day_key(offset: usize) -> String {
    if offset == 0 {
        "today".to_string()
    } else {
        format!("day_{}", offset)
    }
}

/// Parse the longest numeric prefix of `input`, or `NaN` if there is none.
///
/// Leading whitespace is skipped and trailing text such as units is ignored,
/// so `"23.5 C"` yields 23.5.
pub fn parse_float(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        digits += j - frac_start;
        if digits > 0 {
            end = j;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut j = end + 1;
        if j < len && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// Format with exactly one fractional digit, the way `Number.toFixed(1)` does.
///
/// The exact binary value is rounded, so `28.45` (stored as 28.4499...)
/// gives `"28.4"`. Only exact ties such as `0.25` round away from zero.
pub fn format_one_decimal(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // covers -0.0
        return "0.0".to_string();
    }
    if is_exact_tie(value) {
        return format!("{:.1}", (value * 10.0).round() / 10.0);
    }
    format!("{:.1}", value)
}

/// True when `value` lies exactly halfway between two one-decimal numbers.
///
/// A binary float only hits such a midpoint at an odd number of quarters
/// (`x.25`, `x.75`).
fn is_exact_tie(value: f64) -> bool {
    let quarters = value * 4.0;
    quarters.fract() == 0.0 && quarters % 2.0 != 0.0
}
