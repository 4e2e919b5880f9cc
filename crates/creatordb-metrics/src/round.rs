//! Fixed-decimal rounding shared by the metric calculators.

/// Round to 2 decimal places (engagement rates, ratios).
#[must_use]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 1 decimal place (trend change, campaign scores).
#[must_use]
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
