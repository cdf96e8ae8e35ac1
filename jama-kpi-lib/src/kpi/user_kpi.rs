use serde::Serialize;

/// Productivity and quality figures for one user over one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserKpi {
    pub testrun_count: u64,
    pub defect_count: u64,

    /// Number of distinct execution dates among the user's test runs.
    pub distinct_days: u64,

    /// Test runs per active day, rounded to two decimals.
    pub productivity: f64,

    /// Defects per test run, rounded to two decimals.
    pub defect_rate: f64,
}

impl UserKpi {
    /// Derive the rates from raw counts. Both denominators are floored at one.
    #[must_use]
    pub fn from_counts(testrun_count: u64, defect_count: u64, distinct_days: u64) -> Self {
        Self {
            testrun_count,
            defect_count,
            distinct_days,
            productivity: rounded_ratio(testrun_count, distinct_days.max(1)),
            defect_rate: rounded_ratio(defect_count, testrun_count.max(1)),
        }
    }
}

/// `numerator / denominator` rounded half-up to two decimals.
///
/// The rounding happens in integer arithmetic so ties such as `1/8 = 0.125` round up instead of
/// landing on whichever side the nearest `f64` happens to fall.
#[expect(clippy::cast_precision_loss, reason = "Hundredths of realistic counts are far below 2^52")]
fn rounded_ratio(numerator: u64, denominator: u64) -> f64 {
    debug_assert!(denominator > 0);
    let numerator = u128::from(numerator);
    let denominator = u128::from(denominator);
    let hundredths = (numerator * 200 + denominator) / (denominator * 2);
    hundredths as f64 / 100.0
}
