//! IQR outlier filter over run durations

use super::HistoricalRecord;

/// Smallest batch the filter will touch. Below this quartiles are meaningless.
const MIN_FILTER_BATCH: usize = 4;

/// Drop records whose duration falls outside `[q1 - f*iqr, q3 + f*iqr]`.
///
/// Quartiles are positional (`sorted[n/4]`, `sorted[3n/4]`), not
/// interpolated. Survivors keep their original order.
pub fn filter_outliers_iqr(records: &[HistoricalRecord], factor: f64) -> Vec<HistoricalRecord> {
    if records.len() < MIN_FILTER_BATCH {
        return records.to_vec();
    }

    let mut durations: Vec<f64> = records.iter().map(|r| r.duration_ms).collect();
    durations.sort_by(f64::total_cmp);

    let n = durations.len();
    let q1 = durations[n / 4];
    let q3 = durations[3 * n / 4];
    let iqr = q3 - q1;
    let lower = q1 - factor * iqr;
    let upper = q3 + factor * iqr;

    records
        .iter()
        .filter(|r| lower <= r.duration_ms && r.duration_ms <= upper)
        .copied()
        .collect()
}
