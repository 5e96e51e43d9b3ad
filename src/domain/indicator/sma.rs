//! Simple moving average.
//!
//! SMA(n)[i] = (V[i-n+1] + ... + V[i]) / n
//! Warmup: first (n-1) slots are missing, as is any slot whose window
//! contains a missing value.

use crate::domain::time_series::TimeSeries;

pub fn rolling_mean(series: &TimeSeries, window: usize) -> TimeSeries {
    let values = series.values();
    let dates = series.dates();

    if window == 0 {
        return TimeSeries::on_index(&dates, vec![None; values.len()]);
    }

    let out = (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let sum: Option<f64> = values[i + 1 - window..=i].iter().copied().sum();
            sum.map(|s| s / window as f64)
        })
        .collect();

    TimeSeries::on_index(&dates, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time_series::SeriesPoint;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_series(values: &[Option<f64>]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &v)| SeriesPoint::new(start + chrono::Days::new(i as u64), v))
            .collect();
        TimeSeries::new(points).unwrap()
    }

    #[test]
    fn sma_warmup() {
        let s = make_series(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        let out = rolling_mean(&s, 3);

        assert_eq!(out.len(), 4);
        assert_eq!(out.value(0), None);
        assert_eq!(out.value(1), None);
        assert!(out.value(2).is_some());
    }

    #[test]
    fn sma_known_values() {
        let s = make_series(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        let out = rolling_mean(&s, 3);

        assert_relative_eq!(out.value(2).unwrap(), 2.0);
        assert_relative_eq!(out.value(3).unwrap(), 3.0);
    }

    #[test]
    fn sma_missing_value_poisons_window() {
        let s = make_series(&[Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)]);
        let out = rolling_mean(&s, 2);

        assert_eq!(out.value(1), None);
        assert_eq!(out.value(2), None);
        assert_relative_eq!(out.value(3).unwrap(), 3.5);
        assert_relative_eq!(out.value(4).unwrap(), 4.5);
    }

    #[test]
    fn sma_window_1_is_identity() {
        let s = make_series(&[Some(7.0), Some(8.0)]);
        let out = rolling_mean(&s, 1);
        assert_eq!(out.values(), vec![Some(7.0), Some(8.0)]);
    }

    #[test]
    fn sma_window_0_is_all_missing() {
        let s = make_series(&[Some(7.0), Some(8.0)]);
        let out = rolling_mean(&s, 0);
        assert_eq!(out.len(), 2);
        assert_eq!(out.missing_count(), 2);
    }

    #[test]
    fn sma_window_longer_than_series() {
        let s = make_series(&[Some(1.0), Some(2.0)]);
        let out = rolling_mean(&s, 220);
        assert_eq!(out.missing_count(), 2);
    }

    #[test]
    fn sma_keeps_dates() {
        let s = make_series(&[Some(1.0), Some(2.0), Some(3.0)]);
        let out = rolling_mean(&s, 2);
        assert_eq!(out.dates(), s.dates());
    }
}
