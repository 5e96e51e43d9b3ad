//! Recursive smoothed RSI.
//!
//! A single stateful scan over the whole series; there is no seed window.
//! Both running averages start at zero and every price change from index 1
//! onward is folded in:
//!
//! - up = max(diff, 0), down = max(-diff, 0)
//! - P = ((n-1)*P + up) / n
//! - N = ((n-1)*N + down) / n
//!
//! RSI[i] = 100 * P / (P + N), or 0 when P + N == 0.
//! Warmup: slots with i < n are missing.
//!
//! A change with a missing endpoint counts as a flat move, so both averages
//! decay. So does a change too large to represent. A slot whose own price is
//! missing reports missing.

use crate::domain::time_series::{TimeSeries, finite};

pub fn recursive_smoothed_rsi(prices: &TimeSeries, period: usize) -> TimeSeries {
    let values = prices.values();
    let dates = prices.dates();

    if period == 0 {
        return TimeSeries::on_index(&dates, vec![None; values.len()]);
    }

    let n = period as f64;
    let mut avg_up = 0.0;
    let mut avg_down = 0.0;
    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if i >= 1 {
            let diff = match (prices.previous(i), values[i]) {
                (Some(prev), Some(curr)) => finite(curr - prev).unwrap_or(0.0),
                _ => 0.0,
            };
            let up = diff.max(0.0);
            let down = (-diff).max(0.0);
            avg_up = ((n - 1.0) * avg_up + up) / n;
            avg_down = ((n - 1.0) * avg_down + down) / n;
        }

        let rsi = if i < period || values[i].is_none() {
            None
        } else if avg_up + avg_down != 0.0 {
            Some(100.0 * avg_up / (avg_up + avg_down))
        } else {
            Some(0.0)
        };
        out.push(rsi);
    }

    TimeSeries::on_index(&dates, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time_series::SeriesPoint;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    fn make_series(prices: &[f64]) -> TimeSeries {
        make_optional(&prices.iter().map(|&p| Some(p)).collect::<Vec<_>>())
    }

    fn make_optional(prices: &[Option<f64>]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &v)| SeriesPoint::new(start + chrono::Days::new(i as u64), v))
            .collect();
        TimeSeries::new(points).unwrap()
    }

    #[test]
    fn rsi_empty_series() {
        let out = recursive_smoothed_rsi(&make_series(&[]), 5);
        assert!(out.is_empty());
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (0..10).map(|i| 20.0 + (i % 3) as f64).collect();
        let out = recursive_smoothed_rsi(&make_series(&prices), 5);

        assert_eq!(out.len(), 10);
        for i in 0..5 {
            assert_eq!(out.value(i), None, "slot {} should be missing", i);
        }
        for i in 5..10 {
            assert!(out.value(i).is_some(), "slot {} should be present", i);
        }
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..8).map(|i| 15.0 + i as f64).collect();
        let out = recursive_smoothed_rsi(&make_series(&prices), 5);
        assert_abs_diff_eq!(out.value(7).unwrap(), 100.0, epsilon = 1e-12);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (0..8).map(|i| 40.0 - i as f64).collect();
        let out = recursive_smoothed_rsi(&make_series(&prices), 5);
        assert_abs_diff_eq!(out.value(7).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rsi_flat_prices_is_0() {
        let out = recursive_smoothed_rsi(&make_series(&[20.0; 8]), 5);
        assert_eq!(out.value(6), Some(0.0));
    }

    #[test]
    fn rsi_known_recursion() {
        // period 2: each step halves the old average and adds half the move
        // +2: P=1,   N=0
        // -1: P=0.5, N=0.5
        // +3: P=1.75,N=0.25
        let out = recursive_smoothed_rsi(&make_series(&[10.0, 12.0, 11.0, 14.0]), 2);

        assert_eq!(out.value(0), None);
        assert_eq!(out.value(1), None);
        assert_abs_diff_eq!(out.value(2).unwrap(), 50.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out.value(3).unwrap(), 87.5, epsilon = 1e-12);
    }

    #[test]
    fn rsi_remembers_history_beyond_period() {
        // Same last five moves, different early history.
        let a = make_series(&[10.0, 20.0, 20.0, 21.0, 20.0, 21.0, 20.0, 21.0]);
        let b = make_series(&[20.0, 10.0, 10.0, 11.0, 10.0, 11.0, 10.0, 11.0]);
        let ra = recursive_smoothed_rsi(&a, 3).value(7).unwrap();
        let rb = recursive_smoothed_rsi(&b, 3).value(7).unwrap();
        assert!(ra > rb, "{} should exceed {}", ra, rb);
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (0..40)
            .map(|i| 20.0 + ((i * 7) % 11) as f64 - 5.0)
            .collect();
        let out = recursive_smoothed_rsi(&make_series(&prices), 5);

        for v in out.values().into_iter().flatten() {
            assert!((-1e-9..=100.0 + 1e-9).contains(&v), "RSI {} out of range", v);
        }
    }

    #[test]
    fn rsi_leading_missing_prices() {
        let out = recursive_smoothed_rsi(
            &make_optional(&[None, None, Some(10.0), Some(11.0), Some(12.0), Some(13.0)]),
            2,
        );
        assert_eq!(out.value(2), Some(0.0));
        assert_abs_diff_eq!(out.value(5).unwrap(), 100.0, epsilon = 1e-12);
    }

    #[test]
    fn rsi_own_price_missing_reports_missing() {
        let out = recursive_smoothed_rsi(
            &make_optional(&[Some(10.0), Some(11.0), Some(12.0), None, Some(13.0)]),
            2,
        );
        assert_eq!(out.value(3), None);
        assert!(out.value(4).is_some());
    }

    #[test]
    fn rsi_zero_period() {
        let out = recursive_smoothed_rsi(&make_series(&[1.0, 2.0, 3.0]), 0);
        assert_eq!(out.len(), 3);
        assert_eq!(out.missing_count(), 3);
    }

    #[test]
    fn rsi_state_is_local_to_each_call() {
        let s = make_series(&[10.0, 12.0, 11.0, 14.0, 13.0, 15.0]);
        let first = recursive_smoothed_rsi(&s, 3);
        let second = recursive_smoothed_rsi(&s, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn rsi_infinite_price_is_missing_and_state_recovers() {
        let with_inf = recursive_smoothed_rsi(
            &make_optional(&[
                Some(10.0),
                Some(f64::INFINITY),
                Some(12.0),
                Some(11.0),
                Some(13.0),
            ]),
            2,
        );
        let with_gap = recursive_smoothed_rsi(
            &make_optional(&[Some(10.0), None, Some(12.0), Some(11.0), Some(13.0)]),
            2,
        );

        assert_eq!(with_inf, with_gap);
        for i in 2..5 {
            let v = with_inf.value(i).unwrap();
            assert!(v.is_finite(), "slot {} is {}", i, v);
        }
    }

    #[test]
    fn rsi_overflowing_change_is_a_flat_move() {
        let out = recursive_smoothed_rsi(&make_series(&[-f64::MAX, f64::MAX, f64::MAX, 1.0]), 2);
        assert_eq!(out.value(2), Some(0.0));
        assert_abs_diff_eq!(out.value(3).unwrap(), 0.0, epsilon = 1e-12);
    }
}
