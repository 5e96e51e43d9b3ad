//! Rolling least-squares regression, reported as net change over the window.
//!
//! For each slot i >= n-1 an ordinary least-squares line is fitted to the
//! trailing n values against x = 0..n-1 (positions, not calendar days):
//!
//!   slope = sum((x - x_mean) * (y - y_mean)) / sum((x - x_mean)^2)
//!   LINREG(n)[i] = slope * (n - 1)
//!
//! A window containing any missing value yields a missing slot; there are
//! no partial fits. A fit that overflows is missing too. A one-point window
//! has zero net change.

use crate::domain::time_series::TimeSeries;

pub fn rolling_linreg_slope(series: &TimeSeries, window: usize) -> TimeSeries {
    let values = series.values();
    let dates = series.dates();

    if window == 0 {
        return TimeSeries::on_index(&dates, vec![None; values.len()]);
    }

    let x_mean = (window - 1) as f64 / 2.0;
    let sxx: f64 = (0..window).map(|x| (x as f64 - x_mean).powi(2)).sum();

    let out = (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let y: Option<Vec<f64>> = values[i + 1 - window..=i].iter().copied().collect();
            let y = y?;
            if window == 1 {
                return Some(0.0);
            }
            Some(ols_slope(&y, x_mean, sxx) * (window - 1) as f64)
        })
        .collect();

    TimeSeries::on_index(&dates, out)
}

fn ols_slope(y: &[f64], x_mean: f64, sxx: f64) -> f64 {
    let y_mean = y.iter().sum::<f64>() / y.len() as f64;
    let sxy: f64 = y
        .iter()
        .enumerate()
        .map(|(x, &v)| (x as f64 - x_mean) * (v - y_mean))
        .sum();
    sxy / sxx
}
