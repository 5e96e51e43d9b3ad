//! Pointwise combinations of two aligned series.
//!
//! RATIO[i] = A[i] / B[i], missing when B[i] == 0
//! DIFF[i]  = A[i] - B[i]
//! Either operand missing makes the slot missing, as does a result that is
//! not a finite number. Both inputs must share one date index (frame columns
//! always do).

use crate::domain::time_series::TimeSeries;

pub fn rolling_ratio(a: &TimeSeries, b: &TimeSeries) -> TimeSeries {
    combine(a, b, |x, y| if y == 0.0 { None } else { Some(x / y) })
}

pub fn rolling_difference(a: &TimeSeries, b: &TimeSeries) -> TimeSeries {
    combine(a, b, |x, y| Some(x - y))
}

fn combine(a: &TimeSeries, b: &TimeSeries, op: impl Fn(f64, f64) -> Option<f64>) -> TimeSeries {
    debug_assert_eq!(a.dates(), b.dates());

    let out = a
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| match (p.value, b.value(i)) {
            (Some(x), Some(y)) => op(x, y),
            _ => None,
        })
        .collect();

    TimeSeries::on_index(&a.dates(), out)
}
