//! Dated scalar series with explicit missing values.
//!
//! A series never holds NaN or an infinity: both constructors store any
//! non-finite value as missing.

use crate::domain::error::ExposureError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// `Some(v)` when `v` is a real number, `None` for NaN and the infinities.
pub fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Ordered series; dates are strictly increasing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    points: Vec<SeriesPoint>,
}

impl TimeSeries {
    /// Builds a series, rejecting duplicate or out-of-order dates.
    pub fn new(points: Vec<SeriesPoint>) -> Result<Self, ExposureError> {
        check_strictly_increasing("series", points.iter().map(|p| p.date))?;
        let points = points
            .into_iter()
            .map(|p| SeriesPoint::new(p.date, p.value.and_then(finite)))
            .collect();
        Ok(Self { points })
    }

    /// Builds a series on an index that is already known to be ordered.
    pub(crate) fn on_index(dates: &[NaiveDate], values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        let points = dates
            .iter()
            .zip(values)
            .map(|(&date, value)| SeriesPoint::new(date, value.and_then(finite)))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Value at `index`; `None` when missing or out of range.
    pub fn value(&self, index: usize) -> Option<f64> {
        self.points.get(index).and_then(|p| p.value)
    }

    /// Value one position earlier (`shift(1)`); `None` at index 0.
    pub fn previous(&self, index: usize) -> Option<f64> {
        index.checked_sub(1).and_then(|i| self.value(i))
    }

    pub fn missing_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_none()).count()
    }
}

pub(crate) fn check_strictly_increasing(
    name: &str,
    dates: impl IntoIterator<Item = NaiveDate>,
) -> Result<(), ExposureError> {
    let mut prev: Option<NaiveDate> = None;
    for date in dates {
        if let Some(p) = prev {
            if date <= p {
                return Err(ExposureError::alignment(
                    name,
                    format!("dates not strictly increasing: {} follows {}", date, p),
                ));
            }
        }
        prev = Some(date);
    }
    Ok(())
}
