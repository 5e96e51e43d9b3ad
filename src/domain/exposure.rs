//! Exposure aggregation.
//!
//! Each enabled system that fires on a date contributes a fixed 20 % to that
//! date's recommended exposure. The sum is clamped to [0, 100].

use crate::domain::signal::{EvaluatedSignals, SignalSystem};
use chrono::NaiveDate;
use std::collections::BTreeSet;

pub const SYSTEM_WEIGHT_PCT: f64 = 20.0;
pub const MAX_EXPOSURE_PCT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposurePoint {
    pub date: NaiveDate,
    pub exposure_pct: f64,
    pub active_systems: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExposureSeries {
    pub points: Vec<ExposurePoint>,
}

impl ExposureSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The current recommendation.
    pub fn latest(&self) -> Option<&ExposurePoint> {
        self.points.last()
    }

    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].exposure_pct)
    }

    pub fn average_pct(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.exposure_pct).sum::<f64>() / self.points.len() as f64
    }
}

/// Sums the contributions of `enabled` systems per date.
///
/// Enabled systems that were not evaluated contribute nothing.
pub fn aggregate(enabled: &BTreeSet<SignalSystem>, evaluated: &EvaluatedSignals) -> ExposureSeries {
    let points = evaluated
        .dates
        .iter()
        .enumerate()
        .map(|(i, &date)| {
            let active_systems = enabled
                .iter()
                .filter_map(|s| evaluated.get(*s))
                .filter(|fired| fired.get(i).copied().unwrap_or(false))
                .count();
            let exposure_pct =
                (SYSTEM_WEIGHT_PCT * active_systems as f64).clamp(0.0, MAX_EXPOSURE_PCT);
            ExposurePoint {
                date,
                exposure_pct,
                active_systems,
            }
        })
        .collect();

    ExposureSeries { points }
}
