//! Aligned market frame and the shared date index.
//!
//! Every input field is reindexed onto the union of all input dates and
//! forward-filled from its most recent earlier observation. Nothing is ever
//! back-filled: slots before a field's first observation stay missing.

use crate::domain::error::ExposureError;
use crate::domain::market::{Field, Instrument, RawBar};
use crate::domain::time_series::{SeriesPoint, TimeSeries, check_strictly_increasing, finite};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFrame {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<String, TimeSeries>,
}

impl AlignedFrame {
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&TimeSeries> {
        self.columns.get(name)
    }

    pub fn require(&self, field: Field) -> Result<&TimeSeries, ExposureError> {
        self.column(field.name())
            .ok_or_else(|| ExposureError::missing_field(field.name()))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Aligns named raw series onto their union date index.
///
/// Fails atomically if any series is empty or not strictly increasing.
pub fn align(fields: BTreeMap<String, Vec<SeriesPoint>>) -> Result<AlignedFrame, ExposureError> {
    for (name, points) in &fields {
        if points.is_empty() {
            return Err(ExposureError::alignment(name.as_str(), "series is empty"));
        }
        check_strictly_increasing(name, points.iter().map(|p| p.date))?;
    }

    let dates: Vec<NaiveDate> = fields
        .values()
        .flat_map(|points| points.iter().map(|p| p.date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let columns = fields
        .into_iter()
        .map(|(name, points)| {
            let values = forward_fill(&dates, &points);
            (name, TimeSeries::on_index(&dates, values))
        })
        .collect();

    Ok(AlignedFrame { dates, columns })
}

fn forward_fill(index: &[NaiveDate], points: &[SeriesPoint]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(index.len());
    let mut cursor = 0;
    let mut last: Option<f64> = None;

    for &date in index {
        if cursor < points.len() && points[cursor].date == date {
            if let Some(v) = points[cursor].value.and_then(finite) {
                last = Some(v);
            }
            cursor += 1;
        }
        out.push(last);
    }

    out
}

/// Builds the market frame from the six required feeds.
///
/// `SPX` supplies both `SPX_Close` and `SPX_Open`; every other instrument
/// supplies its close only.
pub fn build_market_frame(
    feeds: &HashMap<Instrument, Vec<RawBar>>,
) -> Result<AlignedFrame, ExposureError> {
    let mut fields: BTreeMap<String, Vec<SeriesPoint>> = BTreeMap::new();

    for instrument in Instrument::ALL {
        let bars = feeds
            .get(&instrument)
            .ok_or_else(|| ExposureError::missing_field(instrument.code()))?;

        let closes = bars
            .iter()
            .map(|b| SeriesPoint::new(b.date, b.close_value()))
            .collect();
        fields.insert(instrument.close_field().name().to_string(), closes);

        if instrument == Instrument::Spx {
            let opens = bars
                .iter()
                .map(|b| SeriesPoint::new(b.date, b.open_value()))
                .collect();
            fields.insert(Field::SpxOpen.name().to_string(), opens);
        }
    }

    align(fields)
}
