#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use exposure::domain::error::ExposureError;
use exposure::domain::frame::{AlignedFrame, align};
use exposure::domain::market::{Field, Instrument, RawBar};
use exposure::domain::pipeline::{DEFAULT_TOP_TRADES, ExposureConfig};
use exposure::domain::signal::SignalSystem;
use exposure::domain::time_series::SeriesPoint;
use exposure::ports::data_port::DataPort;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

pub const SPX_LEVEL: f64 = 4500.0;
pub const NYSE_HI_LEVEL: f64 = 50.0;
pub const NYSE_LO_LEVEL: f64 = 50.0;
pub const VIX_LEVEL: f64 = 15.0;
pub const VIX3M_LEVEL: f64 = 17.0;
pub const PUT_CALL_LEVEL: f64 = 0.80;

pub struct MockDataPort {
    pub data: HashMap<Instrument, Vec<RawBar>>,
    pub errors: HashMap<Instrument, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, instrument: Instrument, bars: Vec<RawBar>) -> Self {
        self.data.insert(instrument, bars);
        self
    }

    pub fn with_closes(self, instrument: Instrument, closes: &[f64]) -> Self {
        self.with_bars(instrument, bars(closes))
    }

    pub fn with_error(mut self, instrument: Instrument, reason: &str) -> Self {
        self.errors.insert(instrument, reason.to_string());
        self
    }

    pub fn without(mut self, instrument: Instrument) -> Self {
        self.data.remove(&instrument);
        self
    }

    /// Writes one `<CODE>.csv` per instrument held.
    pub fn write_csv_dir(&self, dir: &Path) {
        for (instrument, bars) in &self.data {
            let mut content = String::from("date,open,close\n");
            for b in bars {
                let open = b.open.map(|o| o.to_string()).unwrap_or_default();
                let close = b.close.map(|c| c.to_string()).unwrap_or_default();
                content.push_str(&format!("{},{},{}\n", b.date, open, close));
            }
            fs::write(dir.join(format!("{}.csv", instrument.code())), content).unwrap();
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        instrument: Instrument,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RawBar>, ExposureError> {
        if let Some(reason) = self.errors.get(&instrument) {
            return Err(ExposureError::Data {
                reason: reason.clone(),
            });
        }
        let bars = self
            .data
            .get(&instrument)
            .ok_or_else(|| ExposureError::missing_field(instrument.code()))?;
        Ok(bars
            .iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .cloned()
            .collect())
    }

    fn get_data_range(
        &self,
        instrument: Instrument,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ExposureError> {
        match self.data.get(&instrument) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// The i-th session of the test calendar.
pub fn day(i: usize) -> NaiveDate {
    date("2023-01-02") + Days::new(i as u64)
}

pub fn bars(closes: &[f64]) -> Vec<RawBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| RawBar::new(day(i), None, Some(c)))
        .collect()
}

/// All six feeds flat for `len` sessions; no system fires on it.
pub fn flat_market(len: usize) -> MockDataPort {
    let spx: Vec<RawBar> = (0..len)
        .map(|i| RawBar::new(day(i), Some(SPX_LEVEL - 1.0), Some(SPX_LEVEL)))
        .collect();
    MockDataPort::new()
        .with_bars(Instrument::Spx, spx)
        .with_closes(Instrument::NyseHi, &vec![NYSE_HI_LEVEL; len])
        .with_closes(Instrument::NyseLo, &vec![NYSE_LO_LEVEL; len])
        .with_closes(Instrument::Vix, &vec![VIX_LEVEL; len])
        .with_closes(Instrument::Vix3m, &vec![VIX3M_LEVEL; len])
        .with_closes(Instrument::PutCall, &vec![PUT_CALL_LEVEL; len])
}

pub fn sample_config(len: usize, systems: &[SignalSystem]) -> ExposureConfig {
    ExposureConfig {
        start_date: day(0),
        end_date: day(len.saturating_sub(1)),
        systems: systems.to_vec(),
        top_trades: DEFAULT_TOP_TRADES,
        pseudo_return_seed: 0,
    }
}

/// Frame from per-field values on the test calendar.
pub fn frame_from(fields: &[(Field, Vec<Option<f64>>)]) -> AlignedFrame {
    let map: BTreeMap<String, Vec<SeriesPoint>> = fields
        .iter()
        .map(|(field, values)| {
            let points = values
                .iter()
                .enumerate()
                .map(|(i, &v)| SeriesPoint::new(day(i), v))
                .collect();
            (field.name().to_string(), points)
        })
        .collect();
    align(map).unwrap()
}

pub fn present(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Put/call closes whose 10-day mean reads 0.90, 0.91, 0.93, 0.94 on
/// sessions 9 through 12.
pub fn put_call_crossing_closes() -> Vec<f64> {
    let mut closes = vec![0.90; 10];
    closes.extend_from_slice(&[1.00, 1.10, 1.00]);
    closes
}
