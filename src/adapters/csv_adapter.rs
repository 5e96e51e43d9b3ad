//! CSV file data adapter.
//!
//! One file per instrument, `<base>/<CODE>.csv`, with a header row naming at
//! least `date` and `close` (any order, any case). An `open` column is
//! optional and its cells may be empty. An empty `close` cell is a missing
//! observation.
//!
//! Rows are returned in file order; ordering problems surface later as
//! alignment errors rather than being silently sorted away.

use crate::domain::error::ExposureError;
use crate::domain::market::{Instrument, RawBar};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    open: Option<usize>,
    close: usize,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, instrument: Instrument) -> PathBuf {
        self.base_path.join(format!("{}.csv", instrument.code()))
    }

    fn read_all(&self, instrument: Instrument) -> Result<Option<Vec<RawBar>>, ExposureError> {
        let path = self.csv_path(instrument);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| ExposureError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| ExposureError::Data {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let columns = locate_columns(headers).ok_or_else(|| ExposureError::Data {
            reason: format!("{} needs date and close columns", path.display()),
        })?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| ExposureError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            bars.push(parse_row(&record, &columns)?);
        }

        Ok(Some(bars))
    }
}

fn locate_columns(headers: &csv::StringRecord) -> Option<Columns> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    Some(Columns {
        date: find("date")?,
        open: find("open"),
        close: find("close")?,
    })
}

fn parse_row(record: &csv::StringRecord, columns: &Columns) -> Result<RawBar, ExposureError> {
    let date_str = record.get(columns.date).ok_or_else(|| ExposureError::Data {
        reason: "missing date column".into(),
    })?;
    let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
        ExposureError::Data {
            reason: format!("invalid date format '{}': {}", date_str, e),
        }
    })?;

    let open = match columns.open.and_then(|i| record.get(i)).map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(parse_number(s, "open")?),
    };

    let close = match record.get(columns.close).map(str::trim) {
        None | Some("") => None,
        Some(s) => Some(parse_number(s, "close")?),
    };

    Ok(RawBar { date, open, close })
}

fn parse_number(s: &str, column: &str) -> Result<f64, ExposureError> {
    s.parse().map_err(|e| ExposureError::Data {
        reason: format!("invalid {} value '{}': {}", column, s, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        instrument: Instrument,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RawBar>, ExposureError> {
        let bars = self
            .read_all(instrument)?
            .ok_or_else(|| ExposureError::missing_field(instrument.code()))?;

        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn get_data_range(
        &self,
        instrument: Instrument,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ExposureError> {
        let Some(bars) = self.read_all(instrument)? else {
            return Ok(None);
        };
        let min = bars.iter().map(|b| b.date).min();
        let max = bars.iter().map(|b| b.date).max();
        Ok(min.zip(max).map(|(lo, hi)| (lo, hi, bars.len())))
    }
}
