//! CSV report adapter implementing ReportPort.
//!
//! Writes three files into the output directory:
//!
//! - `frame.csv`: the aligned frame, one column per field
//! - `exposure.csv`: date, exposure_pct, active_systems
//! - `trades.csv`: system, date, status, spx_close, synthetic_return_pct
//!
//! Missing values are written as empty cells.

use crate::domain::error::ExposureError;
use crate::domain::pipeline::ExposureReport;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

pub const FRAME_FILE: &str = "frame.csv";
pub const EXPOSURE_FILE: &str = "exposure.csv";
pub const TRADES_FILE: &str = "trades.csv";

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn report_err(file: &str, e: impl std::fmt::Display) -> ExposureError {
    ExposureError::Report {
        reason: format!("failed to write {}: {}", file, e),
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_frame(report: &ExposureReport, dir: &Path) -> Result<(), ExposureError> {
    let mut wtr = csv::Writer::from_path(dir.join(FRAME_FILE)).map_err(|e| report_err(FRAME_FILE, e))?;

    let names: Vec<&str> = report.frame.field_names().collect();
    let mut header = vec!["date"];
    header.extend(names.iter().copied());
    wtr.write_record(&header)
        .map_err(|e| report_err(FRAME_FILE, e))?;

    for (i, date) in report.frame.dates().iter().enumerate() {
        let mut row = vec![date.to_string()];
        row.extend(
            names
                .iter()
                .map(|name| cell(report.frame.column(name).and_then(|s| s.value(i)))),
        );
        wtr.write_record(&row)
            .map_err(|e| report_err(FRAME_FILE, e))?;
    }

    wtr.flush().map_err(|e| report_err(FRAME_FILE, e))
}

fn write_exposure(report: &ExposureReport, dir: &Path) -> Result<(), ExposureError> {
    let mut wtr =
        csv::Writer::from_path(dir.join(EXPOSURE_FILE)).map_err(|e| report_err(EXPOSURE_FILE, e))?;

    wtr.write_record(["date", "exposure_pct", "active_systems"])
        .map_err(|e| report_err(EXPOSURE_FILE, e))?;
    for point in &report.exposure.points {
        wtr.write_record([
            point.date.to_string(),
            point.exposure_pct.to_string(),
            point.active_systems.to_string(),
        ])
        .map_err(|e| report_err(EXPOSURE_FILE, e))?;
    }

    wtr.flush().map_err(|e| report_err(EXPOSURE_FILE, e))
}

fn write_trades(report: &ExposureReport, dir: &Path) -> Result<(), ExposureError> {
    let mut wtr =
        csv::Writer::from_path(dir.join(TRADES_FILE)).map_err(|e| report_err(TRADES_FILE, e))?;

    wtr.write_record([
        "system",
        "date",
        "status",
        "spx_close",
        "synthetic_return_pct",
    ])
    .map_err(|e| report_err(TRADES_FILE, e))?;
    for trade in &report.trades {
        wtr.write_record([
            trade.system.name().to_string(),
            trade.date.to_string(),
            trade.status.to_string(),
            cell(trade.spx_close),
            format!("{:.2}", trade.pseudo_return.pct()),
        ])
        .map_err(|e| report_err(TRADES_FILE, e))?;
    }

    wtr.flush().map_err(|e| report_err(TRADES_FILE, e))
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, report: &ExposureReport, output: &Path) -> Result<(), ExposureError> {
        fs::create_dir_all(output).map_err(|e| ExposureError::Report {
            reason: format!("failed to create {}: {}", output.display(), e),
        })?;

        write_frame(report, output)?;
        write_exposure(report, output)?;
        write_trades(report, output)?;

        tracing::info!(
            dir = %output.display(),
            trades = report.trades.len(),
            "report written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::align;
    use crate::domain::market::Field;
    use crate::domain::pipeline::{DEFAULT_TOP_TRADES, ExposureConfig, run_exposure};
    use crate::domain::signal::SignalSystem;
    use crate::domain::time_series::SeriesPoint;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sample_report() -> ExposureReport {
        let mut fields = BTreeMap::new();
        let series = |vals: &[Option<f64>]| -> Vec<SeriesPoint> {
            vals.iter()
                .enumerate()
                .map(|(i, &v)| SeriesPoint::new(day(i as u32 + 1), v))
                .collect()
        };
        fields.insert(
            Field::SpxClose.name().to_string(),
            series(&[Some(100.0), Some(101.0), Some(102.0)]),
        );
        fields.insert(
            Field::SpxOpen.name().to_string(),
            series(&[None, Some(100.5), Some(101.5)]),
        );
        fields.insert(Field::NyseHi.name().to_string(), series(&[Some(5.0); 3]));
        fields.insert(Field::NyseLo.name().to_string(), series(&[Some(2.0); 3]));
        fields.insert(Field::VixClose.name().to_string(), series(&[Some(15.0); 3]));
        fields.insert(Field::Vix3mClose.name().to_string(), series(&[Some(16.0); 3]));
        fields.insert(
            Field::PutCallClose.name().to_string(),
            series(&[Some(0.8); 3]),
        );
        let frame = align(fields).unwrap();

        let config = ExposureConfig {
            start_date: day(1),
            end_date: day(3),
            systems: SignalSystem::ALL.to_vec(),
            top_trades: DEFAULT_TOP_TRADES,
            pseudo_return_seed: 0,
        };
        run_exposure(frame, &config).unwrap()
    }

    #[test]
    fn writes_all_three_files() {
        let dir = TempDir::new().unwrap();
        CsvReportAdapter::new()
            .write(&sample_report(), dir.path())
            .unwrap();

        for file in [FRAME_FILE, EXPOSURE_FILE, TRADES_FILE] {
            assert!(dir.path().join(file).exists(), "{} missing", file);
        }
    }

    #[test]
    fn frame_file_has_header_and_empty_cells_for_missing() {
        let dir = TempDir::new().unwrap();
        CsvReportAdapter::new()
            .write(&sample_report(), dir.path())
            .unwrap();

        let content = fs::read_to_string(dir.path().join(FRAME_FILE)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("date,"));
        assert!(lines[0].contains("SPX_Open"));

        let header: Vec<&str> = lines[0].split(',').collect();
        let open_col = header.iter().position(|h| *h == "SPX_Open").unwrap();
        let first_row: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(first_row[0], "2024-03-01");
        assert_eq!(first_row[open_col], "");
    }

    #[test]
    fn exposure_file_has_one_row_per_date() {
        // Three dates is too short for any system's warm-up.
        let dir = TempDir::new().unwrap();
        CsvReportAdapter::new()
            .write(&sample_report(), dir.path())
            .unwrap();

        let content = fs::read_to_string(dir.path().join(EXPOSURE_FILE)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "date,exposure_pct,active_systems");
        assert_eq!(lines[1], "2024-03-01,0,0");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn trades_file_header_only_when_nothing_fired() {
        let dir = TempDir::new().unwrap();
        CsvReportAdapter::new()
            .write(&sample_report(), dir.path())
            .unwrap();

        let content = fs::read_to_string(dir.path().join(TRADES_FILE)).unwrap();
        assert_eq!(
            content.trim_end(),
            "system,date,status,spx_close,synthetic_return_pct"
        );
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("reports").join("latest");
        CsvReportAdapter::new()
            .write(&sample_report(), &nested)
            .unwrap();
        assert!(nested.join(EXPOSURE_FILE).exists());
    }
}
