//! Configuration validation.
//!
//! Checks for the `[exposure]` section. Each `validate_*` helper returns the
//! parsed value so the CLI builds its run config from the same checks.

use crate::domain::error::ExposureError;
use crate::domain::pipeline::DEFAULT_TOP_TRADES;
use crate::domain::signal::{SignalSystem, parse_systems};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const EXPOSURE_SECTION: &str = "exposure";
pub const REPORT_SECTION: &str = "report";
pub const DEFAULT_DATA_DIR: &str = "data";

fn invalid(key: &str, reason: &str) -> ExposureError {
    ExposureError::ConfigInvalid {
        section: EXPOSURE_SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Integer key that must parse when present.
fn read_int(config: &dyn ConfigPort, key: &str, default: i64) -> Result<i64, ExposureError> {
    match config.get_string(EXPOSURE_SECTION, key) {
        Some(raw) if raw.trim().parse::<i64>().is_err() => {
            Err(invalid(key, &format!("{} must be an integer", key)))
        }
        _ => Ok(config.get_int(EXPOSURE_SECTION, key, default)),
    }
}

pub fn validate_dates(config: &dyn ConfigPort) -> Result<(NaiveDate, NaiveDate), ExposureError> {
    let start_str = config.get_string(EXPOSURE_SECTION, "start_date");
    let end_str = config.get_string(EXPOSURE_SECTION, "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date > end_date {
        return Err(invalid("start_date", "start_date must not be after end_date"));
    }
    Ok((start_date, end_date))
}

fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, ExposureError> {
    match value {
        None => Err(ExposureError::ConfigMissing {
            section: EXPOSURE_SECTION.to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| invalid(field, &format!("invalid {} format, expected YYYY-MM-DD", field))),
    }
}

/// Enabled systems: an explicit `systems` list wins over `active_systems`.
pub fn validate_systems(config: &dyn ConfigPort) -> Result<Vec<SignalSystem>, ExposureError> {
    if let Some(raw) = config.get_string(EXPOSURE_SECTION, "systems") {
        if config.get_string(EXPOSURE_SECTION, "active_systems").is_some() {
            tracing::warn!("both systems and active_systems set; using systems");
        }
        let systems = parse_systems(&raw)?;
        if systems.is_empty() {
            return Err(invalid("systems", "systems must name at least one system"));
        }
        return Ok(systems);
    }

    let count = read_int(config, "active_systems", SignalSystem::ALL.len() as i64)?;
    active_count(count).map(SignalSystem::first)
}

/// Checks a count of systems to enable against the fixed system set.
pub fn active_count(count: i64) -> Result<usize, ExposureError> {
    let max = SignalSystem::ALL.len() as i64;
    if !(1..=max).contains(&count) {
        return Err(invalid(
            "active_systems",
            &format!("active_systems must be between 1 and {}", max),
        ));
    }
    Ok(count as usize)
}

pub fn validate_top_trades(config: &dyn ConfigPort) -> Result<usize, ExposureError> {
    let value = read_int(config, "top_trades", DEFAULT_TOP_TRADES as i64)?;
    if value < 1 {
        return Err(invalid("top_trades", "top_trades must be at least 1"));
    }
    Ok(value as usize)
}

pub fn validate_seed(config: &dyn ConfigPort) -> Result<u64, ExposureError> {
    let value = read_int(config, "pseudo_return_seed", 0)?;
    if value < 0 {
        return Err(invalid(
            "pseudo_return_seed",
            "pseudo_return_seed must be non-negative",
        ));
    }
    Ok(value as u64)
}
