//! End-to-end exposure run.
//!
//! feeds -> aligned frame -> system booleans -> {exposure series, trade log}
//!
//! `ExposureConfig` carries the run parameters.

use crate::domain::error::ExposureError;
use crate::domain::exposure::{ExposureSeries, aggregate};
use crate::domain::frame::{AlignedFrame, build_market_frame};
use crate::domain::market::{Instrument, RawBar};
use crate::domain::signal::{EvaluatedSignals, SignalSystem, evaluate_systems};
use crate::domain::trade::{TradeRecord, extract_seeded, most_recent};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

pub const DEFAULT_TOP_TRADES: usize = 10;

#[derive(Debug, Clone)]
pub struct ExposureConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub systems: Vec<SignalSystem>,
    pub top_trades: usize,
    pub pseudo_return_seed: u64,
}

/// The read-only products of one run.
#[derive(Debug, Clone)]
pub struct ExposureReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub enabled: BTreeSet<SignalSystem>,
    pub frame: AlignedFrame,
    pub signals: EvaluatedSignals,
    pub exposure: ExposureSeries,
    /// Newest first.
    pub trades: Vec<TradeRecord>,
    pub top_trades: usize,
}

impl ExposureReport {
    pub fn recent_trades(&self) -> &[TradeRecord] {
        most_recent(&self.trades, self.top_trades)
    }
}

/// Fetches all six required feeds for the closed range `[start, end]`.
pub fn fetch_market_feeds(
    port: &dyn DataPort,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HashMap<Instrument, Vec<RawBar>>, ExposureError> {
    let mut feeds = HashMap::with_capacity(Instrument::ALL.len());
    for instrument in Instrument::ALL {
        let bars = port.fetch_series(instrument, start, end)?;
        tracing::debug!(instrument = instrument.code(), bars = bars.len(), "fetched feed");
        feeds.insert(instrument, bars);
    }
    Ok(feeds)
}

/// Runs the enabled systems over an already aligned frame.
pub fn run_exposure(
    frame: AlignedFrame,
    config: &ExposureConfig,
) -> Result<ExposureReport, ExposureError> {
    let enabled: BTreeSet<SignalSystem> = config.systems.iter().copied().collect();
    let systems: Vec<SignalSystem> = enabled.iter().copied().collect();

    tracing::info!(
        dates = frame.len(),
        systems = systems.len(),
        "evaluating signal systems"
    );

    let signals = evaluate_systems(&frame, &systems)?;
    let exposure = aggregate(&enabled, &signals);
    let trades = extract_seeded(&enabled, &signals, &frame, config.pseudo_return_seed);

    tracing::info!(trades = trades.len(), "extracted trades");

    Ok(ExposureReport {
        start_date: config.start_date,
        end_date: config.end_date,
        enabled,
        frame,
        signals,
        exposure,
        trades,
        top_trades: config.top_trades,
    })
}

/// Fetches, aligns and runs in one step.
pub fn run_from_port(
    port: &dyn DataPort,
    config: &ExposureConfig,
) -> Result<ExposureReport, ExposureError> {
    let feeds = fetch_market_feeds(port, config.start_date, config.end_date)?;
    let frame = build_market_frame(&feeds)?;
    tracing::info!(
        first = ?frame.first_date(),
        last = ?frame.last_date(),
        "aligned market frame"
    );
    run_exposure(frame, config)
}
