//! Trade extraction for reporting.
//!
//! One record per (enabled system, date the system fired). The status and
//! the return figure are display aids only:
//!
//! - `Open` means the same system fires again on some later date; it is not
//!   a position model.
//! - `SyntheticReturn` is a random placeholder drawn from [-5, 10) percent.
//!   It is not a backtested result.

use crate::domain::frame::AlignedFrame;
use crate::domain::market::Field;
use crate::domain::signal::{EvaluatedSignals, SignalSystem};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::fmt;

pub const SYNTHETIC_RETURN_MIN_PCT: f64 = -5.0;
pub const SYNTHETIC_RETURN_MAX_PCT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    Open,
    Closed,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Open => f.pad("Open"),
            TradeStatus::Closed => f.pad("Closed"),
        }
    }
}

/// Placeholder return in percent. Randomly generated, never a real P&L.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticReturn(f64);

impl SyntheticReturn {
    pub fn draw(rng: &mut impl Rng) -> Self {
        SyntheticReturn(rng.gen_range(SYNTHETIC_RETURN_MIN_PCT..SYNTHETIC_RETURN_MAX_PCT))
    }

    pub fn pct(self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub system: SignalSystem,
    pub date: NaiveDate,
    pub status: TradeStatus,
    /// SPX close on the trade date, for context.
    pub spx_close: Option<f64>,
    pub pseudo_return: SyntheticReturn,
}

/// Extracts trades for every enabled system, newest first.
///
/// Records sharing a date keep the canonical system order.
pub fn extract(
    enabled: &BTreeSet<SignalSystem>,
    evaluated: &EvaluatedSignals,
    frame: &AlignedFrame,
    rng: &mut impl Rng,
) -> Vec<TradeRecord> {
    let spx = frame.column(Field::SpxClose.name());
    let mut trades = Vec::new();

    for &system in enabled {
        let Some(fired) = evaluated.get(system) else {
            continue;
        };
        let last_fired = fired.iter().rposition(|&b| b);

        for (i, _) in fired.iter().enumerate().filter(|&(_, &b)| b) {
            let status = match last_fired {
                Some(last) if i < last => TradeStatus::Open,
                _ => TradeStatus::Closed,
            };
            trades.push(TradeRecord {
                system,
                date: evaluated.dates[i],
                status,
                spx_close: spx.and_then(|s| s.value(i)),
                pseudo_return: SyntheticReturn::draw(rng),
            });
        }
    }

    trades.sort_by(|a, b| b.date.cmp(&a.date).then(a.system.cmp(&b.system)));
    trades
}

/// `extract` with a generator seeded from `seed`, so reruns are identical.
pub fn extract_seeded(
    enabled: &BTreeSet<SignalSystem>,
    evaluated: &EvaluatedSignals,
    frame: &AlignedFrame,
    seed: u64,
) -> Vec<TradeRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    extract(enabled, evaluated, frame, &mut rng)
}

/// The `n` newest records of a date-descending trade log.
pub fn most_recent(trades: &[TradeRecord], n: usize) -> &[TradeRecord] {
    &trades[..n.min(trades.len())]
}
