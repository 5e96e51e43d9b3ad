//! The five signal systems and their per-date evaluation.
//!
//! Each system is a fixed rule over the aligned market frame. Evaluating a
//! set of systems yields one boolean per frame date per system; a date with
//! any missing input evaluates to `false`.

use crate::domain::error::ExposureError;
use crate::domain::frame::AlignedFrame;
use crate::domain::indicator::IndicatorSpec;
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::market::Field;
use crate::domain::rule::{Operand, Rule, extract_indicators};
use crate::domain::rule_eval::evaluate_series;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const SPX_TREND_WINDOW: usize = 220;
pub const PUT_CALL_WINDOW: usize = 10;
pub const PUT_CALL_THRESHOLD: f64 = 0.92;
pub const VIX_TERM_THRESHOLD: f64 = 1.0;
pub const REGRESSION_WINDOW: usize = 4;
pub const VIX_RSI_PERIOD: usize = 5;
pub const VIX_RSI_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalSystem {
    /// New highs exceed new lows while SPX trades above its 220-day mean.
    Breadth,
    /// 10-day put/call mean crosses up through 0.92.
    PutCallCross,
    /// VIX/VIX3M crosses down through 1 (backwardation resolving).
    VixTermStructure,
    /// SPX and NYSE new lows both trending down over four sessions.
    DualRegression,
    /// 5-period VIX RSI above 90.
    VixRsi,
}

impl SignalSystem {
    /// Canonical order; "first N systems" selections follow it.
    pub const ALL: [SignalSystem; 5] = [
        SignalSystem::Breadth,
        SignalSystem::PutCallCross,
        SignalSystem::VixTermStructure,
        SignalSystem::DualRegression,
        SignalSystem::VixRsi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SignalSystem::Breadth => "NH_NL",
            SignalSystem::PutCallCross => "PutCall",
            SignalSystem::VixTermStructure => "RatioVIX",
            SignalSystem::DualRegression => "Regression",
            SignalSystem::VixRsi => "RSI_VIX",
        }
    }

    pub fn rule(self) -> Rule {
        let constant = Operand::Constant;
        let indicator = Operand::Indicator;

        match self {
            SignalSystem::Breadth => Rule::And(vec![
                Rule::above(
                    indicator(IndicatorSpec::Difference {
                        left: Field::NyseHi,
                        right: Field::NyseLo,
                    }),
                    constant(0.0),
                ),
                Rule::above(
                    Operand::Field(Field::SpxClose),
                    indicator(IndicatorSpec::Sma {
                        field: Field::SpxClose,
                        window: SPX_TREND_WINDOW,
                    }),
                ),
            ]),
            SignalSystem::PutCallCross => Rule::cross_above(
                indicator(IndicatorSpec::Sma {
                    field: Field::PutCallClose,
                    window: PUT_CALL_WINDOW,
                }),
                constant(PUT_CALL_THRESHOLD),
            ),
            SignalSystem::VixTermStructure => Rule::cross_below(
                indicator(IndicatorSpec::Ratio {
                    numerator: Field::VixClose,
                    denominator: Field::Vix3mClose,
                }),
                constant(VIX_TERM_THRESHOLD),
            ),
            SignalSystem::DualRegression => Rule::And(vec![
                Rule::below(
                    indicator(IndicatorSpec::LinRegSlope {
                        field: Field::SpxClose,
                        window: REGRESSION_WINDOW,
                    }),
                    constant(0.0),
                ),
                Rule::below(
                    indicator(IndicatorSpec::LinRegSlope {
                        field: Field::NyseLo,
                        window: REGRESSION_WINDOW,
                    }),
                    constant(0.0),
                ),
            ]),
            SignalSystem::VixRsi => Rule::above(
                indicator(IndicatorSpec::Rsi {
                    field: Field::VixClose,
                    period: VIX_RSI_PERIOD,
                }),
                constant(VIX_RSI_THRESHOLD),
            ),
        }
    }

    pub fn indicators(self) -> Vec<IndicatorSpec> {
        extract_indicators(&self.rule()).into_iter().collect()
    }

    /// The first `count` systems in canonical order.
    pub fn first(count: usize) -> Vec<SignalSystem> {
        SignalSystem::ALL.iter().copied().take(count).collect()
    }
}

impl fmt::Display for SignalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignalSystem {
    type Err = ExposureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SignalSystem::ALL
            .into_iter()
            .find(|sys| sys.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ExposureError::UnknownSystem {
                name: wanted.to_string(),
            })
    }
}

/// Parses a comma-separated list of system names, dropping duplicates.
pub fn parse_systems(input: &str) -> Result<Vec<SignalSystem>, ExposureError> {
    let mut systems = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let system: SignalSystem = token.parse()?;
        if !systems.contains(&system) {
            systems.push(system);
        }
    }
    Ok(systems)
}

/// Per-system booleans on the frame's date index.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatedSignals {
    pub dates: Vec<NaiveDate>,
    pub signals: BTreeMap<SignalSystem, Vec<bool>>,
}

impl EvaluatedSignals {
    pub fn get(&self, system: SignalSystem) -> Option<&[bool]> {
        self.signals.get(&system).map(Vec::as_slice)
    }

    pub fn fired_count(&self, system: SignalSystem) -> usize {
        self.get(system)
            .map(|s| s.iter().filter(|&&b| b).count())
            .unwrap_or(0)
    }
}

/// Computes every indicator the systems need once, then evaluates each rule.
pub fn evaluate_systems(
    frame: &AlignedFrame,
    systems: &[SignalSystem],
) -> Result<EvaluatedSignals, ExposureError> {
    let specs: Vec<IndicatorSpec> = systems.iter().flat_map(|s| s.indicators()).collect();
    let indicators = compute_indicators(frame, &specs)?;

    let signals = systems
        .iter()
        .map(|&system| {
            let fired = evaluate_series(&system.rule(), frame, &indicators);
            tracing::debug!(
                system = system.name(),
                fired = fired.iter().filter(|&&b| b).count(),
                "evaluated signal system"
            );
            (system, fired)
        })
        .collect();

    Ok(EvaluatedSignals {
        dates: frame.dates().to_vec(),
        signals,
    })
}
