//! Technical indicator implementations.
//!
//! Every function here is pure: it takes one or two series and returns a new
//! series on the same date index. Warm-up slots are `None`, never zero.
//!
//! - `sma`: trailing arithmetic mean
//! - `pointwise`: ratio and difference of two aligned series
//! - `rsi`: recursive (Wilder-style) smoothed RSI
//! - `linreg`: rolling least-squares net change
//!
//! `IndicatorSpec` names an indicator together with its inputs and
//! parameters; it is the key under which computed series are cached.

pub mod linreg;
pub mod pointwise;
pub mod rsi;
pub mod sma;

use crate::domain::error::ExposureError;
use crate::domain::frame::AlignedFrame;
use crate::domain::market::Field;
use crate::domain::time_series::TimeSeries;
use std::fmt;

pub use linreg::rolling_linreg_slope;
pub use pointwise::{rolling_difference, rolling_ratio};
pub use rsi::recursive_smoothed_rsi;
pub use sma::rolling_mean;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorSpec {
    Sma { field: Field, window: usize },
    Ratio { numerator: Field, denominator: Field },
    Difference { left: Field, right: Field },
    Rsi { field: Field, period: usize },
    LinRegSlope { field: Field, window: usize },
}

impl IndicatorSpec {
    /// Frame fields this indicator reads.
    pub fn inputs(&self) -> Vec<Field> {
        match *self {
            IndicatorSpec::Sma { field, .. }
            | IndicatorSpec::Rsi { field, .. }
            | IndicatorSpec::LinRegSlope { field, .. } => vec![field],
            IndicatorSpec::Ratio {
                numerator,
                denominator,
            } => vec![numerator, denominator],
            IndicatorSpec::Difference { left, right } => vec![left, right],
        }
    }

    pub fn compute(&self, frame: &AlignedFrame) -> Result<TimeSeries, ExposureError> {
        let series = match *self {
            IndicatorSpec::Sma { field, window } => rolling_mean(frame.require(field)?, window),
            IndicatorSpec::Ratio {
                numerator,
                denominator,
            } => rolling_ratio(frame.require(numerator)?, frame.require(denominator)?),
            IndicatorSpec::Difference { left, right } => {
                rolling_difference(frame.require(left)?, frame.require(right)?)
            }
            IndicatorSpec::Rsi { field, period } => {
                recursive_smoothed_rsi(frame.require(field)?, period)
            }
            IndicatorSpec::LinRegSlope { field, window } => {
                rolling_linreg_slope(frame.require(field)?, window)
            }
        };
        Ok(series)
    }
}

impl fmt::Display for IndicatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorSpec::Sma { field, window } => write!(f, "SMA({},{})", field, window),
            IndicatorSpec::Ratio {
                numerator,
                denominator,
            } => write!(f, "RATIO({},{})", numerator, denominator),
            IndicatorSpec::Difference { left, right } => write!(f, "DIFF({},{})", left, right),
            IndicatorSpec::Rsi { field, period } => write!(f, "RSI({},{})", field, period),
            IndicatorSpec::LinRegSlope { field, window } => {
                write!(f, "LINREG({},{})", field, window)
            }
        }
    }
}
