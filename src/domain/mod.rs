//! Core domain types and logic.

pub mod config_validation;
pub mod error;
pub mod exposure;
pub mod frame;
pub mod indicator;
pub mod indicator_helpers;
pub mod market;
pub mod pipeline;
pub mod rule;
pub mod rule_eval;
pub mod signal;
pub mod time_series;
pub mod trade;
