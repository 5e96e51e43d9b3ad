//! Rule evaluation engine.
//!
//! Evaluates rules against the aligned frame and pre-computed indicators.
//!
//! # Evaluation Semantics
//!
//! - Comparison rules: evaluate at the given index
//! - `CROSS_ABOVE`/`CROSS_BELOW`: compare the previous index too; `false` at index 0
//! - `AND`: short-circuits on first `false`
//! - Any missing operand makes the comparison `false`, never an error

use crate::domain::frame::AlignedFrame;
use crate::domain::indicator_helpers::IndicatorMap;
use crate::domain::rule::{Operand, Rule};

pub fn evaluate(rule: &Rule, frame: &AlignedFrame, indicators: &IndicatorMap, index: usize) -> bool {
    let at = |operand: &Operand, i: usize| resolve_operand(operand, frame, indicators, i);

    match rule {
        Rule::Above { left, right } => compare(at(left, index), at(right, index), |l, r| l > r),
        Rule::Below { left, right } => compare(at(left, index), at(right, index), |l, r| l < r),
        Rule::AtOrAbove { left, right } => {
            compare(at(left, index), at(right, index), |l, r| l >= r)
        }
        Rule::AtOrBelow { left, right } => {
            compare(at(left, index), at(right, index), |l, r| l <= r)
        }
        Rule::CrossAbove { left, right } => {
            if index == 0 {
                return false;
            }
            compare(at(left, index - 1), at(right, index - 1), |l, r| l < r)
                && compare(at(left, index), at(right, index), |l, r| l >= r)
        }
        Rule::CrossBelow { left, right } => {
            if index == 0 {
                return false;
            }
            compare(at(left, index - 1), at(right, index - 1), |l, r| l > r)
                && compare(at(left, index), at(right, index), |l, r| l <= r)
        }
        Rule::And(rules) => {
            for r in rules {
                if !evaluate(r, frame, indicators, index) {
                    return false;
                }
            }
            true
        }
    }
}

/// Evaluates the rule at every index of the frame.
pub fn evaluate_series(rule: &Rule, frame: &AlignedFrame, indicators: &IndicatorMap) -> Vec<bool> {
    (0..frame.len())
        .map(|i| evaluate(rule, frame, indicators, i))
        .collect()
}

fn compare(left: Option<f64>, right: Option<f64>, op: impl Fn(f64, f64) -> bool) -> bool {
    match (left, right) {
        (Some(l), Some(r)) => op(l, r),
        _ => false,
    }
}

fn resolve_operand(
    operand: &Operand,
    frame: &AlignedFrame,
    indicators: &IndicatorMap,
    index: usize,
) -> Option<f64> {
    match operand {
        Operand::Constant(v) => Some(*v),
        Operand::Field(field) => frame.column(field.name())?.value(index),
        Operand::Indicator(spec) => indicators.get(spec)?.value(index),
    }
}
