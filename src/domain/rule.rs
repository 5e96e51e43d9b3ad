//! Rule AST for signal conditions.
//!
//! - `Operand`: what can be compared (frame fields, indicators, constants)
//! - `Rule`: threshold comparisons, crossovers and conjunction
//!
//! Crossovers are edge-triggered: `CrossAbove { left, right }` holds only on
//! the slot where `left` moves from strictly below `right` to at-or-above
//! it; `CrossBelow` is the mirror image.

use crate::domain::indicator::IndicatorSpec;
use crate::domain::market::Field;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Field(Field),
    Indicator(IndicatorSpec),
    Constant(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Above { left: Operand, right: Operand },
    Below { left: Operand, right: Operand },
    AtOrAbove { left: Operand, right: Operand },
    AtOrBelow { left: Operand, right: Operand },
    CrossAbove { left: Operand, right: Operand },
    CrossBelow { left: Operand, right: Operand },
    And(Vec<Rule>),
}

impl Rule {
    pub fn above(left: Operand, right: Operand) -> Self {
        Rule::Above { left, right }
    }

    pub fn below(left: Operand, right: Operand) -> Self {
        Rule::Below { left, right }
    }

    pub fn cross_above(left: Operand, right: Operand) -> Self {
        Rule::CrossAbove { left, right }
    }

    pub fn cross_below(left: Operand, right: Operand) -> Self {
        Rule::CrossBelow { left, right }
    }
}

/// All indicator specs referenced anywhere in the rule.
pub fn extract_indicators(rule: &Rule) -> BTreeSet<IndicatorSpec> {
    let mut out = BTreeSet::new();
    collect_indicators(rule, &mut out);
    out
}

fn collect_indicators(rule: &Rule, out: &mut BTreeSet<IndicatorSpec>) {
    match rule {
        Rule::Above { left, right }
        | Rule::Below { left, right }
        | Rule::AtOrAbove { left, right }
        | Rule::AtOrBelow { left, right }
        | Rule::CrossAbove { left, right }
        | Rule::CrossBelow { left, right } => {
            for operand in [left, right] {
                if let Operand::Indicator(spec) = operand {
                    out.insert(*spec);
                }
            }
        }
        Rule::And(rules) => {
            for r in rules {
                collect_indicators(r, out);
            }
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Field(field) => write!(f, "{}", field),
            Operand::Indicator(spec) => write!(f, "{}", spec),
            Operand::Constant(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Above { left, right } => write!(f, "ABOVE({}, {})", left, right),
            Rule::Below { left, right } => write!(f, "BELOW({}, {})", left, right),
            Rule::AtOrAbove { left, right } => write!(f, "AT_OR_ABOVE({}, {})", left, right),
            Rule::AtOrBelow { left, right } => write!(f, "AT_OR_BELOW({}, {})", left, right),
            Rule::CrossAbove { left, right } => write!(f, "CROSS_ABOVE({}, {})", left, right),
            Rule::CrossBelow { left, right } => write!(f, "CROSS_BELOW({}, {})", left, right),
            Rule::And(rules) => {
                write!(f, "AND(")?;
                for (i, r) in rules.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", r)?;
                }
                write!(f, ")")
            }
        }
    }
}
