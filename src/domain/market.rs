//! Raw market feeds and the frame columns derived from them.
//!
//! Six instruments feed the engine. Each one is a daily series of
//! `(date, open?, close?)` rows as delivered by the data collaborator.

use crate::domain::time_series::finite;
use chrono::NaiveDate;
use std::fmt;

/// One vendor row. `open` is absent for breadth and sentiment feeds; `close`
/// is absent when the vendor left the cell empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub close: Option<f64>,
}

impl RawBar {
    pub fn new(date: NaiveDate, open: Option<f64>, close: Option<f64>) -> Self {
        Self { date, open, close }
    }

    /// Close as an observation; non-finite closes count as missing.
    pub fn close_value(&self) -> Option<f64> {
        self.close.and_then(finite)
    }

    pub fn open_value(&self) -> Option<f64> {
        self.open.and_then(finite)
    }
}

/// The six required input feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Instrument {
    Spx,
    NyseHi,
    NyseLo,
    Vix,
    Vix3m,
    PutCall,
}

impl Instrument {
    pub const ALL: [Instrument; 6] = [
        Instrument::Spx,
        Instrument::NyseHi,
        Instrument::NyseLo,
        Instrument::Vix,
        Instrument::Vix3m,
        Instrument::PutCall,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Instrument::Spx => "SPX",
            Instrument::NyseHi => "NYSEHI",
            Instrument::NyseLo => "NYSELO",
            Instrument::Vix => "VIX",
            Instrument::Vix3m => "VIX3M",
            Instrument::PutCall => "PutCall",
        }
    }

    /// Frame column holding this instrument's close.
    pub fn close_field(self) -> Field {
        match self {
            Instrument::Spx => Field::SpxClose,
            Instrument::NyseHi => Field::NyseHi,
            Instrument::NyseLo => Field::NyseLo,
            Instrument::Vix => Field::VixClose,
            Instrument::Vix3m => Field::Vix3mClose,
            Instrument::PutCall => Field::PutCallClose,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Named columns of the aligned market frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    SpxClose,
    SpxOpen,
    NyseHi,
    NyseLo,
    VixClose,
    Vix3mClose,
    PutCallClose,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::SpxClose,
        Field::SpxOpen,
        Field::NyseHi,
        Field::NyseLo,
        Field::VixClose,
        Field::Vix3mClose,
        Field::PutCallClose,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::SpxClose => "SPX_Close",
            Field::SpxOpen => "SPX_Open",
            Field::NyseHi => "NYSEHI",
            Field::NyseLo => "NYSELO",
            Field::VixClose => "VIX_Close",
            Field::Vix3mClose => "VIX3M_Close",
            Field::PutCallClose => "PutCall_Close",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
