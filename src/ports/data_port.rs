//! Data access port trait.
//!
//! The data collaborator supplies raw daily feeds; the engine never talks
//! to a vendor directly.

use crate::domain::error::ExposureError;
use crate::domain::market::{Instrument, RawBar};
use chrono::NaiveDate;

pub trait DataPort {
    /// Rows for `instrument` within the closed range `[start_date, end_date]`,
    /// in the order the source holds them.
    fn fetch_series(
        &self,
        instrument: Instrument,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RawBar>, ExposureError>;

    /// First date, last date and row count held for `instrument`.
    fn get_data_range(
        &self,
        instrument: Instrument,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ExposureError>;
}
