//! Report generation port trait.

use crate::domain::error::ExposureError;
use crate::domain::pipeline::ExposureReport;
use std::path::Path;

/// Port for writing the products of an exposure run.
pub trait ReportPort {
    fn write(&self, report: &ExposureReport, output: &Path) -> Result<(), ExposureError>;
}
