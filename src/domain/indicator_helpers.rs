//! Batch computation of indicator specs against one frame.
//!
//! Specs are independent of each other, so the batch fans out across
//! threads when the `parallel` feature is on. Each individual series is
//! still a sequential scan.

use crate::domain::error::ExposureError;
use crate::domain::frame::AlignedFrame;
use crate::domain::indicator::IndicatorSpec;
use crate::domain::time_series::TimeSeries;
use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub type IndicatorMap = HashMap<IndicatorSpec, TimeSeries>;

pub fn compute_indicators(
    frame: &AlignedFrame,
    specs: &[IndicatorSpec],
) -> Result<IndicatorMap, ExposureError> {
    let unique: BTreeSet<IndicatorSpec> = specs.iter().copied().collect();
    let unique: Vec<IndicatorSpec> = unique.into_iter().collect();

    #[cfg(feature = "parallel")]
    let computed: Result<Vec<(IndicatorSpec, TimeSeries)>, ExposureError> = unique
        .par_iter()
        .map(|spec| spec.compute(frame).map(|series| (*spec, series)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let computed: Result<Vec<(IndicatorSpec, TimeSeries)>, ExposureError> = unique
        .iter()
        .map(|spec| spec.compute(frame).map(|series| (*spec, series)))
        .collect();

    let map: IndicatorMap = computed?.into_iter().collect();
    tracing::debug!(count = map.len(), "computed indicator series");
    Ok(map)
}
