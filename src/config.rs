//! Search configuration: the typed subset of the config map the searcher
//! interprets, plus pass-through storage for index-specific keys.

use crate::error::{Error, Result};
use crate::metric::Metric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Config options the core interprets, plus whatever an index kernel wants
/// (`NLIST`, `NPROBE`, `HNSW_M`, `EFCONSTRUCTION`, `EF`, `M`, `NBITS`,
/// `RANGE_K`, ...), forwarded to the kernel unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// `METRIC_TYPE`, spelled as one of the five metric tags.
    pub metric_type: Option<String>,
    /// `DIM`, the vector dimension.
    pub dim: Option<i64>,
    /// `TOPK`, the number of neighbours requested per query.
    pub topk: Option<i64>,
    /// `RADIUS`, the single-bound radius used by native range search.
    pub radius: Option<f32>,
    /// `RADIUS_LOW_BOUND`, the inclusive lower edge of a top-K radius band.
    pub radius_low_bound: Option<f32>,
    /// `RADIUS_HIGH_BOUND`, the inclusive upper edge of a top-K radius band.
    pub radius_high_bound: Option<f32>,
    /// Fractional digits to round to, or `-1` to disable rounding.
    pub round_decimal: i32,
    /// Index-specific keys the core never interprets.
    pub extra: BTreeMap<String, String>,
}

impl SearchConfig {
    /// Build a config with the required fields set and rounding disabled.
    pub fn new(metric: Metric, dim: i64, topk: i64) -> Self {
        Self {
            metric_type: Some(metric_tag(metric).to_string()),
            dim: Some(dim),
            topk: Some(topk),
            radius: None,
            radius_low_bound: None,
            radius_high_bound: None,
            round_decimal: -1,
            extra: BTreeMap::new(),
        }
    }

    /// Set the decimal rounding precision.
    pub fn with_round_decimal(mut self, round_decimal: i32) -> Self {
        self.round_decimal = round_decimal;
        self
    }

    /// Set both radius bounds, routing top-K search through the range→top-K
    /// projector.
    pub fn with_radius_band(mut self, low: f32, high: f32) -> Self {
        self.radius_low_bound = Some(low);
        self.radius_high_bound = Some(high);
        self
    }

    /// Set an index-specific key the core forwards to the kernel unchanged.
    pub fn set_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Parse and validate the required fields, returning the resolved
    /// `(metric, dim, topk)` triple.
    pub fn resolve(&self) -> Result<(Metric, usize, usize)> {
        let metric_type = self
            .metric_type
            .as_deref()
            .ok_or_else(|| Error::config("METRIC_TYPE is required"))?;
        let metric = Metric::parse(metric_type)?;

        let dim = self.dim.ok_or_else(|| Error::config("DIM is required"))?;
        if dim <= 0 {
            return Err(Error::config(format!("DIM must be positive, got {dim}")));
        }

        let topk = self.topk.ok_or_else(|| Error::config("TOPK is required"))?;
        if topk <= 0 {
            return Err(Error::config(format!("TOPK must be positive, got {topk}")));
        }

        Ok((metric, dim as usize, topk as usize))
    }

    /// `true` iff exactly one of the radius bounds is set — a config error.
    pub fn has_mismatched_radius_bounds(&self) -> bool {
        self.radius_low_bound.is_some() != self.radius_high_bound.is_some()
    }

    /// `true` iff both radius bounds are present.
    pub fn has_radius_band(&self) -> bool {
        self.radius_low_bound.is_some() && self.radius_high_bound.is_some()
    }
}

pub(crate) const fn metric_tag(metric: Metric) -> &'static str {
    match metric {
        Metric::L2 => "L2",
        Metric::Ip => "IP",
        Metric::Hamming => "HAMMING",
        Metric::Jaccard => "JACCARD",
        Metric::Tanimoto => "TANIMOTO",
    }
}
