//! The brute-force per-chunk searcher: dispatches a query batch against one
//! chunk's worth of base vectors and a kernel, producing a sub-result.

use crate::bitset::BitsetView;
use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::kernel::VectorKernel;
use crate::metric::Order;
use crate::projector;
use crate::subresult::{RangeSubResult, TopKSubResult};
use tracing::{debug, warn};

/// Immutable input describing one top-K query batch against a chunk.
#[derive(Debug, Clone)]
pub struct SearchDataset<'a> {
    /// Number of queries in the batch.
    pub nq: usize,
    /// Vector dimension shared by queries and base rows.
    pub dim: usize,
    /// Neighbours requested per query.
    pub topk: usize,
    /// Fractional digits to round to, or `-1` to disable rounding.
    pub round_decimal: i32,
    /// `nq` query vectors of `dim` elements, row-major.
    pub query_data: &'a [f32],
}

/// Immutable input describing one range query batch against a chunk.
#[derive(Debug, Clone)]
pub struct RangeSearchDataset<'a> {
    /// Number of queries in the batch.
    pub nq: usize,
    /// Vector dimension shared by queries and base rows.
    pub dim: usize,
    /// The radius passed to the kernel's native range search.
    pub radius: f32,
    /// Inclusive lower edge, in user-facing metric space.
    pub low_bound: f32,
    /// Inclusive upper edge, in user-facing metric space.
    pub high_bound: f32,
    /// Fractional digits to round to, or `-1` to disable rounding.
    pub round_decimal: i32,
    /// `nq` query vectors of `dim` elements, row-major.
    pub query_data: &'a [f32],
}

/// Run a top-K search of `dataset` against `chunk_data_raw`, honouring
/// `config`'s dispatch rule: a fully-specified radius band routes
/// through the kernel's range search and the projector; otherwise the
/// kernel's native top-K is used directly.
pub fn search_topk(
    dataset: &SearchDataset<'_>,
    chunk_data_raw: &[f32],
    config: &SearchConfig,
    kernel: &dyn VectorKernel,
    bitset: &BitsetView,
) -> Result<TopKSubResult> {
    let (metric, _dim, topk) = config.resolve()?;

    if config.has_mismatched_radius_bounds() {
        warn!("RADIUS_LOW_BOUND/RADIUS_HIGH_BOUND set without the other");
        return Err(Error::config(
            "RADIUS_LOW_BOUND and RADIUS_HIGH_BOUND must be set together",
        ));
    }

    if config.has_radius_band() {
        debug!("dispatching top-K search via range search + projector");
        let low_bound = config.radius_low_bound.unwrap();
        let high_bound = config.radius_high_bound.unwrap();
        let kernel_radius = if metric.order() == Order::Descending {
            low_bound
        } else {
            high_bound
        };
        // The kernel's own distances are squared for L2; its radius argument
        // must be in the same units as the bound the projector later squares.
        let kernel_radius = if matches!(metric, crate::metric::Metric::L2) {
            kernel_radius * kernel_radius
        } else {
            kernel_radius
        };
        let mut range_config = config.clone();
        range_config.radius = Some(kernel_radius);

        let (ids, distances, lims) = kernel
            .range_search(chunk_data_raw, dataset.query_data, &range_config, bitset)
            .map_err(|e| Error::kernel(e.to_string()))?;

        let (result, total) = projector::project_range_to_topk(
            metric,
            dataset.nq,
            topk,
            dataset.round_decimal,
            low_bound,
            high_bound,
            &lims,
            &ids,
            &distances,
            bitset,
        )?;
        debug!(total_hits = total, "projected range search into top-K");
        Ok(result)
    } else {
        debug!("dispatching top-K search directly to the kernel");
        let (ids, distances) = kernel
            .search(chunk_data_raw, dataset.query_data, config, bitset)
            .map_err(|e| Error::kernel(e.to_string()))?;
        Ok(TopKSubResult::from_parts(
            dataset.nq,
            topk,
            metric,
            dataset.round_decimal,
            ids,
            distances,
        ))
    }
}

/// Run a range-band search of `dataset` against `chunk_data_raw`, copying
/// the kernel's output verbatim into a `RangeSubResult`.
pub fn search_range(
    dataset: &RangeSearchDataset<'_>,
    chunk_data_raw: &[f32],
    config: &SearchConfig,
    kernel: &dyn VectorKernel,
    bitset: &BitsetView,
) -> Result<RangeSubResult> {
    let (metric, _dim, _) = config.resolve()?;
    let mut range_config = config.clone();
    range_config.radius = Some(dataset.radius);

    debug!(radius = dataset.radius, "dispatching native range search");
    let (ids, distances, lims) = kernel
        .range_search(chunk_data_raw, dataset.query_data, &range_config, bitset)
        .map_err(|e| Error::kernel(e.to_string()))?;

    Ok(RangeSubResult::from_parts(
        dataset.nq,
        dataset.radius,
        metric,
        dataset.round_decimal,
        lims,
        ids,
        distances,
    ))
}
