//! The driver: iterates a segment's chunks, invokes the searcher per chunk,
//! accumulates sub-results, and rounds once at the end.

use crate::bitset::BitsetView;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::kernel::VectorKernel;
use crate::searcher::{self, RangeSearchDataset, SearchDataset};
use crate::subresult::{RangeSubResult, TopKSubResult};
use tracing::{debug, trace, warn};

/// One chunk of a segment: its raw base vector data and row count.
pub struct Chunk<'a> {
    /// Number of base rows in this chunk.
    pub chunk_rows: usize,
    /// The chunk's base vectors, row-major, `chunk_rows * dim` elements.
    pub chunk_data_raw: &'a [f32],
}

/// The searcher returns ids local to the chunk it scanned; the driver shifts
/// them to segment-wide offsets before merging so ids from different chunks
/// never collide. Sentinel slots are left untouched.
fn shift_ids(ids: &[i64], chunk_offset: u32) -> Vec<i64> {
    ids.iter()
        .map(|&id| {
            if id == crate::metric::SENTINEL_ID {
                id
            } else {
                id + chunk_offset as i64
            }
        })
        .collect()
}

/// Run a top-K search across every chunk of a segment, merging sub-results
/// into a single accumulator and rounding once at the end.
///
/// `bitset` is the segment-wide deletion/visibility filter; it is sliced per
/// chunk via [`BitsetView::slice`] before being handed to the searcher.
pub fn run_topk(
    dataset: &SearchDataset<'_>,
    chunks: &[Chunk<'_>],
    config: &SearchConfig,
    kernel: &dyn VectorKernel,
    bitset: &BitsetView,
) -> Result<TopKSubResult> {
    let (metric, _dim, topk) = config.resolve()?;
    let mut acc = TopKSubResult::empty(dataset.nq, topk, metric, dataset.round_decimal);
    let mut offset = 0u32;

    for (chunk_idx, chunk) in chunks.iter().enumerate() {
        trace!(chunk_idx, rows = chunk.chunk_rows, "entering chunk");
        let chunk_bitset = bitset.slice(offset, chunk.chunk_rows as u32);

        let sub = searcher::search_topk(dataset, chunk.chunk_data_raw, config, kernel, &chunk_bitset)
            .inspect_err(|e| warn!(chunk_idx, error = %e, "chunk search failed"))?;
        let sub = TopKSubResult::from_parts(
            sub.nq(),
            sub.topk(),
            sub.metric(),
            sub.round_decimal(),
            shift_ids(sub.seg_offsets(), offset),
            sub.distances().to_vec(),
        );

        acc = acc.merge(&sub)?;
        debug!(chunk_idx, "merged chunk into accumulator");
        offset += chunk.chunk_rows as u32;
    }

    acc.round_values();
    debug!(nq = dataset.nq, topk, "top-K pipeline finished");
    Ok(acc)
}

/// Run a range-band search across every chunk of a segment, merging
/// sub-results into a single accumulator and rounding once at the end.
pub fn run_range(
    dataset: &RangeSearchDataset<'_>,
    chunks: &[Chunk<'_>],
    config: &SearchConfig,
    kernel: &dyn VectorKernel,
    bitset: &BitsetView,
) -> Result<RangeSubResult> {
    let (metric, _dim, _) = config.resolve()?;
    let mut acc = RangeSubResult::empty(dataset.nq, dataset.radius, metric, dataset.round_decimal);
    let mut offset = 0u32;

    for (chunk_idx, chunk) in chunks.iter().enumerate() {
        trace!(chunk_idx, rows = chunk.chunk_rows, "entering chunk");
        let chunk_bitset = bitset.slice(offset, chunk.chunk_rows as u32);

        let sub = searcher::search_range(dataset, chunk.chunk_data_raw, config, kernel, &chunk_bitset)
            .inspect_err(|e| warn!(chunk_idx, error = %e, "chunk search failed"))?;
        let sub = RangeSubResult::from_parts(
            sub.nq(),
            sub.radius(),
            sub.metric(),
            sub.round_decimal(),
            sub.lims().to_vec(),
            shift_ids(sub.seg_offsets(), offset),
            sub.distances().to_vec(),
        );

        acc = acc.merge(&sub)?;
        debug!(chunk_idx, "merged chunk into accumulator");
        offset += chunk.chunk_rows as u32;
    }

    acc.round_values();
    debug!(nq = dataset.nq, "range pipeline finished");
    Ok(acc)
}
