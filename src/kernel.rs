//! The consumed numeric-search interface, plus a brute-force reference
//! implementation.

use crate::bitset::BitsetView;
use crate::config::SearchConfig;
use crate::distance;
use crate::error::Result;
use crate::heap;
use crate::metric::SENTINEL_ID;

/// The interface a numeric index (brute-force, IVF, HNSW, binary IDMAP, ...)
/// implements to serve a chunk search. This crate is a consumer of this trait
/// in general, but ships one concrete implementation ([`BruteForceKernel`])
/// for tests and default pipeline wiring.
pub trait VectorKernel {
    /// Native top-K search. Returns `(ids, distances)`, each of length
    /// `nq * topk`, laid out and ordered exactly like
    /// [`crate::subresult::TopKSubResult`]'s arrays.
    fn search(
        &self,
        base: &[f32],
        query: &[f32],
        config: &SearchConfig,
        bitset: &BitsetView,
    ) -> Result<(Vec<i64>, Vec<f32>)>;

    /// Native range-band search. Returns `(ids, distances, lims)` laid out
    /// like [`crate::subresult::RangeSubResult`]'s arrays.
    fn range_search(
        &self,
        base: &[f32],
        query: &[f32],
        config: &SearchConfig,
        bitset: &BitsetView,
    ) -> Result<(Vec<i64>, Vec<f32>, Vec<usize>)>;
}

/// Exact brute-force kernel: scans every base row for every query.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceKernel;

impl VectorKernel for BruteForceKernel {
    fn search(
        &self,
        base: &[f32],
        query: &[f32],
        config: &SearchConfig,
        bitset: &BitsetView,
    ) -> Result<(Vec<i64>, Vec<f32>)> {
        let (metric, dim, topk) = config.resolve()?;
        let chunk_rows = base.len() / dim;
        let nq = query.len() / dim;
        let order = metric.order();
        let sentinel = metric.sentinel_distance();

        let mut out_ids = vec![SENTINEL_ID; nq * topk];
        let mut out_dists = vec![sentinel; nq * topk];

        for q in 0..nq {
            let q_vec = &query[q * dim..(q + 1) * dim];
            let dist = &mut out_dists[q * topk..(q + 1) * topk];
            let id = &mut out_ids[q * topk..(q + 1) * topk];
            heap::heapify(order, dist, id);

            for row in 0..chunk_rows {
                if bitset.test(row as u32) {
                    continue;
                }
                let base_vec = &base[row * dim..(row + 1) * dim];
                let d = distance::compute(metric, q_vec, base_vec);
                if order.admits(d, dist[0]) {
                    heap::replace_top(order, dist, id, d, row as i64);
                }
            }
            heap::reorder(order, dist, id);
        }

        Ok((out_ids, out_dists))
    }

    fn range_search(
        &self,
        base: &[f32],
        query: &[f32],
        config: &SearchConfig,
        bitset: &BitsetView,
    ) -> Result<(Vec<i64>, Vec<f32>, Vec<usize>)> {
        let (metric, dim, _) = config.resolve()?;
        let radius = config
            .radius
            .ok_or_else(|| crate::error::Error::config("RADIUS is required for range search"))?;
        let chunk_rows = base.len() / dim;
        let nq = query.len() / dim;
        let order = metric.order();

        let mut ids = Vec::new();
        let mut distances = Vec::new();
        let mut lims = Vec::with_capacity(nq + 1);
        lims.push(0);

        for q in 0..nq {
            let q_vec = &query[q * dim..(q + 1) * dim];
            for row in 0..chunk_rows {
                if bitset.test(row as u32) {
                    continue;
                }
                let base_vec = &base[row * dim..(row + 1) * dim];
                let d = distance::compute(metric, q_vec, base_vec);
                let is_hit = match order {
                    crate::metric::Order::Descending => d > radius,
                    crate::metric::Order::Ascending => d < radius,
                };
                if is_hit {
                    ids.push(row as i64);
                    distances.push(d);
                }
            }
            lims.push(ids.len());
        }

        Ok((ids, distances, lims))
    }
}
