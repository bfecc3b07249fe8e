//! Sub-result containers: the per-chunk and accumulated result shapes, and
//! their merge operators.

use crate::error::{Error, Result};
use crate::metric::{Metric, SENTINEL_ID};

/// A fixed-width `nq * topk` top-K result.
///
/// Per query `q`, the slice `[q*topk, (q+1)*topk)` is sorted in
/// metric-preferred order with sentinels trailing any unfilled slots.
#[derive(Debug, Clone, PartialEq)]
pub struct TopKSubResult {
    nq: usize,
    topk: usize,
    metric: Metric,
    round_decimal: i32,
    seg_offsets: Vec<i64>,
    distances: Vec<f32>,
}

impl TopKSubResult {
    /// Create an all-sentinel result of the given shape.
    pub fn empty(nq: usize, topk: usize, metric: Metric, round_decimal: i32) -> Self {
        let sentinel = metric.sentinel_distance();
        Self {
            nq,
            topk,
            metric,
            round_decimal,
            seg_offsets: vec![SENTINEL_ID; nq * topk],
            distances: vec![sentinel; nq * topk],
        }
    }

    /// Build directly from already-populated, per-query-sorted arrays.
    /// Used by the brute-force searcher and the range→top-K projector, which
    /// produce arrays already in metric-preferred order via the heap
    /// primitives.
    pub fn from_parts(
        nq: usize,
        topk: usize,
        metric: Metric,
        round_decimal: i32,
        seg_offsets: Vec<i64>,
        distances: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(seg_offsets.len(), nq * topk);
        debug_assert_eq!(distances.len(), nq * topk);
        Self {
            nq,
            topk,
            metric,
            round_decimal,
            seg_offsets,
            distances,
        }
    }

    /// Number of queries in the batch.
    pub fn nq(&self) -> usize {
        self.nq
    }

    /// Neighbours retained per query.
    pub fn topk(&self) -> usize {
        self.topk
    }

    /// The metric this result was produced under.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Fractional digits distances are rounded to, or `-1` if disabled.
    pub fn round_decimal(&self) -> i32 {
        self.round_decimal
    }

    /// The flat `nq * topk` id array.
    pub fn seg_offsets(&self) -> &[i64] {
        &self.seg_offsets
    }

    /// The flat `nq * topk` distance array.
    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    /// Mutable access to the distance array, for in-place rounding.
    pub fn distances_mut(&mut self) -> &mut [f32] {
        &mut self.distances
    }

    /// The slice for query `q`.
    pub fn query_slice(&self, q: usize) -> (&[i64], &[f32]) {
        let start = q * self.topk;
        let end = start + self.topk;
        (&self.seg_offsets[start..end], &self.distances[start..end])
    }

    /// Merge `other` into `self`, retaining the metric-best `topk` per query
    /// across both: a single linear K-way merge of two already-ordered
    /// K-length slices.
    pub fn merge(&self, other: &TopKSubResult) -> Result<TopKSubResult> {
        if self.nq != other.nq {
            return Err(Error::precondition(format!(
                "nq mismatch: {} vs {}",
                self.nq, other.nq
            )));
        }
        if self.topk != other.topk {
            return Err(Error::precondition(format!(
                "topk mismatch: {} vs {}",
                self.topk, other.topk
            )));
        }
        if self.metric != other.metric {
            return Err(Error::precondition("metric mismatch".to_string()));
        }
        if self.round_decimal != other.round_decimal {
            return Err(Error::precondition("round_decimal mismatch".to_string()));
        }

        let order = self.metric.order();
        let topk = self.topk;
        let mut seg_offsets = Vec::with_capacity(self.nq * topk);
        let mut distances = Vec::with_capacity(self.nq * topk);

        for q in 0..self.nq {
            let (left_ids, left_dists) = self.query_slice(q);
            let (right_ids, right_dists) = other.query_slice(q);
            let (mut i, mut j) = (0usize, 0usize);

            for _ in 0..topk {
                // Both slices are always exactly `topk` long (padded with
                // sentinels), so `i`/`j` never run past either one before
                // `topk` total entries have been taken.
                let left_entry = (left_dists[i], left_ids[i]);
                let right_entry = (right_dists[j], right_ids[j]);

                let take_left = order.cmp_entry(left_entry, right_entry) != std::cmp::Ordering::Greater;

                if take_left {
                    let (d, id) = left_entry;
                    seg_offsets.push(id);
                    distances.push(d);
                    i += 1;
                } else {
                    let (d, id) = right_entry;
                    seg_offsets.push(id);
                    distances.push(d);
                    j += 1;
                }
            }
        }

        Ok(TopKSubResult::from_parts(
            self.nq,
            topk,
            self.metric,
            self.round_decimal,
            seg_offsets,
            distances,
        ))
    }

    /// Apply the rounding filter in place.
    pub fn round_values(&mut self) {
        crate::rounding::round_in_place(&mut self.distances, self.round_decimal);
    }
}

/// A variable-width range result, indexed by a prefix-sum `lims` array.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSubResult {
    nq: usize,
    radius: f32,
    metric: Metric,
    round_decimal: i32,
    lims: Vec<usize>,
    seg_offsets: Vec<i64>,
    distances: Vec<f32>,
}

impl RangeSubResult {
    /// An empty range result for `nq` queries.
    pub fn empty(nq: usize, radius: f32, metric: Metric, round_decimal: i32) -> Self {
        Self {
            nq,
            radius,
            metric,
            round_decimal,
            lims: vec![0; nq + 1],
            seg_offsets: Vec::new(),
            distances: Vec::new(),
        }
    }

    /// Build from parts; `lims` must already satisfy the container invariant
    /// (`lims[0] == 0`, non-decreasing, `lims[nq] == ids.len() ==
    /// distances.len()`).
    pub fn from_parts(
        nq: usize,
        radius: f32,
        metric: Metric,
        round_decimal: i32,
        lims: Vec<usize>,
        seg_offsets: Vec<i64>,
        distances: Vec<f32>,
    ) -> Self {
        debug_assert_eq!(lims.len(), nq + 1);
        debug_assert_eq!(lims[0], 0);
        debug_assert!(lims.windows(2).all(|w| w[0] <= w[1]));
        debug_assert_eq!(*lims.last().unwrap(), seg_offsets.len());
        debug_assert_eq!(seg_offsets.len(), distances.len());
        Self {
            nq,
            radius,
            metric,
            round_decimal,
            lims,
            seg_offsets,
            distances,
        }
    }

    /// Number of queries in the batch.
    pub fn nq(&self) -> usize {
        self.nq
    }

    /// The radius this result was produced under.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// The metric this result was produced under.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Fractional digits distances are rounded to, or `-1` if disabled.
    pub fn round_decimal(&self) -> i32 {
        self.round_decimal
    }

    /// The prefix-sum delimiter array of length `nq + 1`.
    pub fn lims(&self) -> &[usize] {
        &self.lims
    }

    /// The flat hit-id array of length `lims[nq]`.
    pub fn seg_offsets(&self) -> &[i64] {
        &self.seg_offsets
    }

    /// The flat hit-distance array of length `lims[nq]`.
    pub fn distances(&self) -> &[f32] {
        &self.distances
    }

    /// `true` iff no query has any hit.
    pub fn is_empty(&self) -> bool {
        *self.lims.last().unwrap_or(&0) == 0
    }

    /// The slice of hits for query `q`.
    pub fn query_slice(&self, q: usize) -> (&[i64], &[f32]) {
        let start = self.lims[q];
        let end = self.lims[q + 1];
        (&self.seg_offsets[start..end], &self.distances[start..end])
    }

    /// Merge `other` into `self` by concatenating each query's hit list and
    /// recomputing `lims`. Order within a query's slice is not preserved.
    pub fn merge(&self, other: &RangeSubResult) -> Result<RangeSubResult> {
        if self.nq != other.nq {
            return Err(Error::precondition(format!(
                "nq mismatch: {} vs {}",
                self.nq, other.nq
            )));
        }
        if self.metric != other.metric {
            return Err(Error::precondition("metric mismatch".to_string()));
        }
        if self.radius != other.radius {
            return Err(Error::precondition(format!(
                "radius mismatch: {} vs {}",
                self.radius, other.radius
            )));
        }

        let total = self.seg_offsets.len() + other.seg_offsets.len();
        let mut lims = Vec::with_capacity(self.nq + 1);
        let mut seg_offsets = Vec::with_capacity(total);
        let mut distances = Vec::with_capacity(total);
        lims.push(0);

        for q in 0..self.nq {
            let (left_ids, left_dists) = self.query_slice(q);
            let (right_ids, right_dists) = other.query_slice(q);
            seg_offsets.extend_from_slice(left_ids);
            seg_offsets.extend_from_slice(right_ids);
            distances.extend_from_slice(left_dists);
            distances.extend_from_slice(right_dists);
            lims.push(seg_offsets.len());
        }

        Ok(RangeSubResult::from_parts(
            self.nq,
            self.radius,
            self.metric,
            self.round_decimal,
            lims,
            seg_offsets,
            distances,
        ))
    }

    /// Apply the rounding filter in place.
    pub fn round_values(&mut self) {
        crate::rounding::round_in_place(&mut self.distances, self.round_decimal);
    }
}
