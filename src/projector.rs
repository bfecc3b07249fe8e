//! Range→top-K projector: turns unbounded range-search output into a
//! fixed-width [`TopKSubResult`] filtered by a closed `[low_bound,
//! high_bound]` band, using the metric-appropriate heap.

use crate::bitset::BitsetView;
use crate::error::{Error, Result};
use crate::heap;
use crate::metric::{Metric, Order, SENTINEL_ID};
use crate::subresult::TopKSubResult;
use tracing::debug;

/// Project a range-search result onto a `TopKSubResult`.
///
/// `low_bound`/`high_bound` are in *user-facing* metric space (linear L2, not
/// squared); for `metric == L2` they are squared internally before being
/// compared against the kernel's (squared) distances.
///
/// Returns the projected result and the total count of non-sentinel hits
/// across all queries.
#[allow(clippy::too_many_arguments)]
pub fn project_range_to_topk(
    metric: Metric,
    nq: usize,
    topk: usize,
    round_decimal: i32,
    low_bound: f32,
    high_bound: f32,
    lims: &[usize],
    ids: &[i64],
    distances: &[f32],
    bitset: &BitsetView,
) -> Result<(TopKSubResult, usize)> {
    debug_assert_eq!(lims.len(), nq + 1);

    let (lb, hb) = if matches!(metric, Metric::L2) {
        (low_bound * low_bound, high_bound * high_bound)
    } else {
        (low_bound, high_bound)
    };
    debug!(metric = ?metric, low_bound, high_bound, lb, hb, "projector bound transformation");

    let order = metric.order();
    let sentinel = metric.sentinel_distance();
    let mut out_ids = vec![SENTINEL_ID; nq * topk];
    let mut out_dists = vec![sentinel; nq * topk];
    let mut total = 0usize;

    for q in 0..nq {
        let start = lims[q];
        let end = lims[q + 1];
        let dist_slot = &mut out_dists[q * topk..(q + 1) * topk];
        let id_slot = &mut out_ids[q * topk..(q + 1) * topk];
        heap::heapify(order, dist_slot, id_slot);

        for idx in start..end {
            let id = ids[idx];
            let d = distances[idx];
            if !bitset.empty() && bitset.test(id as u32) {
                return Err(Error::invariant(format!(
                    "candidate id {id} is excluded by the bitset"
                )));
            }

            let in_band = match order {
                Order::Descending => {
                    if d <= lb {
                        return Err(Error::invariant(format!(
                            "candidate distance {d} does not exceed low bound {lb} under IP polarity"
                        )));
                    }
                    d <= hb
                }
                Order::Ascending => {
                    if d >= hb {
                        return Err(Error::invariant(format!(
                            "candidate distance {d} is not below high bound {hb}"
                        )));
                    }
                    d >= lb
                }
            };

            if in_band && order.admits(d, dist_slot[0]) {
                heap::replace_top(order, dist_slot, id_slot, d, id);
            }
        }

        total += heap::reorder(order, dist_slot, id_slot);
    }

    debug!(total_hits = total, "projector completed");
    Ok((
        TopKSubResult::from_parts(nq, topk, metric, round_decimal, out_ids, out_dists),
        total,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Scenario S3: L2 range projection with the squared-bound transformation.
    // The kernel is trusted to have already enforced the high bound, so all
    // candidates here fall at or below the squared high bound (9); the
    // projector's own job is filtering out anything below the squared low
    // bound (1).
    #[test]
    fn s3_l2_range_projection() {
        // low_bound=1.0, high_bound=3.0 in user space -> squared band [1, 9].
        let lims = vec![0, 3];
        let ids = vec![1, 2, 3];
        let distances = vec![0.5, 4.0, 8.0]; // squared distances
        let (result, total) = project_range_to_topk(
            Metric::L2,
            1,
            2,
            -1,
            1.0,
            3.0,
            &lims,
            &ids,
            &distances,
            &BitsetView::pass_all(),
        )
        .unwrap();
        assert_eq!(total, 2);
        assert_eq!(result.seg_offsets(), &[2, 3]);
        assert_eq!(result.distances(), &[4.0, 8.0]);
    }

    // Scenario S4: IP range projection. The kernel is trusted to have already
    // enforced the low bound (it was passed as the kernel's own radius), so
    // all candidates here exceed it; the projector's own job is filtering
    // out anything above the high bound.
    #[test]
    fn s4_ip_range_projection() {
        let lims = vec![0, 3];
        let ids = vec![1, 2, 3];
        let distances = vec![0.9, 0.5, 0.4];
        let (result, total) = project_range_to_topk(
            Metric::Ip,
            1,
            2,
            -1,
            0.3,
            0.95,
            &lims,
            &ids,
            &distances,
            &BitsetView::pass_all(),
        )
        .unwrap();
        assert_eq!(total, 2);
        assert_eq!(result.seg_offsets(), &[1, 2]);
        assert_eq!(result.distances(), &[0.9, 0.5]);
    }

    // `Error::invariant` debug_asserts before returning, so in a debug test
    // build a bitset contract violation panics rather than surfacing as an
    // `Err` (fatal unless debug assertions are disabled — see error.rs).
    #[test]
    #[should_panic(expected = "candidate id 7 is excluded by the bitset")]
    fn bitset_violation_is_an_invariant_error() {
        let lims = vec![0, 1];
        let ids = vec![7];
        let distances = vec![1.0];
        let bitset = BitsetView::from_excluded_ids([7]);
        let _ = project_range_to_topk(
            Metric::L2, 1, 1, -1, 0.0, 5.0, &lims, &ids, &distances, &bitset,
        );
    }

    #[test]
    fn fewer_hits_than_topk_pads_with_sentinels() {
        let lims = vec![0, 1];
        let ids = vec![9];
        let distances = vec![2.0];
        let (result, total) = project_range_to_topk(
            Metric::L2,
            1,
            4,
            -1,
            0.0,
            5.0,
            &lims,
            &ids,
            &distances,
            &BitsetView::pass_all(),
        )
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(result.seg_offsets()[1..], [SENTINEL_ID; 3]);
    }
}
