//! Distance metrics and the ordering polarity they imply.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Distance/similarity metric tag. Determines both how the reference kernel
/// scores a pair of vectors and which way the heap and merge operators order
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Euclidean (L2) distance. Smaller is better.
    L2,
    /// Inner product. Larger is better.
    Ip,
    /// Hamming distance over packed bits. Smaller is better.
    Hamming,
    /// Jaccard distance over set-valued bit vectors. Smaller is better.
    Jaccard,
    /// Tanimoto distance, the chemistry-literature variant of Jaccard.
    /// Smaller is better.
    Tanimoto,
}

/// Ordering polarity implied by a [`Metric`]. This is the single source of
/// truth for heap direction and sort order; nothing downstream should
/// special-case individual metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Smaller distances are better (L2, Hamming, Jaccard, Tanimoto).
    Ascending,
    /// Larger distances are better (IP).
    Descending,
}

impl Metric {
    /// Parse a metric from its config-map spelling (`METRIC_TYPE`).
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "L2" => Ok(Metric::L2),
            "IP" => Ok(Metric::Ip),
            "HAMMING" => Ok(Metric::Hamming),
            "JACCARD" => Ok(Metric::Jaccard),
            "TANIMOTO" => Ok(Metric::Tanimoto),
            other => Err(Error::config(format!("unknown metric type: {other}"))),
        }
    }

    /// The ordering polarity this metric implies.
    pub const fn order(&self) -> Order {
        match self {
            Metric::Ip => Order::Descending,
            Metric::L2 | Metric::Hamming | Metric::Jaccard | Metric::Tanimoto => Order::Ascending,
        }
    }

    /// `true` for IP, the only metric where larger is better.
    pub const fn is_ip(&self) -> bool {
        matches!(self.order(), Order::Descending)
    }

    /// The sentinel distance for an unfilled top-K slot under this metric:
    /// `+inf` for ascending-better metrics, `-inf` for IP.
    pub const fn sentinel_distance(&self) -> f32 {
        match self.order() {
            Order::Ascending => f32::INFINITY,
            Order::Descending => f32::NEG_INFINITY,
        }
    }
}

/// Reserved id marking an unfilled top-K slot.
pub const SENTINEL_ID: i64 = -1;

impl Order {
    /// `true` iff `candidate` is strictly better than `incumbent` under this
    /// order.
    #[inline]
    pub fn better(&self, candidate: f32, incumbent: f32) -> bool {
        match self {
            Order::Ascending => candidate < incumbent,
            Order::Descending => candidate > incumbent,
        }
    }

    /// `true` iff `candidate` is at least as good as `incumbent`, i.e. would
    /// be admitted into a bounded top-K that currently holds `incumbent` as
    /// its worst entry.
    #[inline]
    pub fn admits(&self, candidate: f32, incumbent: f32) -> bool {
        match self {
            Order::Ascending => candidate <= incumbent,
            Order::Descending => candidate >= incumbent,
        }
    }

    /// Comparator implementing metric-preferred order: the better distance
    /// sorts first; ties break on smaller id.
    #[inline]
    pub fn cmp_entry(&self, (d_a, id_a): (f32, i64), (d_b, id_b): (f32, i64)) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        let primary = match self {
            Order::Ascending => d_a.partial_cmp(&d_b).unwrap_or(Ordering::Equal),
            Order::Descending => d_b.partial_cmp(&d_a).unwrap_or(Ordering::Equal),
        };
        primary.then_with(|| id_a.cmp(&id_b))
    }
}
