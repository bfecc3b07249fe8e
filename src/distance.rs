//! SIMD-accelerated per-metric distance functions.
//!
//! Uses the `wide` crate for portable 8-wide SIMD, with a scalar remainder
//! loop for tails not divisible by 8. `L2` here is the *squared* Euclidean
//! distance — the reference kernel never takes the square root, matching the
//! internal representation the range→top-K projector's bound transformation
//! assumes.

use crate::metric::Metric;

/// Compute the raw per-metric distance between `a` and `b`.
///
/// `Hamming`/`Jaccard`/`Tanimoto` read `a`/`b` as 0/1-valued bit patterns (one
/// `f32` per bit), matching [`crate::metric::Metric`]'s documented convention.
pub fn compute(metric: Metric, a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    match metric {
        Metric::L2 => l2_squared_simd(a, b),
        Metric::Ip => dot_product_simd(a, b),
        Metric::Hamming => hamming_distance(a, b),
        Metric::Jaccard => jaccard_distance(a, b),
        Metric::Tanimoto => tanimoto_distance(a, b),
    }
}

/// Dot product via 8-wide SIMD with a scalar tail.
pub fn dot_product_simd(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let dim = a.len();
    let mut sum = wide::f32x8::ZERO;

    let chunks = dim / 8;
    for i in 0..chunks {
        let offset = i * 8;
        let va = wide::f32x8::from(&a[offset..offset + 8]);
        let vb = wide::f32x8::from(&b[offset..offset + 8]);
        sum += va * vb;
    }

    let mut result: f32 = sum.to_array().iter().sum();
    let start = chunks * 8;
    for i in start..dim {
        result += a[i] * b[i];
    }
    result
}

/// Squared Euclidean distance via 8-wide SIMD with a scalar tail.
pub fn l2_squared_simd(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let dim = a.len();
    let mut sum = wide::f32x8::ZERO;

    let chunks = dim / 8;
    for i in 0..chunks {
        let offset = i * 8;
        let va = wide::f32x8::from(&a[offset..offset + 8]);
        let vb = wide::f32x8::from(&b[offset..offset + 8]);
        let diff = va - vb;
        sum += diff * diff;
    }

    let mut result: f32 = sum.to_array().iter().sum();
    let start = chunks * 8;
    for i in start..dim {
        let diff = a[i] - b[i];
        result += diff * diff;
    }
    result
}

/// Count of differing bits, treating each element as 0/1-valued.
pub fn hamming_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .filter(|(x, y)| (**x != 0.0) != (**y != 0.0))
        .count() as f32
}

/// Jaccard distance `1 - |A∩B| / |A∪B|` over 0/1-valued bit vectors.
/// An empty union (both vectors all-zero) is defined as maximally dissimilar.
pub fn jaccard_distance(a: &[f32], b: &[f32]) -> f32 {
    let (mut intersection, mut union) = (0u32, 0u32);
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x != 0.0, *y != 0.0);
        if x && y {
            intersection += 1;
        }
        if x || y {
            union += 1;
        }
    }
    if union == 0 {
        1.0
    } else {
        1.0 - (intersection as f32 / union as f32)
    }
}

/// Tanimoto distance, the chemistry-literature variant of Jaccard. Expressed
/// in log-odds form: `-log2(similarity)` where `similarity` is the Jaccard
/// set-overlap ratio, so a perfect match is `0` and a perfect mismatch is
/// `+inf` rather than Jaccard's bounded `[0, 1]`.
pub fn tanimoto_distance(a: &[f32], b: &[f32]) -> f32 {
    let (mut intersection, mut union) = (0u32, 0u32);
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x != 0.0, *y != 0.0);
        if x && y {
            intersection += 1;
        }
        if x || y {
            union += 1;
        }
    }
    if union == 0 {
        0.0
    } else {
        let similarity = intersection as f32 / union as f32;
        -similarity.log2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, epsilon: f32) {
        assert!((a - b).abs() < epsilon, "expected {a} close to {b}");
    }

    #[test]
    fn dot_product_matches_scalar() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let b = vec![1.0; 10];
        let scalar: f32 = a.iter().sum();
        assert_close(dot_product_simd(&a, &b), scalar, 1e-6);
    }

    #[test]
    fn l2_squared_matches_scalar_definition() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 6.0, 8.0];
        // (4-1)^2 + (6-2)^2 + (8-3)^2 = 9 + 16 + 25 = 50
        assert_close(l2_squared_simd(&a, &b), 50.0, 1e-6);
    }

    #[test]
    fn l2_squared_self_distance_is_zero() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        assert_close(l2_squared_simd(&a, &a), 0.0, 1e-6);
    }

    #[test]
    fn hamming_counts_differing_bits() {
        let a = vec![1.0, 0.0, 1.0, 1.0];
        let b = vec![1.0, 1.0, 0.0, 1.0];
        assert_eq!(hamming_distance(&a, &b), 2.0);
    }

    #[test]
    fn jaccard_identical_sets_is_zero() {
        let a = vec![1.0, 0.0, 1.0, 0.0];
        assert_close(jaccard_distance(&a, &a), 0.0, 1e-6);
    }

    #[test]
    fn jaccard_disjoint_sets_is_one() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 1.0];
        assert_close(jaccard_distance(&a, &b), 1.0, 1e-6);
    }

    #[test]
    fn jaccard_both_empty_is_one() {
        let a = vec![0.0, 0.0, 0.0];
        assert_close(jaccard_distance(&a, &a), 1.0, 1e-6);
    }

    #[test]
    fn tanimoto_identical_sets_is_zero() {
        let a = vec![1.0, 1.0, 0.0, 1.0];
        assert_close(tanimoto_distance(&a, &a), 0.0, 1e-6);
    }

    #[test]
    fn compute_dispatches_on_metric() {
        let a = vec![1.0, 0.0, 1.0];
        let b = vec![1.0, 1.0, 0.0];
        assert_eq!(compute(Metric::Hamming, &a, &b), hamming_distance(&a, &b));
        assert_eq!(compute(Metric::Ip, &a, &b), dot_product_simd(&a, &b));
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_l2_squared_symmetric(
            a in prop::collection::vec(-10.0f32..10.0, 1..40),
            b in prop::collection::vec(-10.0f32..10.0, 1..40)
        ) {
            let max_len = a.len().max(b.len());
            let mut a = a;
            let mut b = b;
            a.resize(max_len, 0.0);
            b.resize(max_len, 0.0);
            prop_assert!((l2_squared_simd(&a, &b) - l2_squared_simd(&b, &a)).abs() < 1e-3);
        }

        #[test]
        fn prop_l2_squared_non_negative(
            a in prop::collection::vec(-10.0f32..10.0, 1..40),
            b in prop::collection::vec(-10.0f32..10.0, 1..40)
        ) {
            let max_len = a.len().max(b.len());
            let mut a = a;
            let mut b = b;
            a.resize(max_len, 0.0);
            b.resize(max_len, 0.0);
            prop_assert!(l2_squared_simd(&a, &b) >= 0.0);
        }

        #[test]
        fn prop_jaccard_bounded(
            a in prop::collection::vec(prop::bool::ANY, 1..40),
            b in prop::collection::vec(prop::bool::ANY, 1..40)
        ) {
            let max_len = a.len().max(b.len());
            let to_f32 = |v: &Vec<bool>| -> Vec<f32> {
                let mut out: Vec<f32> = v.iter().map(|x| if *x { 1.0 } else { 0.0 }).collect();
                out.resize(max_len, 0.0);
                out
            };
            let a = to_f32(&a);
            let b = to_f32(&b);
            let d = jaccard_distance(&a, &b);
            prop_assert!((0.0..=1.0).contains(&d));
        }
    }
}
