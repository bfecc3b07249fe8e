use segcore_reduce::pipeline;
use segcore_reduce::{
    BitsetView, BruteForceKernel, Chunk, Metric, RangeSearchDataset, SearchConfig, SearchDataset,
};

fn chunks_from_rows(base: &[f32], dim: usize, rows_per_chunk: usize) -> Vec<Chunk<'_>> {
    let total_rows = base.len() / dim;
    let mut chunks = Vec::new();
    let mut start_row = 0;
    while start_row < total_rows {
        let rows = rows_per_chunk.min(total_rows - start_row);
        let start = start_row * dim;
        let end = start + rows * dim;
        chunks.push(Chunk {
            chunk_rows: rows,
            chunk_data_raw: &base[start..end],
        });
        start_row += rows;
    }
    chunks
}

#[test]
fn topk_over_many_chunks_matches_single_chunk() {
    let dim = 4;
    let base: Vec<f32> = (0..40)
        .map(|i| (i % 17) as f32)
        .collect();
    let query = vec![0.0, 0.0, 0.0, 0.0];
    let dataset = SearchDataset {
        nq: 1,
        dim,
        topk: 3,
        round_decimal: -1,
        query_data: &query,
    };
    let config = SearchConfig::new(Metric::L2, dim as i64, 3);
    let kernel = BruteForceKernel;

    let single = pipeline::run_topk(
        &dataset,
        &chunks_from_rows(&base, dim, 10),
        &config,
        &kernel,
        &BitsetView::pass_all(),
    )
    .unwrap();

    let many = pipeline::run_topk(
        &dataset,
        &chunks_from_rows(&base, dim, 2),
        &config,
        &kernel,
        &BitsetView::pass_all(),
    )
    .unwrap();

    assert_eq!(single.seg_offsets(), many.seg_offsets());
    assert_eq!(single.distances(), many.distances());
}

#[test]
fn deletion_bitset_excludes_ids_across_chunk_boundaries() {
    let dim = 1;
    let base: Vec<f32> = vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5];
    let query = vec![0.0];
    let dataset = SearchDataset {
        nq: 1,
        dim,
        topk: 1,
        round_decimal: -1,
        query_data: &query,
    };
    let config = SearchConfig::new(Metric::L2, dim as i64, 1);
    let kernel = BruteForceKernel;
    // Exclude the single closest id (0); the best remaining is id 1.
    let bitset = BitsetView::from_excluded_ids([0]);

    let result = pipeline::run_topk(
        &dataset,
        &chunks_from_rows(&base, dim, 2),
        &config,
        &kernel,
        &bitset,
    )
    .unwrap();

    assert_eq!(result.seg_offsets(), &[1]);
}

#[test]
fn ip_range_search_across_chunks_returns_band_members() {
    let dim = 2;
    let base: Vec<f32> = vec![1.0, 0.0, 0.8, 0.0, 0.2, 0.0, 0.0, 1.0];
    let query = vec![1.0, 0.0];
    let dataset = RangeSearchDataset {
        nq: 1,
        dim,
        radius: 0.3,
        low_bound: 0.3,
        high_bound: 0.95,
        round_decimal: -1,
        query_data: &query,
    };
    let config = SearchConfig::new(Metric::Ip, dim as i64, 1);
    let kernel = BruteForceKernel;

    let result = pipeline::run_range(
        &dataset,
        &chunks_from_rows(&base, dim, 2),
        &config,
        &kernel,
        &BitsetView::pass_all(),
    )
    .unwrap();

    // Native range search copies the kernel's own radius filter verbatim
    // (the low/high band is only enforced by the top-K projector, not here):
    // id 0 (IP 1.0) and id 1 (IP 0.8) both clear the 0.3 radius, ids 2 and 3
    // don't.
    assert_eq!(result.seg_offsets(), &[0, 1]);
}

#[test]
fn rounding_applies_once_after_all_chunk_merges() {
    let dim = 1;
    let base: Vec<f32> = vec![1.0005, 2.0005];
    let query = vec![0.0];
    let dataset = SearchDataset {
        nq: 1,
        dim,
        topk: 2,
        round_decimal: 3,
        query_data: &query,
    };
    let config = SearchConfig::new(Metric::L2, dim as i64, 2).with_round_decimal(3);
    let kernel = BruteForceKernel;

    let result = pipeline::run_topk(
        &dataset,
        &chunks_from_rows(&base, dim, 1),
        &config,
        &kernel,
        &BitsetView::pass_all(),
    )
    .unwrap();

    for d in result.distances() {
        let rounded = (d * 1000.0).round() / 1000.0;
        assert_eq!(*d, rounded);
    }
}
