//! segcore-reduce - search-result assembly for a vector-search segment engine
//!
//! This crate is the core that turns raw per-chunk similarity computations
//! into a final, correctly ordered, bounded result set for a batch of
//! queries. It covers the brute-force per-chunk searcher, the sub-result
//! data model and its merge operators, the range→top-K projector, the
//! rounding filter, and the pipeline driver that ties them together.
//!
//! # Core Philosophy
//!
//! - **Deterministic correctness**: merges are commutative/associative up to
//!   an explicit tie-break rule, so chunk partitioning never changes results.
//! - **Single-threaded, synchronous, no I/O**: this crate does no persistence
//!   and holds no state beyond one call.
//!
//! # Example
//!
//! ```
//! use segcore_reduce::{
//!     BitsetView, BruteForceKernel, Chunk, Metric, SearchConfig, SearchDataset, pipeline,
//! };
//!
//! let base: Vec<f32> = vec![0.0, 0.0, 1.0, 1.0, 5.0, 5.0];
//! let chunk = Chunk { chunk_rows: 3, chunk_data_raw: &base };
//! let query = vec![0.0, 0.0];
//! let dataset = SearchDataset { nq: 1, dim: 2, topk: 2, round_decimal: -1, query_data: &query };
//! let config = SearchConfig::new(Metric::L2, 2, 2);
//!
//! let result = pipeline::run_topk(
//!     &dataset,
//!     &[chunk],
//!     &config,
//!     &BruteForceKernel,
//!     &BitsetView::pass_all(),
//! ).unwrap();
//! assert_eq!(result.seg_offsets(), &[0, 1]);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bitset;
pub mod config;
pub mod distance;
pub mod error;
pub mod heap;
pub mod kernel;
pub mod metric;
pub mod pipeline;
pub mod projector;
pub mod rounding;
pub mod searcher;
pub mod subresult;

pub use bitset::BitsetView;
pub use config::SearchConfig;
pub use error::{Error, Result};
pub use kernel::{BruteForceKernel, VectorKernel};
pub use metric::{Metric, Order};
pub use pipeline::Chunk;
pub use searcher::{RangeSearchDataset, SearchDataset};
pub use subresult::{RangeSubResult, TopKSubResult};
