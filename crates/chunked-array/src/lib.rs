//! Eager and Lazy Coordinate Arrays
//!
//! This crate provides the array abstraction the mesh geometry is written
//! against. A [`CoordArray`] is either:
//!
//! - **Eager**: an in-memory `ndarray` array, computed immediately
//! - **Lazy**: a block-partitioned graph whose blocks are computed on demand
//!
//! Both backends expose the same capability set (slicing, concatenation,
//! stacking, elementwise arithmetic, axis reversal and broadcasting), so
//! geometry code never branches on the backend.
//!
//! # Architecture
//!
//! ```text
//! CoordArray::lazy(array, chunk_shape)
//!      │
//!      ▼
//! LazyArray { ChunkGrid, [Block] }
//!      │
//!      ├─► slice / concatenate / stack / zip_with
//!      │         │
//!      │         └─► new LazyArray whose kernels read source blocks
//!      │
//!      └─► compute()
//!               │
//!               ├─► evaluate blocks (rayon, memoised)
//!               │
//!               └─► assemble into ArrayD<f64>
//! ```
//!
//! # Example
//!
//! ```
//! use chunked_array::CoordArray;
//! use ndarray::array;
//!
//! let x = CoordArray::lazy(array![[0.0, 10.0], [10.0, 20.0]], &[1, 2]).unwrap();
//! let doubled = x.mul_scalar(2.0);
//! assert!(doubled.is_lazy());
//! assert_eq!(doubled.to_array2().unwrap(), array![[0.0, 20.0], [20.0, 40.0]]);
//! ```

pub mod chunks;
pub mod config;
pub mod coord;
pub mod error;
pub mod lazy;

// Re-export commonly used types at crate root
pub use chunks::ChunkGrid;
pub use config::{ChunkConfig, DEFAULT_CHUNK_SIZE};
pub use coord::CoordArray;
pub use error::{ArrayError, Result};
pub use lazy::LazyArray;
pub use swath_common::Backend;
