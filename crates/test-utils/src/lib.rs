//! Shared test utilities for the swath-mesh workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Approximate equality macros for scalars, coordinate pairs and arrays
//! - Synthetic centroid generators
//! - Reference grids with known corner values
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_allclose, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

use ndarray::{ArrayBase, Data, Dimension};

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of coordinate pairs.
///
/// ```ignore
/// assert_coords_approx_eq!((1.0001, 2.0001), (1.0, 2.0), 0.001);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}

/// Default absolute tolerance of [`assert_allclose!`].
pub const DEFAULT_ATOL: f64 = 1e-9;

/// Macro for elementwise approximate equality of two arrays.
///
/// Shapes must match exactly. NaN matches NaN.
///
/// ```ignore
/// assert_allclose!(corners, expected);
/// assert_allclose!(corners, expected, 1e-4);
/// ```
#[macro_export]
macro_rules! assert_allclose {
    ($actual:expr, $expected:expr) => {
        $crate::check_allclose(&$actual, &$expected, $crate::DEFAULT_ATOL)
    };
    ($actual:expr, $expected:expr, $atol:expr) => {
        $crate::check_allclose(&$actual, &$expected, $atol as f64)
    };
}

/// Panic unless `actual` and `expected` agree elementwise within `atol`.
#[track_caller]
pub fn check_allclose<S1, S2, D1, D2>(
    actual: &ArrayBase<S1, D1>,
    expected: &ArrayBase<S2, D2>,
    atol: f64,
) where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D1: Dimension,
    D2: Dimension,
{
    assert_eq!(
        actual.shape(),
        expected.shape(),
        "shape mismatch between actual and expected arrays"
    );
    for (flat, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        let matches = (a.is_nan() && e.is_nan()) || (a - e).abs() <= atol;
        if !matches {
            panic!(
                "arrays differ at flat index {}: actual `{:?}`, expected `{:?}` (atol {:?})\nactual:\n{}\nexpected:\n{}",
                flat, a, e, atol, actual, expected
            );
        }
    }
}
