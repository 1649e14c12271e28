//! Shared test utilities for the ostn-transform workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic OSTN correction dataset generators
//! - Ordnance Survey reference fixtures
//! - Test data path helpers and a skip macro for the real dataset
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
//! use test_utils::{require_test_file, create_ostn_dataset, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// The full OSTN02 dataset is not committed to the repository. Tests that
/// need it return early with a skip message when it cannot be located.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_real_grid() {
///     let path = require_test_file!("OSTN02_OSGM02_GB.txt");
///     // Test code using path...
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Set TEST_DATA_DIR to the directory holding it.",
                    $name
                );
                return;
            }
        }
    }};
}

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
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of an (easting, northing) pair.
///
/// ```ignore
/// use test_utils::assert_grid_approx_eq;
///
/// assert_grid_approx_eq!((651409.8041, 313177.4502), (651409.804, 313177.450), 0.001);
/// ```
#[macro_export]
macro_rules! assert_grid_approx_eq {
    (($e1:expr, $n1:expr), ($e2:expr, $n2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($e1, $e2, $epsilon);
        $crate::assert_approx_eq!($n1, $n2, $epsilon);
    }};
}
