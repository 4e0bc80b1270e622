//! Numerical utilities shared by the pipeline stages.
//!
//! Everything here operates on plain `f64` slices: descriptive statistics,
//! histogram-to-PMF conversion, a fast box-chain approximation of Gaussian
//! smoothing, and 1-D peak detection with prominence and minimum-distance
//! gating. All functions are deterministic and allocation is kept to the
//! output buffers.

pub mod filter;
pub mod peaks;
pub mod stats;

pub use filter::{box_filter, gaussian_filter};
pub use peaks::find_peaks;
pub use stats::{convert_to_pmf, mean, median, normalize, variance};
