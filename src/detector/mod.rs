//! Photon classifier orchestrating the surface/bathymetry pipeline.
//!
//! Overview
//! - Estimates a global sea-surface prior: the median elevation inside a
//!   broad search band, reselected within ±1 m and summarised as a
//!   `(mean, variance)` gate.
//! - Buckets photons into along-track windows and per-window elevation
//!   bins.
//! - Per window, detects peaks in the smoothed elevation PMF, picks the
//!   surface peak inside the prior band (close calls go to the higher
//!   elevation) and the strongest peak clearly below the surface for the
//!   seabed, then selects member photons by local mean ± N·σ.
//! - Stamps the sparse window elevations onto a dense 5 m grid, gap-fills
//!   symmetrically, smooths along-track, and projects surface and seabed
//!   elevations back onto every photon.
//!
//! Windows are classified in parallel; every parallel iteration writes a
//! disjoint slice of the output, so the result is deterministic and the
//! photon order is preserved end-to-end.
//!
//! Modules
//! - `pipeline` – the main [`BathyDetector`] implementation.
//! - `params` – the [`BathyParams`] configuration record.
//! - `prior`, `window`, `smoothing` – the individual stages.

pub mod params;
pub mod pipeline;
pub mod prior;
pub mod smoothing;
pub mod window;

pub use params::BathyParams;
pub use pipeline::{BathyDetector, ClassificationReport, RunSummary};
pub use prior::surface_prior;
