//! Timing diagnostics for the classification run.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Wall-clock profile of one `classify` invocation, in milliseconds.
///
/// The pipeline has a fixed stage sequence, so each stage gets its own
/// field rather than a generic label list: prior estimation, horizontal
/// binning, the parallel per-window classification, the two along-track
/// smoothing passes, and the final assignment.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTimings {
    pub prior_ms: f64,
    pub binning_ms: f64,
    pub windows_ms: f64,
    pub surface_smoothing_ms: f64,
    pub bathy_smoothing_ms: f64,
    pub assignment_ms: f64,
    pub total_ms: f64,
}

impl StageTimings {
    /// Photon throughput over the whole run; 0 when no time was measured.
    pub fn photons_per_second(&self, photons: usize) -> f64 {
        if self.total_ms <= 0.0 {
            return 0.0;
        }
        photons as f64 / (self.total_ms / 1e3)
    }

    /// Time spent outside the accounted stages (I/O-free overhead).
    pub fn unaccounted_ms(&self) -> f64 {
        let accounted = self.prior_ms
            + self.binning_ms
            + self.windows_ms
            + self.surface_smoothing_ms
            + self.bathy_smoothing_ms
            + self.assignment_ms;
        (self.total_ms - accounted).max(0.0)
    }
}

/// Run a closure and report its result together with the elapsed time.
pub fn run_with_timer<R, F: FnOnce() -> R>(f: F) -> (R, f64) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed().as_secs_f64() * 1000.0)
}
