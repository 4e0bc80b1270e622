//! Detector pipeline driving the classification end-to-end.
//!
//! The [`BathyDetector`] exposes a simple API: feed a photon track and get
//! the same photons back, labelled and annotated with smoothed surface and
//! seabed elevations. Internally it coordinates the global surface prior,
//! spatial binning, the parallel per-window peak classification, the
//! along-track smoothing of both elevation profiles and the final label
//! assignment.
//!
//! Typical usage:
//! ```no_run
//! use bathy_detector::{BathyDetector, BathyParams};
//! # fn example(photons: Vec<bathy_detector::Photon>) {
//! let detector = BathyDetector::new(BathyParams::default());
//! let report = detector.classify_with_report(&photons);
//! println!("{} surface windows", report.summary.surface_windows);
//! # }
//! ```

use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::binning::horizontal_bins;
use crate::diagnostics::{run_with_timer, StageTimings};
use crate::types::{
    Photon, SurfacePrior, WindowEstimate, CLASS_BATHYMETRY, CLASS_SEA_SURFACE, CLASS_UNCLASSIFIED,
    CLASS_UNPROCESSED,
};

use super::params::BathyParams;
use super::prior::surface_prior;
use super::smoothing::smooth_channel;
use super::window::classify_window;

/// Classifier orchestrating prior estimation, binning, per-window peak
/// selection, along-track smoothing and label assignment.
pub struct BathyDetector {
    params: BathyParams,
}

/// Run statistics alongside the labelled photons.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub photons: usize,
    pub windows: usize,
    pub surface_windows: usize,
    pub bathy_windows: usize,
    pub surface_photons: usize,
    pub bathy_photons: usize,
    pub prior: SurfacePrior,
    pub timing: StageTimings,
}

/// Labelled photons plus the run summary.
#[derive(Clone, Debug)]
pub struct ClassificationReport {
    pub photons: Vec<Photon>,
    pub summary: RunSummary,
}

impl BathyDetector {
    /// Create a detector with the supplied parameters.
    pub fn new(params: BathyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BathyParams {
        &self.params
    }

    /// Classify a photon track, returning the labelled photons in input
    /// order.
    pub fn classify(&self, photons: &[Photon]) -> Vec<Photon> {
        self.classify_with_report(photons).photons
    }

    /// Classify a photon track and capture the run summary.
    pub fn classify_with_report(&self, photons: &[Photon]) -> ClassificationReport {
        let mut out: Vec<Photon> = photons.to_vec();
        let mut summary = RunSummary {
            photons: photons.len(),
            ..RunSummary::default()
        };
        if photons.is_empty() {
            return ClassificationReport {
                photons: out,
                summary,
            };
        }
        let total_start = std::time::Instant::now();

        let (prior, elapsed) = run_with_timer(|| surface_prior(photons, &self.params));
        summary.prior = prior;
        summary.timing.prior_ms = elapsed;

        let (hbins, elapsed) = run_with_timer(|| horizontal_bins(photons, &self.params));
        summary.windows = hbins.windows.len();
        summary.timing.binning_ms = elapsed;
        debug!(
            "classify start: {} photons, {} windows, prior mean={:.3} var={:.4}",
            photons.len(),
            hbins.windows.len(),
            prior.mean,
            prior.variance
        );

        // Windows are independent; each iteration only reads the shared
        // photon array and produces its own estimate.
        let (estimates, elapsed) = run_with_timer(|| {
            hbins
                .windows
                .par_iter()
                .map(|members| classify_window(photons, members, &prior, &self.params))
                .collect::<Vec<WindowEstimate>>()
        });
        summary.timing.windows_ms = elapsed;

        summary.surface_windows = estimates.iter().filter(|e| e.surface.is_some()).count();
        summary.bathy_windows = estimates.iter().filter(|e| e.bathy.is_some()).count();
        debug!(
            "{}/{} windows with a surface, {} with bathymetry",
            summary.surface_windows,
            estimates.len(),
            summary.bathy_windows
        );

        let (surface_profile, elapsed) = run_with_timer(|| {
            smooth_channel(
                photons,
                hbins.x_min,
                hbins.x_max,
                &estimates,
                |e| e.surface.as_ref(),
                self.params.surface_smoothing_sigma,
            )
        });
        summary.timing.surface_smoothing_ms = elapsed;

        let (bathy_profile, elapsed) = run_with_timer(|| {
            smooth_channel(
                photons,
                hbins.x_min,
                hbins.x_max,
                &estimates,
                |e| e.bathy.as_ref(),
                self.params.bathy_smoothing_sigma,
            )
        });
        summary.timing.bathy_smoothing_ms = elapsed;

        let (_, elapsed) = run_with_timer(|| {
            self.assign(&mut out, &estimates, &surface_profile, &bathy_profile);
        });
        summary.timing.assignment_ms = elapsed;

        summary.surface_photons = out
            .iter()
            .filter(|p| p.prediction == CLASS_SEA_SURFACE)
            .count();
        summary.bathy_photons = out
            .iter()
            .filter(|p| p.prediction == CLASS_BATHYMETRY)
            .count();
        summary.timing.total_ms = total_start.elapsed().as_secs_f64() * 1000.0;

        ClassificationReport {
            photons: out,
            summary,
        }
    }

    /// Stamp classes and smoothed elevations onto the output photons.
    ///
    /// Bathymetry is written after the surface; the bathy selection only
    /// ever draws from photons below the surface band, so the two sets
    /// cannot overlap.
    fn assign(
        &self,
        out: &mut [Photon],
        estimates: &[WindowEstimate],
        surface_profile: &[f64],
        bathy_profile: &[f64],
    ) {
        out.par_iter_mut().enumerate().for_each(|(i, p)| {
            p.prediction = if p.z >= self.params.z_min && p.z <= self.params.z_max {
                CLASS_UNCLASSIFIED
            } else {
                CLASS_UNPROCESSED
            };
            p.surface_elevation = surface_profile[i];
            p.bathy_elevation = bathy_profile[i];
        });

        for est in estimates {
            if let Some(surface) = &est.surface {
                for &i in &surface.indices {
                    out[i].prediction = CLASS_SEA_SURFACE;
                }
            }
        }
        for est in estimates {
            if let Some(bathy) = &est.bathy {
                for &i in &bathy.indices {
                    out[i].prediction = CLASS_BATHYMETRY;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shallow_track() -> Vec<Photon> {
        // 50 m of track: surface photons near 0.1 m, seabed near -6 m.
        let mut photons = Vec::new();
        for w in 0..5 {
            for i in 0..30 {
                photons.push(Photon {
                    index: photons.len() as u64,
                    x: w as f64 * 10.0 + 0.3 * (i % 30) as f64,
                    z: 0.1 + 0.01 * (i % 9) as f64,
                    ..Photon::default()
                });
            }
            for i in 0..10 {
                photons.push(Photon {
                    index: photons.len() as u64,
                    x: w as f64 * 10.0 + 0.9 * (i % 10) as f64,
                    z: -6.05 + 0.02 * (i % 3) as f64,
                    ..Photon::default()
                });
            }
        }
        // A couple of photons outside the z band.
        photons.push(Photon {
            index: photons.len() as u64,
            x: 25.0,
            z: -80.0,
            ..Photon::default()
        });
        photons.push(Photon {
            index: photons.len() as u64,
            x: 35.0,
            z: 50.0,
            ..Photon::default()
        });
        photons
    }

    #[test]
    fn labels_surface_and_seabed() {
        let photons = shallow_track();
        let detector = BathyDetector::new(BathyParams::default());
        let report = detector.classify_with_report(&photons);

        assert_eq!(report.photons.len(), photons.len());
        assert!(report.summary.surface_windows >= 4);
        assert!(report.summary.bathy_windows >= 4);
        assert!(report.summary.surface_photons >= 100);
        assert!(report.summary.bathy_photons >= 30);

        for (inp, outp) in photons.iter().zip(&report.photons) {
            assert_eq!(inp.index, outp.index);
            assert_eq!(inp.x, outp.x);
            assert_eq!(inp.z, outp.z);
        }
    }

    #[test]
    fn out_of_band_photons_stay_unprocessed() {
        let photons = shallow_track();
        let detector = BathyDetector::new(BathyParams::default());
        let out = detector.classify(&photons);
        let n = out.len();
        assert_eq!(out[n - 2].prediction, CLASS_UNPROCESSED);
        assert_eq!(out[n - 1].prediction, CLASS_UNPROCESSED);
        // They still receive smoothed elevations.
        assert!(out[n - 2].surface_elevation.is_finite());
    }

    #[test]
    fn bathy_photons_sit_below_the_prior() {
        let photons = shallow_track();
        let detector = BathyDetector::new(BathyParams::default());
        let report = detector.classify_with_report(&photons);
        let prior = report.summary.prior;
        assert!(!prior.is_degenerate());
        let ceiling =
            prior.mean - detector.params().bathy_n_stddev * prior.stddev();
        for p in &report.photons {
            if p.prediction == CLASS_BATHYMETRY {
                assert!(p.z < ceiling, "bathy photon at z={} above {}", p.z, ceiling);
            }
        }
    }

    #[test]
    fn empty_input_is_a_noop() {
        let detector = BathyDetector::new(BathyParams::default());
        let report = detector.classify_with_report(&[]);
        assert!(report.photons.is_empty());
        assert_eq!(report.summary.windows, 0);
    }

    #[test]
    fn classification_is_deterministic() {
        let photons = shallow_track();
        let detector = BathyDetector::new(BathyParams::default());
        let a = detector.classify(&photons);
        let b = detector.classify(&photons);
        assert_eq!(a, b);
    }
}
