//! Global sea-surface prior.
//!
//! One pass over the whole track yields a coarse `(mean, variance)` of the
//! surface elevation. The water surface dominates the photon count in the
//! broad search band, so the median is robust against the seabed tail; a
//! ±1 m reselection around the median then tightens the spread before the
//! moments are taken.

use log::debug;

use crate::math::{mean, median, variance};
use crate::types::{Photon, SurfacePrior, CLASS_SEA_SURFACE};

use super::params::BathyParams;

/// Half-width of the reselection band around the median, metres.
const REFINE_HALF_WIDTH: f64 = 1.0;

/// Estimate the global surface prior.
///
/// With `use_predictions` set, photons already labelled sea surface define
/// the prior directly. When no such photon exists the predictions are
/// useless as a prior and the estimate falls back to the median path, so
/// the bathymetry exclusion band cannot collapse to zero width.
pub fn surface_prior(photons: &[Photon], params: &BathyParams) -> SurfacePrior {
    if params.use_predictions {
        let zs: Vec<f64> = photons
            .iter()
            .filter(|p| p.prediction == CLASS_SEA_SURFACE)
            .map(|p| p.z)
            .collect();
        if !zs.is_empty() {
            let prior = SurfacePrior {
                mean: mean(&zs),
                variance: variance(&zs),
            };
            debug!(
                "surface prior from {} predicted photons: mean={:.3} var={:.4}",
                zs.len(),
                prior.mean,
                prior.variance
            );
            return prior;
        }
        debug!("use_predictions set but no sea-surface photons; falling back to median prior");
    }

    let band: Vec<f64> = photons
        .iter()
        .filter(|p| p.z > params.surface_z_min && p.z < params.surface_z_max)
        .map(|p| p.z)
        .collect();
    if band.is_empty() {
        return SurfacePrior::default();
    }

    let m = median(&band);
    let refined: Vec<f64> = band
        .iter()
        .copied()
        .filter(|z| (z - m).abs() < REFINE_HALF_WIDTH)
        .collect();

    let prior = SurfacePrior {
        mean: mean(&refined),
        variance: variance(&refined),
    };
    debug!(
        "surface prior from {} of {} band photons: median={:.3} mean={:.3} var={:.4}",
        refined.len(),
        band.len(),
        m,
        prior.mean,
        prior.variance
    );
    prior
}
