//! Parameter record configuring the classification pipeline.
//!
//! One immutable struct covers the whole run: binning resolutions, the
//! elevation band of interest, the prior search band, peak gates and the
//! smoothing schedule. Defaults target ICESat-2 style coastal granules;
//! for tuning, start with `x_resolution` and the peak gates.

use serde::Deserialize;

/// Pipeline-wide parameters. All lengths are metres.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BathyParams {
    /// Horizontal window width.
    pub x_resolution: f64,
    /// Vertical bin width.
    pub z_resolution: f64,
    /// Lower edge of the elevation band of interest.
    pub z_min: f64,
    /// Upper edge of the elevation band of interest.
    pub z_max: f64,
    /// Lower edge of the prior search band (no-predictions path).
    pub surface_z_min: f64,
    /// Upper edge of the prior search band (no-predictions path).
    pub surface_z_max: f64,
    /// Minimum distance below the surface for bathymetry candidates.
    pub bathy_min_depth: f64,
    /// Gaussian sigma applied to each window's elevation PMF.
    pub vertical_smoothing_sigma: f64,
    /// Along-track Gaussian sigma for the surface profile.
    pub surface_smoothing_sigma: f64,
    /// Along-track Gaussian sigma for the bathymetry profile.
    pub bathy_smoothing_sigma: f64,
    /// Minimum peak prominence, in PMF units.
    pub min_peak_prominence: f64,
    /// Minimum peak separation, in vertical bins.
    pub min_peak_distance: usize,
    /// Windows keeping fewer surface photons than this are discarded.
    /// `None` derives the bound from `x_resolution`.
    pub min_surface_photons_per_window: Option<usize>,
    /// Windows keeping fewer bathy photons than this are discarded.
    /// `None` derives the bound from `x_resolution`.
    pub min_bathy_photons_per_window: Option<usize>,
    /// Width of the surface selection band, in local standard deviations.
    pub surface_n_stddev: f64,
    /// Width of the bathy selection band, in local standard deviations.
    pub bathy_n_stddev: f64,
    /// Half-width of the seed band around the chosen surface peak.
    pub surface_max_distance: f64,
    /// Half-width of the seed band around the chosen bathy peak.
    pub bathy_max_distance: f64,
    /// Trust an existing `prediction` column for the surface instead of
    /// recomputing it; bathymetry still runs.
    pub use_predictions: bool,
}

impl Default for BathyParams {
    fn default() -> Self {
        Self {
            x_resolution: 10.0,
            z_resolution: 0.2,
            z_min: -50.0,
            z_max: 30.0,
            surface_z_min: -20.0,
            surface_z_max: 20.0,
            bathy_min_depth: 0.5,
            vertical_smoothing_sigma: 0.5,
            surface_smoothing_sigma: 200.0,
            bathy_smoothing_sigma: 100.0,
            min_peak_prominence: 0.01,
            min_peak_distance: 2,
            min_surface_photons_per_window: None,
            min_bathy_photons_per_window: None,
            surface_n_stddev: 3.5,
            bathy_n_stddev: 3.0,
            surface_max_distance: 1.0,
            bathy_max_distance: 1.0,
            use_predictions: false,
        }
    }
}

impl BathyParams {
    /// Minimum surface photons a window must keep, deriving the default
    /// from the window width (half a photon per metre).
    pub fn min_surface_photons(&self) -> usize {
        self.min_surface_photons_per_window
            .unwrap_or_else(|| derived_min_photons(self.x_resolution))
    }

    /// Minimum bathy photons a window must keep; same derivation.
    pub fn min_bathy_photons(&self) -> usize {
        self.min_bathy_photons_per_window
            .unwrap_or_else(|| derived_min_photons(self.x_resolution))
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.x_resolution > 0.0) {
            return Err(format!(
                "x_resolution must be positive, got {}",
                self.x_resolution
            ));
        }
        if !(self.z_resolution > 0.0) {
            return Err(format!(
                "z_resolution must be positive, got {}",
                self.z_resolution
            ));
        }
        if self.z_max <= self.z_min {
            return Err(format!(
                "z_max ({}) must exceed z_min ({})",
                self.z_max, self.z_min
            ));
        }
        if self.surface_z_max <= self.surface_z_min {
            return Err(format!(
                "surface_z_max ({}) must exceed surface_z_min ({})",
                self.surface_z_max, self.surface_z_min
            ));
        }
        Ok(())
    }
}

fn derived_min_photons(x_resolution: f64) -> usize {
    (x_resolution / 2.0).ceil().max(1.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_minimums_follow_window_width() {
        let params = BathyParams::default();
        assert_eq!(params.min_surface_photons(), 5);
        assert_eq!(params.min_bathy_photons(), 5);

        let wide = BathyParams {
            x_resolution: 25.0,
            ..BathyParams::default()
        };
        assert_eq!(wide.min_surface_photons(), 13);

        let pinned = BathyParams {
            min_bathy_photons_per_window: Some(2),
            ..BathyParams::default()
        };
        assert_eq!(pinned.min_bathy_photons(), 2);
    }

    #[test]
    fn validate_rejects_inverted_band() {
        let params = BathyParams {
            z_min: 10.0,
            z_max: -10.0,
            ..BathyParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn validate_rejects_nonpositive_resolution() {
        let params = BathyParams {
            z_resolution: 0.0,
            ..BathyParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: BathyParams =
            serde_json::from_str(r#"{"x_resolution": 25.0, "use_predictions": true}"#).unwrap();
        assert_eq!(params.x_resolution, 25.0);
        assert!(params.use_predictions);
        assert_eq!(params.z_resolution, 0.2);
        assert_eq!(params.min_peak_distance, 2);
    }
}
