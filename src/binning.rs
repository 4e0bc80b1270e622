//! Spatial bucketing of photons into along-track windows and elevation bins.
//!
//! Horizontal windows are `x_resolution` wide and indexed from the track's
//! minimum `x`; photons outside the `[z_min, z_max]` elevation band are
//! dropped here and never reach a window (they keep the unprocessed class).
//! Vertical bins subdivide one window's elevation band at `z_resolution`,
//! carrying photon indices so peak members can be recovered after peak
//! detection on the bin counts.

use crate::detector::BathyParams;
use crate::types::Photon;

/// Photon indices bucketed into along-track windows.
#[derive(Clone, Debug)]
pub struct HorizontalBins {
    /// Minimum along-track position over the whole input, metres.
    pub x_min: f64,
    /// Maximum along-track position over the whole input, metres.
    pub x_max: f64,
    /// Per-window photon indices, ordered by input position within a window.
    pub windows: Vec<Vec<usize>>,
}

/// Bucket photons into horizontal windows of `params.x_resolution` metres.
///
/// The track extent is taken over all photons, but only photons inside the
/// z band are assigned to a window. Empty windows are kept so window index
/// and along-track position stay in lockstep.
pub fn horizontal_bins(photons: &[Photon], params: &BathyParams) -> HorizontalBins {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    for p in photons {
        x_min = x_min.min(p.x);
        x_max = x_max.max(p.x);
    }
    if photons.is_empty() {
        return HorizontalBins {
            x_min: 0.0,
            x_max: 0.0,
            windows: Vec::new(),
        };
    }

    let count = ((x_max - x_min) / params.x_resolution).floor() as usize + 1;
    let mut windows = vec![Vec::new(); count];
    for (i, p) in photons.iter().enumerate() {
        if p.z < params.z_min || p.z > params.z_max {
            continue;
        }
        let k = (((p.x - x_min) / params.x_resolution) as usize).min(count - 1);
        windows[k].push(i);
    }

    HorizontalBins {
        x_min,
        x_max,
        windows,
    }
}

/// Elevation histogram of one window, keeping the member indices per bin.
#[derive(Clone, Debug)]
pub struct VerticalBins {
    /// Per-bin photon indices; bin 0 is the lowest elevation.
    pub bins: Vec<Vec<usize>>,
    /// Bin-centre elevations, metres.
    pub centers: Vec<f64>,
}

impl VerticalBins {
    /// Photon counts per bin.
    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(Vec::len).collect()
    }
}

/// Bucket the given photon indices into vertical elevation bins.
///
/// Callers pass indices already gated to the z band; out-of-band indices
/// would land in a clamped edge bin, so the gate in [`horizontal_bins`]
/// matters.
pub fn vertical_bins(photons: &[Photon], members: &[usize], params: &BathyParams) -> VerticalBins {
    let count = ((params.z_max - params.z_min) / params.z_resolution).ceil() as usize + 1;

    let mut bins = vec![Vec::new(); count];
    for &i in members {
        let k = (((photons[i].z - params.z_min) / params.z_resolution) as usize).min(count - 1);
        bins[k].push(i);
    }

    let centers = (0..count)
        .map(|k| (k as f64 + 0.5) * params.z_resolution + params.z_min)
        .collect();

    VerticalBins { bins, centers }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(xs: &[f64]) -> Vec<Photon> {
        xs.iter()
            .map(|&x| Photon {
                x,
                ..Photon::default()
            })
            .collect()
    }

    #[test]
    fn window_count_tracks_resolution() {
        let photons = track(&[0.0, 0.1, 1.0, 2.0, 3.0, 4.0]);
        let mut params = BathyParams {
            x_resolution: 1.9,
            ..BathyParams::default()
        };

        let h = horizontal_bins(&photons, &params);
        let sizes: Vec<usize> = h.windows.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 2, 1]);

        params.x_resolution = 5.0;
        let h = horizontal_bins(&photons, &params);
        let sizes: Vec<usize> = h.windows.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![6]);

        params.x_resolution = 0.9;
        let h = horizontal_bins(&photons, &params);
        let sizes: Vec<usize> = h.windows.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 1, 1, 1, 1]);
    }

    #[test]
    fn out_of_band_photons_never_reach_a_window() {
        let mut photons = track(&[0.0, 1.0, 2.0]);
        photons[1].z = -100.0;
        let params = BathyParams::default();
        let h = horizontal_bins(&photons, &params);
        let members: Vec<usize> = h.windows.iter().flatten().copied().collect();
        assert_eq!(members, vec![0, 2]);
    }

    #[test]
    fn vertical_bins_order_low_to_high() {
        let photons: Vec<Photon> = [-0.9, 0.1, 1.1, 2.1, 3.1]
            .iter()
            .enumerate()
            .map(|(i, &z)| Photon {
                x: i as f64 * 0.1,
                z,
                ..Photon::default()
            })
            .collect();
        let params = BathyParams {
            x_resolution: 1.0,
            z_resolution: 1.0,
            z_min: -1.0,
            z_max: 4.0,
            ..BathyParams::default()
        };

        let h = horizontal_bins(&photons, &params);
        assert_eq!(h.windows.len(), 1);
        assert_eq!(h.windows[0].len(), 5);

        let v = vertical_bins(&photons, &h.windows[0], &params);
        assert_eq!(v.bins.len(), 6);
        for k in 0..5 {
            assert_eq!(v.bins[k], vec![k]);
        }
        assert!(v.bins[5].is_empty());
        assert_eq!(v.centers[0], -0.5);
        assert_eq!(v.centers[5], 4.5);
    }
}
