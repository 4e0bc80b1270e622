//! Per-window peak selection.
//!
//! Each along-track window is classified independently: the vertical photon
//! histogram is normalised to a PMF, smoothed, and searched for peaks. The
//! surface peak must sit inside the global prior band; the bathymetry peak
//! is searched only among photons clearly below the surface. Either channel
//! degenerates to `None` when no peak survives the gates or too few photons
//! remain, leaving the window unclassified without aborting the run.

use crate::binning::{vertical_bins, VerticalBins};
use crate::math::{convert_to_pmf, find_peaks, gaussian_filter, mean, variance};
use crate::types::{ChannelEstimate, Photon, SurfacePrior, WindowEstimate, CLASS_SEA_SURFACE};

use super::params::BathyParams;

/// Classify one window's photons into surface and bathymetry channels.
pub fn classify_window(
    photons: &[Photon],
    members: &[usize],
    prior: &SurfacePrior,
    params: &BathyParams,
) -> WindowEstimate {
    if members.is_empty() {
        return WindowEstimate::default();
    }

    let vbins = vertical_bins(photons, members, params);
    let surface = if params.use_predictions {
        predicted_surface(photons, members)
    } else {
        select_surface(photons, members, &vbins, prior, params)
    };
    let bathy = select_bathy(photons, members, &vbins, prior, params);

    WindowEstimate { surface, bathy }
}

/// Surface channel when an upstream classifier already labelled the input:
/// adopt its sea-surface photons verbatim.
fn predicted_surface(photons: &[Photon], members: &[usize]) -> Option<ChannelEstimate> {
    let indices: Vec<usize> = members
        .iter()
        .copied()
        .filter(|&i| photons[i].prediction == CLASS_SEA_SURFACE)
        .collect();
    if indices.is_empty() {
        return None;
    }
    let zs: Vec<f64> = indices.iter().map(|&i| photons[i].z).collect();
    Some(ChannelEstimate {
        elevation: mean(&zs),
        indices,
    })
}

fn select_surface(
    photons: &[Photon],
    members: &[usize],
    vbins: &VerticalBins,
    prior: &SurfacePrior,
    params: &BathyParams,
) -> Option<ChannelEstimate> {
    let counts = vbins.counts();
    let peaks = detect_peaks(&counts, params);

    // Only peaks inside the prior band can be the water surface.
    let band = params.surface_n_stddev * prior.stddev();
    let gated: Vec<usize> = peaks
        .into_iter()
        .filter(|&p| (vbins.centers[p] - prior.mean).abs() <= band)
        .collect();

    let peak = pick_surface_peak(&gated, &counts, &vbins.centers)?;
    let estimate = refine_selection(
        photons,
        members,
        vbins.centers[peak],
        params.surface_max_distance,
        params.surface_n_stddev,
    )?;
    (estimate.indices.len() >= params.min_surface_photons()).then_some(estimate)
}

/// Choose among gated surface peaks.
///
/// With two or more, the two largest by raw photon count compete: a close
/// call (smaller above one third of the larger) goes to the higher
/// elevation, since a strong sub-surface reflection sits under the true
/// surface; otherwise the larger wins.
fn pick_surface_peak(gated: &[usize], counts: &[usize], centers: &[f64]) -> Option<usize> {
    match gated {
        [] => None,
        [only] => Some(*only),
        _ => {
            let mut ranked = gated.to_vec();
            ranked.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then(a.cmp(&b)));
            let (first, second) = (ranked[0], ranked[1]);
            if counts[second] * 3 > counts[first] {
                Some(if centers[second] > centers[first] {
                    second
                } else {
                    first
                })
            } else {
                Some(first)
            }
        }
    }
}

fn select_bathy(
    photons: &[Photon],
    members: &[usize],
    vbins: &VerticalBins,
    prior: &SurfacePrior,
    params: &BathyParams,
) -> Option<ChannelEstimate> {
    // Keep only photons clearly below the surface. The depth floor keeps
    // the band open when the prior variance collapses.
    let exclusion = (params.bathy_n_stddev * prior.stddev()).max(params.bathy_min_depth);
    let ceiling = prior.mean - exclusion;
    let subsurface: Vec<usize> = members
        .iter()
        .copied()
        .filter(|&i| photons[i].z < ceiling)
        .collect();
    if subsurface.is_empty() {
        return None;
    }

    let counts = histogram(photons, &subsurface, vbins, params);
    let peaks = detect_peaks(&counts, params);

    // The seabed is the strongest subsurface return; no elevation tiebreak.
    let mut peak = None;
    let mut best = 0usize;
    for p in peaks {
        if counts[p] > best {
            best = counts[p];
            peak = Some(p);
        }
    }
    let peak = peak?;

    let estimate = refine_selection(
        photons,
        &subsurface,
        vbins.centers[peak],
        params.bathy_max_distance,
        params.bathy_n_stddev,
    )?;
    (estimate.indices.len() >= params.min_bathy_photons()).then_some(estimate)
}

/// Histogram a subset of photons onto an existing bin grid.
fn histogram(
    photons: &[Photon],
    members: &[usize],
    vbins: &VerticalBins,
    params: &BathyParams,
) -> Vec<usize> {
    let count = vbins.centers.len();
    let mut counts = vec![0usize; count];
    for &i in members {
        let k = (((photons[i].z - params.z_min) / params.z_resolution) as usize).min(count - 1);
        counts[k] += 1;
    }
    counts
}

/// Histogram → PMF → smooth → peaks, shared by both channels.
fn detect_peaks(counts: &[usize], params: &BathyParams) -> Vec<usize> {
    let pmf = convert_to_pmf(counts);
    let smoothed = gaussian_filter(pmf, params.vertical_smoothing_sigma);
    find_peaks(
        &smoothed,
        params.min_peak_prominence,
        params.min_peak_distance,
    )
}

/// Turn a chosen peak elevation into member photons.
///
/// Photons within `max_distance` of the peak seed a local mean/variance;
/// the final set is everything within `n_stddev` local deviations of that
/// mean. A zero local variance empties the set and degrades the channel.
fn refine_selection(
    photons: &[Photon],
    candidates: &[usize],
    peak_elevation: f64,
    max_distance: f64,
    n_stddev: f64,
) -> Option<ChannelEstimate> {
    let seed: Vec<f64> = candidates
        .iter()
        .map(|&i| photons[i].z)
        .filter(|z| (z - peak_elevation).abs() < max_distance)
        .collect();
    if seed.is_empty() {
        return None;
    }

    let u = mean(&seed);
    let band = n_stddev * variance(&seed).sqrt();
    let indices: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| (photons[i].z - u).abs() < band)
        .collect();
    if indices.is_empty() {
        return None;
    }

    let zs: Vec<f64> = indices.iter().map(|&i| photons[i].z).collect();
    Some(ChannelEstimate {
        elevation: mean(&zs),
        indices,
    })
}
