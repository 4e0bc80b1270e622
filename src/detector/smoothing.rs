//! Along-track smoothing of the sparse per-window elevations.
//!
//! Window estimates are stamped onto a dense fixed-resolution grid, the
//! gaps are filled by averaging a forward and a backward carry sweep (the
//! symmetric fill avoids a systematic lag in either direction), the filled
//! profile is Gaussian-smoothed, and the result is read back at every
//! photon's along-track cell.

use rayon::prelude::*;

use crate::math::gaussian_filter;
use crate::types::{ChannelEstimate, Photon, WindowEstimate};

/// Resolution of the dense along-track grid, metres.
pub const DENSE_RESOLUTION: f64 = 5.0;

/// Smoothed per-photon elevations for one channel (surface or bathymetry).
///
/// `channel` picks the channel estimate out of each window; windows whose
/// channel degenerated contribute nothing and are bridged by the gap fill.
pub fn smooth_channel(
    photons: &[Photon],
    x_min: f64,
    x_max: f64,
    estimates: &[WindowEstimate],
    channel: fn(&WindowEstimate) -> Option<&ChannelEstimate>,
    sigma: f64,
) -> Vec<f64> {
    if photons.is_empty() {
        return Vec::new();
    }

    let cells = ((x_max - x_min) / DENSE_RESOLUTION).floor() as usize + 1;
    let mut dense = vec![f64::NAN; cells];

    // Stamp each window's elevation onto the cells its member photons cover.
    for est in estimates {
        if let Some(ch) = channel(est) {
            for &i in &ch.indices {
                dense[cell_of(photons[i].x, x_min, cells)] = ch.elevation;
            }
        }
    }

    fill_gaps(&mut dense);
    let dense = gaussian_filter(dense, sigma / DENSE_RESOLUTION);

    photons
        .par_iter()
        .map(|p| dense[cell_of(p.x, x_min, cells)])
        .collect()
}

fn cell_of(x: f64, x_min: f64, cells: usize) -> usize {
    (((x - x_min) / DENSE_RESOLUTION) as usize).min(cells - 1)
}

/// Replace NaN cells by the average of a forward and a backward carry.
///
/// Either sweep carries the last value seen (0 before any value), so a cell
/// between two stamped runs averages its neighbours and a cell outside them
/// decays toward half the nearest run.
fn fill_gaps(dense: &mut [f64]) {
    let n = dense.len();
    let mut forward = vec![0.0; n];
    let mut carry = 0.0;
    for i in 0..n {
        if !dense[i].is_nan() {
            carry = dense[i];
        }
        forward[i] = carry;
    }

    let mut backward = vec![0.0; n];
    let mut carry = 0.0;
    for i in (0..n).rev() {
        if !dense[i].is_nan() {
            carry = dense[i];
        }
        backward[i] = carry;
    }

    for i in 0..n {
        dense[i] = 0.5 * (forward[i] + backward[i]);
    }
}
