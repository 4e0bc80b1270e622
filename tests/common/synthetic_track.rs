use bathy_detector::Photon;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Synthetic shallow-water track: a dense surface return near 0 m, a
/// seabed return near `seabed_elevation`, and uniform background noise.
pub struct TrackSpec {
    pub length_m: f64,
    pub surface_photons: usize,
    pub seabed_photons: usize,
    pub noise_photons: usize,
    pub seabed_elevation: f64,
    pub seed: u64,
}

impl Default for TrackSpec {
    fn default() -> Self {
        Self {
            length_m: 1000.0,
            surface_photons: 5000,
            seabed_photons: 2000,
            noise_photons: 500,
            seabed_elevation: -8.0,
            seed: 0xB47_11,
        }
    }
}

pub fn shallow_water_track(spec: &TrackSpec) -> Vec<Photon> {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let surface = Normal::new(0.0, 0.2).unwrap();
    let seabed = Normal::new(spec.seabed_elevation, 0.15).unwrap();

    let mut photons = Vec::with_capacity(
        spec.surface_photons + spec.seabed_photons + spec.noise_photons,
    );
    for _ in 0..spec.surface_photons {
        photons.push(Photon {
            x: rng.gen_range(0.0..spec.length_m),
            z: surface.sample(&mut rng),
            cls: 41,
            ..Photon::default()
        });
    }
    for _ in 0..spec.seabed_photons {
        photons.push(Photon {
            x: rng.gen_range(0.0..spec.length_m),
            z: seabed.sample(&mut rng),
            cls: 40,
            ..Photon::default()
        });
    }
    for _ in 0..spec.noise_photons {
        photons.push(Photon {
            x: rng.gen_range(0.0..spec.length_m),
            z: rng.gen_range(-30.0..15.0),
            cls: 0,
            ..Photon::default()
        });
    }

    // Shuffle-free ordering: sort by x so the track reads like real data,
    // then hand out stable identifiers in that order.
    photons.sort_by(|a, b| a.x.total_cmp(&b.x));
    for (i, p) in photons.iter_mut().enumerate() {
        p.index = i as u64;
    }
    photons
}

/// Uniformly random photons with no structure at all.
pub fn random_cloud(total: usize, seed: u64) -> Vec<Photon> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..total)
        .map(|_| Photon {
            index: rng.gen_range(0..total as u64),
            x: rng.gen_range(-100.0..100.0),
            z: rng.gen_range(-100.0..100.0),
            ..Photon::default()
        })
        .collect()
}
