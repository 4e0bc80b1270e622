#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod dataframe;
pub mod detector;
pub mod diagnostics;
pub mod score;
pub mod types;

// "Expert" modules – still public, but considered unstable internals.
pub mod binning;
pub mod config;
pub mod math;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{BathyDetector, BathyParams, ClassificationReport, RunSummary};
pub use crate::types::{Photon, SurfacePrior};

// Ingestion helpers generally useful to hosts embedding the classifier.
pub use crate::dataframe::{read_photons, write_photons, PhotonFrame};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use bathy_detector::prelude::*;
///
/// # fn main() {
/// let photons: Vec<Photon> = Vec::new();
/// let detector = BathyDetector::new(BathyParams::default());
/// let labelled = detector.classify(&photons);
/// println!("{} photons labelled", labelled.len());
/// # }
/// ```
pub mod prelude {
    pub use crate::detector::{BathyDetector, BathyParams};
    pub use crate::types::{
        Photon, CLASS_BATHYMETRY, CLASS_SEA_SURFACE, CLASS_UNCLASSIFIED, CLASS_UNPROCESSED,
    };
}
