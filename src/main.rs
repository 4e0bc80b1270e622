use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use bathy_detector::config::load_params;
use bathy_detector::dataframe::{read_photons, write_photons};
use bathy_detector::{BathyDetector, BathyParams};

/// Classify lidar photon returns into sea surface, bathymetry and
/// unclassified, annotating each photon with smoothed surface and seabed
/// elevations.
#[derive(Parser, Debug)]
#[command(name = "classify", version)]
struct Args {
    /// Input CSV (reads stdin when omitted).
    input: Option<PathBuf>,

    /// Output CSV (writes stdout when omitted).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON parameter file; absent keys keep their defaults.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Horizontal window width, metres.
    #[arg(long)]
    x_resolution: Option<f64>,

    /// Vertical bin width, metres.
    #[arg(long)]
    z_resolution: Option<f64>,

    /// Lower edge of the elevation band of interest, metres.
    #[arg(long)]
    z_min: Option<f64>,

    /// Upper edge of the elevation band of interest, metres.
    #[arg(long)]
    z_max: Option<f64>,

    /// Trust an existing prediction column for the surface.
    #[arg(short = 'p', long)]
    use_predictions: bool,

    /// Write the run summary (counts, prior, stage timings) as JSON.
    #[arg(long)]
    json_report: Option<PathBuf>,

    /// Log progress and performance to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let default_level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let mut params = match &args.params {
        Some(path) => load_params(path)?,
        None => BathyParams::default(),
    };
    if let Some(v) = args.x_resolution {
        params.x_resolution = v;
    }
    if let Some(v) = args.z_resolution {
        params.z_resolution = v;
    }
    if let Some(v) = args.z_min {
        params.z_min = v;
    }
    if let Some(v) = args.z_max {
        params.z_max = v;
    }
    if args.use_predictions {
        params.use_predictions = true;
    }
    params.validate()?;

    let frame = match &args.input {
        Some(path) => {
            let file = fs::File::open(path)
                .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
            read_photons(BufReader::new(file))?
        }
        None => read_photons(io::stdin().lock())?,
    };
    info!("{} photons read", frame.photons.len());
    if params.use_predictions && !frame.has_predictions {
        return Err("--use-predictions requires a 'prediction' column".to_string());
    }

    let detector = BathyDetector::new(params);
    let report = detector.classify_with_report(&frame.photons);
    let summary = &report.summary;
    info!(
        "{}/{} windows with a surface, {} with bathymetry",
        summary.surface_windows, summary.windows, summary.bathy_windows
    );
    info!(
        "{} surface photons, {} bathy photons",
        summary.surface_photons, summary.bathy_photons
    );
    if summary.timing.total_ms > 0.0 {
        info!(
            "classified {} photons in {:.3} s ({:.0} photons/s)",
            summary.photons,
            summary.timing.total_ms / 1e3,
            summary.timing.photons_per_second(summary.photons)
        );
    }

    match &args.output {
        Some(path) => {
            let file = fs::File::create(path)
                .map_err(|e| format!("failed to create {}: {e}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_photons(&mut out, &report.photons)?;
            out.flush()
                .map_err(|e| format!("failed to flush {}: {e}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = BufWriter::new(stdout.lock());
            write_photons(&mut lock, &report.photons)?;
            lock.flush().map_err(|e| format!("failed to flush output: {e}"))?;
        }
    }

    if let Some(path) = &args.json_report {
        let json = serde_json::to_string_pretty(summary)
            .map_err(|e| format!("failed to serialize report: {e}"))?;
        fs::write(path, json)
            .map_err(|e| format!("failed to write report {}: {e}", path.display()))?;
        info!("run summary written to {}", path.display());
    }

    Ok(())
}
