use std::fs;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use bathy_detector::dataframe::read_photons;
use bathy_detector::score::{score_photons, weighted_scores, SCORED_CLASSES};

/// Score classified photons against the manual_label column: one binary
/// confusion matrix per class, with accuracy, F1 and balanced accuracy.
#[derive(Parser, Debug)]
#[command(name = "score", version)]
struct Args {
    /// Classified CSV (reads stdin when omitted).
    input: Option<PathBuf>,

    /// Log progress to stderr.
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
    let frame = match &args.input {
        Some(path) => {
            let file = fs::File::open(path)
                .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
            read_photons(BufReader::new(file))?
        }
        None => read_photons(io::stdin().lock())?,
    };
    if !frame.has_manual_label {
        return Err("input has no 'manual_label' column to score against".to_string());
    }
    if !frame.has_predictions {
        return Err("input has no 'prediction' column to score".to_string());
    }
    info!("{} photons read", frame.photons.len());

    let scores = score_photons(&frame.photons, &SCORED_CLASSES);

    println!("cls\tacc\tF1\tbal_acc\ttp\ttn\tfp\tfn\tsupport\ttotal");
    for s in &scores {
        let m = &s.matrix;
        println!(
            "{}\t{:.3}\t{:.3}\t{:.3}\t{}\t{}\t{}\t{}\t{}\t{}",
            s.class,
            m.accuracy(),
            m.f1(),
            m.balanced_accuracy(),
            m.true_positives(),
            m.true_negatives(),
            m.false_positives(),
            m.false_negatives(),
            m.support(),
            m.total()
        );
    }

    let w = weighted_scores(&scores);
    println!("weighted_accuracy = {:.3}", w.accuracy);
    println!("weighted_F1 = {:.3}", w.f1);
    println!("weighted_bal_acc = {:.3}", w.balanced_accuracy);

    Ok(())
}
