//! `art1` command-line front end.
//!
//! Reads a CSV training set, trains an ART1 network, writes the training
//! report and per-cluster files, then optionally scores a CSV test set.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use art1_core::dataset::{Dataset, DatasetOptions};
use art1_core::noise::add_noise;
use art1_core::report::{write_cluster_files, TestReport, TrainingReport};
use art1_core::{ClusterLabels, NetworkParams, Trainer};

#[derive(Parser)]
#[command(name = "art1")]
#[command(version)]
#[command(about = "ART1 clustering of binary patterns", long_about = None)]
struct Cli {
    /// Training set (CSV of 0/1 values)
    #[arg(long)]
    train: PathBuf,

    /// Optional test set, classified against the trained network
    #[arg(long)]
    test: Option<PathBuf>,

    /// Directory for reports and cluster files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// File name prefix for every output file
    #[arg(long, default_value = "art1")]
    prefix: String,

    /// First CSV column is a class label
    #[arg(long)]
    labelled: bool,

    /// Percentage of bits flipped in each training pattern
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
    train_noise: u8,

    /// Percentage of bits flipped in each test pattern
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
    test_noise: u8,

    /// Choice smoothing constant (>= 0)
    #[arg(long, default_value_t = 1.0)]
    beta: f64,

    /// Vigilance in (0, 1]
    #[arg(long, default_value_t = 0.5)]
    vigilance: f64,

    /// Stop once a pass reassigns this percentage of patterns or less
    #[arg(long, default_value_t = 0.0)]
    min_fluc: f64,

    /// Maximum number of training passes
    #[arg(long, default_value_t = 50)]
    max_passes: usize,

    /// RNG seed for noise and tie-breaks; omitted = drawn from the OS
    #[arg(long)]
    seed: Option<u64>,

    /// Also write a machine-readable JSON summary
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let params = NetworkParams {
        beta: cli.beta,
        vigilance: cli.vigilance,
        max_passes: cli.max_passes,
        min_fluctuation: cli.min_fluc,
    };
    let trainer = Trainer::new(params).context("invalid network parameters")?;
    let mut rng = match cli.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let options = DatasetOptions { labelled: cli.labelled };

    // ── Training ────────────────────────────────────────────────────────────
    let mut train = Dataset::from_path(&cli.train, options)
        .with_context(|| format!("reading training set {}", cli.train.display()))?;
    add_noise(train.patterns_mut(), cli.train_noise, &mut rng);

    let outcome = trainer.train(train.patterns(), &mut rng)?;
    let network = &outcome.network;

    let labels = match train.labels() {
        Some(l) => {
            let cl = ClusterLabels::from_training(network, l)?;
            let tally = cl.training_tally(network, l);
            Some((cl, tally))
        }
        None => None,
    };

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    let train_source = cli.train.display().to_string();
    let report = TrainingReport {
        source: &train_source,
        pattern_count: train.len(),
        removed_empty: train.removed_empty(),
        noise: cli.train_noise,
        outcome: &outcome,
        labels: labels.as_ref().map(|(cl, t)| (cl, *t)),
    };
    let train_path = cli.out_dir.join(format!("{}_train.txt", cli.prefix));
    fs::write(&train_path, report.to_string())
        .with_context(|| format!("writing {}", train_path.display()))?;
    write_cluster_files(&cli.out_dir, &cli.prefix, network, train.patterns())?;

    println!(
        "{} clusters, best fluctuation {:.3}% at pass {} of {}",
        network.cluster_count(),
        outcome.best_fluctuation,
        outcome.best_pass,
        outcome.passes()
    );

    // ── Testing ─────────────────────────────────────────────────────────────
    let mut test_tally = None;
    if let Some(test_path) = &cli.test {
        let Some((cl, _)) = &labels else {
            bail!("--test needs --labelled data to score predictions");
        };
        let mut test = Dataset::from_path(test_path, options)
            .with_context(|| format!("reading test set {}", test_path.display()))?;
        test.ensure_width(network.pattern_len())?;
        add_noise(test.patterns_mut(), cli.test_noise, &mut rng);

        let test_labels = test.labels().unwrap_or_default();
        let evaluation = cl.evaluate(network, test.patterns(), test_labels, &mut rng)?;
        let test_source = test_path.display().to_string();
        let report = TestReport {
            source: &test_source,
            removed_empty: test.removed_empty(),
            noise: cli.test_noise,
            evaluation: &evaluation,
        };
        let out = cli.out_dir.join(format!("{}_test.txt", cli.prefix));
        fs::write(&out, report.to_string())
            .with_context(|| format!("writing {}", out.display()))?;
        println!(
            "test: {} success, {} fail ({:.3}%)",
            evaluation.tally.success,
            evaluation.tally.fail,
            evaluation.tally.success_rate()
        );
        test_tally = Some(evaluation.tally);
    }

    if cli.json {
        let summary = serde_json::json!({
            "params": network.params(),
            "clusters": network.cluster_count(),
            "best_fluctuation": outcome.best_fluctuation,
            "best_pass": outcome.best_pass,
            "history": outcome.history,
            "prototypes": network
                .clusters()
                .iter()
                .map(|c| c.prototype().to_bits())
                .collect::<Vec<_>>(),
            "members": network
                .clusters()
                .iter()
                .map(|c| c.members().to_vec())
                .collect::<Vec<_>>(),
            "training_tally": labels.as_ref().map(|(_, t)| *t),
            "test_tally": test_tally,
        });
        let out = cli.out_dir.join(format!("{}_summary.json", cli.prefix));
        fs::write(&out, serde_json::to_string_pretty(&summary)?)
            .with_context(|| format!("writing {}", out.display()))?;
    }

    Ok(())
}
