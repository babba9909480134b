/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Plain-text training and testing reports, and per-cluster CSV dumps.
//!
//! Reports are [`core::fmt::Display`] views over results the core already
//! produced; nothing here feeds back into training.
//!
//! Requires the `std` feature.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::labels::{ClusterLabels, Evaluation, Tally};
use crate::pattern::BinaryPattern;
use crate::training::{PassStats, TrainedNetwork, TrainingOutcome};

const RULE: &str = "---------------------------------------";

/// Write a pattern as comma-separated `0`/`1`.
pub struct Bits<'a>(pub &'a BinaryPattern);

impl fmt::Display for Bits<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(if b { "1" } else { "0" })?;
        }
        Ok(())
    }
}

// ─── PassTable ───────────────────────────────────────────────────────────────

/// The per-pass progress table.
pub struct PassTable<'a>(pub &'a [PassStats]);

impl fmt::Display for PassTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pass no. | No. reassigned | Fluctuation | No. clusters")?;
        writeln!(f, "---------+----------------+-------------+-------------")?;
        for s in self.0 {
            writeln!(
                f,
                "{:>8} | {:>14} | {:>10.3}% | {:>12}",
                s.pass, s.reassigned, s.fluctuation, s.clusters
            )?;
        }
        Ok(())
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "\n{RULE}\n{title:^39}\n{RULE}")
}

fn tally(f: &mut fmt::Formatter<'_>, t: &Tally) -> fmt::Result {
    writeln!(f, "SUCCESS: {} ({:.3}%)", t.success, t.success_rate())?;
    writeln!(f, "FAIL: {} ({:.3}%)", t.fail, t.fail_rate())?;
    writeln!(f, "RATIO: {:.3}", t.ratio())
}

// ─── TrainingReport ──────────────────────────────────────────────────────────

/// Full training report: parameters, convergence, prototypes, members, classes.
pub struct TrainingReport<'a> {
    /// Where the training patterns came from.
    pub source: &'a str,
    /// Usable training patterns.
    pub pattern_count: usize,
    /// All-zero patterns dropped on load.
    pub removed_empty: usize,
    /// Noise percentage applied before training.
    pub noise: u8,
    /// Training result.
    pub outcome: &'a TrainingOutcome,
    /// Cluster labels and training-set tally, for labelled data.
    pub labels: Option<(&'a ClusterLabels<String>, Tally)>,
}

impl fmt::Display for TrainingReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let net = &self.outcome.network;
        let p = net.params();

        section(f, "ART1 NETWORK SPECIFICATIONS")?;
        writeln!(f, "Generated from:")?;
        writeln!(f, "\tfile: {:?}", self.source)?;
        writeln!(f, "\tnumber of trained patterns: {}", self.pattern_count)?;
        writeln!(f, "\tnumber of empty patterns (ignored): {}", self.removed_empty)?;
        writeln!(f, "\nWith parameters:")?;
        writeln!(f, "\tvigilance: {}", p.vigilance)?;
        writeln!(f, "\tbeta: {}", p.beta)?;
        writeln!(f, "\tnoise: {}%", self.noise)?;
        writeln!(f, "\tminimum fluctuation: {}%", p.min_fluctuation)?;
        writeln!(f, "\tmaximum number of passes: {}", p.max_passes)?;

        section(f, "ART1 NETWORK RESULTS")?;
        writeln!(f, "Number of resulting clusters: {}", net.cluster_count())?;
        writeln!(
            f,
            "Best fluctuation: {:.3}% (pass {} of {})",
            self.outcome.best_fluctuation,
            self.outcome.best_pass,
            self.outcome.passes()
        )?;
        writeln!(f)?;
        write!(f, "{}", PassTable(&self.outcome.history))?;

        section(f, "CLUSTER PROTOTYPES")?;
        for c in net.clusters().iter() {
            writeln!(f, "Cluster {} prototype:\n{}", c.id(), Bits(c.prototype()))?;
        }

        section(f, "CLUSTER MEMBERS")?;
        for c in net.clusters().iter() {
            write!(f, "Cluster {} ({} patterns):", c.id(), c.members().len())?;
            for m in c.members() {
                write!(f, " {m}")?;
            }
            writeln!(f)?;
        }

        if let Some((labels, training)) = &self.labels {
            section(f, "CLUSTER CLASS REPARTITION")?;
            write!(f, "{:>11} |", "Cluster")?;
            for class in labels.classes() {
                write!(f, " {:>w$} |", class, w = class.len().max(7))?;
            }
            writeln!(f, " Class")?;
            for (id, counts, major) in labels.repartition() {
                write!(f, "{:>11} |", id)?;
                for (n, class) in counts.iter().zip(labels.classes()) {
                    write!(f, " {:>w$} |", n, w = class.len().max(7))?;
                }
                writeln!(f, " {}", major.map_or("-", String::as_str))?;
            }

            section(f, "SUCCESS / FAIL RATIO")?;
            tally(f, training)?;
        }
        Ok(())
    }
}

// ─── TestReport ──────────────────────────────────────────────────────────────

/// Testing report: per-pattern target / result table and overall ratio.
pub struct TestReport<'a> {
    /// Where the testing patterns came from.
    pub source: &'a str,
    /// All-zero patterns dropped on load.
    pub removed_empty: usize,
    /// Noise percentage applied before testing.
    pub noise: u8,
    /// Evaluation result.
    pub evaluation: &'a Evaluation<String>,
}

impl fmt::Display for TestReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        section(f, "ART1 NETWORK SPECIFICATIONS")?;
        writeln!(f, "Generated from:")?;
        writeln!(f, "\ttesting file: {:?}", self.source)?;
        writeln!(f, "\tnumber of tested patterns: {}", self.evaluation.predictions.len())?;
        writeln!(f, "\tnumber of empty patterns (ignored): {}", self.removed_empty)?;
        writeln!(f, "\nWith parameters:")?;
        writeln!(f, "\tnoise: {}%", self.noise)?;

        section(f, "ART1 TEST RESULTS")?;
        writeln!(f, "Pattern | Cluster |  Target |  Result | Status")?;
        writeln!(f, "--------+---------+---------+---------+--------")?;
        for (i, p) in self.evaluation.predictions.iter().enumerate() {
            let cluster = p.cluster.map_or_else(|| "-".to_string(), |c| c.to_string());
            writeln!(
                f,
                "{:>7} | {:>7} | {:>7} | {:>7} | {}",
                i,
                cluster,
                p.actual,
                p.predicted.as_deref().unwrap_or("-"),
                if p.is_success() { "SUCCESS" } else { "FAIL" }
            )?;
        }

        section(f, "ART1 TEST RATIO")?;
        tally(f, &self.evaluation.tally)
    }
}

// ─── Cluster files ───────────────────────────────────────────────────────────

/// Write one `<prefix>_clust_<id>.csv` per cluster into `dir`.
///
/// Each file holds the prototype followed by every member pattern.
/// Returns the written paths in cluster order.
pub fn write_cluster_files(
    dir: &Path,
    prefix: &str,
    network: &TrainedNetwork,
    patterns: &[BinaryPattern],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(network.cluster_count());
    for c in network.clusters().iter() {
        let path = dir.join(format!("{prefix}_clust_{}.csv", c.id()));
        let mut out = fs::File::create(&path)?;
        writeln!(out, "# prototype:")?;
        writeln!(out, "{}", Bits(c.prototype()))?;
        writeln!(out, "# patterns:")?;
        for &m in c.members() {
            writeln!(out, "{}", Bits(&patterns[m]))?;
        }
        written.push(path);
    }
    tracing::info!(files = written.len(), dir = %dir.display(), "cluster files written");
    Ok(written)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NetworkParams;
    use crate::training::Trainer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn trained() -> (Vec<BinaryPattern>, TrainingOutcome) {
        let p: Vec<BinaryPattern> = [[1u8, 1, 0, 0], [1, 1, 0, 0], [0, 0, 1, 1]]
            .iter()
            .map(|r| BinaryPattern::from_bits(r))
            .collect();
        let params = NetworkParams { beta: 0.0, vigilance: 0.9, max_passes: 5, min_fluctuation: 0.0 };
        let out = Trainer::new(params)
            .unwrap()
            .train(&p, &mut StdRng::seed_from_u64(0))
            .unwrap();
        (p, out)
    }

    #[test]
    fn test_bits_display() {
        let p = BinaryPattern::from_bits(&[1, 0, 1]);
        assert_eq!(Bits(&p).to_string(), "1,0,1");
    }

    #[test]
    fn test_training_report_mentions_clusters_and_ratio() {
        let (_, out) = trained();
        let labels: Vec<String> = ["a", "a", "b"].iter().map(|s| s.to_string()).collect();
        let cl = ClusterLabels::from_training(&out.network, &labels).unwrap();
        let t = cl.training_tally(&out.network, &labels);
        let text = TrainingReport {
            source: "train.csv",
            pattern_count: 3,
            removed_empty: 0,
            noise: 0,
            outcome: &out,
            labels: Some((&cl, t)),
        }
        .to_string();
        assert!(text.contains("Number of resulting clusters: 2"), "{text}");
        assert!(text.contains("1,1,0,0"));
        assert!(text.contains("SUCCESS: 3"));
    }

    #[test]
    fn test_pass_table_has_one_row_per_pass() {
        let (_, out) = trained();
        let text = PassTable(&out.history).to_string();
        assert_eq!(text.lines().count(), 2 + out.passes());
    }

    #[test]
    fn test_cluster_files_written() {
        let (p, out) = trained();
        let dir = std::env::temp_dir().join(format!("art1-report-{}", std::process::id()));
        let files = write_cluster_files(&dir, "t", &out.network, &p).unwrap();
        assert_eq!(files.len(), 2);
        let first = fs::read_to_string(&files[0]).unwrap();
        assert!(first.starts_with("# prototype:\n1,1,0,0\n# patterns:\n"));
        assert_eq!(first.lines().count(), 5);
        let _ = fs::remove_dir_all(&dir);
    }
}
