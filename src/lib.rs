//! # art1-core
//!
//! ART1 adaptive resonance clustering for binary patterns.
//!
//! ---
//!
//! ## Unsupervised, stable, and plastic
//!
//! ART1 groups binary vectors without being told how many groups exist. Each
//! cluster keeps a **prototype**: the bitwise AND of every member. A new pattern
//! competes for the cluster whose prototype explains it best, and a single knob
//! decides whether the winner is good enough.
//!
//! **Choice.** Every live cluster is scored with `|P ∧ x| / (β + |P|)`.
//! Small prototypes that are fully contained in `x` score highest.
//!
//! **Plausibility.** The winner must beat `|x| / (β + len)`, the score a
//! hypothetical all-ones prototype would get. Otherwise `x` founds a new cluster.
//!
//! **Vigilance.** The winner must cover at least `ρ` of `x`'s ones:
//! `|P ∧ x| / |x| ≥ ρ`. On a mismatch the candidate is inhibited for this
//! pattern and the search continues.
//! > Low vigilance: few broad clusters. High vigilance: many tight ones.
//!
//! Training repeats full passes over the set and tracks the **fluctuation**,
//! the percentage of patterns that changed cluster in a pass. The network from
//! the pass with the lowest fluctuation is the one returned.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! CSV → Dataset → noise → Trainer ─┬─→ TrainedNetwork → classify
//!                    │             │          │
//!                    │      ClusterRegistry   └─→ ClusterLabels → Tally
//!                    │     (resonance search)
//!                    └───────────────────────────→ report
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`pattern`] | [`BinaryPattern`] | Packed bit vectors, popcount and AND-fold |
//! | [`params`] | [`NetworkParams`] | β, vigilance, stopping criteria and their validation |
//! | [`registry`] | [`ClusterRegistry`], [`Cluster`], [`ClusterId`] | Clusters, prototypes, membership and ownership |
//! | [`resonance`] | [`SearchStep`], [`Assignment`] | One pattern's search: choice, plausibility, vigilance |
//! | [`training`] | [`Trainer`], [`TrainingOutcome`], [`TrainedNetwork`] | Multi-pass training with best-snapshot retention |
//! | [`classify`] | [`TrainedNetwork::classify`] | Learning-free prediction on a [`TrainedNetwork`] |
//! | [`labels`] | [`ClusterLabels`], [`Tally`] | Majority-class labelling and success / fail scoring |
//! | [`noise`] | [`noise::add_noise`] | Seeded random bit flips |
//! | `dataset` | `Dataset` | CSV ingestion and validation (requires `std`) |
//! | `report` | `TrainingReport`, `TestReport` | Text reports and per-cluster CSV files (requires `std`) |
//!
//! ## Randomness
//!
//! Exact score ties are broken at random. Every operation that can tie takes a
//! caller-supplied [`rand::Rng`]; seed it for reproducible runs.
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default and needs only `alloc`. Enable `std` for
//! CSV ingestion and reports, `serde` for serialisation of parameters and
//! results, `cli` for the `art1` binary, and `python-ffi` for the PyO3 module.
//!
//! ## License
//!
//! Business Source License 1.1. Free for evaluation and non-production use.

#![cfg_attr(not(any(feature = "std", feature = "python-ffi")), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// Pull in std when the feature is enabled (for file IO and reports).
#[cfg(any(feature = "std", feature = "python-ffi"))]
extern crate std;

pub mod error;
pub mod pattern;
pub mod params;
pub mod registry;
pub mod resonance;
pub mod training;
pub mod classify;
pub mod labels;
pub mod noise;

#[cfg(feature = "std")]
pub mod dataset;
#[cfg(feature = "std")]
pub mod report;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use error::{Art1Error, Result};
pub use labels::{ClusterLabels, Evaluation, Prediction, Tally};
pub use params::NetworkParams;
pub use pattern::{BinaryPattern, PatternId};
pub use registry::{Cluster, ClusterId, ClusterRegistry};
pub use resonance::{Assignment, SearchStep};
pub use training::{PassStats, TrainedNetwork, Trainer, TrainingOutcome};
