//! Python FFI bindings via PyO3.
//!
//! Exposes training and classification on lists of 0/1 integers.
//! Labelling, noise and reports stay on the Rust side.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from art1_core import Art1Network
//!
//! net = Art1Network(vigilance=0.9, beta=0.0, seed=7)
//! net.train([[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 1, 1]])
//! print(net.cluster_count)          # 2
//! print(net.prototypes())           # [[1, 1, 0, 0], [0, 0, 1, 1]]
//! print(net.classify([0, 1, 1, 1])) # 1
//! ```

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Art1Error;
use crate::params::NetworkParams;
use crate::pattern::{pattern_from_row, patterns_from_rows};
use crate::training::{Trainer, TrainingOutcome};

fn to_py_err(e: Art1Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ── Art1Network ───────────────────────────────────────────────────────────────

/// ART1 network: train on binary patterns, then classify new ones.
///
/// Ties between equally scored clusters are broken at random. Pass `seed` for
/// reproducible results.
#[pyclass(name = "Art1Network")]
pub struct PyArt1Network {
    params: NetworkParams,
    rng: StdRng,
    outcome: Option<TrainingOutcome>,
}

impl PyArt1Network {
    fn trained(&self) -> PyResult<&TrainingOutcome> {
        self.outcome
            .as_ref()
            .ok_or_else(|| PyRuntimeError::new_err("network has not been trained"))
    }
}

#[pymethods]
impl PyArt1Network {
    /// Create an untrained network.
    ///
    /// Args:
    ///     vigilance: Match threshold in (0, 1]; higher = more clusters (default 0.5)
    ///     beta: Choice smoothing constant >= 0 (default 1.0)
    ///     max_passes: Upper bound on training passes (default 50)
    ///     min_fluctuation: Stop once a pass reassigns this percentage or less (default 0.0)
    ///     seed: RNG seed for tie-breaks; None draws from the OS
    #[new]
    #[pyo3(signature = (vigilance=0.5, beta=1.0, max_passes=50, min_fluctuation=0.0, seed=None))]
    pub fn new(
        vigilance: f64,
        beta: f64,
        max_passes: usize,
        min_fluctuation: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let params = NetworkParams { beta, vigilance, max_passes, min_fluctuation };
        params.validate().map_err(to_py_err)?;
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(Self { params, rng, outcome: None })
    }

    /// Train on a list of equal-length 0/1 lists.
    ///
    /// Raises ValueError naming the offending row when a row is not binary,
    /// has the wrong length or has no set bit.
    ///
    /// Returns:
    ///     Number of clusters in the retained network
    pub fn train(&mut self, patterns: Vec<Vec<u8>>) -> PyResult<usize> {
        let patterns = patterns_from_rows(&patterns).map_err(to_py_err)?;
        let trainer = Trainer::new(self.params.clone()).map_err(to_py_err)?;
        let outcome = trainer.train(&patterns, &mut self.rng).map_err(to_py_err)?;
        let count = outcome.network.cluster_count();
        self.outcome = Some(outcome);
        Ok(count)
    }

    /// Classify one pattern without learning.
    ///
    /// Returns:
    ///     Cluster id, or None when the network has no clusters
    pub fn classify(&mut self, pattern: Vec<u8>) -> PyResult<Option<u32>> {
        let outcome = self
            .outcome
            .as_ref()
            .ok_or_else(|| PyRuntimeError::new_err("network has not been trained"))?;
        let p = pattern_from_row(&pattern, 0, Some(outcome.network.pattern_len())).map_err(to_py_err)?;
        Ok(outcome.network.classify(&p, &mut self.rng).map(|id| id.0))
    }

    /// Cluster prototypes as 0/1 lists, in cluster creation order.
    pub fn prototypes(&self) -> PyResult<Vec<Vec<u8>>> {
        Ok(self
            .trained()?
            .network
            .clusters()
            .iter()
            .map(|c| c.prototype().to_bits())
            .collect())
    }

    /// Training pattern indices of every cluster, in cluster creation order.
    pub fn members(&self) -> PyResult<Vec<Vec<usize>>> {
        Ok(self
            .trained()?
            .network
            .clusters()
            .iter()
            .map(|c| c.members().to_vec())
            .collect())
    }

    /// Cluster ids, in creation order.
    pub fn cluster_ids(&self) -> PyResult<Vec<u32>> {
        Ok(self.trained()?.network.clusters().ids().map(|id| id.0).collect())
    }

    /// Per-pass `(pass, reassigned, fluctuation, clusters)` tuples.
    pub fn history(&self) -> PyResult<Vec<(usize, usize, f64, usize)>> {
        Ok(self
            .trained()?
            .history
            .iter()
            .map(|s| (s.pass, s.reassigned, s.fluctuation, s.clusters))
            .collect())
    }

    /// Best fluctuation percentage reached, or None before training.
    #[getter]
    pub fn fluctuation(&self) -> Option<f64> {
        self.outcome.as_ref().map(|o| o.best_fluctuation)
    }

    /// Number of learned clusters (0 before training).
    #[getter]
    pub fn cluster_count(&self) -> usize {
        self.outcome.as_ref().map_or(0, |o| o.network.cluster_count())
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "Art1Network(vigilance={}, beta={}, max_passes={}, min_fluctuation={})",
            self.params.vigilance, self.params.beta, self.params.max_passes, self.params.min_fluctuation,
        )
    }
}

// ── Module entry point ────────────────────────────────────────────────────────

/// ART1 adaptive resonance clustering for binary patterns.
#[pymodule]
pub fn art1_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyArt1Network>()?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
