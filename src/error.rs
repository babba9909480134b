/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Error type shared by the core and its collaborators.
//!
//! The core itself only fails on entry-point checks (bad parameters, empty
//! training set) and on the empty-tie-set invariant. Everything else here
//! belongs to the [`crate::dataset`] ingestion layer, which rejects malformed
//! input before it reaches the core.

use alloc::string::String;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Art1Error>;

/// Errors raised by ART1 training, classification, and dataset ingestion.
#[derive(Debug, thiserror::Error)]
pub enum Art1Error {
    /// A network parameter is outside its valid range.
    #[error("invalid network parameter: {0}")]
    InvalidParams(String),

    /// `Trainer::train` was handed zero patterns.
    #[error("training set is empty")]
    EmptyTrainingSet,

    /// A caller-supplied pattern row cannot be trained on.
    #[error("pattern {index}: {reason}")]
    InvalidPattern {
        /// 0-based row index.
        index: usize,
        /// What is wrong with the row.
        reason: String,
    },

    /// The registry has handed out every representable cluster id.
    #[error("cluster ids exhausted after {created} clusters")]
    ClusterIdsExhausted {
        /// Ids allocated so far.
        created: u32,
    },

    /// Scoring produced no maximum even though uninhibited clusters exist.
    ///
    /// Indicates broken score or inhibition bookkeeping, never bad input.
    #[error("resonance search found {candidates} candidate(s) but an empty tie set for pattern {pattern}")]
    EmptyTieSet {
        /// Pattern being searched.
        pattern: usize,
        /// Number of uninhibited clusters that were scored.
        candidates: usize,
    },

    /// A dataset contained no usable pattern after filtering.
    #[error("dataset has no usable patterns ({removed} all-zero pattern(s) removed)")]
    EmptyDataset {
        /// All-zero patterns dropped before the check.
        removed: usize,
    },

    /// A CSV row has a different column count than the first row.
    #[error("line {line} has {found} columns, previous lines had {expected}")]
    RaggedRow {
        /// 1-based line number in the source file.
        line: u64,
        /// Columns on this line.
        found: usize,
        /// Columns on the first data line.
        expected: usize,
    },

    /// A pattern cell is not `0` or `1`.
    #[error("value at line {line}, column {column} is {value:?}; patterns must be binary (0 or 1)")]
    NonBinary {
        /// 1-based line number in the source file.
        line: u64,
        /// 1-based column number, counting the label column if present.
        column: usize,
        /// The offending cell text.
        value: String,
    },

    /// Training and testing patterns differ in length.
    #[error("training patterns are {train} bits long, testing patterns are {test} bits long")]
    WidthMismatch {
        /// Training pattern length.
        train: usize,
        /// Testing pattern length.
        test: usize,
    },

    /// Labels and patterns were supplied in different quantities.
    #[error("{labels} label(s) supplied for {patterns} pattern(s)")]
    LabelCountMismatch {
        /// Number of labels.
        labels: usize,
        /// Number of patterns.
        patterns: usize,
    },

    /// CSV decoding failure.
    #[cfg(feature = "std")]
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O failure while reading input or writing reports.
    #[cfg(feature = "std")]
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
