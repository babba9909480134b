/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! CSV ingestion and validation for training and testing sets.
//!
//! This is the layer that guarantees what the core assumes: every pattern is
//! binary, every pattern has the same width, and the set is non-empty.
//!
//! # File format
//!
//! ```text
//! # comment lines start with '#'; blank lines are ignored
//! p, 1, 0, 1, 1, 0        ← labelled: first column is the class
//! e, 0, 0, 1, 0, 1
//! ```
//!
//! All-zero patterns carry no information for ART1 (they score zero against
//! everything), so they are dropped and counted in [`Dataset::removed_empty`].
//!
//! Requires the `std` feature.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::error::{Art1Error, Result};
use crate::pattern::BinaryPattern;

/// How to read a dataset file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DatasetOptions {
    /// Treat the first column as a class label.
    pub labelled: bool,
}

/// A validated set of equal-width binary patterns, optionally labelled.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    patterns: Vec<BinaryPattern>,
    labels: Option<Vec<String>>,
    removed_empty: usize,
}

impl Dataset {
    /// Read and validate a dataset from a file.
    pub fn from_path(path: impl AsRef<Path>, options: DatasetOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file, options)
    }

    /// Read and validate a dataset from any reader.
    pub fn from_reader<R: Read>(reader: R, options: DatasetOptions) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let skip = usize::from(options.labelled);
        let mut expected: Option<usize> = None;
        let mut patterns = Vec::new();
        let mut labels = Vec::new();
        let mut removed_empty = 0;

        for record in rdr.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            if record.iter().all(str::is_empty) {
                continue;
            }

            let columns = record.len();
            match expected {
                None => expected = Some(columns),
                Some(e) if e != columns => {
                    return Err(Art1Error::RaggedRow { line, found: columns, expected: e });
                }
                Some(_) => {}
            }

            let mut bits = Vec::with_capacity(columns.saturating_sub(skip));
            for (col, cell) in record.iter().enumerate().skip(skip) {
                match cell {
                    "0" => bits.push(0u8),
                    "1" => bits.push(1u8),
                    other => {
                        return Err(Art1Error::NonBinary {
                            line,
                            column: col + 1,
                            value: other.into(),
                        });
                    }
                }
            }

            let pattern = BinaryPattern::from_bits(&bits);
            if pattern.is_all_zero() {
                tracing::warn!(line, "dropping all-zero pattern");
                removed_empty += 1;
                continue;
            }
            patterns.push(pattern);
            if options.labelled {
                labels.push(record.get(0).unwrap_or_default().to_owned());
            }
        }

        if patterns.is_empty() {
            return Err(Art1Error::EmptyDataset { removed: removed_empty });
        }
        tracing::info!(
            patterns = patterns.len(),
            width = patterns[0].len(),
            removed_empty,
            "dataset loaded"
        );

        Ok(Self {
            patterns,
            labels: options.labelled.then_some(labels),
            removed_empty,
        })
    }

    /// Validated patterns, in file order.
    pub fn patterns(&self) -> &[BinaryPattern] {
        &self.patterns
    }

    /// Mutable access, e.g. for noise injection.
    pub fn patterns_mut(&mut self) -> &mut [BinaryPattern] {
        &mut self.patterns
    }

    /// Class labels, when the file was read as labelled.
    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    /// Number of usable patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Never true for a successfully loaded dataset.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Bit width shared by every pattern.
    pub fn pattern_len(&self) -> usize {
        self.patterns.first().map_or(0, BinaryPattern::len)
    }

    /// All-zero patterns dropped while loading.
    pub fn removed_empty(&self) -> usize {
        self.removed_empty
    }

    /// Fail unless this dataset's width equals `train_width`.
    pub fn ensure_width(&self, train_width: usize) -> Result<()> {
        let test = self.pattern_len();
        if test != train_width {
            return Err(Art1Error::WidthMismatch { train: train_width, test });
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
