/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Fixed-length binary patterns and the bitwise primitives ART1 is built on.
//!
//! A [`BinaryPattern`] packs its bits into `u64` words so that
//! [`ones_count`] and [`common_ones`] reduce to popcounts. The same type is
//! used for input patterns and cluster prototypes.
//!
//! # Invariants
//!
//! - **ART-P01**: bits at positions `>= len` in the last word are always zero,
//!   so word-level popcounts never see padding.
//! - **ART-P02**: [`fold_into`] only ever clears prototype bits. A prototype
//!   built by folding every member into a copy of the first member is the
//!   bitwise AND of all members.
//! - **ART-P03**: [`common_ones`] does not re-check lengths in release builds.
//!   Equal length is guaranteed by ingestion.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::{Art1Error, Result};

const WORD_BITS: usize = u64::BITS as usize;

/// Stable identifier of a pattern: its position in the training set.
pub type PatternId = usize;

// ─── BinaryPattern ───────────────────────────────────────────────────────────

/// An ordered, fixed-length sequence of bits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryPattern {
    words: Vec<u64>,
    len: usize,
}

impl BinaryPattern {
    /// All-zero pattern of `len` bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Build from a slice of `0`/`1` values. Any non-zero byte counts as set.
    pub fn from_bits(bits: &[u8]) -> Self {
        let mut p = Self::zeros(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            if b != 0 {
                p.words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
            }
        }
        p
    }

    /// Build from booleans.
    pub fn from_bools(bits: &[bool]) -> Self {
        let mut p = Self::zeros(bits.len());
        for (i, &b) in bits.iter().enumerate() {
            if b {
                p.words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
            }
        }
        p
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length pattern.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read bit `i`. Panics if `i >= len`.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.len, "bit {} out of range for length {}", i, self.len);
        self.words[i / WORD_BITS] >> (i % WORD_BITS) & 1 == 1
    }

    /// Write bit `i`. Panics if `i >= len`.
    #[inline]
    pub fn set(&mut self, i: usize, value: bool) {
        assert!(i < self.len, "bit {} out of range for length {}", i, self.len);
        let mask = 1u64 << (i % WORD_BITS);
        if value {
            self.words[i / WORD_BITS] |= mask;
        } else {
            self.words[i / WORD_BITS] &= !mask;
        }
    }

    /// Invert bit `i`. Panics if `i >= len`.
    #[inline]
    pub fn flip(&mut self, i: usize) {
        assert!(i < self.len, "bit {} out of range for length {}", i, self.len);
        self.words[i / WORD_BITS] ^= 1 << (i % WORD_BITS);
    }

    /// True when no bit is set.
    pub fn is_all_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.words[i / WORD_BITS] >> (i % WORD_BITS) & 1 == 1)
    }

    /// Unpack into one `0`/`1` byte per bit.
    pub fn to_bits(&self) -> Vec<u8> {
        self.iter().map(u8::from).collect()
    }
}

// ─── Primitives ──────────────────────────────────────────────────────────────

/// Number of set bits in `v`.
#[inline]
pub fn ones_count(v: &BinaryPattern) -> u32 {
    v.words.iter().map(|w| w.count_ones()).sum()
}

/// Number of positions set in both `a` and `b`.
///
/// `a` and `b` must have the same length (ART-P03).
#[inline]
pub fn common_ones(a: &BinaryPattern, b: &BinaryPattern) -> u32 {
    debug_assert_eq!(a.len, b.len, "common_ones on patterns of different length");
    a.words
        .iter()
        .zip(&b.words)
        .map(|(x, y)| (x & y).count_ones())
        .sum()
}

/// Clear every prototype bit where `pattern` is 0 (ART-P02).
#[inline]
pub fn fold_into(prototype: &mut BinaryPattern, pattern: &BinaryPattern) {
    debug_assert_eq!(prototype.len, pattern.len, "fold_into on patterns of different length");
    for (p, &x) in prototype.words.iter_mut().zip(&pattern.words) {
        *p &= x;
    }
}

/// `num / den`, or `0.0` when `den` is zero.
///
/// An all-zero prototype with β = 0 would otherwise score NaN and fall out of
/// every comparison.
#[inline]
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

// ─── Row validation ──────────────────────────────────────────────────────────

/// Check one caller-supplied row of `0`/`1` values and pack it.
///
/// `index` only labels the error. `width`, when given, is the required length.
pub fn pattern_from_row(row: &[u8], index: usize, width: Option<usize>) -> Result<BinaryPattern> {
    if let Some((column, &bad)) = row.iter().enumerate().find(|&(_, &b)| b > 1) {
        return Err(Art1Error::InvalidPattern {
            index,
            reason: format!("column {column} is {bad}, expected 0 or 1"),
        });
    }
    if let Some(width) = width.filter(|&w| w != row.len()) {
        return Err(Art1Error::InvalidPattern {
            index,
            reason: format!("has {} elements, expected {width}", row.len()),
        });
    }
    Ok(BinaryPattern::from_bits(row))
}

/// Check and pack a training set given as rows.
///
/// Every row must have the width of the first one and contain at least one set
/// bit. An all-zero row fails vigilance against every cluster, founds a fresh
/// cluster on each pass and keeps the fluctuation from ever reaching zero.
pub fn patterns_from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Vec<BinaryPattern>> {
    let width = rows.first().map(|r| r.as_ref().len());
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let p = pattern_from_row(row.as_ref(), index, width)?;
            if p.is_all_zero() {
                return Err(Art1Error::InvalidPattern {
                    index,
                    reason: "all-zero pattern cannot be clustered".into(),
                });
            }
            Ok(p)
        })
        .collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_from_bits_roundtrip_across_word_boundary() {
        let mut bits = vec![0u8; 130];
        bits[0] = 1;
        bits[63] = 1;
        bits[64] = 1;
        bits[129] = 1;
        let p = BinaryPattern::from_bits(&bits);
        assert_eq!(p.len(), 130);
        assert_eq!(p.to_bits(), bits);
        assert_eq!(ones_count(&p), 4);
    }

    #[test]
    fn test_ones_count_and_common_ones() {
        let a = BinaryPattern::from_bits(&[1, 1, 0, 1]);
        let b = BinaryPattern::from_bits(&[0, 1, 1, 1]);
        assert_eq!(ones_count(&a), 3);
        assert_eq!(ones_count(&b), 3);
        assert_eq!(common_ones(&a, &b), 2);
        assert_eq!(common_ones(&a, &a), 3);
    }

    #[test]
    fn test_fold_into_only_clears() {
        let mut proto = BinaryPattern::from_bits(&[1, 1, 0, 1]);
        fold_into(&mut proto, &BinaryPattern::from_bits(&[0, 1, 1, 1]));
        assert_eq!(proto.to_bits(), vec![0, 1, 0, 1]);
        // A pattern with extra ones never sets prototype bits.
        fold_into(&mut proto, &BinaryPattern::from_bits(&[1, 1, 1, 1]));
        assert_eq!(proto.to_bits(), vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_fold_is_and_of_members() {
        let members = [
            BinaryPattern::from_bits(&[1, 1, 1, 0, 1]),
            BinaryPattern::from_bits(&[1, 0, 1, 1, 1]),
            BinaryPattern::from_bits(&[1, 1, 1, 1, 0]),
        ];
        let mut proto = members[0].clone();
        for m in &members[1..] {
            fold_into(&mut proto, m);
        }
        for i in 0..5 {
            let all = members.iter().all(|m| m.get(i));
            assert_eq!(proto.get(i), all, "bit {}", i);
        }
    }

    #[test]
    fn test_set_flip_and_all_zero() {
        let mut p = BinaryPattern::zeros(70);
        assert!(p.is_all_zero());
        p.set(69, true);
        assert!(p.get(69));
        assert!(!p.is_all_zero());
        p.flip(69);
        assert!(p.is_all_zero());
        p.flip(3);
        assert_eq!(ones_count(&p), 1);
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio(0.0, 0.0), 0.0);
        assert_eq!(ratio(3.0, 0.0), 0.0);
        assert!((ratio(1.0, 4.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_rows_reject_all_zero_with_index() {
        let err = patterns_from_rows(&[[0u8, 0, 0, 0], [1, 1, 0, 0]]).unwrap_err();
        assert!(matches!(err, Art1Error::InvalidPattern { index: 0, .. }), "{err}");
        assert!(err.to_string().starts_with("pattern 0:"), "{err}");

        let err = patterns_from_rows(&[vec![1u8, 0], vec![0, 1], vec![0, 0]]).unwrap_err();
        assert!(matches!(err, Art1Error::InvalidPattern { index: 2, .. }), "{err}");
    }

    #[test]
    fn test_rows_reject_non_binary_and_ragged() {
        let err = patterns_from_rows(&[vec![1u8, 0, 2]]).unwrap_err();
        assert!(err.to_string().contains("column 2 is 2"), "{err}");

        let err = patterns_from_rows(&[vec![1u8, 0, 1], vec![1, 1]]).unwrap_err();
        assert!(matches!(err, Art1Error::InvalidPattern { index: 1, .. }), "{err}");
        assert!(err.to_string().contains("expected 3"), "{err}");
    }

    #[test]
    fn test_rows_accept_valid_set() {
        let rows = [[1u8, 1, 0, 0], [0, 0, 1, 1]];
        let p = patterns_from_rows(&rows).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p[1].to_bits(), vec![0, 0, 1, 1]);
        assert!(patterns_from_rows::<[u8; 4]>(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_row_allows_all_zero() {
        let p = pattern_from_row(&[0, 0, 0], 7, Some(3)).unwrap();
        assert!(p.is_all_zero());
        let err = pattern_from_row(&[0, 0], 7, Some(3)).unwrap_err();
        assert!(matches!(err, Art1Error::InvalidPattern { index: 7, .. }), "{err}");
    }

    #[test]
    fn test_from_bools_matches_from_bits() {
        let a = BinaryPattern::from_bools(&[true, false, true]);
        let b = BinaryPattern::from_bits(&[1, 0, 1]);
        assert_eq!(a, b);
    }
}
