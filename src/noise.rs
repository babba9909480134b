/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Random bit-flip noise for robustness experiments.
//!
//! Each pattern gets `round(percent × len / 100)` flips at uniformly drawn
//! positions. Positions are drawn with replacement, so a bit can flip back.

use rand::Rng;

use crate::pattern::BinaryPattern;

/// Flips applied per pattern of length `len` at `percent` noise.
pub fn flips_per_pattern(percent: u8, len: usize) -> usize {
    let percent = percent.min(100) as usize;
    // Integer round-half-up of percent × len / 100.
    (percent * len + 50) / 100
}

/// Flip random bits of every pattern in place and return the total flip count.
///
/// `percent` is clamped to 100.
pub fn add_noise<R: Rng + ?Sized>(patterns: &mut [BinaryPattern], percent: u8, rng: &mut R) -> usize {
    let mut flipped = 0;
    for p in patterns.iter_mut() {
        let len = p.len();
        if len == 0 {
            continue;
        }
        for _ in 0..flips_per_pattern(percent, len) {
            p.flip(rng.gen_range(0..len));
            flipped += 1;
        }
    }
    tracing::debug!(percent, flipped, "noise applied");
    flipped
}
