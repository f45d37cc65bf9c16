// MIT License
//
// Copyright (c) 2026 Raja Lehtihet & Wael El Oraiby
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//
//! Similarity and intersection-size estimators over raw signatures.
//!
//! These are pure functions; sketches call them with their own signatures,
//! but they work equally on signatures restored from storage.

use crate::SketchError;
use crate::signature::UNSET;

/// Estimates the Jaccard index from two MinWise signatures.
///
/// Returns the fraction of slots whose minima are equal. Slots that are
/// [`UNSET`] on both sides never count as a match, so two empty signatures
/// have similarity `0.0`.
///
/// # Errors
/// Returns [`SketchError::SignatureLength`] when lengths differ and
/// [`SketchError::InvalidParameter`] when both are empty.
///
/// # Example
/// ```rust
/// use minwise::estimators::minwise_similarity;
///
/// assert_eq!(minwise_similarity(&[1, 2, 3, 4], &[1, 2, 7, 8]).unwrap(), 0.5);
/// assert!(minwise_similarity(&[1, 2, 3], &[1, 2]).is_err());
/// ```
pub fn minwise_similarity(left: &[u64], right: &[u64]) -> Result<f64, SketchError> {
    if left.len() != right.len() {
        return Err(SketchError::SignatureLength {
            expected: left.len(),
            actual: right.len(),
        });
    }
    if left.is_empty() {
        return Err(SketchError::InvalidParameter(
            "similarity is undefined for zero-length signatures",
        ));
    }

    let matches = left
        .iter()
        .zip(right.iter())
        .filter(|&(&a, &b)| a == b && a != UNSET)
        .count();
    Ok(matches as f64 / left.len() as f64)
}

/// Estimates the Jaccard index from two Bottom-K signatures.
///
/// Both inputs yield their retained values in ascending order; [`UNSET`]
/// padding is skipped. The result is the number of values retained by both
/// sides divided by `min(k, |A ∪ B|)`, where `A` and `B` are the retained
/// sets. For two saturated sketches this is `|A ∩ B| / k`; below capacity the
/// retained sets are exact and the exact Jaccard index is returned. Anything
/// compared against an empty side is `0.0`.
///
/// # Errors
/// Returns [`SketchError::InvalidParameter`] when `k == 0`.
///
/// # Example
/// ```rust
/// use minwise::estimators::bottom_k_similarity;
///
/// assert_eq!(bottom_k_similarity([1, 2, 3, 10], [4, 5, 6, 10], 4).unwrap(), 0.25);
/// ```
pub fn bottom_k_similarity<L, R>(left: L, right: R, k: usize) -> Result<f64, SketchError>
where
    L: IntoIterator<Item = u64>,
    R: IntoIterator<Item = u64>,
{
    if k == 0 {
        return Err(SketchError::InvalidParameter("k must be greater than zero"));
    }

    let mut left = left.into_iter().filter(|&v| v != UNSET).peekable();
    let mut right = right.into_iter().filter(|&v| v != UNSET).peekable();
    let (mut left_len, mut right_len, mut shared) = (0_usize, 0_usize, 0_usize);

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => break,
            (Some(_), None) => {
                left.next();
                left_len += 1;
            }
            (None, Some(_)) => {
                right.next();
                right_len += 1;
            }
            (Some(a), Some(b)) => {
                if a <= b {
                    left.next();
                    left_len += 1;
                }
                if b <= a {
                    right.next();
                    right_len += 1;
                }
                if a == b {
                    shared += 1;
                }
            }
        }
    }

    if left_len == 0 || right_len == 0 {
        return Ok(0.0);
    }
    let union = left_len + right_len - shared;
    Ok(shared as f64 / union.min(k) as f64)
}

/// Estimates `|A ∩ B|` from a Jaccard estimate and the two set sizes.
///
/// With `n = |A|`, `m = |B|` and `i = |A ∩ B|`, `J = i / (n + m - i)` solves
/// to `i = (n + m) / (1/J + 1)`, floored. A similarity of exactly `0` returns
/// `0` even though small true intersections are then under-estimated.
///
/// # Errors
/// Returns [`SketchError::InvalidParameter`] when `similarity` is NaN or
/// outside `[0, 1]`.
///
/// # Example
/// ```rust
/// use minwise::estimators::intersection_size;
///
/// assert_eq!(intersection_size(1.0, 5, 5).unwrap(), 5);
/// assert_eq!(intersection_size(0.0, 10, 20).unwrap(), 0);
/// // 4_000 shared out of 16_000 distinct.
/// assert_eq!(intersection_size(0.25, 10_000, 10_000).unwrap(), 4_000);
/// ```
pub fn intersection_size(similarity: f64, size_a: u64, size_b: u64) -> Result<u64, SketchError> {
    check_similarity(similarity)?;
    if similarity == 0.0 {
        return Ok(0);
    }

    let total = size_a as f64 + size_b as f64;
    Ok((total / (1.0 / similarity + 1.0)).floor() as u64)
}

/// Estimates `|A ∪ B|` as `|A| + |B| - |A ∩ B|`.
///
/// # Errors
/// Same conditions as [`intersection_size`].
pub fn union_size(similarity: f64, size_a: u64, size_b: u64) -> Result<u64, SketchError> {
    let intersection = intersection_size(similarity, size_a, size_b)?;
    Ok(size_a.saturating_add(size_b).saturating_sub(intersection))
}

fn check_similarity(similarity: f64) -> Result<(), SketchError> {
    if !(0.0..=1.0).contains(&similarity) {
        return Err(SketchError::InvalidParameter(
            "similarity must be within [0, 1]",
        ));
    }
    Ok(())
}
