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
//! Contract shared by every sketch variant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SketchError;
use crate::element::Element;
use crate::estimators::intersection_size;
use crate::signature::Signature;

/// Identifies how a sketch fills and compares its signature.
///
/// Signatures of different kinds are never comparable, even at equal length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SketchKind {
    /// One independent minimum per virtual hash function.
    MinWise,
    /// The `k` smallest distinct values of a single hash function.
    BottomK,
}

impl fmt::Display for SketchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinWise => f.write_str("minwise"),
            Self::BottomK => f.write_str("bottom-k"),
        }
    }
}

/// Common API for sketches summarizing a set by a fixed-size signature.
///
/// Comparison and merging are only defined between sketches of the same
/// variant, which the `&Self` parameters enforce at compile time.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
///
/// use minwise::{BottomK, HashFamily, MinWise, SetSketch, similarity};
///
/// fn overlap<S: SetSketch>(mut left: S, mut right: S) -> f64 {
///     for value in 0_u64..5_000 {
///         left.ingest(value);
///     }
///     for value in 2_500_u64..7_500 {
///         right.ingest(value);
///     }
///     similarity(&left, &right).unwrap()
/// }
///
/// let family = Arc::new(HashFamily::xxh3(128, 42).unwrap());
/// let minwise = overlap(MinWise::new(family.clone()), MinWise::new(family.clone()));
/// let bottom_k = overlap(BottomK::new(family.clone()), BottomK::new(family));
/// assert!(minwise > 0.20 && minwise < 0.50);
/// assert!(bottom_k > 0.20 && bottom_k < 0.65);
/// ```
pub trait SetSketch {
    /// Returns the variant tag of this sketch.
    fn kind(&self) -> SketchKind;

    /// Adds one element to the summarized set.
    fn ingest<'a>(&mut self, element: impl Into<Element<'a>>);

    /// Folds `other` into `self`, yielding the sketch of the union.
    ///
    /// # Errors
    /// Implementations return an error, without mutating `self`, when the two
    /// sketches were not built from equivalent hash families.
    fn merge(&mut self, other: &Self) -> Result<(), SketchError>;

    /// Returns the estimated number of distinct ingested elements.
    fn cardinality(&self) -> f64;

    /// Returns the current signature, suitable for storage.
    fn signature(&self) -> Signature;

    /// Returns the estimated Jaccard index `|A ∩ B| / |A ∪ B|` in `[0, 1]`.
    ///
    /// # Errors
    /// Implementations return an error when the sketches are not comparable.
    fn similarity(&self, other: &Self) -> Result<f64, SketchError>;

    /// Returns [`cardinality`](Self::cardinality) rounded to an integer.
    fn count(&self) -> u64 {
        self.cardinality().round() as u64
    }

    /// Estimates `|A ∩ B|` from the similarity and both cardinalities.
    ///
    /// # Errors
    /// Propagates errors from [`similarity`](Self::similarity).
    fn intersection_estimate(&self, other: &Self) -> Result<u64, SketchError>
    where
        Self: Sized,
    {
        let similarity = self.similarity(other)?;
        intersection_size(similarity, self.count(), other.count())
    }
}

/// Compares two sketches of the same variant through the receiver's own
/// [`SetSketch::similarity`].
///
/// # Errors
/// Returns whatever the variant's `similarity` returns.
pub fn similarity<S: SetSketch>(left: &S, right: &S) -> Result<f64, SketchError> {
    left.similarity(right)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{SetSketch, SketchKind, similarity};
    use crate::{BottomK, HashFamily, MinWise};

    fn fill<S: SetSketch>(sketch: &mut S, values: std::ops::Range<u64>) {
        for value in values {
            sketch.ingest(value);
        }
    }

    #[test]
    fn free_function_matches_receiver() {
        let family = Arc::new(HashFamily::xxh3(128, 9).unwrap());
        let mut left = MinWise::new(family.clone());
        let mut right = MinWise::new(family);
        fill(&mut left, 0..1_000);
        fill(&mut right, 500..1_500);

        assert_eq!(
            similarity(&left, &right).unwrap(),
            SetSketch::similarity(&left, &right).unwrap()
        );
        assert_eq!(similarity(&left, &right).unwrap(), similarity(&right, &left).unwrap());
    }

    #[test]
    fn kinds_are_reported() {
        let family = Arc::new(HashFamily::xxh3(8, 0).unwrap());
        assert_eq!(MinWise::new(family.clone()).kind(), SketchKind::MinWise);
        assert_eq!(BottomK::new(family).kind(), SketchKind::BottomK);
        assert_eq!(SketchKind::BottomK.to_string(), "bottom-k");
    }

    #[test]
    fn intersection_estimate_is_reasonable_for_both_variants() {
        let family = Arc::new(HashFamily::xxh3(256, 3).unwrap());

        let mut left = MinWise::new(family.clone());
        let mut right = MinWise::new(family.clone());
        fill(&mut left, 0..10_000);
        fill(&mut right, 5_000..15_000);
        let estimate = left.intersection_estimate(&right).unwrap() as f64;
        assert!((estimate - 5_000.0).abs() < 2_000.0, "estimate={estimate}");

        let mut left = BottomK::new(family.clone());
        let mut right = BottomK::new(family);
        fill(&mut left, 0..10_000);
        fill(&mut right, 5_000..15_000);
        let estimate = left.intersection_estimate(&right).unwrap() as f64;
        assert!((estimate - 5_000.0).abs() < 3_000.0, "estimate={estimate}");
    }
}
