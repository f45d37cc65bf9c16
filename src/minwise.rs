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
//! MinWise sketch: one minimum per virtual hash function.

use std::sync::Arc;

use tracing::debug;

use crate::element::Element;
use crate::estimators::{intersection_size, minwise_similarity};
use crate::hash_family::HashFamily;
use crate::signature::Signature;
use crate::sketch::{SetSketch, SketchKind};
use crate::{SketchError, normalize};

/// MinWise signature sketch for estimating set similarity and cardinality.
///
/// Slot `i` holds the minimum of virtual hash `i` over every ingested
/// element, so merging two sketches slot-wise yields exactly the sketch of
/// the union of their streams.
///
/// A sketch has a single mutator: concurrent ingestion into one instance
/// needs an external lock, since a slot-by-slot update is not atomic.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
///
/// use minwise::{HashFamily, MinWise};
///
/// let family = Arc::new(HashFamily::xxh3(256, 42).unwrap());
/// let mut left = MinWise::new(family.clone());
/// let mut right = MinWise::new(family);
///
/// for value in 0_u64..10_000 {
///     left.ingest(value);
/// }
/// for value in 5_000_u64..15_000 {
///     right.ingest(value);
/// }
///
/// // Exact Jaccard is 5_000 / 15_000 = 0.333...
/// let estimate = left.similarity(&right).unwrap();
/// assert!(estimate > 0.20 && estimate < 0.45);
/// ```
#[derive(Debug, Clone)]
pub struct MinWise {
    family: Arc<HashFamily>,
    signature: Signature,
}

impl MinWise {
    /// Creates an empty sketch over `family`.
    pub fn new(family: Arc<HashFamily>) -> Self {
        let signature = Signature::unset(family.num_hashes());
        Self { family, signature }
    }

    /// Resumes a sketch from a previously exported signature.
    ///
    /// The values are trusted to be minima produced under `family`.
    ///
    /// # Errors
    /// Returns [`SketchError::SignatureLength`] when the signature length
    /// differs from the family's `num_hashes`.
    pub fn from_signature(family: Arc<HashFamily>, signature: Signature) -> Result<Self, SketchError> {
        if signature.len() != family.num_hashes() {
            return Err(SketchError::SignatureLength {
                expected: family.num_hashes(),
                actual: signature.len(),
            });
        }
        Ok(Self { family, signature })
    }

    pub fn family(&self) -> &Arc<HashFamily> {
        &self.family
    }

    /// Returns the number of signature slots.
    pub fn num_hashes(&self) -> usize {
        self.signature.len()
    }

    /// Returns the expected standard error of similarity, `1 / sqrt(k)`.
    pub fn expected_error(&self) -> f64 {
        1.0 / (self.num_hashes() as f64).sqrt()
    }

    /// Returns `true` when no slot has observed a value.
    pub fn is_empty(&self) -> bool {
        self.signature.is_unset()
    }

    /// Returns a read-only view of the signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn into_signature(self) -> Signature {
        self.signature
    }

    /// Adds one element to the sketch.
    pub fn ingest<'a>(&mut self, element: impl Into<Element<'a>>) {
        element.into().with_bytes(|bytes| self.ingest_bytes(bytes));
    }

    /// Adds one element already encoded as bytes.
    pub fn ingest_bytes(&mut self, bytes: &[u8]) {
        for (index, value) in self.family.slot_values(bytes).enumerate() {
            self.signature.lower(index, value);
        }
    }

    /// Merges another sketch in-place by taking slot-wise minima.
    ///
    /// # Errors
    /// Returns [`SketchError::SignatureLength`] or
    /// [`SketchError::IncompatibleSketches`] without touching `self`.
    pub fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        self.check_compatible(other)?;
        self.signature.merge_min(&other.signature)
    }

    /// Estimates the number of distinct ingested elements.
    ///
    /// Each observed minimum `m` normalized to `u = m / 2^64` gives an
    /// exponential sample `-ln(1 - u)` with rate `n`; over `s` observed slots
    /// `(s - 1) / Σ -ln(1 - u)` is unbiased for `n`.
    pub fn estimate(&self) -> f64 {
        let (observed, total) = self
            .signature
            .observed()
            .fold((0_usize, 0.0_f64), |(observed, total), min| {
                (observed + 1, total + -(-normalize(min)).ln_1p())
            });

        match observed {
            0 => 0.0,
            1 => 1.0 / total,
            observed => (observed - 1) as f64 / total,
        }
    }

    /// Returns the estimated cardinality rounded to `u64`.
    pub fn count(&self) -> u64 {
        self.estimate().round() as u64
    }

    /// Estimates Jaccard similarity against another MinWise sketch.
    ///
    /// # Errors
    /// Returns [`SketchError::SignatureLength`] or
    /// [`SketchError::IncompatibleSketches`] when the families differ.
    pub fn similarity(&self, other: &Self) -> Result<f64, SketchError> {
        self.check_compatible(other)?;
        minwise_similarity(self.signature.as_slice(), other.signature.as_slice())
    }

    /// Estimates `|A ∩ B|` from the similarity and both cardinality estimates.
    ///
    /// # Errors
    /// Same conditions as [`similarity`](Self::similarity).
    pub fn intersection_estimate(&self, other: &Self) -> Result<u64, SketchError> {
        let similarity = self.similarity(other)?;
        intersection_size(similarity, self.count(), other.count())
    }

    /// Resets the sketch to the empty state.
    pub fn clear(&mut self) {
        self.signature.reset();
    }

    fn check_compatible(&self, other: &Self) -> Result<(), SketchError> {
        if self.signature.len() != other.signature.len() {
            debug!(
                left = self.signature.len(),
                right = other.signature.len(),
                "rejecting minwise sketches with different lengths"
            );
            return Err(SketchError::SignatureLength {
                expected: self.signature.len(),
                actual: other.signature.len(),
            });
        }
        if !self.family.is_compatible(&other.family) {
            debug!(
                left = self.family.fingerprint(),
                right = other.family.fingerprint(),
                "rejecting minwise sketches from different hash families"
            );
            return Err(SketchError::IncompatibleSketches(
                "sketches must share an equivalent hash family",
            ));
        }
        Ok(())
    }
}

impl<'a, E: Into<Element<'a>>> Extend<E> for MinWise {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for element in iter {
            self.ingest(element);
        }
    }
}

impl SetSketch for MinWise {
    fn kind(&self) -> SketchKind {
        SketchKind::MinWise
    }

    fn ingest<'a>(&mut self, element: impl Into<Element<'a>>) {
        MinWise::ingest(self, element);
    }

    fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        MinWise::merge(self, other)
    }

    fn cardinality(&self) -> f64 {
        self.estimate()
    }

    fn signature(&self) -> Signature {
        self.signature.clone()
    }

    fn similarity(&self, other: &Self) -> Result<f64, SketchError> {
        MinWise::similarity(self, other)
    }
}
