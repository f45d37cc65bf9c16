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
//! Bottom-K sketch: the `k` smallest distinct values of one hash function.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::element::Element;
use crate::estimators::bottom_k_similarity;
use crate::hash_family::HashFamily;
use crate::signature::{Signature, UNSET};
use crate::sketch::{SetSketch, SketchKind};
use crate::{SketchError, normalize};

/// Bottom-K sketch over the first base hash of a [`HashFamily`].
///
/// The capacity `k` is the family's `num_hashes`. While fewer than `k`
/// distinct hashes were seen the sketch is exact.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
///
/// use minwise::{BottomK, HashFamily};
///
/// let family = Arc::new(HashFamily::xxh3(256, 42).unwrap());
/// let mut sketch = BottomK::new(family);
/// for value in 0_u64..100 {
///     sketch.ingest(value);
/// }
/// assert_eq!(sketch.count(), 100);
///
/// for value in 100_u64..20_000 {
///     sketch.ingest(value);
/// }
/// let estimate = sketch.estimate();
/// assert!(estimate > 15_000.0 && estimate < 25_000.0);
/// ```
#[derive(Debug, Clone)]
pub struct BottomK {
    family: Arc<HashFamily>,
    retained: BTreeSet<u64>,
}

impl BottomK {
    pub fn new(family: Arc<HashFamily>) -> Self {
        Self {
            family,
            retained: BTreeSet::new(),
        }
    }

    /// Resumes a sketch from a previously exported signature.
    ///
    /// [`UNSET`] slots are skipped; the other values are trusted to be hashes
    /// produced under `family`.
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
        let mut sketch = Self::new(family);
        for hash in signature.observed() {
            sketch.offer(hash);
        }
        Ok(sketch)
    }

    pub fn family(&self) -> &Arc<HashFamily> {
        &self.family
    }

    /// Returns the maximum number of retained hashes.
    pub fn capacity(&self) -> usize {
        self.family.num_hashes()
    }

    /// Returns the number of currently retained hashes.
    pub fn len(&self) -> usize {
        self.retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }

    /// Returns `true` once `capacity()` hashes are retained.
    pub fn is_saturated(&self) -> bool {
        self.retained.len() >= self.capacity()
    }

    /// Iterates over the retained hashes in ascending order.
    pub fn hashes(&self) -> impl Iterator<Item = u64> + '_ {
        self.retained.iter().copied()
    }

    /// Adds one element to the sketch.
    pub fn ingest<'a>(&mut self, element: impl Into<Element<'a>>) {
        element.into().with_bytes(|bytes| self.ingest_bytes(bytes));
    }

    /// Adds one element already encoded as bytes.
    pub fn ingest_bytes(&mut self, bytes: &[u8]) {
        let hash = self.family.base_hash(bytes);
        self.offer(hash);
    }

    /// Merges another sketch in-place, keeping the `k` smallest of the union.
    ///
    /// # Errors
    /// Returns [`SketchError::IncompatibleSketches`] when the families differ.
    pub fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        self.check_compatible(other)?;
        for &hash in &other.retained {
            self.offer(hash);
        }
        Ok(())
    }

    /// Estimates the number of distinct ingested elements.
    ///
    /// Exact below capacity; otherwise the KMV estimate `(k - 1) / u_k`, with
    /// `u_k` the largest retained hash normalized to `(0, 1)`. With `k == 1`
    /// that numerator is zero, so the single minimum `u` gives `1/u - 1`
    /// (from `E[u] = 1 / (n + 1)`), floored at one element.
    pub fn estimate(&self) -> f64 {
        let Some(&largest) = self.retained.last() else {
            return 0.0;
        };
        if !self.is_saturated() {
            return self.retained.len() as f64;
        }

        let k = self.capacity();
        let u = normalize(largest);
        if k == 1 {
            return (1.0 / u - 1.0).max(1.0);
        }
        (k - 1) as f64 / u
    }

    /// Returns the estimated cardinality rounded to `u64`.
    pub fn count(&self) -> u64 {
        self.estimate().round() as u64
    }

    /// Returns the retained hashes ascending, padded with [`UNSET`] to `k`.
    pub fn signature(&self) -> Signature {
        Signature::padded(self.hashes(), self.capacity())
    }

    /// Estimates Jaccard similarity against another Bottom-K sketch.
    ///
    /// Once both sketches are saturated this is the number of hashes retained
    /// by both, divided by `k`.
    ///
    /// # Errors
    /// Returns [`SketchError::IncompatibleSketches`] when the families differ.
    pub fn similarity(&self, other: &Self) -> Result<f64, SketchError> {
        self.check_compatible(other)?;
        bottom_k_similarity(self.hashes(), other.hashes(), self.capacity())
    }

    /// Resets the sketch to the empty state.
    pub fn clear(&mut self) {
        self.retained.clear();
    }

    fn offer(&mut self, hash: u64) {
        // UNSET is reserved for padding exported signatures.
        if hash == UNSET {
            return;
        }
        if !self.is_saturated() {
            self.retained.insert(hash);
            return;
        }
        if let Some(&largest) = self.retained.last() {
            if hash < largest && self.retained.insert(hash) {
                self.retained.pop_last();
            }
        }
    }

    fn check_compatible(&self, other: &Self) -> Result<(), SketchError> {
        if !self.family.is_compatible(&other.family) {
            debug!(
                left = self.family.fingerprint(),
                right = other.family.fingerprint(),
                "rejecting bottom-k sketches from different hash families"
            );
            return Err(SketchError::IncompatibleSketches(
                "sketches must share an equivalent hash family",
            ));
        }
        Ok(())
    }
}

impl<'a, E: Into<Element<'a>>> Extend<E> for BottomK {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for element in iter {
            self.ingest(element);
        }
    }
}

impl SetSketch for BottomK {
    fn kind(&self) -> SketchKind {
        SketchKind::BottomK
    }

    fn ingest<'a>(&mut self, element: impl Into<Element<'a>>) {
        BottomK::ingest(self, element);
    }

    fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        BottomK::merge(self, other)
    }

    fn cardinality(&self) -> f64 {
        self.estimate()
    }

    fn signature(&self) -> Signature {
        BottomK::signature(self)
    }

    fn similarity(&self, other: &Self) -> Result<f64, SketchError> {
        BottomK::similarity(self, other)
    }
}
