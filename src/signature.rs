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
//! Fixed-length signature of per-slot 64-bit minima.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::SketchError;

/// Slot value meaning "no element observed yet".
pub const UNSET: u64 = u64::MAX;

/// Ordered sequence of `k` slot values.
///
/// Slot `i` always corresponds to virtual hash function `i` of the family
/// that produced it. The serialized form is the bare sequence of integers,
/// with no header: callers track which family produced a signature.
///
/// # Example
/// ```rust
/// use minwise::signature::{Signature, UNSET};
///
/// let signature = Signature::empty(4).unwrap();
/// assert_eq!(signature.as_slice(), &[UNSET; 4]);
/// assert!(signature.is_unset());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u64>", into = "Vec<u64>")]
pub struct Signature {
    values: Vec<u64>,
}

impl Signature {
    /// Creates an all-[`UNSET`] signature with `len` slots.
    ///
    /// # Errors
    /// Returns [`SketchError::InvalidParameter`] when `len == 0`.
    pub fn empty(len: usize) -> Result<Self, SketchError> {
        if len == 0 {
            return Err(SketchError::InvalidParameter(
                "signature length must be greater than zero",
            ));
        }
        Ok(Self::unset(len))
    }

    pub(crate) fn unset(len: usize) -> Self {
        Self {
            values: vec![UNSET; len],
        }
    }

    /// Builds a `len`-slot signature from ascending values, padded with [`UNSET`].
    pub(crate) fn padded(values: impl IntoIterator<Item = u64>, len: usize) -> Self {
        let mut values: Vec<u64> = values.into_iter().take(len).collect();
        values.resize(len, UNSET);
        Self { values }
    }

    /// Wraps previously exported slot values.
    ///
    /// # Errors
    /// Returns [`SketchError::InvalidParameter`] when `values` is empty.
    pub fn from_vec(values: Vec<u64>) -> Result<Self, SketchError> {
        if values.is_empty() {
            return Err(SketchError::InvalidParameter(
                "signature length must be greater than zero",
            ));
        }
        Ok(Self { values })
    }

    /// Returns the number of slots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: a signature has at least one slot.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` when every slot still holds [`UNSET`].
    pub fn is_unset(&self) -> bool {
        self.values.iter().all(|&value| value == UNSET)
    }

    /// Iterates over slots that hold an observed value.
    pub fn observed(&self) -> impl Iterator<Item = u64> + '_ {
        self.values.iter().copied().filter(|&value| value != UNSET)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<u64> {
        self.values
    }

    /// Lowers slot `index` to `value` if `value` is smaller.
    #[inline]
    pub(crate) fn lower(&mut self, index: usize, value: u64) {
        let slot = &mut self.values[index];
        if value < *slot {
            *slot = value;
        }
    }

    /// Takes slot-wise minima with `other`.
    ///
    /// # Errors
    /// Returns [`SketchError::SignatureLength`] when lengths differ; `self`
    /// is left untouched in that case.
    pub fn merge_min(&mut self, other: &Self) -> Result<(), SketchError> {
        if self.len() != other.len() {
            return Err(SketchError::SignatureLength {
                expected: self.len(),
                actual: other.len(),
            });
        }
        for (left, right) in self.values.iter_mut().zip(other.values.iter()) {
            *left = (*left).min(*right);
        }
        Ok(())
    }

    /// Resets every slot to [`UNSET`].
    pub fn reset(&mut self) {
        self.values.fill(UNSET);
    }
}

impl Index<usize> for Signature {
    type Output = u64;

    fn index(&self, index: usize) -> &u64 {
        &self.values[index]
    }
}

impl AsRef<[u64]> for Signature {
    fn as_ref(&self) -> &[u64] {
        &self.values
    }
}

impl From<Signature> for Vec<u64> {
    fn from(signature: Signature) -> Self {
        signature.values
    }
}

impl TryFrom<Vec<u64>> for Signature {
    type Error = SketchError;

    fn try_from(values: Vec<u64>) -> Result<Self, SketchError> {
        Self::from_vec(values)
    }
}
