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
//! Families of `k` virtual hash functions derived from one or two base hashes.
//!
//! Slot `i` (zero-based) of a family hashes an element `x` as
//! `h1(x) + (i + 1) * h2(x)` in wrapping 64-bit arithmetic, so every element
//! costs two base hash evaluations regardless of `k`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::{SketchError, splitmix64};

/// Seed used by [`HashFamilyConfig`] when none is configured.
pub const DEFAULT_SEED: u64 = 0x5851_F42D_4C95_7F2D;

/// Inputs evaluated once per family to derive its fingerprint.
const FINGERPRINT_PROBES: [&[u8]; 4] = [b"", b"\x00", b"minwise", b"\xFF\xFE\xFD\xFC\xFB\xFA\xF9\xF8"];

/// A base hash capability: byte sequence to 64-bit value.
pub type BaseHash = Arc<dyn Fn(&[u8]) -> u64 + Send + Sync>;

/// Returns an xxh3 base hash with a fixed seed.
pub fn xxh3_base(seed: u64) -> impl Fn(&[u8]) -> u64 + Send + Sync + Clone + 'static {
    move |bytes: &[u8]| xxh3_64_with_seed(bytes, seed)
}

/// Immutable family of `num_hashes` virtual hash functions.
///
/// Families are shared behind an [`Arc`] by every sketch that must stay
/// comparable. Two families are equivalent when they have the same length and
/// the same [`fingerprint`](Self::fingerprint).
///
/// # Example
/// ```rust
/// use minwise::hash_family::HashFamily;
///
/// let family = HashFamily::xxh3(64, 7).unwrap();
/// let same = HashFamily::xxh3(64, 7).unwrap();
/// let other = HashFamily::xxh3(64, 8).unwrap();
///
/// assert!(family.is_compatible(&same));
/// assert!(!family.is_compatible(&other));
/// assert_eq!(family.slot_hash(b"x", 3), family.slot_values(b"x").nth(3));
/// assert_eq!(family.slot_hash(b"x", 64), None);
/// ```
#[derive(Clone)]
pub struct HashFamily {
    num_hashes: usize,
    first: BaseHash,
    second: Option<BaseHash>,
    fingerprint: u64,
}

impl HashFamily {
    pub fn builder() -> HashFamilyBuilder {
        HashFamilyBuilder::default()
    }

    /// Creates a family from two seeded xxh3 base hashes.
    ///
    /// # Errors
    /// Returns [`SketchError::InvalidParameter`] when `num_hashes == 0`.
    pub fn xxh3(num_hashes: usize, seed: u64) -> Result<Self, SketchError> {
        HashFamilyConfig { num_hashes, seed }.build()
    }

    /// Creates an xxh3 family sized from a target standard error.
    ///
    /// Uses the relation `std_error ≈ 1 / sqrt(num_hashes)`, i.e.
    /// `num_hashes = ceil(1 / std_error^2)`.
    ///
    /// # Errors
    /// Returns [`SketchError::InvalidParameter`] for invalid `std_error`.
    pub fn with_error_rate(std_error: f64, seed: u64) -> Result<Self, SketchError> {
        if !std_error.is_finite() || std_error <= 0.0 || std_error >= 1.0 {
            return Err(SketchError::InvalidParameter(
                "std_error must be finite and strictly between 0 and 1",
            ));
        }

        let num_hashes = (1.0 / (std_error * std_error)).ceil() as usize;
        Self::xxh3(num_hashes.max(1), seed)
    }

    /// Returns the number of virtual hash functions (the signature length).
    pub fn num_hashes(&self) -> usize {
        self.num_hashes
    }

    /// Returns a value identifying this family's base hashes and length.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Returns `true` when signatures of both families may be compared.
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.num_hashes == other.num_hashes && self.fingerprint == other.fingerprint
    }

    /// Evaluates the first base hash only.
    pub fn base_hash(&self, bytes: &[u8]) -> u64 {
        (self.first)(bytes)
    }

    /// Evaluates `(h1, h2)` for `bytes`.
    ///
    /// Without a second base hash, `h2` is a SplitMix64 remix of `h1`.
    pub fn base_pair(&self, bytes: &[u8]) -> (u64, u64) {
        let h1 = (self.first)(bytes);
        let h2 = match &self.second {
            Some(second) => second(bytes),
            None => splitmix64(h1),
        };
        (h1, h2)
    }

    /// Evaluates virtual hash `index` (zero-based) for `bytes`.
    ///
    /// Returns `None` when `index >= num_hashes`.
    pub fn slot_hash(&self, bytes: &[u8], index: usize) -> Option<u64> {
        if index >= self.num_hashes {
            return None;
        }
        let (h1, h2) = self.base_pair(bytes);
        Some(h1.wrapping_add((index as u64 + 1).wrapping_mul(h2)))
    }

    /// Yields all `num_hashes` virtual hash values for `bytes`, slot order.
    pub fn slot_values(&self, bytes: &[u8]) -> SlotValues {
        let (h1, h2) = self.base_pair(bytes);
        SlotValues {
            current: h1,
            step: h2,
            remaining: self.num_hashes,
        }
    }

    fn compute_fingerprint(&self) -> u64 {
        FINGERPRINT_PROBES
            .iter()
            .fold(splitmix64(self.num_hashes as u64), |state, probe| {
                let (h1, h2) = self.base_pair(probe);
                splitmix64(splitmix64(state ^ h1) ^ h2)
            })
    }
}

impl fmt::Debug for HashFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashFamily")
            .field("num_hashes", &self.num_hashes)
            .field("derived_second", &self.second.is_none())
            .field("fingerprint", &format_args!("{:#018x}", self.fingerprint))
            .finish()
    }
}

/// Iterator over the virtual hash values of one element.
#[derive(Debug, Clone)]
pub struct SlotValues {
    current: u64,
    step: u64,
    remaining: usize,
}

impl Iterator for SlotValues {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.current = self.current.wrapping_add(self.step);
        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SlotValues {}

/// Builder for [`HashFamily`] from caller-supplied base hashes.
///
/// # Example
/// ```rust
/// use minwise::hash_family::{HashFamily, xxh3_base};
///
/// let family = HashFamily::builder()
///     .num_hashes(32)
///     .first(xxh3_base(1))
///     .second(xxh3_base(2))
///     .build()
///     .unwrap();
/// assert_eq!(family.num_hashes(), 32);
///
/// // A family needs at least one base hash.
/// assert!(HashFamily::builder().num_hashes(32).build().is_err());
/// ```
#[derive(Default)]
pub struct HashFamilyBuilder {
    num_hashes: usize,
    first: Option<BaseHash>,
    second: Option<BaseHash>,
}

impl HashFamilyBuilder {
    pub fn num_hashes(mut self, num_hashes: usize) -> Self {
        self.num_hashes = num_hashes;
        self
    }

    pub fn first<F>(self, hash: F) -> Self
    where
        F: Fn(&[u8]) -> u64 + Send + Sync + 'static,
    {
        self.first_shared(Arc::new(hash))
    }

    pub fn second<F>(self, hash: F) -> Self
    where
        F: Fn(&[u8]) -> u64 + Send + Sync + 'static,
    {
        self.second_shared(Arc::new(hash))
    }

    pub fn first_shared(mut self, hash: BaseHash) -> Self {
        self.first = Some(hash);
        self
    }

    pub fn second_shared(mut self, hash: BaseHash) -> Self {
        self.second = Some(hash);
        self
    }

    /// Builds the family.
    ///
    /// # Errors
    /// Returns [`SketchError::InvalidParameter`] when `num_hashes == 0` or no
    /// first base hash was supplied.
    pub fn build(self) -> Result<HashFamily, SketchError> {
        if self.num_hashes == 0 {
            return Err(SketchError::InvalidParameter(
                "num_hashes must be greater than zero",
            ));
        }
        let Some(first) = self.first else {
            return Err(SketchError::InvalidParameter(
                "a first base hash function is required",
            ));
        };

        let mut family = HashFamily {
            num_hashes: self.num_hashes,
            first,
            second: self.second,
            fingerprint: 0,
        };
        family.fingerprint = family.compute_fingerprint();
        debug!(
            num_hashes = family.num_hashes,
            fingerprint = family.fingerprint,
            "built hash family"
        );
        Ok(family)
    }
}

impl fmt::Debug for HashFamilyBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashFamilyBuilder")
            .field("num_hashes", &self.num_hashes)
            .field("has_first", &self.first.is_some())
            .field("has_second", &self.second.is_some())
            .finish()
    }
}

/// Serializable description of an xxh3-backed family.
///
/// Rebuilding the same config in another process yields an equivalent family.
///
/// ```rust
/// use minwise::hash_family::HashFamilyConfig;
///
/// let config: HashFamilyConfig = serde_json::from_str(r#"{"num_hashes": 16}"#).unwrap();
/// assert_eq!(config.build().unwrap().num_hashes(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashFamilyConfig {
    pub num_hashes: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for HashFamilyConfig {
    fn default() -> Self {
        Self {
            num_hashes: 128,
            seed: DEFAULT_SEED,
        }
    }
}

impl HashFamilyConfig {
    /// Builds the family: `h1` is xxh3 with `seed`, `h2` xxh3 with a remixed seed.
    ///
    /// # Errors
    /// Returns [`SketchError::InvalidParameter`] when `num_hashes == 0`.
    pub fn build(&self) -> Result<HashFamily, SketchError> {
        HashFamily::builder()
            .num_hashes(self.num_hashes)
            .first(xxh3_base(self.seed))
            .second(xxh3_base(splitmix64(self.seed)))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::{HashFamily, HashFamilyConfig, xxh3_base};
    use crate::SketchError;

    fn constant_pair(h1: u64, h2: u64, num_hashes: usize) -> HashFamily {
        HashFamily::builder()
            .num_hashes(num_hashes)
            .first(move |_: &[u8]| h1)
            .second(move |_: &[u8]| h2)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_validates_parameters() {
        assert_eq!(
            HashFamily::builder().first(xxh3_base(0)).build().unwrap_err(),
            SketchError::InvalidParameter("num_hashes must be greater than zero")
        );
        assert_eq!(
            HashFamily::builder().num_hashes(8).second(xxh3_base(0)).build().unwrap_err(),
            SketchError::InvalidParameter("a first base hash function is required")
        );
        assert!(HashFamily::xxh3(0, 1).is_err());
    }

    #[test]
    fn slots_follow_linear_combination() {
        let family = constant_pair(10, 3, 4);
        let values: Vec<u64> = family.slot_values(b"anything").collect();
        assert_eq!(values, vec![13, 16, 19, 22]);
        for (index, value) in values.iter().enumerate() {
            assert_eq!(family.slot_hash(b"anything", index), Some(*value));
        }
    }

    #[test]
    fn slot_arithmetic_wraps() {
        let family = constant_pair(u64::MAX, 2, 2);
        let values: Vec<u64> = family.slot_values(b"").collect();
        assert_eq!(values, vec![1, 3]);
        assert_eq!(family.slot_hash(b"", 1), Some(3));
    }

    #[test]
    fn slot_hash_out_of_range_is_none() {
        let family = constant_pair(10, 3, 4);
        assert_eq!(family.slot_hash(b"anything", 3), Some(22));
        assert_eq!(family.slot_hash(b"anything", 4), None);
        assert_eq!(family.slot_hash(b"anything", usize::MAX), None);
    }

    #[test]
    fn single_base_hash_derives_second() {
        let family = HashFamily::builder()
            .num_hashes(8)
            .first(xxh3_base(5))
            .build()
            .unwrap();
        let (h1, h2) = family.base_pair(b"element");
        assert_eq!(h1, xxh3_base(5)(b"element".as_slice()));
        assert_ne!(h1, h2);
    }

    #[test]
    fn fingerprint_tracks_hashes_and_length() {
        let base = HashFamily::xxh3(64, 1).unwrap();
        assert_eq!(base.fingerprint(), HashFamily::xxh3(64, 1).unwrap().fingerprint());
        assert_ne!(base.fingerprint(), HashFamily::xxh3(64, 2).unwrap().fingerprint());
        assert_ne!(base.fingerprint(), HashFamily::xxh3(65, 1).unwrap().fingerprint());
    }

    #[test]
    fn error_rate_sizes_family() {
        let family = HashFamily::with_error_rate(0.1, 0).unwrap();
        assert_eq!(family.num_hashes(), 100);
        assert!(HashFamily::with_error_rate(0.0, 0).is_err());
        assert!(HashFamily::with_error_rate(f64::NAN, 0).is_err());
    }

    #[test]
    fn config_defaults_and_round_trips() {
        let config = HashFamilyConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: HashFamilyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
        assert!(config.build().unwrap().is_compatible(&restored.build().unwrap()));
    }
}
