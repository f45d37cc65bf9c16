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
//! MinWise hashing sketches for streaming set similarity.
//!
//! A sketch summarizes a (possibly unbounded) stream of set elements into a
//! fixed-size signature of 64-bit minima. Two signatures built with the same
//! [`hash_family::HashFamily`] estimate the Jaccard index of the underlying
//! sets, and each signature estimates its own set's cardinality.
//!
//! The crate currently exposes:
//! - [`hash_family::HashFamily`] for deriving `k` virtual hash functions.
//! - [`signature::Signature`] for the exported/restored slot vector.
//! - [`minwise::MinWise`] for `k` independent minima (one per virtual hash).
//! - [`bottom_k::BottomK`] for the `k` smallest values of a single hash.
//! - [`estimators`] for similarity and intersection-size estimates.
//! - [`sketch::SetSketch`] for comparing sketches through one entry point.
//! - [`element::Element`] for turning typed values into hash input bytes.

use thiserror::Error;

pub mod bottom_k;
pub mod element;
pub mod estimators;
pub mod hash_family;
pub mod minwise;
pub mod signature;
pub mod sketch;

pub use bottom_k::BottomK;
pub use element::Element;
pub use hash_family::{HashFamily, HashFamilyBuilder, HashFamilyConfig};
pub use minwise::MinWise;
pub use signature::{Signature, UNSET};
pub use sketch::{SetSketch, SketchKind, similarity};

/// Errors returned by sketch constructors, merges and comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SketchError {
    /// Returned when a constructor or estimator receives an invalid argument.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// Returned when combining two sketches built from different hash families.
    #[error("incompatible sketches: {0}")]
    IncompatibleSketches(&'static str),
    /// Returned when two signatures do not have the same number of slots.
    #[error("signature length mismatch: expected {expected}, got {actual}")]
    SignatureLength { expected: usize, actual: usize },
}

/// SplitMix64 mixer used for deriving secondary hashes and seeds.
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// `2^64` as a float, the size of the hash value domain.
pub(crate) const HASH_DOMAIN: f64 = 18_446_744_073_709_551_616.0;

/// Maps a hash value to the midpoint of its bucket in `(0, 1)`.
pub(crate) fn normalize(hash: u64) -> f64 {
    ((hash as f64 + 0.5) / HASH_DOMAIN).min(1.0 - f64::EPSILON)
}
