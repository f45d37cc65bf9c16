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
use std::collections::BTreeSet;
use std::sync::Arc;

use approx::assert_relative_eq;
use proptest::prelude::*;

use minwise::estimators::{intersection_size, minwise_similarity};
use minwise::{BottomK, HashFamily, MinWise, SetSketch, Signature, similarity};

fn family(num_hashes: usize) -> Arc<HashFamily> {
    Arc::new(HashFamily::xxh3(num_hashes, 0x00C0_FFEE).unwrap())
}

fn build<S: SetSketch>(mut sketch: S, values: &BTreeSet<u64>) -> S {
    for value in values {
        sketch.ingest(value);
    }
    sketch
}

fn small_set() -> impl Strategy<Value = BTreeSet<u64>> {
    prop::collection::btree_set(0_u64..5_000, 0..200)
}

proptest! {
    #[test]
    fn minwise_merge_equals_union(left in small_set(), right in small_set()) {
        let family = family(48);
        let mut merged = build(MinWise::new(family.clone()), &left);
        merged.merge(&build(MinWise::new(family.clone()), &right)).unwrap();

        let union: BTreeSet<u64> = left.union(&right).copied().collect();
        let streamed = build(MinWise::new(family), &union);
        prop_assert_eq!(merged.signature(), streamed.signature());
    }

    #[test]
    fn bottom_k_merge_equals_union(left in small_set(), right in small_set()) {
        let family = family(24);
        let mut merged = build(BottomK::new(family.clone()), &left);
        merged.merge(&build(BottomK::new(family.clone()), &right)).unwrap();

        let union: BTreeSet<u64> = left.union(&right).copied().collect();
        let streamed = build(BottomK::new(family), &union);
        prop_assert_eq!(merged.signature(), streamed.signature());
    }

    #[test]
    fn duplicate_ingestion_is_idempotent(values in prop::collection::vec(any::<u64>(), 0..64)) {
        let family = family(32);
        let mut once = MinWise::new(family.clone());
        let mut twice = MinWise::new(family);
        for value in &values {
            once.ingest(value);
            twice.ingest(value);
            twice.ingest(value);
        }
        prop_assert_eq!(once.signature(), twice.signature());
    }

    #[test]
    fn minwise_similarity_is_symmetric(left in small_set(), right in small_set()) {
        let family = family(64);
        let a = build(MinWise::new(family.clone()), &left);
        let b = build(MinWise::new(family), &right);
        prop_assert_eq!(similarity(&a, &b).unwrap(), similarity(&b, &a).unwrap());
        let score = similarity(&a, &b).unwrap();
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn self_similarity_is_one(values in prop::collection::btree_set(any::<u64>(), 1..100)) {
        let sketch = build(MinWise::new(family(64)), &values);
        let signature = sketch.signature();
        prop_assert_eq!(minwise_similarity(signature.as_slice(), signature.as_slice()).unwrap(), 1.0);
    }

    #[test]
    fn zero_similarity_means_zero_intersection(n in any::<u32>(), m in any::<u32>()) {
        prop_assert_eq!(intersection_size(0.0, n as u64, m as u64).unwrap(), 0);
    }

    #[test]
    fn export_import_preserves_streaming(
        head in small_set(),
        tail in prop::collection::vec(0_u64..10_000, 0..100),
    ) {
        let family = family(40);
        let mut streamed = build(MinWise::new(family.clone()), &head);
        let exported: Vec<u64> = streamed.signature().clone().into();

        let mut restored =
            MinWise::from_signature(family, Signature::from_vec(exported).unwrap()).unwrap();
        for value in &tail {
            streamed.ingest(value);
            restored.ingest(value);
        }
        prop_assert_eq!(restored.signature(), streamed.signature());
    }
}

#[test]
fn identical_small_sets_match_exactly() {
    let family = family(64);
    let values: BTreeSet<u64> = (1..=5).collect();
    let a = build(MinWise::new(family.clone()), &values);
    let b = build(MinWise::new(family), &values);
    assert_relative_eq!(similarity(&a, &b).unwrap(), 1.0);
    assert_eq!(a.intersection_estimate(&b).unwrap(), a.count());
}

#[test]
fn empty_set_scenario() {
    let family = family(64);
    let a = build(MinWise::new(family.clone()), &(1..=5).collect::<BTreeSet<u64>>());
    let b = MinWise::new(family);
    assert_eq!(b.count(), 0);
    assert_relative_eq!(similarity(&a, &b).unwrap(), 0.0);
}

#[test]
fn signature_survives_json_storage() {
    let family = family(32);
    let sketch = build(MinWise::new(family.clone()), &(0..1_000).collect::<BTreeSet<u64>>());

    let json = serde_json::to_string(sketch.signature()).unwrap();
    let stored: Signature = serde_json::from_str(&json).unwrap();
    let restored = MinWise::from_signature(family, stored).unwrap();

    assert_relative_eq!(restored.similarity(&sketch).unwrap(), 1.0);
    assert_relative_eq!(restored.estimate(), sketch.estimate());
}

#[test]
fn cardinality_tracks_set_size() {
    let family = family(512);
    for size in [100_u64, 1_000, 50_000] {
        let values: BTreeSet<u64> = (0..size).collect();
        let minwise = build(MinWise::new(family.clone()), &values);
        let bottom_k = build(BottomK::new(family.clone()), &values);
        assert_relative_eq!(minwise.estimate(), size as f64, max_relative = 0.2);
        assert_relative_eq!(bottom_k.estimate(), size as f64, max_relative = 0.2);
    }
}

#[test]
fn unparseable_text_is_hashed_not_rejected() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let family = family(32);
    let mut texts = MinWise::new(family.clone());
    let mut numbers = MinWise::new(family);
    for text in ["12", "012", "12x", "not a number"] {
        texts.ingest(text);
    }
    numbers.ingest(12_u64);

    assert!(!texts.is_empty());
    assert_ne!(texts.signature(), numbers.signature());
    numbers.ingest("12x");
    numbers.ingest("not a number");
    assert_eq!(texts.signature(), numbers.signature());
}
