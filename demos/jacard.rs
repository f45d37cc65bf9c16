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
use std::sync::Arc;

use minwise::estimators::{intersection_size, union_size};
use minwise::{BottomK, HashFamily, MinWise, SetSketch, similarity};

fn report<S: SetSketch>(name: &str, left: &S, right: &S) -> Result<(), Box<dyn std::error::Error>> {
    let jaccard = similarity(left, right)?;
    let intersection = intersection_size(jaccard, left.count(), right.count())?;
    let union = union_size(jaccard, left.count(), right.count())?;

    println!("[{name}]");
    println!("  jaccard estimate:      {:.4} (exact {:.4})", jaccard, 5_000.0 / 15_000.0);
    println!("  intersection estimate: {intersection} (exact 5000)");
    println!("  union estimate:        {union} (exact 15000)");
    Ok(())
}

fn fill<S: SetSketch>(mut sketch: S, values: std::ops::Range<u64>) -> S {
    for value in values {
        sketch.ingest(value);
    }
    sketch
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Both variants share one family so each pair stays comparable.
    let family = Arc::new(HashFamily::xxh3(512, 11)?);

    // left  = [0, 10_000)
    // right = [5_000, 15_000)
    report(
        "minwise",
        &fill(MinWise::new(family.clone()), 0..10_000),
        &fill(MinWise::new(family.clone()), 5_000..15_000),
    )?;
    report(
        "bottom-k",
        &fill(BottomK::new(family.clone()), 0..10_000),
        &fill(BottomK::new(family), 5_000..15_000),
    )?;

    Ok(())
}
