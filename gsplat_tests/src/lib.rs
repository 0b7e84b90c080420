// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gsplat tests.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![allow(missing_docs, clippy::missing_assert_message)]

use anyhow::{anyhow, Result};
use gsplat::{FrameParams, ProjectedPoints};
use gsplat_layout::{align_up, Float2, Float4};

/// Element counts worth checking every layout against.
pub const COUNTS: &[usize] = &[0, 1, 2, 7, 31, 255, 256, 257, 1000, 4099];

/// A small frame whose binning can be worked out by hand.
///
/// Five splats on a 64x64 image with 16x16 tiles, overlapping twelve tiles in total.
pub struct Scenario {
    pub params: FrameParams,
    pub depths: Vec<f32>,
    pub means2d: Vec<Float2>,
    pub radii: Vec<i32>,
    pub conic_opacity: Vec<Float4>,
}

impl Scenario {
    pub fn five_points() -> Self {
        Self {
            params: FrameParams {
                width: 64,
                height: 64,
            },
            depths: vec![5.0, 1.0, 3.0, 2.0, 4.0],
            means2d: vec![
                // One tile.
                Float2::new(8.0, 8.0),
                // Straddles the corner of four tiles.
                Float2::new(16.0, 16.0),
                Float2::new(32.0, 8.0),
                Float2::new(48.0, 24.0),
                // Centre above the image, clamped to the first row.
                Float2::new(24.0, -10.0),
            ],
            radii: vec![4, 4, 8, 8, 20],
            conic_opacity: vec![Float4::new(0.05, 0.0, 0.05, 0.8); 5],
        }
    }

    pub fn points(&self) -> ProjectedPoints<'_> {
        ProjectedPoints {
            depths: &self.depths,
            means2d: &self.means2d,
            radii: &self.radii,
            conic_opacity: &self.conic_opacity,
        }
    }
}

/// Returns the largest sub-slice of `backing` whose start is aligned to `alignment`.
pub fn aligned_tail(backing: &mut [u8], alignment: usize) -> Result<&mut [u8]> {
    let base = backing.as_ptr() as usize;
    let aligned = align_up(base, alignment).ok_or_else(|| anyhow!("address overflow"))?;
    let lead = aligned - base;
    if lead > backing.len() {
        return Err(anyhow!("buffer of {} bytes has no aligned start", backing.len()));
    }
    Ok(&mut backing[lead..])
}
