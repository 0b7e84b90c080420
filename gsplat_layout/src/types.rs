// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element types stored in the carved fields.
//!
//! These must be kept in sync with the vector types the device kernels read.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

/// Two packed `f32`s, used for projected means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct Float2 {
    pub x: f32,
    pub y: f32,
}

impl Float2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Four packed `f32`s.
///
/// Used for the conic of a projected Gaussian plus its opacity: `x`, `y`, `z` hold the
/// upper triangle of the inverse 2D covariance and `w` the opacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct Float4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Float4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

/// Two packed `u32`s, used for half-open instance ranges (`x` first, `y` one past last).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Zeroable, Pod)]
#[repr(C)]
pub struct Uint2 {
    pub x: u32,
    pub y: u32,
}

impl Uint2 {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Number of instances covered by the range.
    pub const fn len(self) -> u32 {
        self.y.saturating_sub(self.x)
    }

    pub const fn is_empty(self) -> bool {
        self.y <= self.x
    }
}

const_assert_eq!(size_of::<Float2>(), 8);
const_assert_eq!(size_of::<Float4>(), 16);
const_assert_eq!(size_of::<Uint2>(), 8);
