// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile binning for a Gaussian splatting rasterizer.
//!
//! A [`Rasterizer`] owns three reusable byte buffers, one per chunk state of
//! [`gsplat_layout`]. [`Rasterizer::bin_frame`] sizes and carves each of them in turn and
//! runs the binning stages over the carved fields:
//!
//! 1. Count the tiles each projected point overlaps, and scan the counts into offsets.
//! 2. Carve the binning state for the total instance count, emit one
//!    `(tile, depth)` key per instance and radix sort them.
//! 3. Find each tile's run of instances and accumulate per-pixel coverage.
//!
//! The stages themselves live in [`cpu`] and can be driven directly against any carved state.
//!
//! ```
//! use gsplat::{FrameParams, ProjectedPoints, Rasterizer, RasterizerOptions};
//! use gsplat_layout::{Float2, Float4};
//!
//! let mut rasterizer = Rasterizer::new(RasterizerOptions::default()).unwrap();
//! let points = ProjectedPoints {
//!     depths: &[1.0],
//!     means2d: &[Float2::new(16.0, 16.0)],
//!     radii: &[4],
//!     conic_opacity: &[Float4::new(0.05, 0.0, 0.05, 0.8)],
//! };
//! let frame = rasterizer
//!     .bin_frame(FrameParams { width: 64, height: 64 }, &points)
//!     .unwrap();
//! assert_eq!(frame.stats.num_rendered, 4);
//! ```

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod buffer;
mod frame;

pub mod cpu;

use gsplat_layout::LayoutOptions;
use thiserror::Error;

pub use buffer::ChunkBuffer;
pub use frame::{frame_bytes, Frame, FrameParams, FrameStats, ProjectedPoints};

/// Errors that can occur while binning a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A chunk layout could not be built or carved.
    #[error(transparent)]
    Layout(#[from] gsplat_layout::Error),
    /// Tiles must have a nonzero width and height.
    #[error("Invalid tile size {width}x{height}")]
    InvalidTileSize { width: u32, height: u32 },
    /// The per-point inputs disagree on the number of points.
    #[error("Input '{field}' has {actual} entries, expected {expected}")]
    InputLengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Point indices are stored as `u32`.
    #[error("Too many points ({0}) for 32-bit indices")]
    TooManyPoints(usize),
    /// The number of (point, tile) instances does not fit in a `u32`.
    #[error("Instance count exceeds 32-bit indices")]
    TooManyInstances,
    /// The instances emitted for a frame disagree with the scanned tile counts.
    #[error("Expected {expected} instances, found {actual}")]
    InstanceCountMismatch { expected: usize, actual: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Options which are set at rasterizer creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterizerOptions {
    /// Alignment and slack used for every chunk state.
    pub layout: LayoutOptions,
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
}

impl Default for RasterizerOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            tile_width: cpu::TILE_WIDTH,
            tile_height: cpu::TILE_HEIGHT,
        }
    }
}

/// Bins projected points into screen tiles, reusing its backing buffers across frames.
#[derive(Debug)]
pub struct Rasterizer {
    options: RasterizerOptions,
    geometry: ChunkBuffer,
    binning: ChunkBuffer,
    image: ChunkBuffer,
}

static_assertions::assert_impl_all!(Rasterizer: Send, Sync);

impl Rasterizer {
    /// Creates a new rasterizer, checking the options up front.
    pub fn new(options: RasterizerOptions) -> Result<Self> {
        options.layout.validate()?;
        if options.tile_width == 0 || options.tile_height == 0 {
            return Err(Error::InvalidTileSize {
                width: options.tile_width,
                height: options.tile_height,
            });
        }
        Ok(Self {
            options,
            geometry: ChunkBuffer::new(),
            binning: ChunkBuffer::new(),
            image: ChunkBuffer::new(),
        })
    }

    pub fn options(&self) -> &RasterizerOptions {
        &self.options
    }

    /// Total bytes currently held by the three backing buffers.
    pub fn allocated_bytes(&self) -> usize {
        self.geometry.capacity_bytes() + self.binning.capacity_bytes() + self.image.capacity_bytes()
    }

    /// Bins one frame of projected points.
    ///
    /// The returned [`Frame`] borrows the rasterizer's buffers; its states stay valid until
    /// the next call.
    pub fn bin_frame<'a>(
        &'a mut self,
        params: FrameParams,
        points: &ProjectedPoints<'_>,
    ) -> Result<Frame<'a>> {
        frame::run_frame(
            &self.options,
            &mut self.geometry,
            &mut self.binning,
            &mut self.image,
            params,
            points,
        )
    }
}
