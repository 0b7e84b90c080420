// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chunk layouts for the per-frame scratch buffers of a Gaussian splatting rasterizer.
//!
//! Each stage of the rasterizer works out of one raw byte buffer, which is carved into
//! strongly typed sub-slices:
//!
//! - [`GeometryState`]: per-point working data (depths, projected means, conics, tile counts).
//! - [`ImageState`]: per-pixel accumulation data and per-tile instance ranges.
//! - [`BinningState`]: per-instance sort keys and point indices.
//!
//! The sizing query ([`required`]) and the carve ([`ChunkState::from_chunk`]) both consume
//! the same [`ChunkLayout`] built by [`ChunkState::describe`], so the byte count a caller
//! allocates and the offsets it is carved at can never disagree.
//!
//! ```
//! use gsplat_layout::{required, ChunkState, GeometryState, LayoutOptions};
//!
//! let options = LayoutOptions::default();
//! let size = required::<GeometryState<'_>>(1024, &options).unwrap();
//! let mut chunk = vec![0_u8; size];
//! let geometry = GeometryState::from_chunk(&mut chunk, 1024, &options).unwrap();
//! assert_eq!(geometry.depths.len(), 1024);
//! assert_eq!(geometry.clamped.len(), 3 * 1024);
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

mod binning;
mod chunk;
mod error;
mod geometry;
mod image;
mod layout;
mod scratch;
mod state;
mod types;

pub use binning::{BinningFields, BinningState};
pub use chunk::{align_up, ChunkCursor};
pub use error::{Error, Result};
pub use geometry::{GeometryFields, GeometryState};
pub use image::{ImageFields, ImageState};
pub use layout::{Carved, ChunkLayout, Field, FieldSlot, LayoutOptions, DEFAULT_ALIGNMENT, DEFAULT_SLACK};
pub use scratch::{
    scan_scratch_layout, scan_scratch_size, sort_scratch_layout, sort_scratch_size, ScanScratch,
    SortScratch, RADIX_BITS, RADIX_BUCKETS, SCAN_WG,
};
pub use state::{required, ChunkState};
pub use types::{Float2, Float4, Uint2};
