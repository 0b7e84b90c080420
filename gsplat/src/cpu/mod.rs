// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU implementations of the binning stages.
//!
//! Each stage reads and writes the carved fields of the chunk states directly, in the order
//! the device kernels run them: tile count, scan, duplicate with keys, sort, tile ranges and
//! coverage. They are useful for testing and for checking the size contract of the layouts;
//! they are not meant to be fast.

mod coverage;
mod duplicate;
mod ranges;
mod scan;
mod sort;
mod tile_count;
mod util;

pub use coverage::coverage;
pub use duplicate::{duplicate_with_keys, instance_key};
pub use ranges::identify_tile_ranges;
pub use scan::inclusive_scan;
pub use sort::sort_pairs;
pub use tile_count::count_tiles;
pub use util::{higher_msb, TileGrid, TileRect, TILE_HEIGHT, TILE_WIDTH};
