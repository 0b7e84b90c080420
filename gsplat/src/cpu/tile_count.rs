// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gsplat_layout::Float2;

use super::TileGrid;
use crate::{Error, Result};

/// Writes the number of tiles each point's splat overlaps.
///
/// This is the tail of preprocessing: culled points (radius zero or less) touch no tiles.
/// Fails with [`Error::TooManyInstances`] if a single splat covers more than `u32::MAX` tiles.
pub fn count_tiles(
    grid: &TileGrid,
    means2d: &[Float2],
    radii: &[i32],
    tiles_touched: &mut [u32],
) -> Result<()> {
    for ((touched, &mean), &radius) in tiles_touched.iter_mut().zip(means2d).zip(radii) {
        *touched = if radius > 0 {
            grid.rect(mean, radius)
                .area()
                .ok_or(Error::TooManyInstances)?
        } else {
            0
        };
    }
    Ok(())
}
