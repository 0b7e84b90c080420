// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile grid helpers shared by the stages.

use gsplat_layout::Float2;

/// Default tile width in pixels.
pub const TILE_WIDTH: u32 = 16;
/// Default tile height in pixels.
pub const TILE_HEIGHT: u32 = 16;

/// The grid of tiles covering the output image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileGrid {
    /// Width of the image in tiles.
    pub width_in_tiles: u32,
    /// Height of the image in tiles.
    pub height_in_tiles: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl TileGrid {
    /// Creates the grid covering a `width` by `height` pixel image.
    ///
    /// Tile dimensions must be nonzero.
    pub fn new(width: u32, height: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            width_in_tiles: width.div_ceil(tile_width),
            height_in_tiles: height.div_ceil(tile_height),
            tile_width,
            tile_height,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.width_in_tiles as usize * self.height_in_tiles as usize
    }

    /// Row-major id of the tile at (`x`, `y`).
    pub fn tile_id(&self, x: u32, y: u32) -> u32 {
        y * self.width_in_tiles + x
    }

    /// Tiles overlapped by a splat centred at `mean` with the given pixel radius.
    ///
    /// The rectangle is clamped to the grid, so splats entirely off screen yield an empty
    /// rectangle.
    pub fn rect(&self, mean: Float2, radius: i32) -> TileRect {
        let r = radius as f32;
        let tw = self.tile_width as f32;
        let th = self.tile_height as f32;
        let clamp_x = |v: f32| (v as i32).clamp(0, self.width_in_tiles as i32) as u32;
        let clamp_y = |v: f32| (v as i32).clamp(0, self.height_in_tiles as i32) as u32;
        TileRect {
            x0: clamp_x((mean.x - r) / tw),
            y0: clamp_y((mean.y - r) / th),
            x1: clamp_x((mean.x + r + tw - 1.0) / tw),
            y1: clamp_y((mean.y + r + th - 1.0) / th),
        }
    }
}

/// A half-open rectangle of tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl TileRect {
    /// Number of tiles in the rectangle, or `None` if it does not fit in a `u32`.
    pub fn area(&self) -> Option<u32> {
        self.x1
            .saturating_sub(self.x0)
            .checked_mul(self.y1.saturating_sub(self.y0))
    }

    /// Tile coordinates in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32)> {
        let Self { x0, y0, x1, y1 } = *self;
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

/// Number of bits needed to represent `n`.
pub fn higher_msb(n: u32) -> u32 {
    u32::BITS - n.leading_zeros()
}
