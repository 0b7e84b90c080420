// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gsplat_layout::{
    required, BinningState, Float2, Float4, GeometryState, ImageState, LayoutOptions, Uint2,
};

use crate::buffer::ChunkBuffer;
use crate::cpu::{self, TileGrid};
use crate::{Error, RasterizerOptions, Result};

/// Parameters of a single frame that are configurable by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameParams {
    /// Dimensions of the rasterization target in pixels.
    pub width: u32,
    pub height: u32,
}

/// Per-point results of preprocessing, supplied by the caller.
///
/// All slices must have the same length, one entry per point.
#[derive(Clone, Copy, Debug)]
pub struct ProjectedPoints<'p> {
    pub depths: &'p [f32],
    pub means2d: &'p [Float2],
    pub radii: &'p [i32],
    pub conic_opacity: &'p [Float4],
}

impl ProjectedPoints<'_> {
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    fn validate(&self) -> Result<()> {
        let expected = self.len();
        let lengths = [
            ("means2d", self.means2d.len()),
            ("radii", self.radii.len()),
            ("conic_opacity", self.conic_opacity.len()),
        ];
        for (field, actual) in lengths {
            if actual != expected {
                return Err(Error::InputLengthMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }
        if u32::try_from(expected).is_err() {
            return Err(Error::TooManyPoints(expected));
        }
        Ok(())
    }
}

/// Sizes of one binned frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub num_points: usize,
    /// Number of (point, tile) instances.
    pub num_rendered: usize,
    pub tile_count: usize,
    pub geometry_bytes: usize,
    pub binning_bytes: usize,
    pub image_bytes: usize,
}

/// The carved states of one frame, after every stage has run.
#[derive(Debug)]
pub struct Frame<'a> {
    pub geometry: GeometryState<'a>,
    pub binning: BinningState<'a>,
    pub image: ImageState<'a>,
    pub grid: TileGrid,
    pub stats: FrameStats,
}

impl Frame<'_> {
    /// Instance ranges of the tiles in the grid, indexed by tile id.
    pub fn tile_ranges(&self) -> &[Uint2] {
        &self.image.ranges[..self.grid.tile_count()]
    }
}

/// Runs the binning pipeline for one frame over the given backing buffers.
pub(crate) fn run_frame<'a>(
    options: &RasterizerOptions,
    geometry_chunk: &'a mut ChunkBuffer,
    binning_chunk: &'a mut ChunkBuffer,
    image_chunk: &'a mut ChunkBuffer,
    params: FrameParams,
    points: &ProjectedPoints<'_>,
) -> Result<Frame<'a>> {
    points.validate()?;
    let layout = &options.layout;
    let grid = TileGrid::new(
        params.width,
        params.height,
        options.tile_width,
        options.tile_height,
    );
    let num_points = points.len();

    let geometry: GeometryState<'a> = geometry_chunk.carve(num_points, layout)?;
    geometry.depths.copy_from_slice(points.depths);
    geometry.means2d.copy_from_slice(points.means2d);
    geometry.internal_radii.copy_from_slice(points.radii);
    geometry.conic_opacity.copy_from_slice(points.conic_opacity);

    cpu::count_tiles(
        &grid,
        geometry.means2d,
        geometry.internal_radii,
        geometry.tiles_touched,
    )?;
    let num_rendered = cpu::inclusive_scan(
        geometry.tiles_touched,
        geometry.point_offsets,
        geometry.scanning_space,
    )? as usize;

    let binning: BinningState<'a> = binning_chunk.carve(num_rendered, layout)?;
    let written = cpu::duplicate_with_keys(
        &grid,
        geometry.means2d,
        geometry.internal_radii,
        geometry.depths,
        geometry.point_offsets,
        binning.point_list_keys_unsorted,
        binning.point_list_unsorted,
    )?;
    if written != num_rendered {
        return Err(Error::InstanceCountMismatch {
            expected: num_rendered,
            actual: written,
        });
    }
    let tile_count = grid.tile_count();
    let end_bit = 32 + cpu::higher_msb(u32::try_from(tile_count).unwrap_or(u32::MAX));
    cpu::sort_pairs(
        binning.point_list_keys_unsorted,
        binning.point_list_unsorted,
        binning.point_list_keys,
        binning.point_list,
        binning.list_sorting_space,
        end_bit,
    )?;

    let num_pixels = params.width as usize * params.height as usize;
    let image: ImageState<'a> = image_chunk.carve(num_pixels, layout)?;
    cpu::identify_tile_ranges(binning.point_list_keys, &mut image.ranges[..tile_count]);
    cpu::coverage(
        &grid,
        params.width,
        params.height,
        image.ranges,
        binning.point_list,
        geometry.means2d,
        geometry.conic_opacity,
        image.accum_alpha,
        image.n_contrib,
    );

    let stats = FrameStats {
        num_points,
        num_rendered,
        tile_count,
        geometry_bytes: required::<GeometryState<'_>>(num_points, layout)?,
        binning_bytes: required::<BinningState<'_>>(num_rendered, layout)?,
        image_bytes: required::<ImageState<'_>>(num_pixels, layout)?,
    };
    log::debug!(
        "binned {} points into {} instances over {} tiles ({} + {} + {} bytes)",
        stats.num_points,
        stats.num_rendered,
        stats.tile_count,
        stats.geometry_bytes,
        stats.binning_bytes,
        stats.image_bytes
    );
    Ok(Frame {
        geometry,
        binning,
        image,
        grid,
        stats,
    })
}

/// Bytes the three chunk buffers need for a frame with `num_points` points,
/// `num_rendered` instances and `num_pixels` pixels.
pub fn frame_bytes(
    num_points: usize,
    num_rendered: usize,
    num_pixels: usize,
    layout: &LayoutOptions,
) -> Result<usize> {
    let overflow = || gsplat_layout::Error::SizeOverflow { field: "frame" };
    let total = required::<GeometryState<'_>>(num_points, layout)?
        .checked_add(required::<BinningState<'_>>(num_rendered, layout)?)
        .ok_or_else(overflow)?
        .checked_add(required::<ImageState<'_>>(num_pixels, layout)?)
        .ok_or_else(overflow)?;
    Ok(total)
}
