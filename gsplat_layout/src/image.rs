// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{Carved, ChunkLayout, ChunkState, Field, LayoutOptions, Result, Uint2};

/// Per-pixel accumulation buffers and per-tile instance ranges.
///
/// The state is carved for the pixel count of the frame. `ranges` is indexed by tile id;
/// it reserves one entry per pixel, of which only the first tile-count entries are used.
#[derive(Debug)]
pub struct ImageState<'a> {
    /// Opacity accumulated front to back; a pixel is done once this saturates.
    pub accum_alpha: &'a mut [f32],
    /// Number of Gaussians that contributed to each pixel before early termination.
    pub n_contrib: &'a mut [u32],
    /// Half-open range of each tile in the sorted instance list.
    pub ranges: &'a mut [Uint2],
}

#[derive(Debug)]
pub struct ImageFields {
    accum_alpha: Field<f32>,
    n_contrib: Field<u32>,
    ranges: Field<Uint2>,
}

impl<'a> ChunkState<'a> for ImageState<'a> {
    const NAME: &'static str = "ImageState";

    type Fields = ImageFields;

    fn describe(count: usize, options: &LayoutOptions) -> Result<(ChunkLayout, ImageFields)> {
        let mut layout = ChunkLayout::new(Self::NAME, options)?;
        let accum_alpha = layout.push("accum_alpha", count)?;
        let n_contrib = layout.push("n_contrib", count)?;
        let ranges = layout.push("ranges", count)?;
        Ok((
            layout,
            ImageFields {
                accum_alpha,
                n_contrib,
                ranges,
            },
        ))
    }

    fn assemble(carved: &mut Carved<'a>, fields: ImageFields) -> Self {
        Self {
            accum_alpha: carved.take(fields.accum_alpha),
            n_contrib: carved.take(fields.n_contrib),
            ranges: carved.take(fields.ranges),
        }
    }
}
