// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::state::scaled;
use crate::{
    scan_scratch_size, Carved, ChunkLayout, ChunkState, Field, Float2, Float4, LayoutOptions,
    Result,
};

/// Per-point working buffers, one entry per 3D point.
#[derive(Debug)]
pub struct GeometryState<'a> {
    /// Size of `scanning_space` in bytes.
    pub scan_size: usize,
    /// View-space depth.
    pub depths: &'a mut [f32],
    /// Three flags per point, nonzero where a colour channel was clamped.
    pub clamped: &'a mut [u8],
    /// Screen-space splat radius in pixels. Zero or less marks a culled point.
    pub internal_radii: &'a mut [i32],
    /// Projected 2D centre in pixels.
    pub means2d: &'a mut [Float2],
    /// Upper triangle of the 3D covariance, six floats per point.
    pub cov3d: &'a mut [f32],
    /// Inverse 2D covariance (`x`, `y`, `z`) and opacity (`w`).
    pub conic_opacity: &'a mut [Float4],
    /// Evaluated colour, three floats per point.
    pub rgb: &'a mut [f32],
    /// Number of tiles overlapped by each point.
    pub tiles_touched: &'a mut [u32],
    /// Scratch for the prefix sum over `tiles_touched`.
    pub scanning_space: &'a mut [u8],
    /// Inclusive prefix sum of `tiles_touched`.
    pub point_offsets: &'a mut [u32],
}

#[derive(Debug)]
pub struct GeometryFields {
    scan_size: usize,
    depths: Field<f32>,
    clamped: Field<u8>,
    internal_radii: Field<i32>,
    means2d: Field<Float2>,
    cov3d: Field<f32>,
    conic_opacity: Field<Float4>,
    rgb: Field<f32>,
    tiles_touched: Field<u32>,
    scanning_space: Field<u8>,
    point_offsets: Field<u32>,
}

impl<'a> ChunkState<'a> for GeometryState<'a> {
    const NAME: &'static str = "GeometryState";

    type Fields = GeometryFields;

    fn describe(count: usize, options: &LayoutOptions) -> Result<(ChunkLayout, GeometryFields)> {
        let scan_size = scan_scratch_size(count)?;
        let mut layout = ChunkLayout::new(Self::NAME, options)?;
        let depths = layout.push("depths", count)?;
        let clamped = layout.push("clamped", scaled(count, 3, "clamped")?)?;
        let internal_radii = layout.push("internal_radii", count)?;
        let means2d = layout.push("means2d", count)?;
        let cov3d = layout.push("cov3d", scaled(count, 6, "cov3d")?)?;
        let conic_opacity = layout.push("conic_opacity", count)?;
        let rgb = layout.push("rgb", scaled(count, 3, "rgb")?)?;
        let tiles_touched = layout.push("tiles_touched", count)?;
        let scanning_space = layout.push("scanning_space", scan_size)?;
        let point_offsets = layout.push("point_offsets", count)?;
        Ok((
            layout,
            GeometryFields {
                scan_size,
                depths,
                clamped,
                internal_radii,
                means2d,
                cov3d,
                conic_opacity,
                rgb,
                tiles_touched,
                scanning_space,
                point_offsets,
            },
        ))
    }

    fn assemble(carved: &mut Carved<'a>, fields: GeometryFields) -> Self {
        Self {
            scan_size: fields.scan_size,
            depths: carved.take(fields.depths),
            clamped: carved.take(fields.clamped),
            internal_radii: carved.take(fields.internal_radii),
            means2d: carved.take(fields.means2d),
            cov3d: carved.take(fields.cov3d),
            conic_opacity: carved.take(fields.conic_opacity),
            rgb: carved.take(fields.rgb),
            tiles_touched: carved.take(fields.tiles_touched),
            scanning_space: carved.take(fields.scanning_space),
            point_offsets: carved.take(fields.point_offsets),
        }
    }
}

impl GeometryState<'_> {
    /// Number of points the state was carved for.
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// Total instance count after the scan: the last inclusive offset.
    pub fn num_rendered(&self) -> u32 {
        self.point_offsets.last().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::GeometryState;
    use crate::{required, ChunkState, LayoutOptions};

    #[test]
    fn fields_are_placed_in_carve_order() {
        let (layout, _) = GeometryState::describe(10, &LayoutOptions::default()).unwrap();
        let names: Vec<_> = layout.slots().iter().map(|slot| slot.name).collect();
        assert_eq!(
            names,
            [
                "depths",
                "clamped",
                "internal_radii",
                "means2d",
                "cov3d",
                "conic_opacity",
                "rgb",
                "tiles_touched",
                "scanning_space",
                "point_offsets",
            ]
        );
        let offsets: Vec<_> = layout.slots().iter().map(|slot| slot.offset).collect();
        assert_eq!(
            offsets,
            [0, 128, 256, 384, 512, 768, 1024, 1152, 1280, 1408]
        );
        assert_eq!(layout.span(), 1408 + 40);
    }

    #[test]
    fn empty_geometry_needs_only_the_slack() {
        let options = LayoutOptions::default();
        assert_eq!(required::<GeometryState<'_>>(0, &options), Ok(128));
        let mut chunk = vec![0_u8; 128];
        let state = GeometryState::from_chunk(&mut chunk, 0, &options).unwrap();
        assert!(state.is_empty());
        assert_eq!(state.scan_size, 0);
        assert_eq!(state.num_rendered(), 0);
    }

    #[test]
    fn carved_fields_have_nominal_lengths() {
        let options = LayoutOptions::default();
        let size = required::<GeometryState<'_>>(7, &options).unwrap();
        let mut chunk = vec![0_u8; size];
        let state = GeometryState::from_chunk(&mut chunk, 7, &options).unwrap();
        assert_eq!(state.len(), 7);
        assert_eq!(state.clamped.len(), 21);
        assert_eq!(state.internal_radii.len(), 7);
        assert_eq!(state.means2d.len(), 7);
        assert_eq!(state.cov3d.len(), 42);
        assert_eq!(state.conic_opacity.len(), 7);
        assert_eq!(state.rgb.len(), 21);
        assert_eq!(state.tiles_touched.len(), 7);
        assert_eq!(state.scanning_space.len(), state.scan_size);
        assert_eq!(state.point_offsets.len(), 7);
    }
}
