// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End to end binning of small frames.

use anyhow::Result;
use gsplat::cpu::instance_key;
use gsplat::{frame_bytes, Error, FrameParams, ProjectedPoints, Rasterizer, RasterizerOptions};
use gsplat_layout::{required, BinningState, Float2, Float4, GeometryState, ImageState, Uint2};
use gsplat_tests::Scenario;

#[test]
fn five_points_bin_into_twelve_instances() -> Result<()> {
    let scenario = Scenario::five_points();
    let mut rasterizer = Rasterizer::new(RasterizerOptions::default())?;
    let frame = rasterizer.bin_frame(scenario.params, &scenario.points())?;

    assert_eq!(frame.stats.num_points, 5);
    assert_eq!(frame.stats.tile_count, 16);
    assert_eq!(frame.stats.num_rendered, 12);
    assert_eq!(frame.geometry.tiles_touched, [1, 4, 2, 2, 3]);
    assert_eq!(frame.geometry.point_offsets, [1, 5, 7, 9, 12]);
    assert_eq!(frame.geometry.num_rendered(), 12);
    assert_eq!(frame.binning.len(), 12);

    // Grouped by tile, then ordered front to back by depth.
    assert_eq!(frame.binning.point_list, [1, 4, 0, 1, 2, 4, 2, 4, 1, 1, 3, 3]);
    assert!(frame
        .binning
        .point_list_keys
        .windows(2)
        .all(|pair| pair[0] <= pair[1]));
    assert_eq!(frame.binning.point_list_keys[0], instance_key(0, 1.0));
    assert_eq!(frame.binning.point_list_keys[11], instance_key(7, 2.0));

    let mut expected = [Uint2::default(); 16];
    expected[0] = Uint2::new(0, 3);
    expected[1] = Uint2::new(3, 6);
    expected[2] = Uint2::new(6, 8);
    expected[4] = Uint2::new(8, 9);
    expected[5] = Uint2::new(9, 10);
    expected[6] = Uint2::new(10, 11);
    expected[7] = Uint2::new(11, 12);
    assert_eq!(frame.tile_ranges(), expected);
    Ok(())
}

#[test]
fn ranges_partition_the_instances() -> Result<()> {
    let scenario = Scenario::five_points();
    let mut rasterizer = Rasterizer::new(RasterizerOptions::default())?;
    let frame = rasterizer.bin_frame(scenario.params, &scenario.points())?;

    let mut covered = 0;
    let mut ranges: Vec<Uint2> = frame
        .tile_ranges()
        .iter()
        .copied()
        .filter(|range| !range.is_empty())
        .collect();
    ranges.sort_by_key(|range| range.x);
    for range in ranges {
        assert_eq!(range.x, covered);
        covered = range.y;
    }
    assert_eq!(covered as usize, frame.stats.num_rendered);
    Ok(())
}

#[test]
fn contributors_stay_within_tile_ranges() -> Result<()> {
    let scenario = Scenario::five_points();
    let mut rasterizer = Rasterizer::new(RasterizerOptions::default())?;
    let frame = rasterizer.bin_frame(scenario.params, &scenario.points())?;

    let width = scenario.params.width;
    for (ix, (&n, &alpha)) in frame
        .image
        .n_contrib
        .iter()
        .zip(frame.image.accum_alpha.iter())
        .enumerate()
    {
        let (px, py) = (ix as u32 % width, ix as u32 / width);
        let tile = frame.grid.tile_id(px / 16, py / 16) as usize;
        assert!(n <= frame.tile_ranges()[tile].len());
        assert!((0.0..1.0).contains(&alpha));
        if n == 0 {
            assert_eq!(alpha, 0.0);
        }
    }
    // Pixel (16, 16) sits on the centre of the second splat.
    let centre = (16 * width + 16) as usize;
    assert!(frame.image.n_contrib[centre] > 0);
    assert!(frame.image.accum_alpha[centre] > 0.5);
    Ok(())
}

#[test]
fn frame_stats_match_sizing_queries() -> Result<()> {
    let scenario = Scenario::five_points();
    let options = RasterizerOptions::default();
    let mut rasterizer = Rasterizer::new(options)?;
    let stats = rasterizer
        .bin_frame(scenario.params, &scenario.points())?
        .stats;

    assert_eq!(
        stats.geometry_bytes,
        required::<GeometryState<'_>>(5, &options.layout)?
    );
    assert_eq!(
        stats.binning_bytes,
        required::<BinningState<'_>>(12, &options.layout)?
    );
    assert_eq!(
        stats.image_bytes,
        required::<ImageState<'_>>(64 * 64, &options.layout)?
    );
    let total = stats.geometry_bytes + stats.binning_bytes + stats.image_bytes;
    assert_eq!(rasterizer.allocated_bytes(), total);
    assert_eq!(frame_bytes(5, 12, 64 * 64, &options.layout)?, total);
    Ok(())
}

#[test]
fn smaller_frame_reuses_buffers() -> Result<()> {
    let scenario = Scenario::five_points();
    let mut rasterizer = Rasterizer::new(RasterizerOptions::default())?;
    rasterizer.bin_frame(scenario.params, &scenario.points())?;
    let allocated = rasterizer.allocated_bytes();

    let mut small = Scenario::five_points();
    small.depths.truncate(2);
    small.means2d.truncate(2);
    small.radii.truncate(2);
    small.conic_opacity.truncate(2);
    let frame = rasterizer.bin_frame(small.params, &small.points())?;
    assert_eq!(frame.stats.num_rendered, 5);
    assert_eq!(frame.binning.point_list, [1, 0, 1, 1, 1]);
    assert_eq!(rasterizer.allocated_bytes(), allocated);
    Ok(())
}

#[test]
fn instance_count_overflow_is_an_error() -> Result<()> {
    // One-pixel tiles on a 65536x65536 frame: a splat covering the whole frame touches
    // 2^32 tiles.
    let options = RasterizerOptions {
        tile_width: 1,
        tile_height: 1,
        ..Default::default()
    };
    let mut rasterizer = Rasterizer::new(options)?;
    let points = ProjectedPoints {
        depths: &[1.0],
        means2d: &[Float2::new(32768.0, 32768.0)],
        radii: &[1_000_000],
        conic_opacity: &[Float4::new(0.1, 0.0, 0.1, 0.5)],
    };
    let params = FrameParams {
        width: 1 << 16,
        height: 1 << 16,
    };
    let err = rasterizer.bin_frame(params, &points).unwrap_err();
    assert_eq!(err, Error::TooManyInstances);
    Ok(())
}
