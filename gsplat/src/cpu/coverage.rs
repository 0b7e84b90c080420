// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gsplat_layout::{Float2, Float4, Uint2};

use super::TileGrid;

/// Contributions fainter than this are skipped.
const MIN_ALPHA: f32 = 1.0 / 255.0;
/// Upper bound on the alpha of a single contribution.
const MAX_ALPHA: f32 = 0.99;
/// A pixel stops accumulating once its transmittance would fall below this.
const MIN_TRANSMITTANCE: f32 = 0.0001;

/// Accumulates opacity front to back for every pixel of a `width` by `height` image.
///
/// Each pixel walks the sorted instances of its tile until it saturates, then records the
/// accumulated alpha and the index (one-based) of the last Gaussian that contributed.
#[allow(clippy::too_many_arguments)]
pub fn coverage(
    grid: &TileGrid,
    width: u32,
    height: u32,
    ranges: &[Uint2],
    point_list: &[u32],
    means2d: &[Float2],
    conic_opacity: &[Float4],
    accum_alpha: &mut [f32],
    n_contrib: &mut [u32],
) {
    for py in 0..height {
        for px in 0..width {
            let pix_id = (py * width + px) as usize;
            let tile_id = grid.tile_id(px / grid.tile_width, py / grid.tile_height);
            let range = ranges[tile_id as usize];
            let pixf = Float2::new(px as f32, py as f32);

            let mut transmittance = 1.0_f32;
            let mut contributor = 0;
            let mut last_contributor = 0;
            for &point in &point_list[range.x as usize..range.y as usize] {
                contributor += 1;
                let xy = means2d[point as usize];
                let con_o = conic_opacity[point as usize];
                let d = Float2::new(xy.x - pixf.x, xy.y - pixf.y);
                let power = -0.5 * (con_o.x * d.x * d.x + con_o.z * d.y * d.y) - con_o.y * d.x * d.y;
                if power > 0.0 {
                    continue;
                }
                let alpha = MAX_ALPHA.min(con_o.w * power.exp());
                if alpha < MIN_ALPHA {
                    continue;
                }
                let test_t = transmittance * (1.0 - alpha);
                if test_t < MIN_TRANSMITTANCE {
                    break;
                }
                transmittance = test_t;
                last_contributor = contributor;
            }
            accum_alpha[pix_id] = 1.0 - transmittance;
            n_contrib[pix_id] = last_contributor;
        }
    }
}
