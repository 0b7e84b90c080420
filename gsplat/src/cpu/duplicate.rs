// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gsplat_layout::Float2;

use super::TileGrid;
use crate::{Error, Result};

/// Builds the sort key of one instance: tile id in the high half, depth bits in the low half.
///
/// Depths are positive, so their IEEE bit patterns order the same way as the values.
pub fn instance_key(tile_id: u32, depth: f32) -> u64 {
    (u64::from(tile_id) << 32) | u64::from(depth.to_bits())
}

/// Emits one key/value pair per (point, tile) overlap.
///
/// Point `i` writes its instances to `keys[offsets[i - 1]..offsets[i]]` (starting at zero for
/// the first point), where `offsets` is the inclusive scan of the tile counts. Returns the
/// number of instances written.
pub fn duplicate_with_keys(
    grid: &TileGrid,
    means2d: &[Float2],
    radii: &[i32],
    depths: &[f32],
    offsets: &[u32],
    keys: &mut [u64],
    values: &mut [u32],
) -> Result<usize> {
    let mut written = 0;
    for (ix, &end) in offsets.iter().enumerate() {
        let start = if ix == 0 { 0 } else { offsets[ix - 1] as usize };
        let end = end as usize;
        if end > keys.len() {
            return Err(Error::InstanceCountMismatch {
                expected: end,
                actual: keys.len(),
            });
        }
        if radii[ix] <= 0 {
            continue;
        }
        let rect = grid.rect(means2d[ix], radii[ix]);
        let area = rect.area().ok_or(Error::TooManyInstances)? as usize;
        if area != end - start {
            return Err(Error::InstanceCountMismatch {
                expected: end - start,
                actual: area,
            });
        }
        for ((x, y), (key, value)) in rect
            .tiles()
            .zip(keys[start..end].iter_mut().zip(&mut values[start..end]))
        {
            *key = instance_key(grid.tile_id(x, y), depths[ix]);
            *value = ix as u32;
        }
        written += end - start;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::{duplicate_with_keys, instance_key};
    use crate::cpu::TileGrid;
    use crate::Error;
    use gsplat_layout::Float2;

    #[test]
    fn keys_order_by_tile_then_depth() {
        assert!(instance_key(0, 100.0) < instance_key(1, 0.5));
        assert!(instance_key(3, 0.5) < instance_key(3, 2.0));
    }

    #[test]
    fn each_point_fills_its_own_slice() {
        let grid = TileGrid::new(64, 64, 16, 16);
        let means = [Float2::new(8.0, 8.0), Float2::new(16.0, 16.0)];
        let radii = [4, 4];
        let depths = [2.0, 1.0];
        let offsets = [1, 5];
        let mut keys = [0; 5];
        let mut values = [0; 5];
        let written =
            duplicate_with_keys(&grid, &means, &radii, &depths, &offsets, &mut keys, &mut values)
                .unwrap();
        assert_eq!(written, 5);
        assert_eq!(values, [0, 1, 1, 1, 1]);
        assert_eq!(keys[0], instance_key(0, 2.0));
        assert_eq!(keys[1..], [0, 1, 4, 5].map(|tile| instance_key(tile, 1.0)));
    }

    #[test]
    fn stale_offsets_are_reported() {
        let grid = TileGrid::new(64, 64, 16, 16);
        let means = [Float2::new(16.0, 16.0)];
        let mut keys = [0; 3];
        let mut values = [0; 3];
        let err = duplicate_with_keys(&grid, &means, &[4], &[1.0], &[3], &mut keys, &mut values)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InstanceCountMismatch {
                expected: 3,
                actual: 4
            }
        ));
    }
}
