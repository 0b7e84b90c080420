// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gsplat_layout::Uint2;

/// Finds the start and end of each tile's run in the sorted key list.
///
/// `ranges` is indexed by tile id and is cleared first, so tiles without instances end up
/// with an empty `0..0` range.
pub fn identify_tile_ranges(sorted_keys: &[u64], ranges: &mut [Uint2]) {
    ranges.fill(Uint2::default());
    let n = sorted_keys.len();
    for (ix, &key) in sorted_keys.iter().enumerate() {
        let tile = (key >> 32) as usize;
        if ix == 0 {
            ranges[tile].x = 0;
        } else {
            let prev_tile = (sorted_keys[ix - 1] >> 32) as usize;
            if tile != prev_tile {
                ranges[prev_tile].y = ix as u32;
                ranges[tile].x = ix as u32;
            }
        }
        if ix == n - 1 {
            ranges[tile].y = n as u32;
        }
    }
}
