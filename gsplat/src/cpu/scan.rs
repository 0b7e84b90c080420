// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gsplat_layout::{scan_scratch_layout, SCAN_WG};

use crate::{Error, Result};

/// Inclusive prefix sum of `values` into `offsets`, returning the total.
///
/// Runs as a block reduce followed by a block scan, keeping one partial sum per
/// [`SCAN_WG`] sized block in `scratch`, which must hold at least
/// [`scan_scratch_size`](gsplat_layout::scan_scratch_size) bytes.
///
/// Fails with [`Error::TooManyInstances`] if the total does not fit in a `u32`.
pub fn inclusive_scan(values: &[u32], offsets: &mut [u32], scratch: &mut [u8]) -> Result<u32> {
    if values.is_empty() {
        return Ok(0);
    }
    let (layout, fields) = scan_scratch_layout(values.len())?;
    let mut carved = layout.carve(scratch)?;
    let block_sums = carved.take(fields.block_sums);

    for (sum, block) in block_sums.iter_mut().zip(values.chunks(SCAN_WG)) {
        *sum = block
            .iter()
            .try_fold(0_u32, |acc, &value| acc.checked_add(value))
            .ok_or(Error::TooManyInstances)?;
    }
    let mut total = 0_u32;
    for sum in block_sums.iter_mut() {
        let block = *sum;
        *sum = total;
        total = total.checked_add(block).ok_or(Error::TooManyInstances)?;
    }
    for ((block, out), &prefix) in values
        .chunks(SCAN_WG)
        .zip(offsets.chunks_mut(SCAN_WG))
        .zip(block_sums.iter())
    {
        let mut acc = prefix;
        for (&value, offset) in block.iter().zip(out) {
            acc = acc.checked_add(value).ok_or(Error::TooManyInstances)?;
            *offset = acc;
        }
    }
    Ok(total)
}
