// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Temporary storage for the prefix sum and the key sort.
//!
//! Both scratch regions are opaque bytes to the states that host them; the stages that use
//! them lay them out again with the layouts below.

use crate::{ChunkLayout, Field, LayoutOptions, Result};

/// Elements reduced per block by the tile-touch scan.
pub const SCAN_WG: usize = 256;

/// Key bits consumed per radix sort pass.
pub const RADIX_BITS: u32 = 8;

/// Histogram buckets per radix sort pass.
pub const RADIX_BUCKETS: usize = 1 << RADIX_BITS;

// The slack lets the scratch start anywhere inside its host field.
const SCRATCH_OPTIONS: LayoutOptions = LayoutOptions {
    alignment: 8,
    slack: 7,
};

/// Fields of the scan scratch region.
#[derive(Debug)]
pub struct ScanScratch {
    /// One partial sum per [`SCAN_WG`] sized block.
    pub block_sums: Field<u32>,
}

pub fn scan_scratch_layout(count: usize) -> Result<(ChunkLayout, ScanScratch)> {
    let mut layout = ChunkLayout::new("scan scratch", &SCRATCH_OPTIONS)?;
    let block_sums = layout.push("block_sums", count.div_ceil(SCAN_WG))?;
    Ok((layout, ScanScratch { block_sums }))
}

/// Bytes of scratch needed to scan `count` values. Zero when there is nothing to scan.
pub fn scan_scratch_size(count: usize) -> Result<usize> {
    if count == 0 {
        return Ok(0);
    }
    scan_scratch_layout(count)?.0.required()
}

/// Fields of the sort scratch region.
#[derive(Debug)]
pub struct SortScratch {
    /// Ping-pong key storage.
    pub keys: Field<u64>,
    /// Ping-pong value storage.
    pub values: Field<u32>,
    /// Digit histogram, reused by every pass.
    pub histogram: Field<u32>,
}

pub fn sort_scratch_layout(count: usize) -> Result<(ChunkLayout, SortScratch)> {
    let mut layout = ChunkLayout::new("sort scratch", &SCRATCH_OPTIONS)?;
    let keys = layout.push("keys", count)?;
    let values = layout.push("values", count)?;
    let histogram = layout.push("histogram", RADIX_BUCKETS)?;
    Ok((
        layout,
        SortScratch {
            keys,
            values,
            histogram,
        },
    ))
}

/// Bytes of scratch needed to sort `count` key/value pairs. Zero when there is nothing to sort.
pub fn sort_scratch_size(count: usize) -> Result<usize> {
    if count == 0 {
        return Ok(0);
    }
    sort_scratch_layout(count)?.0.required()
}
