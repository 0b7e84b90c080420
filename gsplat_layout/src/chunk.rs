// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chunk cursor, a bump allocator over byte offsets.

use std::ops::Range;

/// Rounds `offset` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two. Returns `None` if the result does not fit in `usize`.
pub const fn align_up(offset: usize, alignment: usize) -> Option<usize> {
    offset.checked_add(offset.wrapping_neg() & (alignment - 1))
}

/// A byte cursor that hands out aligned, non-overlapping ranges.
///
/// The cursor never holds an address, only an offset from the start of the chunk, so
/// sizing a layout and carving a real buffer run exactly the same arithmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkCursor {
    offset: usize,
}

impl ChunkCursor {
    /// Creates a cursor at the start of a chunk.
    pub const fn new() -> Self {
        Self { offset: 0 }
    }

    /// The offset one past the last byte handed out so far.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Reserves `len` bytes starting at the next multiple of `alignment`.
    ///
    /// Returns the reserved byte range and advances the cursor to its end. `alignment`
    /// must be a power of two.
    pub fn obtain_bytes(&mut self, len: usize, alignment: usize) -> Option<Range<usize>> {
        debug_assert!(alignment.is_power_of_two());
        let start = align_up(self.offset, alignment)?;
        let end = start.checked_add(len)?;
        self.offset = end;
        Some(start..end)
    }

    /// Reserves room for `count` elements of `T` starting at the next multiple of `alignment`.
    pub fn obtain<T: Sized>(&mut self, count: usize, alignment: usize) -> Option<Range<usize>> {
        let len = count.checked_mul(size_of::<T>())?;
        self.obtain_bytes(len, alignment)
    }
}
