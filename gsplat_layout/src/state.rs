// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{Carved, ChunkLayout, Error, LayoutOptions, Result};

/// A set of typed fields carved out of one chunk.
///
/// Implementors describe their fields once, in [`ChunkState::describe`]. Sizing
/// ([`required`]) and carving ([`ChunkState::from_chunk`]) both go through that
/// description, so they always agree on the size of the chunk and the offset of every field.
pub trait ChunkState<'a>: Sized {
    /// Name of the state, used in layouts and errors.
    const NAME: &'static str;

    /// Typed handles to the fields of one [`ChunkLayout`].
    type Fields;

    /// Lays out a state holding `count` elements.
    fn describe(count: usize, options: &LayoutOptions) -> Result<(ChunkLayout, Self::Fields)>;

    /// Builds the state from freshly carved fields.
    fn assemble(carved: &mut Carved<'a>, fields: Self::Fields) -> Self;

    /// Carves a state holding `count` elements out of `chunk`.
    ///
    /// `chunk` should be at least [`required`] bytes long; shorter chunks are rejected with
    /// [`Error::BufferTooSmall`] when they cannot host the layout at their base address.
    /// A chunk sized for fewer elements is only rejected once the larger span no longer
    /// fits; inside the slack the carve succeeds with fields of the requested length.
    fn from_chunk(chunk: &'a mut [u8], count: usize, options: &LayoutOptions) -> Result<Self> {
        let (layout, fields) = Self::describe(count, options)?;
        let mut carved = layout.carve(chunk)?;
        Ok(Self::assemble(&mut carved, fields))
    }

    /// Carves a state from the front of `chunk`, then advances `chunk` past its last field.
    ///
    /// This allows several states to share one buffer.
    fn obtain_from(
        chunk: &mut &'a mut [u8],
        count: usize,
        options: &LayoutOptions,
    ) -> Result<Self> {
        let (layout, fields) = Self::describe(count, options)?;
        let consumed = layout.consumed_by(&**chunk)?;
        let (head, tail) = std::mem::take(chunk).split_at_mut(consumed);
        *chunk = tail;
        let mut carved = layout.carve(head)?;
        Ok(Self::assemble(&mut carved, fields))
    }
}

/// Bytes a caller must allocate to host a `T` holding `count` elements.
///
/// This is the span of the layout plus the configured slack, which absorbs the padding
/// needed when the buffer's base address is not aligned.
pub fn required<'a, T: ChunkState<'a>>(count: usize, options: &LayoutOptions) -> Result<usize> {
    let (layout, _) = T::describe(count, options)?;
    layout.required()
}

/// `count * factor`, for fields holding several scalars per element.
pub(crate) fn scaled(count: usize, factor: usize, field: &'static str) -> Result<usize> {
    count
        .checked_mul(factor)
        .ok_or(Error::SizeOverflow { field })
}
