// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

use bytemuck::Pod;
use smallvec::SmallVec;

use crate::chunk::{align_up, ChunkCursor};
use crate::{Error, Result};

/// Alignment of every field start, matching the device's general allocation granularity.
pub const DEFAULT_ALIGNMENT: usize = 128;

/// Bytes added on top of a layout's span by [`ChunkLayout::required`].
///
/// Covers the padding needed to bring an arbitrary base address up to [`DEFAULT_ALIGNMENT`].
pub const DEFAULT_SLACK: usize = 128;

/// Options shared by every chunk layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Alignment of every field start, in bytes. Must be a power of two and at least the
    /// natural alignment of every field's element type.
    pub alignment: usize,
    /// Safety margin added to the span of a layout when sizing a buffer for it.
    ///
    /// Must be at least `alignment - 1` so that a buffer whose base address is not aligned
    /// can still host the whole layout.
    pub slack: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            alignment: DEFAULT_ALIGNMENT,
            slack: DEFAULT_SLACK,
        }
    }
}

impl LayoutOptions {
    /// Checks that the alignment is a power of two and that the slack can absorb it.
    pub fn validate(&self) -> Result<()> {
        if !self.alignment.is_power_of_two() {
            return Err(Error::InvalidAlignment(self.alignment));
        }
        if self.slack < self.alignment - 1 {
            return Err(Error::InsufficientSlack {
                slack: self.slack,
                alignment: self.alignment,
            });
        }
        Ok(())
    }
}

/// Placement of one field inside a chunk, relative to the aligned chunk start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSlot {
    pub name: &'static str,
    /// Byte offset of the first element.
    pub offset: usize,
    /// Size of the field in bytes.
    pub size: usize,
    /// Number of elements.
    pub count: usize,
}

impl FieldSlot {
    /// Byte offset one past the last element.
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }

    pub const fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Typed handle to a field pushed onto a [`ChunkLayout`].
///
/// Handles are not `Clone`; each one is redeemed exactly once by [`Carved::take`].
#[derive(Debug)]
pub struct Field<T: Pod> {
    index: usize,
    _phantom: PhantomData<T>,
}

impl<T: Pod> Field<T> {
    /// Position of the field in the layout's ordered field list.
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// Ordered description of the fields of a chunk.
///
/// Fields are placed in the order they are pushed, each at the next multiple of the
/// configured alignment. The order is part of the contract: both the size of a chunk and
/// the offsets of its fields depend on it.
#[derive(Clone, Debug)]
pub struct ChunkLayout {
    name: &'static str,
    options: LayoutOptions,
    cursor: ChunkCursor,
    slots: SmallVec<[FieldSlot; 12]>,
}

impl ChunkLayout {
    /// Creates an empty layout. `name` identifies the layout in errors and reports.
    pub fn new(name: &'static str, options: &LayoutOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            name,
            options: *options,
            cursor: ChunkCursor::new(),
            slots: SmallVec::new(),
        })
    }

    /// Appends a field of `count` elements of `T`.
    pub fn push<T: Pod>(&mut self, name: &'static str, count: usize) -> Result<Field<T>> {
        if self.options.alignment < align_of::<T>() {
            return Err(Error::UnderAligned {
                field: name,
                alignment: self.options.alignment,
                natural: align_of::<T>(),
            });
        }
        let range = self
            .cursor
            .obtain::<T>(count, self.options.alignment)
            .ok_or(Error::SizeOverflow { field: name })?;
        let index = self.slots.len();
        self.slots.push(FieldSlot {
            name,
            offset: range.start,
            size: range.len(),
            count,
        });
        Ok(Field {
            index,
            _phantom: PhantomData,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// All fields, in placement order.
    pub fn slots(&self) -> &[FieldSlot] {
        &self.slots
    }

    /// Placement of the given field.
    pub fn slot<T: Pod>(&self, field: &Field<T>) -> &FieldSlot {
        &self.slots[field.index]
    }

    /// Looks up a field by name.
    pub fn find(&self, name: &str) -> Option<&FieldSlot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    /// Bytes from the aligned chunk start to the end of the last field.
    pub fn span(&self) -> usize {
        self.cursor.offset()
    }

    /// Bytes a caller must allocate to host this layout at any base address.
    pub fn required(&self) -> Result<usize> {
        self.span()
            .checked_add(self.options.slack)
            .ok_or(Error::SizeOverflow { field: self.name })
    }

    /// Splits `chunk` into the fields of this layout.
    ///
    /// The chunk start is first rounded up to the layout's alignment; every field then
    /// sits at exactly the offset reported by [`ChunkLayout::slots`] from that point.
    pub fn carve<'a>(&self, chunk: &'a mut [u8]) -> Result<Carved<'a>> {
        let consumed = self.consumed_by(chunk)?;
        let base = chunk.as_ptr() as usize;
        let lead = consumed - self.span();
        let (_, rest) = chunk.split_at_mut(lead);
        let (mut rest, _) = rest.split_at_mut(self.span());
        let mut parts = SmallVec::new();
        let mut cursor = 0;
        for slot in &self.slots {
            let tail = std::mem::take(&mut rest);
            let (_, tail) = tail.split_at_mut(slot.offset - cursor);
            let (field, tail) = tail.split_at_mut(slot.size);
            parts.push(field);
            rest = tail;
            cursor = slot.end();
        }
        Ok(Carved {
            base: base + lead,
            lead,
            parts,
        })
    }

    /// Bytes of `chunk` a carve would use: the alignment lead-in plus the span.
    ///
    /// Fails with [`Error::BufferTooSmall`] if `chunk` cannot host the layout.
    pub fn consumed_by(&self, chunk: &[u8]) -> Result<usize> {
        let base = chunk.as_ptr() as usize;
        let lead = align_up(base, self.options.alignment)
            .map(|aligned| aligned - base)
            .ok_or(Error::SizeOverflow { field: self.name })?;
        let needed = lead
            .checked_add(self.span())
            .ok_or(Error::SizeOverflow { field: self.name })?;
        if chunk.len() < needed {
            return Err(Error::BufferTooSmall {
                state: self.name,
                required: needed,
                actual: chunk.len(),
            });
        }
        Ok(needed)
    }
}

impl fmt::Display for ChunkLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.span();
        write!(
            f,
            "{}: {} bytes ({:.2} KB | {:.2} MB) in {} fields",
            self.name,
            span,
            span as f32 / (1 << 10) as f32,
            span as f32 / (1 << 20) as f32,
            self.slots.len()
        )?;
        for slot in &self.slots {
            write!(
                f,
                "\n\t{:<26}{:>10} elements @ {:>10} ({} bytes)",
                slot.name, slot.count, slot.offset, slot.size
            )?;
        }
        Ok(())
    }
}

/// The fields of a chunk after a carve, waiting to be taken as typed slices.
#[derive(Debug)]
pub struct Carved<'a> {
    base: usize,
    lead: usize,
    parts: SmallVec<[&'a mut [u8]; 12]>,
}

impl<'a> Carved<'a> {
    /// Address of the aligned chunk start that field offsets are relative to.
    pub fn base_address(&self) -> usize {
        self.base
    }

    /// Padding skipped at the front of the chunk to reach the aligned start.
    pub fn lead(&self) -> usize {
        self.lead
    }

    /// Redeems a field handle for its typed slice.
    pub fn take<T: Pod>(&mut self, field: Field<T>) -> &'a mut [T] {
        bytemuck::cast_slice_mut(std::mem::take(&mut self.parts[field.index]))
    }
}

#[cfg(test)]
mod tests {
    use super::{ChunkLayout, LayoutOptions};
    use crate::Error;

    #[test]
    fn options_reject_bad_alignment() {
        let options = LayoutOptions {
            alignment: 96,
            slack: 128,
        };
        assert_eq!(options.validate(), Err(Error::InvalidAlignment(96)));
        let options = LayoutOptions {
            alignment: 256,
            slack: 128,
        };
        assert_eq!(
            options.validate(),
            Err(Error::InsufficientSlack {
                slack: 128,
                alignment: 256
            })
        );
    }

    #[test]
    fn push_rejects_under_aligned_fields() {
        let options = LayoutOptions {
            alignment: 4,
            slack: 8,
        };
        let mut layout = ChunkLayout::new("test", &options).unwrap();
        layout.push::<f32>("ok", 1).unwrap();
        let err = layout.push::<u64>("keys", 1).unwrap_err();
        assert_eq!(
            err,
            Error::UnderAligned {
                field: "keys",
                alignment: 4,
                natural: 8
            }
        );
    }

    #[test]
    fn carve_aligns_a_misaligned_base() {
        let options = LayoutOptions::default();
        let mut layout = ChunkLayout::new("test", &options).unwrap();
        let a = layout.push::<u32>("a", 10).unwrap();
        let b = layout.push::<u64>("b", 3).unwrap();
        let required = layout.required().unwrap();
        let mut backing = vec![0_u8; required + 1];
        let mut carved = layout.carve(&mut backing[1..]).unwrap();
        let base = carved.base_address();
        assert_eq!(base % options.alignment, 0);
        let a = carved.take(a);
        let b = carved.take(b);
        assert_eq!(a.len(), 10);
        assert_eq!(b.len(), 3);
        assert_eq!(a.as_ptr() as usize - base, 0);
        assert_eq!(b.as_ptr() as usize - base, 128);
    }

    #[test]
    fn carve_reports_short_buffers() {
        let options = LayoutOptions::default();
        let mut layout = ChunkLayout::new("short", &options).unwrap();
        layout.push::<f32>("depths", 64).unwrap();
        let mut chunk = vec![0_u8; 16];
        let err = layout.carve(&mut chunk).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferTooSmall {
                state: "short",
                actual: 16,
                ..
            }
        ));
    }

    #[test]
    fn display_lists_every_field() {
        let mut layout = ChunkLayout::new("display", &LayoutOptions::default()).unwrap();
        layout.push::<f32>("depths", 4).unwrap();
        layout.push::<i32>("internal_radii", 4).unwrap();
        let report = layout.to_string();
        assert!(report.starts_with("display: 144 bytes"));
        assert!(report.contains("depths"));
        assert!(report.contains("internal_radii"));
    }
}
