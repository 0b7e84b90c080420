// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{sort_scratch_size, Carved, ChunkLayout, ChunkState, Field, LayoutOptions, Result};

/// Per-instance sort buffers, one entry per (point, tile) pair.
///
/// Keys hold the tile id in the high 32 bits and the depth bits in the low 32 bits, so an
/// ascending sort groups instances by tile and orders each tile front to back.
#[derive(Debug)]
pub struct BinningState<'a> {
    /// Size of `list_sorting_space` in bytes.
    pub sorting_size: usize,
    /// Point indices, permuted alongside `point_list_keys`.
    pub point_list: &'a mut [u32],
    pub point_list_unsorted: &'a mut [u32],
    /// Sorted keys.
    pub point_list_keys: &'a mut [u64],
    pub point_list_keys_unsorted: &'a mut [u64],
    /// Scratch for the key/value sort.
    pub list_sorting_space: &'a mut [u8],
}

#[derive(Debug)]
pub struct BinningFields {
    sorting_size: usize,
    point_list: Field<u32>,
    point_list_unsorted: Field<u32>,
    point_list_keys: Field<u64>,
    point_list_keys_unsorted: Field<u64>,
    list_sorting_space: Field<u8>,
}

impl<'a> ChunkState<'a> for BinningState<'a> {
    const NAME: &'static str = "BinningState";

    type Fields = BinningFields;

    fn describe(count: usize, options: &LayoutOptions) -> Result<(ChunkLayout, BinningFields)> {
        let sorting_size = sort_scratch_size(count)?;
        let mut layout = ChunkLayout::new(Self::NAME, options)?;
        let point_list = layout.push("point_list", count)?;
        let point_list_unsorted = layout.push("point_list_unsorted", count)?;
        let point_list_keys = layout.push("point_list_keys", count)?;
        let point_list_keys_unsorted = layout.push("point_list_keys_unsorted", count)?;
        let list_sorting_space = layout.push("list_sorting_space", sorting_size)?;
        Ok((
            layout,
            BinningFields {
                sorting_size,
                point_list,
                point_list_unsorted,
                point_list_keys,
                point_list_keys_unsorted,
                list_sorting_space,
            },
        ))
    }

    fn assemble(carved: &mut Carved<'a>, fields: BinningFields) -> Self {
        Self {
            sorting_size: fields.sorting_size,
            point_list: carved.take(fields.point_list),
            point_list_unsorted: carved.take(fields.point_list_unsorted),
            point_list_keys: carved.take(fields.point_list_keys),
            point_list_keys_unsorted: carved.take(fields.point_list_keys_unsorted),
            list_sorting_space: carved.take(fields.list_sorting_space),
        }
    }
}

impl BinningState<'_> {
    /// Number of instances the state was carved for.
    pub fn len(&self) -> usize {
        self.point_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point_list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::BinningState;
    use crate::{sort_scratch_size, ChunkState, LayoutOptions};

    #[test]
    fn binning_layout_places_sort_scratch_last() {
        let options = LayoutOptions::default();
        let (layout, _) = BinningState::describe(12, &options).unwrap();
        let names: Vec<_> = layout.slots().iter().map(|slot| slot.name).collect();
        assert_eq!(
            names,
            [
                "point_list",
                "point_list_unsorted",
                "point_list_keys",
                "point_list_keys_unsorted",
                "list_sorting_space",
            ]
        );
        let scratch = layout.find("list_sorting_space").unwrap();
        assert_eq!(scratch.offset, 512);
        assert_eq!(scratch.size, sort_scratch_size(12).unwrap());
    }

    #[test]
    fn obtain_from_advances_past_the_state() {
        let options = LayoutOptions::default();
        let (layout, _) = BinningState::describe(4, &options).unwrap();
        let mut backing = vec![0_u8; 2 * layout.required().unwrap()];
        let total = backing.len();
        let mut chunk = &mut backing[..];
        let first = BinningState::obtain_from(&mut chunk, 4, &options).unwrap();
        let first_end = first.list_sorting_space.as_ptr_range().end as usize;
        assert_eq!(first.len(), 4);
        let remaining = chunk.len();
        assert!(remaining < total);
        assert_eq!(chunk.as_ptr() as usize, first_end);
        let second = BinningState::obtain_from(&mut chunk, 4, &options).unwrap();
        assert_eq!(second.len(), 4);
    }
}
