// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gsplat_layout::{sort_scratch_layout, RADIX_BITS, RADIX_BUCKETS};

use crate::Result;

/// Stable LSD radix sort of key/value pairs over the low `end_bit` bits of the keys.
///
/// Reads `keys_in`/`values_in` and leaves the sorted pairs in `keys_out`/`values_out`. The
/// passes ping-pong between the outputs and a second copy carved from `scratch`, which must
/// hold at least [`sort_scratch_size`](gsplat_layout::sort_scratch_size) bytes. Bits above
/// `end_bit` are expected to be zero.
pub fn sort_pairs(
    keys_in: &[u64],
    values_in: &[u32],
    keys_out: &mut [u64],
    values_out: &mut [u32],
    scratch: &mut [u8],
    end_bit: u32,
) -> Result<()> {
    let n = keys_in.len();
    if n == 0 {
        return Ok(());
    }
    let (layout, fields) = sort_scratch_layout(n)?;
    let mut carved = layout.carve(scratch)?;
    let alt_keys = carved.take(fields.keys);
    let alt_values = carved.take(fields.values);
    let histogram = carved.take(fields.histogram);

    let passes = end_bit.div_ceil(RADIX_BITS).max(1);
    for pass in 0..passes {
        let shift = pass * RADIX_BITS;
        // The last pass must land in the outputs.
        let to_out = (passes - 1 - pass) % 2 == 0;
        match (pass == 0, to_out) {
            (true, true) => {
                scatter(keys_in, values_in, keys_out, values_out, histogram, shift);
            }
            (true, false) => {
                scatter(keys_in, values_in, alt_keys, alt_values, histogram, shift);
            }
            (false, true) => {
                scatter(alt_keys, alt_values, keys_out, values_out, histogram, shift);
            }
            (false, false) => {
                scatter(keys_out, values_out, alt_keys, alt_values, histogram, shift);
            }
        }
    }
    Ok(())
}

/// One counting-sort pass on the digit at `shift`.
fn scatter(
    src_keys: &[u64],
    src_values: &[u32],
    dst_keys: &mut [u64],
    dst_values: &mut [u32],
    histogram: &mut [u32],
    shift: u32,
) {
    let digit = |key: u64| ((key >> shift) as usize) & (RADIX_BUCKETS - 1);
    histogram.fill(0);
    for &key in src_keys {
        histogram[digit(key)] += 1;
    }
    let mut prefix = 0;
    for bucket in histogram.iter_mut() {
        let count = *bucket;
        *bucket = prefix;
        prefix += count;
    }
    for (&key, &value) in src_keys.iter().zip(src_values) {
        let slot = &mut histogram[digit(key)];
        dst_keys[*slot as usize] = key;
        dst_values[*slot as usize] = value;
        *slot += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::sort_pairs;
    use gsplat_layout::sort_scratch_size;

    fn sorted_by(keys: &[u64], end_bit: u32) -> (Vec<u64>, Vec<u32>) {
        let values: Vec<u32> = (0..keys.len() as u32).collect();
        let mut keys_out = vec![0; keys.len()];
        let mut values_out = vec![0; keys.len()];
        let mut scratch = vec![0; sort_scratch_size(keys.len()).unwrap()];
        sort_pairs(
            keys,
            &values,
            &mut keys_out,
            &mut values_out,
            &mut scratch,
            end_bit,
        )
        .unwrap();
        (keys_out, values_out)
    }

    #[test]
    fn sorts_tile_major_keys() {
        let keys = [
            (3_u64 << 32) | 7,
            (1 << 32) | 9,
            (3 << 32) | 2,
            5,
            (1 << 32) | 1,
        ];
        let (sorted, values) = sorted_by(&keys, 34);
        assert_eq!(
            sorted,
            [5, (1 << 32) | 1, (1 << 32) | 9, (3 << 32) | 2, (3 << 32) | 7]
        );
        assert_eq!(values, [3, 4, 1, 2, 0]);
    }

    #[test]
    fn equal_keys_keep_their_order() {
        let keys = [42_u64; 6];
        for end_bit in [8, 16, 40] {
            let (_, values) = sorted_by(&keys, end_bit);
            assert_eq!(values, [0, 1, 2, 3, 4, 5]);
        }
    }
}
