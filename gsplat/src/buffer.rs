// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gsplat_layout::{required, ChunkState, LayoutOptions};

use crate::Result;

/// Reusable backing storage for one chunk state.
///
/// The buffer grows to fit the largest state carved from it and never shrinks, so a steady
/// stream of similar frames stops allocating after the first one.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    inner: Vec<u8>,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns exactly `size` bytes, growing the buffer first if needed.
    pub fn to_fit(&mut self, size: usize) -> &mut [u8] {
        if self.inner.len() < size {
            log::trace!("growing chunk buffer from {} to {size} bytes", self.inner.len());
            self.inner.resize(size, 0);
        }
        &mut self.inner[..size]
    }

    /// Sizes the buffer for a `T` holding `count` elements and carves it.
    ///
    /// Sizing and carving use the same count, and the carve sees exactly [`required`] bytes.
    pub fn carve<'a, T: ChunkState<'a>>(
        &'a mut self,
        count: usize,
        options: &LayoutOptions,
    ) -> Result<T> {
        let size = required::<T>(count, options)?;
        let chunk = self.to_fit(size);
        Ok(T::from_chunk(chunk, count, options)?)
    }

    /// Bytes currently held.
    pub fn capacity_bytes(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::ChunkBuffer;
    use gsplat_layout::{required, GeometryState, LayoutOptions};

    #[test]
    fn buffer_grows_but_never_shrinks() {
        let options = LayoutOptions::default();
        let mut buffer = ChunkBuffer::new();
        let state: GeometryState<'_> = buffer.carve(100, &options).unwrap();
        assert_eq!(state.len(), 100);
        let large = required::<GeometryState<'_>>(100, &options).unwrap();
        assert_eq!(buffer.capacity_bytes(), large);

        let state: GeometryState<'_> = buffer.carve(10, &options).unwrap();
        assert_eq!(state.len(), 10);
        assert_eq!(buffer.capacity_bytes(), large);
    }
}
