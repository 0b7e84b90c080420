// Copyright 2026 the Gsplat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors raised while laying out or carving a chunk.
///
/// None of these are recoverable by retrying the same call: they indicate that the
/// caller's buffer or options do not satisfy the size contract of the layout.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The configured alignment is zero or not a power of two.
    #[error("alignment {0} is not a power of two")]
    InvalidAlignment(usize),
    /// The configured alignment is weaker than the natural alignment of a field's element type.
    #[error("alignment {alignment} is below the {natural}-byte alignment of field `{field}`")]
    UnderAligned {
        field: &'static str,
        alignment: usize,
        natural: usize,
    },
    /// The slack margin cannot absorb the padding needed to align an arbitrary base address.
    #[error("slack of {slack} bytes cannot absorb the padding of a {alignment}-byte aligned base")]
    InsufficientSlack { slack: usize, alignment: usize },
    /// The size of a field, or the running size of the chunk, does not fit in `usize`.
    #[error("size of field `{field}` overflows the address space")]
    SizeOverflow { field: &'static str },
    /// The chunk handed to a carve is smaller than the layout needs.
    #[error("{state} needs {required} bytes but the chunk only holds {actual}")]
    BufferTooSmall {
        state: &'static str,
        required: usize,
        actual: usize,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
