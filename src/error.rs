/*
 * SPDX-FileCopyrightText: 2024 Inria
 * SPDX-FileCopyrightText: 2024 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The error taxonomy of the codec.
//!
//! The codec does not attempt recovery: the first failure unwinds scoped
//! resources and surfaces one of the kinds below to the caller. After a
//! non-success return the output path must be treated as unreliable, as
//! partial output is permitted.

use std::path::PathBuf;

/// A specialized [`Result`](core::result::Result) using [`enum@Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// The error returned by all fallible operations of this crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input file cannot be opened or the output file cannot be created.
    #[error("cannot open {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A read failed, or the input ended before the expected end.
    #[error("read failed: {0}")]
    FileRead(#[source] std::io::Error),
    /// A write failed or was short.
    #[error("write failed: {0}")]
    FileWrite(#[source] std::io::Error),
    /// A buffer allocation failed.
    #[error("cannot allocate a buffer of {bytes} bytes")]
    Memory { bytes: u64 },
    /// Bad magic, an invalid lengths table, a corrupted bit stream, or a
    /// premature end of the container.
    #[error("bad container format: {0}")]
    BadFormat(&'static str),
    /// The input size cannot be addressed on this platform.
    #[error("input of {size} bytes exceeds addressable memory")]
    InputTooLarge { size: u64 },
    /// An internal invariant was violated.
    #[error("internal invariant violated: {0}")]
    Unknown(&'static str),
}
