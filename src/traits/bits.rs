/*
 * SPDX-FileCopyrightText: 2024 Tommaso Fontana
 * SPDX-FileCopyrightText: 2024 Inria
 * SPDX-FileCopyrightText: 2024 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;

/// Sequential, streaming bit-by-bit reads.
///
/// Implementations buffer up to 64 bits in an accumulator. The decoding fast
/// path peeks at a fixed number of bits, resolves a symbol through a table,
/// and then skips the length of the matched code, so peeking must not
/// advance the stream.
///
/// Bits past the end of the underlying stream read as zeros, but they are
/// never counted by [`available_bits`](BitRead::available_bits): callers
/// detect exhaustion by comparing the number of bits they are about to
/// consume with the number of bits actually available.
pub trait BitRead {
    type Error: Error + Send + Sync + 'static;

    /// Refill the accumulator until at least `n` bits are buffered or the
    /// underlying stream is exhausted.
    ///
    /// `n` must be at most 57: the accumulator is refilled one byte at a
    /// time, so larger requests could not be satisfied in all buffer states.
    fn ensure_bits(&mut self, n: usize) -> Result<(), Self::Error>;

    /// Return the number of valid bits currently buffered.
    ///
    /// After [`ensure_bits(n)`](BitRead::ensure_bits) a value smaller than
    /// `n` means the stream is exhausted.
    fn available_bits(&self) -> usize;

    /// Return the next `n` bits of the stream in the lowest bits of the
    /// result, without advancing; bits beyond the end of the stream are
    /// zeros. `n` must be at most 57.
    fn peek_bits(&mut self, n: usize) -> Result<u64, Self::Error>;

    /// Discard `n` buffered bits.
    ///
    /// `n` must not exceed [`available_bits`](BitRead::available_bits).
    fn skip_bits(&mut self, n: usize);

    /// Read `n` bits and return them in the lowest bits, failing if fewer
    /// than `n` bits remain in the stream. `n` must be at most 57.
    fn read_bits(&mut self, n: usize) -> Result<u64, Self::Error>;
}

/// Sequential, streaming bit-by-bit writes.
pub trait BitWrite {
    type Error: Error + Send + Sync + 'static;

    /// Append the lowest `n` bits of `value` to the stream, the least
    /// significant bit first, and return the number of bits written, that
    /// is, `n`.
    ///
    /// `n` must be at most 64. If the feature `checks` is enabled,
    /// implementations check that the remaining bits of `value` are zero;
    /// otherwise, they are ignored.
    fn write_bits(&mut self, value: u64, n: usize) -> Result<usize, Self::Error>;

    /// Flush the accumulator and all staged bytes to the backend, padding
    /// the final partial byte, if any, with zeros.
    fn flush(&mut self) -> Result<(), Self::Error>;
}
