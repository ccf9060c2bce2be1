/*
 * SPDX-FileCopyrightText: 2024 Tommaso Fontana
 * SPDX-FileCopyrightText: 2024 Inria
 * SPDX-FileCopyrightText: 2024 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::Write;

#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

use super::STAGING_CAPACITY;
use crate::traits::BitWrite;

/// An implementation of [`BitWrite`] for a [`std::io::Write`].
///
/// Bits are accumulated in a 64-bit buffer; new bits are placed starting at
/// the lowest unoccupied position, so the first bit written to the stream
/// ends up in the least significant bit of the first byte. Whenever the
/// buffer holds exactly 64 bits it is emitted little-endian as an 8-byte
/// group into the staging area, which in turn is flushed to the backend
/// whenever the next group would overflow it.
///
/// The writer must be finished explicitly with
/// [`flush`](BitWrite::flush) or [`into_inner`](BufBitWriter::into_inner),
/// which pad the final partial byte with zeros; dropping an unflushed writer
/// loses the buffered bits.
#[derive(Debug)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct BufBitWriter<W: Write> {
    /// The [`Write`] to which staged bytes are written.
    backend: W,
    /// The bit accumulator. Only the lowest `count` bits are valid; the
    /// remaining bits are zeros.
    buffer: u64,
    /// Number of valid bits in the accumulator. Strictly smaller than 64
    /// between calls.
    count: usize,
    /// Byte staging area between the accumulator and the backend.
    staging: Vec<u8>,
}

impl<W: Write> BufBitWriter<W> {
    /// Create a new [`BufBitWriter`] around a [`Write`].
    #[must_use]
    pub fn new(backend: W) -> Self {
        Self {
            backend,
            buffer: 0,
            count: 0,
            staging: Vec::with_capacity(STAGING_CAPACITY),
        }
    }

    /// Emit the full accumulator as an 8-byte little-endian group.
    #[inline]
    fn spill_word(&mut self) -> Result<(), std::io::Error> {
        if self.staging.len() + 8 > STAGING_CAPACITY {
            self.backend.write_all(&self.staging)?;
            self.staging.clear();
        }
        self.staging.extend_from_slice(&self.buffer.to_le_bytes());
        Ok(())
    }

    /// Return the backend, consuming this writer after
    /// [flushing it](BitWrite::flush).
    pub fn into_inner(mut self) -> Result<W, std::io::Error> {
        self.flush()?;
        Ok(self.backend)
    }
}

impl<W: Write> BitWrite for BufBitWriter<W> {
    type Error = std::io::Error;

    #[inline]
    fn write_bits(&mut self, value: u64, n: usize) -> Result<usize, Self::Error> {
        debug_assert!(n <= 64);
        debug_assert!(self.count < 64);
        #[cfg(feature = "checks")]
        assert!(
            n == 64 || value & !((1_u64 << n) - 1) == 0,
            "Error: value {} does not fit in {} bits",
            value,
            n
        );
        if n == 0 {
            return Ok(0);
        }
        // Clean up bits higher than n
        let value = if n < 64 { value & ((1_u64 << n) - 1) } else { value };

        // Easy way out: we fit the buffer. A pattern filling it exactly
        // triggers an immediate spill.
        if self.count + n <= 64 {
            self.buffer |= value << self.count;
            self.count += n;
            if self.count == 64 {
                self.spill_word()?;
                self.buffer = 0;
                self.count = 0;
            }
            return Ok(n);
        }

        // The low 64 − count bits of the pattern land in place; the rest
        // restarts the accumulator.
        self.buffer |= value << self.count;
        self.spill_word()?;
        let consumed = 64 - self.count;
        self.buffer = value >> consumed;
        self.count = n - consumed;
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.staging.len() + 8 > STAGING_CAPACITY {
            self.backend.write_all(&self.staging)?;
            self.staging.clear();
        }
        // Emit the final ⌈count/8⌉ bytes, low byte first.
        while self.count > 0 {
            self.staging.push(self.buffer as u8);
            self.buffer >>= 8;
            self.count = self.count.saturating_sub(8);
        }
        self.backend.write_all(&self.staging)?;
        self.staging.clear();
        self.backend.flush()
    }
}
