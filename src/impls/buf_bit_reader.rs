/*
 * SPDX-FileCopyrightText: 2024 Tommaso Fontana
 * SPDX-FileCopyrightText: 2024 Inria
 * SPDX-FileCopyrightText: 2024 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::{ErrorKind, Read};

#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

use super::STAGING_CAPACITY;
use crate::traits::BitRead;

/// An implementation of [`BitRead`] for a [`std::io::Read`].
///
/// Bits are consumed from the least significant end of a 64-bit accumulator,
/// refilled one byte at a time from the staging area: each loaded byte `b`
/// becomes `buffer |= b << count`, matching the order in which
/// [`BufBitWriter`](crate::impls::BufBitWriter) emitted it.
///
/// The reader tracks the end of the underlying stream: peeks past it are
/// zero-extended, but [`available_bits`](BitRead::available_bits) only ever
/// counts bits that were actually read from the backend, so callers can
/// distinguish padding from data.
#[derive(Debug)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct BufBitReader<R: Read> {
    /// The [`Read`] from which staged bytes are read.
    backend: R,
    /// Byte staging area between the backend and the accumulator.
    staging: Box<[u8]>,
    /// Index of the next staged byte to load.
    pos: usize,
    /// Number of valid bytes in the staging area.
    len: usize,
    /// The bit accumulator. Only the lowest `count` bits are valid; the
    /// remaining bits are zeros.
    buffer: u64,
    /// Number of valid bits in the accumulator. At most 64.
    count: usize,
    /// Whether the backend reported end of stream.
    eof: bool,
}

impl<R: Read> BufBitReader<R> {
    /// Create a new [`BufBitReader`] around a [`Read`].
    #[must_use]
    pub fn new(backend: R) -> Self {
        Self {
            backend,
            staging: vec![0; STAGING_CAPACITY].into_boxed_slice(),
            pos: 0,
            len: 0,
            buffer: 0,
            count: 0,
            eof: false,
        }
    }

    /// Return the backend, consuming this reader.
    pub fn into_inner(self) -> R {
        self.backend
    }

    /// Load one byte into the accumulator; returns `false` at end of stream.
    #[inline]
    fn load_byte(&mut self) -> Result<bool, std::io::Error> {
        if self.pos == self.len {
            if self.eof {
                return Ok(false);
            }
            self.pos = 0;
            self.len = 0;
            loop {
                match self.backend.read(&mut self.staging) {
                    Ok(0) => {
                        self.eof = true;
                        return Ok(false);
                    }
                    Ok(n) => {
                        self.len = n;
                        break;
                    }
                    Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
                    Err(e) => return Err(e),
                }
            }
        }
        debug_assert!(self.count + 8 <= 64);
        self.buffer |= (self.staging[self.pos] as u64) << self.count;
        self.pos += 1;
        self.count += 8;
        Ok(true)
    }
}

impl<R: Read> BitRead for BufBitReader<R> {
    type Error = std::io::Error;

    #[inline]
    fn ensure_bits(&mut self, n: usize) -> Result<(), Self::Error> {
        debug_assert!(n <= 57);
        while self.count < n {
            if !self.load_byte()? {
                break;
            }
        }
        Ok(())
    }

    #[inline(always)]
    fn available_bits(&self) -> usize {
        self.count
    }

    #[inline(always)]
    fn peek_bits(&mut self, n: usize) -> Result<u64, Self::Error> {
        debug_assert!(n <= 57);
        self.ensure_bits(n)?;
        Ok(self.buffer & ((1_u64 << n) - 1))
    }

    #[inline(always)]
    fn skip_bits(&mut self, n: usize) {
        debug_assert!(n <= self.count);
        self.buffer >>= n;
        self.count -= n;
    }

    #[inline]
    fn read_bits(&mut self, n: usize) -> Result<u64, Self::Error> {
        self.ensure_bits(n)?;
        if self.count < n {
            return Err(ErrorKind::UnexpectedEof.into());
        }
        let result = self.buffer & ((1_u64 << n) - 1);
        self.skip_bits(n);
        Ok(result)
    }
}
