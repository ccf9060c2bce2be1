/*
 * SPDX-FileCopyrightText: 2024 Inria
 * SPDX-FileCopyrightText: 2024 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Traits for operating on streams of bits.

We provide two bit-based traits, [`BitRead`] and [`BitWrite`], analogous to
[`std::io::Read`] and [`std::io::Write`]. They provide read/write operations
on fixed-width blocks of up to 64 bits, which is all the codec needs: a
Huffman code word is emitted with a single [`write_bits`](BitWrite::write_bits)
call and decoded with a [`peek_bits`](BitRead::peek_bits)/
[`skip_bits`](BitRead::skip_bits) pair driven by a lookup table.

Both traits have an internal error type `Error`, which propagates the error
of the underlying backend — [`std::io::Error`] for the implementations we
provide in [`impls`](crate::impls).

## Bit order

The container format is little-endian throughout, for bytes and bits alike:
the first bit of a stream is the least significant bit of its first byte, and
bit *i* of the stream is bit (*i* & 7) of byte (*i* ≫ 3). Consequently a
pattern passed to [`write_bits`](BitWrite::write_bits) is consumed from its
least significant bit up, and [`peek_bits`](BitRead::peek_bits) returns the
next bits of the stream in the lowest positions of the result. Note that
canonical Huffman code words are conceptually most-significant-bit first, so
the code table stores them bit-reversed (see
[`CodeTable`](crate::codes::CodeTable)).

*/

mod bits;
pub use bits::{BitRead, BitWrite};
