/*
 * SPDX-FileCopyrightText: 2024 Tommaso Fontana
 * SPDX-FileCopyrightText: 2024 Inria
 * SPDX-FileCopyrightText: 2024 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Buffered implementations of the bit-stream traits.

[`BufBitWriter`] and [`BufBitReader`] implement
[`BitWrite`](crate::traits::BitWrite) and [`BitRead`](crate::traits::BitRead)
on top of any [`std::io::Write`] or [`std::io::Read`] backend. Both use a
64-bit accumulator to amortize bit-level work into word-level work, and a
64 KiB byte staging area so the backend sees large, infrequent reads and
writes; wrapping a [`std::fs::File`] directly is the intended use, and no
additional [`std::io::BufWriter`]/[`std::io::BufReader`] layer is needed.

Both structures are call-scoped: they hold no state between encode or decode
calls, and dropping them releases the backend.

*/

mod buf_bit_reader;
pub use buf_bit_reader::BufBitReader;

mod buf_bit_writer;
pub use buf_bit_writer::BufBitWriter;

/// Capacity of the byte staging areas of [`BufBitReader`] and
/// [`BufBitWriter`].
pub(crate) const STAGING_CAPACITY: usize = 64 * 1024;
