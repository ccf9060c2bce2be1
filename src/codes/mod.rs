/*
 * SPDX-FileCopyrightText: 2024 Tommaso Fontana
 * SPDX-FileCopyrightText: 2024 Inria
 * SPDX-FileCopyrightText: 2024 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Static Huffman codes over the byte alphabet.

[`huffman`] builds the frequency-driven tree and derives the *canonical*
code of each symbol: the assignment uniquely determined by the multiset of
code lengths together with the (length ascending, symbol ascending) ordering
rule. Because canonical codes are a function of the lengths alone, the
container only has to persist one length byte per symbol.

[`decoder`] reverses the construction: it rebuilds a prefix tree from the
canonical codes and precomputes a first-level lookup table so that most
symbols are resolved by a single [`DECODE_BITS`]-wide peek, with an explicit
tree walk for longer codes.

*/

pub mod decoder;
pub use decoder::{DECODE_BITS, DecodeEntry, DecoderTable};

pub mod huffman;
pub use huffman::{Code, CodeTable, HuffmanTree, MAX_CODE_BITS, Node};
