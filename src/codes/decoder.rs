/*
 * SPDX-FileCopyrightText: 2024 Tommaso Fontana
 * SPDX-FileCopyrightText: 2024 Inria
 * SPDX-FileCopyrightText: 2024 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Table-accelerated decoding of canonical Huffman codes.

#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

use crate::codes::huffman::{CodeTable, NIL, Node};
use crate::error::{Error, Result};
use crate::traits::BitRead;

/// Width of the first-level lookup: a peek of this many bits resolves every
/// code of length up to [`DECODE_BITS`] in O(1).
pub const DECODE_BITS: usize = 12;

const TABLE_LEN: usize = 1 << DECODE_BITS;

/// One entry of the first-level lookup table.
///
/// If the low bits of the peeked index form a complete code, `symbol` is
/// non-negative and `bits` is that code's length. Otherwise `symbol` is −1,
/// `bits` is [`DECODE_BITS`], and `next_node` is the tree node reached after
/// consuming [`DECODE_BITS`] bits along the index — or −1 if the index
/// dead-ends in an incomplete code, which only a corrupt stream can reach.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
pub struct DecodeEntry {
    pub symbol: i16,
    pub bits: u8,
    pub next_node: i16,
}

/// The decoding tables rebuilt from a [`CodeTable`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct DecoderTable {
    table: Vec<DecodeEntry>,
    nodes: Vec<Node>,
}

impl DecoderTable {
    /// Rebuild the prefix tree from the stored code patterns and precompute
    /// the first-level lookup.
    ///
    /// Stored patterns are walked from bit 0 up (0 = left, 1 = right), so
    /// the tree paths match the order in which the bit reader consumes the
    /// stream; the table is filled by simulating a [`DECODE_BITS`]-bit walk
    /// from every possible peek value.
    pub fn new(codes: &CodeTable) -> Self {
        let mut nodes = vec![Node {
            weight: 0,
            left: NIL,
            right: NIL,
            symbol: NIL,
        }];

        for symbol in 0..=255u8 {
            let code = codes.code(symbol);
            if code.len == 0 {
                continue;
            }
            let mut index = 0usize;
            for j in 0..code.len {
                let bit = (code.bits >> j) & 1;
                let child = if bit == 0 {
                    nodes[index].left
                } else {
                    nodes[index].right
                };
                let child = if child == NIL {
                    let fresh = nodes.len() as i32;
                    nodes.push(Node {
                        weight: 0,
                        left: NIL,
                        right: NIL,
                        symbol: NIL,
                    });
                    if bit == 0 {
                        nodes[index].left = fresh;
                    } else {
                        nodes[index].right = fresh;
                    }
                    fresh
                } else {
                    child
                };
                index = child as usize;
            }
            debug_assert_eq!(nodes[index].symbol, NIL, "codes are not prefix-free");
            nodes[index].symbol = symbol as i32;
        }
        debug_assert!(nodes.len() <= i16::MAX as usize);

        let mut table = Vec::with_capacity(TABLE_LEN);
        for peek in 0..TABLE_LEN {
            let mut index = 0i32;
            let mut entry = DecodeEntry {
                symbol: -1,
                bits: DECODE_BITS as u8,
                next_node: -1,
            };
            for depth in 0..DECODE_BITS {
                let bit = (peek >> depth) & 1;
                let node = &nodes[index as usize];
                let child = if bit == 0 { node.left } else { node.right };
                if child == NIL {
                    index = NIL;
                    break;
                }
                index = child;
                let child = &nodes[child as usize];
                if child.symbol >= 0 {
                    entry = DecodeEntry {
                        symbol: child.symbol as i16,
                        bits: depth as u8 + 1,
                        next_node: -1,
                    };
                    break;
                }
            }
            if entry.symbol < 0 && index != NIL {
                entry.next_node = index as i16;
            }
            table.push(entry);
        }

        Self { table, nodes }
    }

    /// Decode the next symbol from the reader.
    ///
    /// Fails with [`Error::BadFormat`] if the stream ends inside a code or
    /// reaches a bit pattern no code covers.
    #[inline(always)]
    pub fn decode_symbol<R: BitRead<Error = std::io::Error>>(&self, reader: &mut R) -> Result<u8> {
        let peek = reader.peek_bits(DECODE_BITS).map_err(Error::FileRead)?;
        let entry = self.table[peek as usize];

        if entry.symbol >= 0 {
            if entry.bits as usize > reader.available_bits() {
                return Err(Error::BadFormat("bit stream ended inside a code"));
            }
            reader.skip_bits(entry.bits as usize);
            return Ok(entry.symbol as u8);
        }

        if entry.next_node < 0 {
            return Err(Error::BadFormat("corrupted bit stream"));
        }
        if reader.available_bits() < DECODE_BITS {
            return Err(Error::BadFormat("bit stream ended inside a code"));
        }
        reader.skip_bits(DECODE_BITS);

        // Slow path: the code is longer than the table is wide; walk the
        // tree one bit at a time.
        let mut index = entry.next_node as i32;
        loop {
            let bit = reader.read_bits(1).map_err(|error| {
                if error.kind() == std::io::ErrorKind::UnexpectedEof {
                    Error::BadFormat("bit stream ended inside a code")
                } else {
                    Error::FileRead(error)
                }
            })?;
            let node = &self.nodes[index as usize];
            let child = if bit == 0 { node.left } else { node.right };
            if child == NIL {
                return Err(Error::BadFormat("corrupted bit stream"));
            }
            let node = &self.nodes[child as usize];
            if node.symbol >= 0 {
                return Ok(node.symbol as u8);
            }
            index = child;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codes::huffman::HuffmanTree;
    use crate::impls::{BufBitReader, BufBitWriter};

    fn codes_of(freqs: &[u64; 256]) -> CodeTable {
        CodeTable::from_lengths(&HuffmanTree::from_frequencies(freqs).code_lengths())
    }

    fn roundtrip_symbols(freqs: &[u64; 256], symbols: &[u8]) {
        let codes = codes_of(freqs);
        let decoder = DecoderTable::new(&codes);

        let mut writer = BufBitWriter::new(Vec::new());
        for &symbol in symbols {
            codes.write_symbol(symbol, &mut writer).unwrap();
        }
        let data = writer.into_inner().unwrap();

        let mut reader = BufBitReader::new(&data[..]);
        for &symbol in symbols {
            assert_eq!(decoder.decode_symbol(&mut reader).unwrap(), symbol);
        }
    }

    #[test]
    fn test_fast_path() {
        let mut freqs = [0u64; 256];
        freqs[b'a' as usize] = 5;
        freqs[b'b' as usize] = 2;
        freqs[b'c' as usize] = 1;
        roundtrip_symbols(&freqs, b"abacabaabc");
    }

    #[test]
    fn test_slow_path() {
        // Fibonacci frequencies over 16 symbols produce codes up to 15 bits,
        // beyond the 12-bit table.
        let mut freqs = [0u64; 256];
        let mut a = 1u64;
        let mut b = 1u64;
        for symbol in 0..16 {
            freqs[symbol] = a;
            let next = a + b;
            a = b;
            b = next;
        }
        let lengths = HuffmanTree::from_frequencies(&freqs).code_lengths();
        assert!(lengths.iter().any(|&len| len as usize > DECODE_BITS));
        let symbols: Vec<u8> = (0u8..16).cycle().take(200).collect();
        roundtrip_symbols(&freqs, &symbols);
    }

    #[test]
    fn test_truncated_stream() {
        let mut freqs = [0u64; 256];
        freqs[0] = 1;
        freqs[1] = 1;
        let codes = codes_of(&freqs);
        let decoder = DecoderTable::new(&codes);

        // One byte encodes eight 1-bit codes; the ninth must fail.
        let data = [0b1010_1010u8];
        let mut reader = BufBitReader::new(&data[..]);
        for i in 0..8 {
            assert_eq!(decoder.decode_symbol(&mut reader).unwrap(), i % 2);
        }
        assert!(matches!(
            decoder.decode_symbol(&mut reader),
            Err(Error::BadFormat(_))
        ));
    }

    #[test]
    fn test_dead_end_is_bad_format() {
        // A lone 1-bit code leaves the `1` branch of the root empty.
        let mut freqs = [0u64; 256];
        freqs[b'z' as usize] = 10;
        let codes = codes_of(&freqs);
        let decoder = DecoderTable::new(&codes);

        let data = [0xFFu8, 0xFF];
        let mut reader = BufBitReader::new(&data[..]);
        assert!(matches!(
            decoder.decode_symbol(&mut reader),
            Err(Error::BadFormat(_))
        ));
    }
}
