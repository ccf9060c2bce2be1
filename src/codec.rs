/*
 * SPDX-FileCopyrightText: 2024 Tommaso Fontana
 * SPDX-FileCopyrightText: 2024 Inria
 * SPDX-FileCopyrightText: 2024 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The file-level entry points.
//!
//! [`encode`] reads the input fully into memory, counts byte frequencies
//! (in parallel for large inputs), builds the deterministic Huffman tree,
//! derives the canonical codes and streams the container out through the
//! bit writer. [`decode`] validates the header, rebuilds the same canonical
//! codes from the persisted lengths and streams the body through the
//! table-accelerated decoder. Both allocate only call-scoped buffers and
//! share no state across calls, so concurrent invocations on disjoint files
//! are safe.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;

use crate::codes::{CodeTable, DecoderTable, HuffmanTree, MAX_CODE_BITS};
use crate::container::{HEADER_LEN, Header};
use crate::error::{Error, Result};
use crate::impls::{BufBitReader, BufBitWriter};
use crate::utils::{CodecStats, average_code_length, shannon_entropy};

/// Inputs below this size are counted on the calling thread.
const PARALLEL_THRESHOLD: usize = 1 << 20;

/// Upper bound on the number of counting threads.
const MAX_COUNT_THREADS: usize = 64;

/// Capacity of the decoder's output staging buffer.
const OUT_STAGING: usize = 64 * 1024;

/// Compress `input` into a `HUF2` container at `output`.
///
/// The output file is created or truncated; it must be considered
/// unreliable if an error is returned.
pub fn encode(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
    encode_with_stats(input, output).map(|_| ())
}

/// Like [`encode`], additionally returning the run's [`CodecStats`].
pub fn encode_with_stats(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<CodecStats> {
    let start = Instant::now();
    let input = input.as_ref();
    let output = output.as_ref();

    let mut file = File::open(input).map_err(|source| Error::FileOpen {
        path: input.to_path_buf(),
        source,
    })?;
    let size = file.metadata().map_err(Error::FileRead)?.len();
    let Ok(capacity) = usize::try_from(size) else {
        return Err(Error::InputTooLarge { size });
    };
    let mut data = Vec::new();
    data.try_reserve_exact(capacity)
        .map_err(|_| Error::Memory { bytes: size })?;
    file.read_to_end(&mut data).map_err(Error::FileRead)?;
    drop(file);

    let freqs = count_frequencies(&data);
    let tree = HuffmanTree::from_frequencies(&freqs);
    let lengths = tree.code_lengths();
    if lengths.iter().any(|&len| len as usize > MAX_CODE_BITS) {
        return Err(Error::Unknown("tree produced a code longer than 64 bits"));
    }
    let codes = CodeTable::from_lengths(&lengths);

    let header = Header {
        original_size: data.len() as u64,
        lengths,
    };
    let mut out = File::create(output).map_err(|source| Error::FileOpen {
        path: output.to_path_buf(),
        source,
    })?;
    header.write_to(&mut out)?;

    let mut writer = BufBitWriter::new(out);
    for &byte in &data {
        codes
            .write_symbol(byte, &mut writer)
            .map_err(Error::FileWrite)?;
    }
    writer.into_inner().map_err(Error::FileWrite)?;

    let body_bits: u64 = freqs
        .iter()
        .zip(&lengths)
        .map(|(&freq, &len)| freq * len as u64)
        .sum();
    let stats = CodecStats {
        original_size: header.original_size,
        compressed_size: HEADER_LEN as u64 + body_bits.div_ceil(8),
        elapsed: start.elapsed(),
        entropy: shannon_entropy(&freqs),
        avg_code_len: average_code_length(&freqs, &lengths),
        codes,
    };
    log::debug!(
        "encoded {} as {}: {} -> {} bytes in {:.2?}",
        input.display(),
        output.display(),
        stats.original_size,
        stats.compressed_size,
        stats.elapsed
    );
    Ok(stats)
}

/// Decompress the container at `input` into `output`.
///
/// Both `HUF2` and legacy `HUF1` containers are accepted. The output file
/// is created or truncated; it must be considered unreliable if an error is
/// returned.
pub fn decode(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<()> {
    decode_with_stats(input, output).map(|_| ())
}

/// Like [`decode`], additionally returning the run's [`CodecStats`].
pub fn decode_with_stats(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<CodecStats> {
    let start = Instant::now();
    let input = input.as_ref();
    let output = output.as_ref();

    let mut file = File::open(input).map_err(|source| Error::FileOpen {
        path: input.to_path_buf(),
        source,
    })?;
    let compressed_size = file.metadata().map_err(Error::FileRead)?.len();
    let header = Header::read_from(&mut file)?;
    let codes = CodeTable::from_lengths(&header.lengths);

    let mut out = File::create(output).map_err(|source| Error::FileOpen {
        path: output.to_path_buf(),
        source,
    })?;

    let mut freqs = [0u64; 256];
    if header.original_size > 0 {
        if let Some(symbol) = header.single_symbol() {
            // The whole body is one repeated code; skip the bit stream.
            emit_run(&mut out, symbol, header.original_size)?;
            freqs[symbol as usize] = header.original_size;
        } else {
            let decoder = DecoderTable::new(&codes);
            let mut reader = BufBitReader::new(file);
            let mut staging = Vec::with_capacity(OUT_STAGING);
            let mut produced: u64 = 0;
            while produced < header.original_size {
                let symbol = decoder.decode_symbol(&mut reader)?;
                staging.push(symbol);
                freqs[symbol as usize] += 1;
                produced += 1;
                if staging.len() == OUT_STAGING {
                    out.write_all(&staging).map_err(Error::FileWrite)?;
                    staging.clear();
                }
            }
            out.write_all(&staging).map_err(Error::FileWrite)?;
        }
    }

    let stats = CodecStats {
        original_size: header.original_size,
        compressed_size,
        elapsed: start.elapsed(),
        entropy: shannon_entropy(&freqs),
        avg_code_len: average_code_length(&freqs, &header.lengths),
        codes,
    };
    log::debug!(
        "decoded {} as {}: {} -> {} bytes in {:.2?}",
        input.display(),
        output.display(),
        stats.compressed_size,
        stats.original_size,
        stats.elapsed
    );
    Ok(stats)
}

/// Write `count` copies of `symbol`.
fn emit_run(out: &mut File, symbol: u8, count: u64) -> Result<()> {
    let chunk = vec![symbol; count.min(OUT_STAGING as u64) as usize];
    let mut remaining = count;
    while remaining > 0 {
        let n = remaining.min(chunk.len() as u64) as usize;
        out.write_all(&chunk[..n]).map_err(Error::FileWrite)?;
        remaining -= n as u64;
    }
    Ok(())
}

/// Count the occurrences of each byte value.
///
/// Inputs of at least 1 MiB are split into disjoint chunks counted by scoped
/// threads; the per-chunk histograms are summed by the caller. The reduction
/// is associative and commutative, so the result does not depend on the
/// number of threads.
pub fn count_frequencies(data: &[u8]) -> [u64; 256] {
    let threads = if data.len() < PARALLEL_THRESHOLD {
        1
    } else {
        std::thread::available_parallelism()
            .map_or(1, |n| n.get())
            .min(MAX_COUNT_THREADS)
    };
    count_frequencies_in(data, threads)
}

fn count_frequencies_in(data: &[u8], threads: usize) -> [u64; 256] {
    if threads <= 1 || data.len() < threads {
        return histogram(data);
    }
    let chunk_len = data.len().div_ceil(threads);
    let mut freqs = [0u64; 256];
    std::thread::scope(|scope| {
        let handles: Vec<_> = data
            .chunks(chunk_len)
            .map(|chunk| scope.spawn(move || histogram(chunk)))
            .collect();
        for handle in handles {
            let local = handle.join().expect("histogram worker panicked");
            for (freq, count) in freqs.iter_mut().zip(local.iter()) {
                *freq += count;
            }
        }
    });
    freqs
}

fn histogram(data: &[u8]) -> [u64; 256] {
    let mut freqs = [0u64; 256];
    for &byte in data {
        freqs[byte as usize] += 1;
    }
    freqs
}
