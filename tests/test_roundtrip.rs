/*
 * SPDX-FileCopyrightText: 2024 Tommaso Fontana
 * SPDX-FileCopyrightText: 2024 Inria
 * SPDX-FileCopyrightText: 2024 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::fs;
use std::path::PathBuf;

use huf2::container::HEADER_LEN;
use huf2::{decode, encode, encode_with_stats};
use rand::rngs::SmallRng;
use rand::{RngExt, SeedableRng};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("huf2_{}_{}", std::process::id(), name))
}

/// Encode and decode `data`, check the restored bytes, return the container.
fn roundtrip(data: &[u8], name: &str) -> Vec<u8> {
    let input = temp_path(&format!("{name}_in"));
    let packed = temp_path(&format!("{name}_huf"));
    let restored = temp_path(&format!("{name}_out"));

    fs::write(&input, data).unwrap();
    encode(&input, &packed).unwrap();
    decode(&packed, &restored).unwrap();
    assert_eq!(fs::read(&restored).unwrap(), data, "{name}: bad round-trip");

    let container = fs::read(&packed).unwrap();
    for path in [input, packed, restored] {
        let _ = fs::remove_file(path);
    }
    container
}

#[test]
fn test_random_roundtrip() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = SmallRng::seed_from_u64(0);
    for size in [0usize, 1, 2, 3, 100, 4096, 65_536, 1 << 20] {
        let data: Vec<u8> = (0..size).map(|_| rng.random()).collect();
        roundtrip(&data, &format!("rand{size}"));
    }
}

#[test]
fn test_skewed_roundtrip() {
    // A geometric-ish distribution exercises codes of many lengths.
    let mut rng = SmallRng::seed_from_u64(1);
    let data: Vec<u8> = (0..200_000)
        .map(|_| {
            let x: f64 = rng.random();
            (x * x * x * 255.0) as u8
        })
        .collect();
    roundtrip(&data, "skewed");
}

#[test]
fn test_text_roundtrip() {
    let data = b"the quick brown fox jumps over the lazy dog ".repeat(1000);
    roundtrip(&data, "text");
}

#[test]
fn test_determinism() {
    let mut rng = SmallRng::seed_from_u64(2);
    let data: Vec<u8> = (0..300_000).map(|_| rng.random_range(0..32u8)).collect();
    let input = temp_path("det_in");
    let first = temp_path("det_a");
    let second = temp_path("det_b");

    fs::write(&input, &data).unwrap();
    encode(&input, &first).unwrap();
    encode(&input, &second).unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

    for path in [input, first, second] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn test_body_length_matches_code_lengths() {
    let mut rng = SmallRng::seed_from_u64(3);
    let data: Vec<u8> = (0..10_000).map(|_| rng.random_range(0..100u8)).collect();
    let container = roundtrip(&data, "bodylen");

    let lengths = &container[12..268];
    let mut freqs = [0u64; 256];
    for &byte in &data {
        freqs[byte as usize] += 1;
    }
    let body_bits: u64 = freqs
        .iter()
        .zip(lengths)
        .map(|(&freq, &len)| freq * len as u64)
        .sum();
    assert_eq!(
        container.len(),
        HEADER_LEN + body_bits.div_ceil(8) as usize
    );
}

#[test]
fn test_stats() {
    let mut rng = SmallRng::seed_from_u64(4);
    let data: Vec<u8> = (0..50_000).map(|_| rng.random_range(0..16u8)).collect();
    let input = temp_path("stats_in");
    let packed = temp_path("stats_huf");

    fs::write(&input, &data).unwrap();
    let stats = encode_with_stats(&input, &packed).unwrap();
    assert_eq!(stats.original_size, data.len() as u64);
    assert_eq!(
        stats.compressed_size,
        fs::metadata(&packed).unwrap().len(),
        "declared compressed size must match the container"
    );
    // The entropy lower-bounds the average code length.
    assert!(stats.avg_code_len >= stats.entropy - 1e-9);
    assert!(stats.entropy > 0.0);
    // 16 equiprobable-ish symbols should compress roughly 2x.
    assert!(stats.compression_ratio() < 0.7);

    for path in [input, packed] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn test_missing_input() {
    let missing = temp_path("definitely_missing");
    let out = temp_path("missing_out");
    assert!(matches!(
        encode(&missing, &out),
        Err(huf2::Error::FileOpen { .. })
    ));
    assert!(matches!(
        decode(&missing, &out),
        Err(huf2::Error::FileOpen { .. })
    ));
}
