#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn mr_file(width: u32, height: u32, palette: &[[u8; 3]], payload: &[u8]) -> Vec<u8> {
    let data_offset = 30 + 4 * palette.len() as u32;
    let file_size = data_offset + payload.len() as u32;
    let mut out = Vec::new();
    out.extend_from_slice(b"MR");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&data_offset.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(palette.len() as u32).to_le_bytes());
    for &[r, g, b] in palette {
        out.extend_from_slice(&[b, g, r, 0]);
    }
    out.extend_from_slice(payload);
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // Red then blue, two literals
    let two = mr_file(2, 1, &[[255, 0, 0], [0, 0, 255]], &[0x00, 0x01]);
    fs::write(format!("{dir}/two_pixels.mr"), &two).unwrap();

    // One of each run token: 0x82 short-2, 0x85, 0x81 extended, 0x82 long
    let runs = mr_file(
        320,
        2,
        &[[1, 2, 3], [4, 5, 6]],
        &[0x82, 0x00, 0x85, 0x01, 0x81, 0xc8, 0x00, 0x82, 0x80 | 0x74, 0x01],
    );
    fs::write(format!("{dir}/all_tokens.mr"), &runs).unwrap();

    // Full 128-color palette, one pixel each
    let palette: Vec<[u8; 3]> = (0..128u8).map(|i| [i, i ^ 0x55, 255 - i]).collect();
    let indices: Vec<u8> = (0..128u8).collect();
    fs::write(format!("{dir}/palette_128.mr"), mr_file(128, 1, &palette, &indices)).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_magic.bin"), b"MR").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    fs::write(format!("{dir}/truncated_payload.mr"), &two[..two.len() - 1]).unwrap();
    fs::write(format!("{dir}/dangling_escape.mr"), mr_file(4, 1, &[[9, 9, 9]], &[0x81])).unwrap();

    println!("Generated seed corpus in {dir}/");
}
