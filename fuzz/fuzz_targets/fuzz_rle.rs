#![no_main]
use libfuzzer_sys::fuzz_target;
use zenmr::mr::rle;
use zenmr::Permissiveness;

fuzz_target!(|indices: &[u8]| {
    // Any byte sequence, including values the format never uses as indices
    let packed = rle::compress(indices);
    let unpacked = rle::decompress(
        &packed,
        indices.len(),
        Permissiveness::Strict,
        &enough::Unstoppable,
    )
    .expect("compressed stream must decode");
    assert_eq!(unpacked, indices);
});
