#![no_main]
use libfuzzer_sys::fuzz_target;
use zenmr::*;

fuzz_target!(|data: &[u8]| {
    // If we can decode it, re-encoding and decoding again must produce identical pixels
    let limits = Limits {
        max_width: Some(u64::from(mr::MAX_WIDTH)),
        max_height: Some(u64::from(mr::MAX_HEIGHT)),
        ..Default::default()
    };
    let Ok(decoded) = DecodeRequest::new(data)
        .with_limits(&limits)
        .decode(enough::Unstoppable)
    else {
        return;
    };

    // A file may repeat palette colors; re-encoding merges them, so compare pixels only
    let reencoded = encode(
        decoded.pixels(),
        decoded.width,
        decoded.height,
        decoded.layout,
        enough::Unstoppable,
    )
    .expect("decoded image must re-encode");

    let Ok(decoded2) = DecodeRequest::new(reencoded.data())
        .with_permissiveness(Permissiveness::Strict)
        .decode(enough::Unstoppable)
    else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.pixels(), decoded2.pixels(), "roundtrip pixel mismatch");
    assert_eq!(decoded.width, decoded2.width);
    assert_eq!(decoded.height, decoded2.height);
});
