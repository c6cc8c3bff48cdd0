#![no_main]
use libfuzzer_sys::fuzz_target;
use zenmr::{DecodeRequest, Limits, Permissiveness};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 20),
        ..Default::default()
    };
    // Every strictness level must reject or decode, never panic
    for level in [
        Permissiveness::Strict,
        Permissiveness::Standard,
        Permissiveness::Permissive,
    ] {
        let _ = DecodeRequest::new(data)
            .with_limits(&limits)
            .with_permissiveness(level)
            .decode(enough::Unstoppable);
    }
    // Default settings, as the top-level decode() uses them
    let _ = zenmr::decode(data, enough::Unstoppable);
    let _ = zenmr::probe(data);
});
