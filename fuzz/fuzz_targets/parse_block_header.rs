#![no_main]

use libfuzzer_sys::fuzz_target;

// Anything that parses must serialize back to the same 80 bytes.
fuzz_target!(|data: &[u8]| {
    if let Ok(header) = i0_consensus::parse_block_header_bytes(data) {
        assert_eq!(&header.to_bytes()[..], &data[..i0_consensus::BLOCK_HEADER_BYTES]);
    }
});
