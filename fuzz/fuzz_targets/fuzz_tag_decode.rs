#![no_main]

use libfuzzer_sys::fuzz_target;

use tappay_protocol::{codec, ndef};

// Arbitrary tag contents must decode to an outcome, never panic.
fuzz_target!(|data: &[u8]| {
    let outcome = codec::decode(data);

    // A recognized request always re-encodes.
    if let Some(request) = outcome.request() {
        let _ = codec::encode_request(request);
    }

    let _ = ndef::parse_message(data);

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = codec::decode_text(text);
    }
});
