#![no_main]

use libfuzzer_sys::fuzz_target;

use tappay_gateway::abi;

// Contract return data from a node is untrusted.
fuzz_target!(|data: &[u8]| {
    if let Ok(units) = abi::decode_balance(data) {
        assert!(data.len() >= 32);
        assert!(data[..16].iter().all(|&b| b == 0));
        let _ = units.to_string();
    }
});
