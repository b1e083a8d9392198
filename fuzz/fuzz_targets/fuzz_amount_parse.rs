#![no_main]

use libfuzzer_sys::fuzz_target;

use tappay_types::{from_base_units, to_base_units};

// Amount parsing never panics, and whatever parses renders back to a
// string that parses to the same value.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(units) = to_base_units(text) {
        let rendered = from_base_units(units);
        assert_eq!(to_base_units(&rendered).ok(), Some(units));
    }
});
