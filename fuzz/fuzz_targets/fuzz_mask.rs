#![no_main]

use libfuzzer_sys::fuzz_target;
use nfse_audit::core::{CNPJ_DIGITS, mask, unmask};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let masked = mask(s);
        assert_eq!(mask(&masked), masked);
        assert!(unmask(&masked).len() <= CNPJ_DIGITS);
    }
});
