#![no_main]

use libfuzzer_sys::fuzz_target;
use nfse_audit::core::{ErrorPayload, RemoteFailure, normalize};

fuzz_target!(|data: &[u8]| {
    if let Ok(body) = std::str::from_utf8(data) {
        // Every body yields some message; a panic is a bug.
        let _ = normalize(&RemoteFailure::response(400, body));
        let _ = ErrorPayload::parse(body).message();
    }
});
