#![no_main]

use libfuzzer_sys::fuzz_target;
use nfse_audit::import::{BatchResponse, TransportOutcome, reconcile};

fuzz_target!(|data: &[u8]| {
    if let Ok(response) = serde_json::from_slice::<BatchResponse>(data) {
        let total = response.total;
        // Inconsistent responses must come back as errors, not panics.
        if let Ok(result) = reconcile(TransportOutcome::Batch(response), total) {
            assert_eq!(result.succeeded_count() + result.failed_count(), result.total_files());
            assert_eq!(result.items().len(), result.total_files());
        }
    }
});
