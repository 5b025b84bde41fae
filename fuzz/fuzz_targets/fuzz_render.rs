#![no_main]

use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use nfse_audit::core::InvoiceSummary;
use nfse_audit::render::{RenderOptions, render_at};

fuzz_target!(|data: &[u8]| {
    if let Ok(invoice) = serde_json::from_slice::<InvoiceSummary>(data) {
        let Some(at) = NaiveDate::from_ymd_opt(2024, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)) else {
            return;
        };
        let _ = render_at(&invoice, at, &RenderOptions::default());
    }
});
