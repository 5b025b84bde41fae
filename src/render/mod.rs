//! Printable PDF rendering of imported invoices.
//!
//! Layout is fixed and top-to-bottom: header banner, provider and recipient
//! tables, service values, net-value highlight, additional information,
//! verification key (when present) and a footer. Long content flows onto
//! further A4 pages.
//!
//! ```
//! use chrono::NaiveDate;
//! use nfse_audit::core::InvoiceSummary;
//! use nfse_audit::render::{RenderOptions, render_at};
//!
//! let invoice = InvoiceSummary {
//!     number: Some("1234".into()),
//!     issue_date: Some("2024-03-05".into()),
//!     ..Default::default()
//! };
//! let at = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let doc = render_at(&invoice, at, &RenderOptions::default()).unwrap();
//! assert!(doc.bytes.starts_with(b"%PDF-1.7"));
//! assert_eq!(doc.file_name, "NFSe_1234_20240305.pdf");
//! ```

mod document;
mod layout;

pub use document::{
    DEFAULT_DISCLAIMER, DOCUMENT_TITLE, RenderOptions, RenderedDocument, render, render_at,
    suggested_file_name,
};
