//! # nfse-audit
//!
//! Batch import of Brazilian service invoices (NFS-e) into an external audit
//! service, reconciliation of the per-document outcomes, and printable PDF
//! rendering of imported invoices.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use nfse_audit::core::*;
//! use nfse_audit::import::*;
//!
//! // Local checks run before anything touches the network.
//! let files = vec![
//!     DocumentFile::new("nota-1.xml", b"<CompNfse/>".to_vec()),
//!     DocumentFile::new("nota-2.XML", b"<CompNfse/>".to_vec()),
//! ];
//! let request = ImportBatchRequest::new("empresa-1", files).unwrap();
//! assert_eq!(TransportMode::for_file_count(request.files().len()), TransportMode::Batch);
//!
//! // The batch endpoint answers with per-file outcomes.
//! let response: BatchResponse = serde_json::from_str(r#"{
//!     "total": 2, "succeeded": 1, "failed": 1,
//!     "results": [
//!         {"fileName": "nota-1.xml", "succeeded": true,
//!          "invoice": {"numero_nota": "77", "valor_total": 1234.5, "status_auditoria": "APROVADA"}},
//!         {"fileName": "nota-2.XML", "succeeded": false, "error": "Layout de XML desconhecido"}
//!     ]
//! }"#).unwrap();
//!
//! let result = reconcile(TransportOutcome::Batch(response), 2).unwrap();
//! assert_eq!(result.succeeded_count() + result.failed_count(), result.total_files());
//! assert!(result.report().contains("[OK] nota-1.xml: NFS-e 77, APROVADA, R$ 1.234,50"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Invoice types, CNPJ masking, BRL formatting, error normalization |
//! | `registry` (default) | Registry lookup snapshot, activity auto-population, registration draft |
//! | `import` (default) | Request validation, orchestration, reconciliation, import session |
//! | `render` (default) | PDF rendering of invoices |
//! | `http` | `reqwest` client for the audit service |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "registry")]
pub mod registry;

#[cfg(feature = "import")]
pub mod import;

#[cfg(feature = "render")]
pub mod render;

#[cfg(feature = "http")]
pub mod http;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
