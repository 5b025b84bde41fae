//! Batch import of NFS-e documents into the audit service.
//!
//! The flow is: build an [`ImportBatchRequest`] (validated locally), [`submit`]
//! it through an [`AuditTransport`], then [`reconcile`] whatever came back into
//! an [`ImportBatchResult`]. [`ImportSession`] wraps that flow with the view
//! state an operator works against: active company, selected files, and
//! suppression of results that arrive after the view moved on.
//!
//! ```
//! use nfse_audit::import::*;
//!
//! let files = vec![DocumentFile::new("nota.txt", b"hello".to_vec())];
//! assert!(ImportBatchRequest::new("42", files).is_err());
//! ```

mod orchestrator;
mod reconcile;
mod report;
mod request;
mod session;
mod transport;

pub use orchestrator::{TransportMode, run_import, submit};
pub use reconcile::{ImportBatchResult, ImportItemOutcome, ItemResult, reconcile, reconcile_for};
pub use request::{DOCUMENT_EXTENSION, DocumentFile, ImportBatchRequest, MAX_FILES_PER_IMPORT};
pub use session::{ImportSession, SubmitOutcome};
pub use transport::{AuditTransport, BatchItem, BatchResponse, TransportOutcome};
