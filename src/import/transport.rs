use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::core::{InvoiceSummary, RemoteFailure, lenient};

use super::request::DocumentFile;

/// The two import contracts exposed by the audit service.
///
/// `import_single` returns the stored invoice directly; a rejected file comes
/// back as a [`RemoteFailure`], never as a structured outcome. `import_batch`
/// always answers with per-file outcomes.
pub trait AuditTransport: Send + Sync {
    /// `POST /invoices/import/{company_id}` with one file.
    fn import_single(
        &self,
        company_id: &str,
        file: &DocumentFile,
    ) -> impl Future<Output = Result<InvoiceSummary, RemoteFailure>> + Send;

    /// `POST /invoices/import-batch/{company_id}` with several files.
    fn import_batch(
        &self,
        company_id: &str,
        files: &[DocumentFile],
    ) -> impl Future<Output = Result<BatchResponse, RemoteFailure>> + Send;
}

/// What one transport round-trip produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportOutcome {
    /// Single-file endpoint: one stored invoice.
    Single {
        /// Name of the file that was sent.
        file_name: String,
        invoice: InvoiceSummary,
    },
    /// Batch endpoint: aggregate counts plus per-file outcomes.
    Batch(BatchResponse),
}

/// Wire shape of the batch endpoint's answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    #[serde(alias = "total_arquivos")]
    pub total: usize,
    #[serde(alias = "sucesso")]
    pub succeeded: usize,
    #[serde(alias = "falhas")]
    pub failed: usize,
    #[serde(alias = "resultados", default, deserialize_with = "lenient::null_as_default")]
    pub results: Vec<BatchItem>,
}

/// Wire shape of one per-file outcome inside a [`BatchResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    #[serde(rename = "fileName", alias = "nome_arquivo", default)]
    pub file_name: String,
    #[serde(alias = "sucesso")]
    pub succeeded: bool,
    #[serde(alias = "nota", default)]
    pub invoice: Option<InvoiceSummary>,
    #[serde(alias = "erro", default, deserialize_with = "lenient::opt_string")]
    pub error: Option<String>,
}
