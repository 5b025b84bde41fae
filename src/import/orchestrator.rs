use tracing::{debug, warn};

use crate::core::{ImportError, RemoteFailure};

use super::reconcile::{ImportBatchResult, reconcile_for};
use super::request::ImportBatchRequest;
use super::transport::{AuditTransport, TransportOutcome};

/// Which audit-service endpoint a submission goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Single,
    Batch,
}

impl TransportMode {
    /// Exactly one file uses the single-item endpoint; anything else is a batch.
    pub fn for_file_count(count: usize) -> Self {
        if count == 1 { Self::Single } else { Self::Batch }
    }
}

/// Send a validated request to the audit service.
///
/// The request was already checked locally when it was built, so this is the
/// only place a network call happens.
pub async fn submit<T: AuditTransport>(
    transport: &T,
    request: &ImportBatchRequest,
) -> Result<TransportOutcome, ImportError> {
    let company_id = request.company_id();
    let files = request.files();
    match TransportMode::for_file_count(files.len()) {
        TransportMode::Single => {
            let file = &files[0];
            debug!(company_id, file = %file.file_name, "submitting single document");
            let invoice = transport
                .import_single(company_id, file)
                .await
                .map_err(transport_error)?;
            Ok(TransportOutcome::Single {
                file_name: file.file_name.clone(),
                invoice,
            })
        }
        TransportMode::Batch => {
            debug!(company_id, count = files.len(), "submitting document batch");
            let response = transport
                .import_batch(company_id, files)
                .await
                .map_err(transport_error)?;
            Ok(TransportOutcome::Batch(response))
        }
    }
}

/// [`submit`] followed by [`reconcile_for`] against the submitted file names.
pub async fn run_import<T: AuditTransport>(
    transport: &T,
    request: &ImportBatchRequest,
) -> Result<ImportBatchResult, ImportError> {
    let outcome = submit(transport, request).await?;
    let names: Vec<&str> = request.files().iter().map(|f| f.file_name.as_str()).collect();
    reconcile_for(outcome, &names)
}

fn transport_error(failure: RemoteFailure) -> ImportError {
    let err = ImportError::from(failure);
    if let ImportError::Transport { status, message } = &err {
        warn!(?status, %message, "audit service request failed");
    }
    err
}
