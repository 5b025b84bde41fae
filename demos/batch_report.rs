use nfse_audit::core::*;
use nfse_audit::import::*;
use rust_decimal_macros::dec;

/// Stand-in for the audit service: rejects files whose name starts with `bad`.
struct LocalAuditor;

impl LocalAuditor {
    fn audit(file: &DocumentFile) -> Result<InvoiceSummary, String> {
        if file.file_name.starts_with("bad") {
            return Err("Layout de XML desconhecido".into());
        }
        Ok(InvoiceSummary {
            number: Some(file.file_name.trim_end_matches(".xml").into()),
            gross_value: Some(dec!(2500)),
            audit_status: Some(AuditStatus::Approved),
            ..Default::default()
        })
    }
}

impl AuditTransport for LocalAuditor {
    async fn import_single(
        &self,
        _company_id: &str,
        file: &DocumentFile,
    ) -> Result<InvoiceSummary, RemoteFailure> {
        Self::audit(file).map_err(|detail| {
            RemoteFailure::response(400, serde_json::json!({ "detail": detail }).to_string())
        })
    }

    async fn import_batch(
        &self,
        _company_id: &str,
        files: &[DocumentFile],
    ) -> Result<BatchResponse, RemoteFailure> {
        let results: Vec<BatchItem> = files
            .iter()
            .map(|file| match Self::audit(file) {
                Ok(invoice) => BatchItem {
                    file_name: file.file_name.clone(),
                    succeeded: true,
                    invoice: Some(invoice),
                    error: None,
                },
                Err(error) => BatchItem {
                    file_name: file.file_name.clone(),
                    succeeded: false,
                    invoice: None,
                    error: Some(error),
                },
            })
            .collect();
        let succeeded = results.iter().filter(|r| r.succeeded).count();
        Ok(BatchResponse {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        })
    }
}

#[tokio::main]
async fn main() {
    let session = ImportSession::new(LocalAuditor);
    session.activate_company("empresa-1");

    // ── 1. Local validation: wrong extension never reaches the service ──
    session.select_files(vec![DocumentFile::new("nota.pdf", b"%PDF".to_vec())]);
    match session.submit().await {
        Err(e) => println!("Rejected locally: {e}"),
        Ok(outcome) => println!("Unexpected: {outcome:?}"),
    }

    // ── 2. Batch with one rejected file ──────────────────────────────────
    session.select_files(vec![
        DocumentFile::new("1001.xml", b"<CompNfse/>".to_vec()),
        DocumentFile::new("bad-layout.xml", b"<Nfse/>".to_vec()),
        DocumentFile::new("1003.xml", b"<CompNfse/>".to_vec()),
    ]);
    match session.submit().await {
        Ok(SubmitOutcome::Applied(result)) => {
            println!("\n{}", result.report());
            println!(
                "\n{}",
                serde_json::to_string_pretty(result.as_ref()).expect("result serializes")
            );
        }
        Ok(SubmitOutcome::Discarded) => println!("Result discarded"),
        Err(e) => println!("Import failed: {e}"),
    }
    println!("\nSelection after import: {:?}", session.selected_file_names());
}
