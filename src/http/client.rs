use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::core::{ImportError, InvoiceSummary, RemoteFailure, TaxIdentifier};
use crate::import::{AuditTransport, BatchResponse, DocumentFile};
use crate::registry::RegistrySnapshot;

use super::config::ClientConfig;
use super::dashboard::{RevenueMetrics, TaxEstimate};

const DOCUMENT_MIME: &str = "application/xml";

/// HTTP client for the audit service and the registry lookup it fronts.
///
/// Implements [`AuditTransport`], so it can back an
/// [`ImportSession`](crate::import::ImportSession) directly.
#[derive(Debug, Clone)]
pub struct FiscalApiClient {
    http: Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl FiscalApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ImportError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ImportError::Transport {
            status: None,
            message: format!("invalid base URL '{}': {e}", config.base_url),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ImportError::Transport {
                status: None,
                message: format!("base URL '{}' cannot hold paths", config.base_url),
            });
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ImportError::Transport {
                status: None,
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url,
            bearer_token: config.bearer_token,
        })
    }

    /// Build from [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self, ImportError> {
        Self::new(ClientConfig::from_env())
    }

    /// Look up a CNPJ in the taxpayer registry.
    ///
    /// The identifier is checked locally first; a malformed one never leaves
    /// the process.
    pub async fn lookup_registry(&self, cnpj_input: &str) -> Result<RegistrySnapshot, ImportError> {
        let cnpj = TaxIdentifier::parse(cnpj_input)?;
        let url = self.endpoint(&["registry", cnpj.as_str()])?;
        Ok(self.fetch_json(self.http.get(url)).await?)
    }

    pub async fn revenue_metrics(&self, company_id: &str) -> Result<RevenueMetrics, ImportError> {
        let url = self.endpoint(&["metrics", company_id])?;
        Ok(self.fetch_json(self.http.get(url)).await?)
    }

    pub async fn tax_estimate(&self, company_id: &str) -> Result<TaxEstimate, ImportError> {
        let url = self.endpoint(&["invoices", "estimate", company_id])?;
        Ok(self.fetch_json(self.http.get(url)).await?)
    }

    /// Original source document of an imported invoice, unmodified.
    pub async fn raw_document(&self, invoice_id: &str) -> Result<String, ImportError> {
        let url = self.endpoint(&["invoices", invoice_id, "raw"])?;
        Ok(self.fetch_text(self.http.get(url)).await?)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RemoteFailure> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RemoteFailure::transport(format!("cannot extend URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_text(&self, request: RequestBuilder) -> Result<String, RemoteFailure> {
        let request = match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let resp = request
            .send()
            .await
            .map_err(|e| RemoteFailure::transport(e.to_string()))?;

        let status = resp.status();
        let url = resp.url().path().to_string();
        let body = resp
            .text()
            .await
            .map_err(|e| RemoteFailure::transport(e.to_string()))?;

        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "non-success response");
            return Err(RemoteFailure::response(status.as_u16(), body));
        }
        debug!(%url, status = status.as_u16(), bytes = body.len(), "response received");
        Ok(body)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RemoteFailure> {
        let body = self.fetch_text(request).await?;
        serde_json::from_str(&body).map_err(|e| RemoteFailure::Decode {
            message: format!("unexpected response body: {e}"),
        })
    }
}

fn document_part(file: &DocumentFile) -> Result<Part, RemoteFailure> {
    Part::bytes(file.content.clone())
        .file_name(file.file_name.clone())
        .mime_str(DOCUMENT_MIME)
        .map_err(|e| RemoteFailure::transport(e.to_string()))
}

impl AuditTransport for FiscalApiClient {
    async fn import_single(
        &self,
        company_id: &str,
        file: &DocumentFile,
    ) -> Result<InvoiceSummary, RemoteFailure> {
        let url = self.endpoint(&["invoices", "import", company_id])?;
        let form = Form::new().part("file", document_part(file)?);
        self.fetch_json(self.http.post(url).multipart(form)).await
    }

    async fn import_batch(
        &self,
        company_id: &str,
        files: &[DocumentFile],
    ) -> Result<BatchResponse, RemoteFailure> {
        let url = self.endpoint(&["invoices", "import-batch", company_id])?;
        let form = files
            .iter()
            .try_fold(Form::new(), |form, file| {
                Ok::<_, RemoteFailure>(form.part("files", document_part(file)?))
            })?;
        self.fetch_json(self.http.post(url).multipart(form)).await
    }
}
