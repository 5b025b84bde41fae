//! HTTP access to the audit service (`http` feature).
//!
//! [`FiscalApiClient`] implements [`AuditTransport`](crate::import::AuditTransport)
//! over `reqwest` and adds the read-only calls the import view needs: registry
//! lookup, revenue metrics, the monthly tax estimate and raw document download.
//! Error bodies are returned as [`RemoteFailure`](crate::core::RemoteFailure)
//! and surface as normalized [`ImportError`](crate::core::ImportError)s.

mod client;
mod config;
mod dashboard;

pub use client::FiscalApiClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use dashboard::{RevenueMetrics, RevenueStatus, TaxEstimate};
