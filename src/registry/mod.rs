//! Taxpayer registry lookup results and registration-form population.
//!
//! A lookup against the registry returns a [`RegistrySnapshot`]; the
//! auto-populator turns it into the activity rows the operator then maps to
//! municipal service codes.
//!
//! # Example
//!
//! ```
//! use nfse_audit::registry::*;
//!
//! let snapshot: RegistrySnapshot = serde_json::from_str(
//!     r#"{"cnae_principal": {"codigo": 6201500, "descricao": "Software"}}"#,
//! ).unwrap();
//! let entries = populate_from_lookup(&snapshot);
//! assert_eq!(entries[0].code, "6201500");
//! assert_eq!(entries[0].service_code, "");
//! ```

mod draft;
mod populate;
mod snapshot;

pub use draft::{CompanyRegistration, RegistrationDraft, TaxRegime};
pub use populate::{MAX_SECONDARY_ACTIVITIES, populate_from_lookup};
pub use snapshot::{Partner, RegistryActivity, RegistrySnapshot};
