//! Core NFS-e types, CNPJ formatting, currency formatting and error normalization.
//!
//! Everything here is pure: no I/O, no shared state.

mod cnpj;
mod error;
mod money;
mod normalize;
mod types;

pub use cnpj::*;
pub use error::*;
pub use money::*;
pub use normalize::*;
pub use types::{ActivityCodeEntry, AuditStatus, InvoiceSummary};

pub(crate) use types::lenient;
