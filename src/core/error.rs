use thiserror::Error;

/// Errors that can occur anywhere in the import, reconciliation or rendering pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ImportError {
    /// Input rejected locally; no network call was made.
    #[error("validation failed: {0}")]
    LocalValidation(LocalValidationError),

    /// Network or HTTP failure, already normalized to a display message.
    #[error("{message}")]
    Transport {
        /// HTTP status, when the service answered at all.
        status: Option<u16>,
        /// Human-readable message produced by [`normalize`](crate::core::normalize).
        message: String,
    },

    /// The audit service answered with a shape that violates the result invariants.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The PDF layout engine could not produce a document.
    #[error("render fault: {0}")]
    RenderFault(String),

    /// Another import for the same company has not settled yet.
    #[error("an import is already in progress for company {0}")]
    ImportAlreadyInProgress(String),

    /// A submission was attempted with no company selected.
    #[error("no company selected")]
    NoActiveCompany,
}

impl ImportError {
    /// Whether this error signals a broken contract with the audit service
    /// rather than a user-facing condition.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

impl From<LocalValidationError> for ImportError {
    fn from(err: LocalValidationError) -> Self {
        Self::LocalValidation(err)
    }
}

/// What kind of local check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// No files selected.
    NoFiles,
    /// More files than one batch accepts.
    TooManyFiles,
    /// A file without the fiscal-document extension.
    InvalidExtension,
    /// A CNPJ that does not have exactly 14 digits.
    InvalidIdentifier,
    /// A required form field left empty.
    MissingField,
}

/// A local validation failure with the offending field and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalValidationError {
    /// Which check failed.
    pub kind: ValidationKind,
    /// Dot-separated path to the invalid input (e.g. "files[3]").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for LocalValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for LocalValidationError {}

impl LocalValidationError {
    pub fn new(kind: ValidationKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an identifier with the wrong digit count.
    pub fn invalid_identifier(field: impl Into<String>, digits: usize) -> Self {
        Self::new(
            ValidationKind::InvalidIdentifier,
            field,
            format!("CNPJ must have exactly 14 digits, got {digits}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_includes_field() {
        let err = LocalValidationError::new(ValidationKind::NoFiles, "files", "select at least one file");
        assert_eq!(err.to_string(), "files: select at least one file");
    }

    #[test]
    fn import_error_wraps_validation() {
        let err: ImportError = LocalValidationError::invalid_identifier("cnpj", 9).into();
        assert!(err.to_string().starts_with("validation failed: cnpj:"));
        assert!(err.to_string().contains("got 9"));
    }

    #[test]
    fn transport_error_displays_message_only() {
        let err = ImportError::Transport {
            status: Some(400),
            message: "Empresa não encontrada".into(),
        };
        assert_eq!(err.to_string(), "Empresa não encontrada");
        assert!(!err.is_defect());
    }

    #[test]
    fn malformed_response_is_defect() {
        assert!(ImportError::MalformedResponse("total mismatch".into()).is_defect());
    }
}
