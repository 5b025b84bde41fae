//! Turn failure payloads from remote calls into one display message.
//!
//! The audit service answers errors in several shapes: FastAPI-style
//! `{"detail": ...}` bodies (string, validation list, or arbitrary object),
//! bare JSON strings, plain text, or unrelated JSON. [`ErrorPayload`] is the
//! closed set of shapes we recognize; everything else falls through to a
//! serialized catch-all.

use serde::Deserialize;
use serde_json::Value;

use super::error::ImportError;
use super::types::lenient::scalar_to_string;

/// A failed remote call, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RemoteFailure {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    Transport {
        /// Message from the HTTP client.
        message: String,
    },
    /// The service answered with a non-success status.
    Response {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// The service answered with success but the body could not be decoded.
    Decode {
        /// Decoder message.
        message: String,
    },
}

impl RemoteFailure {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn response(status: u16, body: impl Into<String>) -> Self {
        Self::Response {
            status,
            body: body.into(),
        }
    }

    /// HTTP status, when there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// One entry of a validation-error list (`{"loc": [...], "msg": "..."}`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationIssue {
    /// Path to the offending input; elements may be strings or indices.
    #[serde(default)]
    pub loc: Option<Vec<Value>>,
    /// Message for this entry.
    pub msg: String,
}

impl ValidationIssue {
    fn display(&self) -> String {
        let path: Vec<String> = self
            .loc
            .iter()
            .flatten()
            .filter_map(scalar_to_string)
            .collect();
        if path.is_empty() {
            self.msg.clone()
        } else {
            format!("{}: {}", path.join("."), self.msg)
        }
    }
}

/// Recognized error body shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// Body is a bare string (JSON string or non-JSON text).
    Text(String),
    /// `detail` is a list of validation issues.
    DetailList(Vec<ValidationIssue>),
    /// `detail` is a string.
    DetailText(String),
    /// `detail` is some other JSON value.
    DetailOther(Value),
    /// JSON body without a `detail` field.
    Unrecognized(Value),
}

impl ErrorPayload {
    /// Classify a raw response body.
    pub fn parse(body: &str) -> Self {
        let value: Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(_) => return Self::Text(body.to_string()),
        };

        match value {
            Value::String(s) => Self::Text(s),
            Value::Object(mut map) => match map.remove("detail") {
                Some(Value::String(s)) => Self::DetailText(s),
                Some(Value::Array(entries)) => {
                    let entries = Value::Array(entries);
                    match serde_json::from_value::<Vec<ValidationIssue>>(entries.clone()) {
                        Ok(issues) => Self::DetailList(issues),
                        Err(_) => Self::DetailOther(entries),
                    }
                }
                Some(other) => Self::DetailOther(other),
                None => Self::Unrecognized(Value::Object(map)),
            },
            other => Self::Unrecognized(other),
        }
    }

    /// The display message for this payload.
    pub fn message(&self) -> String {
        match self {
            Self::Text(s) | Self::DetailText(s) => s.clone(),
            Self::DetailList(issues) => issues
                .iter()
                .map(ValidationIssue::display)
                .collect::<Vec<_>>()
                .join("; "),
            Self::DetailOther(value) | Self::Unrecognized(value) => value.to_string(),
        }
    }
}

/// Normalize any remote failure into a human-readable message.
///
/// ```
/// use nfse_audit::core::{RemoteFailure, normalize};
///
/// let failure = RemoteFailure::response(
///     422,
///     r#"{"detail":[{"loc":["body","cnpj"],"msg":"field required"}]}"#,
/// );
/// assert_eq!(normalize(&failure), "body.cnpj: field required");
/// ```
pub fn normalize(failure: &RemoteFailure) -> String {
    match failure {
        RemoteFailure::Transport { message } | RemoteFailure::Decode { message } => message.clone(),
        RemoteFailure::Response { status, body } if body.trim().is_empty() => {
            format!("HTTP {status}")
        }
        RemoteFailure::Response { body, .. } => ErrorPayload::parse(body).message(),
    }
}

/// Undecodable success bodies are contract violations; everything else is a
/// transport failure carrying the normalized message.
impl From<RemoteFailure> for ImportError {
    fn from(failure: RemoteFailure) -> Self {
        let message = normalize(&failure);
        match failure {
            RemoteFailure::Decode { .. } => ImportError::MalformedResponse(message),
            other => ImportError::Transport {
                status: other.status(),
                message,
            },
        }
    }
}
