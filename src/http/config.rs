use serde::{Deserialize, Serialize};

/// Default API root of a locally running audit service.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Connection settings for [`FiscalApiClient`](super::FiscalApiClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root; endpoint paths are appended to it.
    pub base_url: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Bearer token issued by the identity service, sent on every request.
    #[serde(skip_serializing)]
    pub bearer_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            connect_timeout_secs: 10,
            bearer_token: None,
        }
    }
}

impl ClientConfig {
    /// Read `NFSE_API_URL`, `NFSE_API_TOKEN`, `NFSE_API_TIMEOUT_SECS` and
    /// `NFSE_API_CONNECT_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            base_url: non_empty("NFSE_API_URL").unwrap_or(defaults.base_url),
            timeout_secs: non_empty("NFSE_API_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            connect_timeout_secs: non_empty("NFSE_API_CONNECT_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connect_timeout_secs),
            bearer_token: non_empty("NFSE_API_TOKEN"),
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}
