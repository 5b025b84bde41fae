use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An imported NFS-e as returned by the audit service.
///
/// Every field is optional on the wire; the renderer substitutes placeholders
/// for whatever the audit engine did not extract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceSummary {
    /// Server-side record identifier.
    #[serde(deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    /// NFS-e number (`numero_nota`).
    #[serde(rename = "numero_nota", deserialize_with = "lenient::opt_string")]
    pub number: Option<String>,
    /// Issue timestamp as sent by the service (ISO 8601, date or date-time).
    #[serde(rename = "data_emissao", deserialize_with = "lenient::opt_string")]
    pub issue_date: Option<String>,
    /// Provider (emitter) CNPJ.
    #[serde(rename = "cnpj_prestador", deserialize_with = "lenient::opt_string")]
    pub provider_tax_id: Option<String>,
    /// Provider municipal registration (inscrição municipal).
    #[serde(
        rename = "inscricao_municipal_prestador",
        alias = "inscricao_municipal",
        deserialize_with = "lenient::opt_string"
    )]
    pub provider_municipal_registration: Option<String>,
    /// Recipient (tomador) CNPJ or CPF.
    #[serde(rename = "cnpj_tomador", deserialize_with = "lenient::opt_string")]
    pub recipient_tax_id: Option<String>,
    /// Recipient legal name.
    #[serde(
        rename = "razao_social_tomador",
        alias = "nome_tomador",
        deserialize_with = "lenient::opt_string"
    )]
    pub recipient_name: Option<String>,
    /// Municipal service code used on the invoice.
    #[serde(
        rename = "codigo_servico",
        alias = "codigo_servico_utilizado",
        deserialize_with = "lenient::opt_string"
    )]
    pub service_code: Option<String>,
    /// Service description (discriminação).
    #[serde(
        rename = "descricao_servico",
        alias = "discriminacao",
        deserialize_with = "lenient::opt_string"
    )]
    pub service_description: Option<String>,
    /// Gross service value.
    #[serde(rename = "valor_total", deserialize_with = "lenient::opt_decimal")]
    pub gross_value: Option<Decimal>,
    /// ISS tax base.
    #[serde(rename = "base_calculo", deserialize_with = "lenient::opt_decimal")]
    pub tax_base: Option<Decimal>,
    /// ISS rate in percent (e.g. `5` for 5%).
    #[serde(rename = "aliquota", deserialize_with = "lenient::opt_decimal")]
    pub tax_rate: Option<Decimal>,
    /// ISS amount.
    #[serde(rename = "valor_iss", deserialize_with = "lenient::opt_decimal")]
    pub tax_value: Option<Decimal>,
    /// Deductions.
    #[serde(rename = "valor_deducoes", deserialize_with = "lenient::opt_decimal")]
    pub deductions: Option<Decimal>,
    /// Verification key printed on the municipal portal.
    #[serde(rename = "chave_validacao", deserialize_with = "lenient::opt_string")]
    pub verification_key: Option<String>,
    /// Free-text additional information.
    #[serde(
        rename = "informacoes_adicionais",
        alias = "outras_informacoes",
        deserialize_with = "lenient::opt_string"
    )]
    pub additional_info: Option<String>,
    /// Audit verdict.
    #[serde(rename = "status_auditoria")]
    pub audit_status: Option<AuditStatus>,
    /// Audit message accompanying the verdict.
    #[serde(rename = "mensagem_erro", deserialize_with = "lenient::opt_string")]
    pub audit_message: Option<String>,
    /// When the service stored the invoice.
    #[serde(rename = "data_importacao", deserialize_with = "lenient::opt_string")]
    pub imported_at: Option<String>,
}

impl InvoiceSummary {
    /// Whether the audit engine approved this invoice.
    pub fn is_approved(&self) -> bool {
        matches!(self.audit_status, Some(AuditStatus::Approved))
    }

    /// Calendar date of issue, if the service sent a parseable one.
    ///
    /// Accepts plain dates, naive date-times and RFC 3339 timestamps with offset.
    pub fn issue_date_parsed(&self) -> Option<NaiveDate> {
        let raw = self.issue_date.as_deref()?.trim();
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.date());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.date());
        }
        raw.get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

/// Audit verdict attached to an imported invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuditStatus {
    /// APROVADA — compliant.
    Approved,
    /// ERRO_CNAE — service code not authorized for the company.
    ServiceCodeNotAllowed,
    /// ERRO_IMPOSTO — tax values inconsistent.
    TaxMismatch,
    /// ALERTA — accepted with warnings.
    Warning,
    /// Any other verdict code.
    Other(String),
}

impl AuditStatus {
    pub fn code(&self) -> &str {
        match self {
            Self::Approved => "APROVADA",
            Self::ServiceCodeNotAllowed => "ERRO_CNAE",
            Self::TaxMismatch => "ERRO_IMPOSTO",
            Self::Warning => "ALERTA",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for AuditStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "APROVADA" => Self::Approved,
            "ERRO_CNAE" => Self::ServiceCodeNotAllowed,
            "ERRO_IMPOSTO" => Self::TaxMismatch,
            "ALERTA" => Self::Warning,
            _ => Self::Other(code),
        }
    }
}

impl From<AuditStatus> for String {
    fn from(status: AuditStatus) -> Self {
        status.code().to_string()
    }
}

/// One CNAE row of the registration form, mapped to a municipal service code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCodeEntry {
    /// CNAE code, always as a string.
    #[serde(rename = "cnae_codigo")]
    pub code: String,
    /// CNAE description.
    #[serde(rename = "descricao", default)]
    pub description: String,
    /// Municipal service code, entered by the operator.
    #[serde(rename = "codigo_servico_municipal", default)]
    pub service_code: String,
}

impl ActivityCodeEntry {
    /// Entry as suggested by a registry lookup; the service code starts empty.
    pub fn suggested(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            service_code: String::new(),
        }
    }
}

/// Deserializers that tolerate the loosely typed JSON the services emit.
pub(crate) mod lenient {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Render a scalar JSON value as a string; `null` and containers yield `None`.
    pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
        let text = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return None,
        };
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }

    pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(scalar_to_string))
    }

    /// Treat an explicit `null` like a missing field.
    pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    pub(crate) fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(ref s)) if s.trim().is_empty() => Ok(None),
            Some(v) => decimal_from_value(&v)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid decimal: {v}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn invoice_accepts_numbers_and_strings() {
        let json = r#"{
            "id": 42,
            "numero_nota": 1234,
            "data_emissao": "2025-01-17T15:04:03",
            "valor_total": 1234.5,
            "valor_iss": null,
            "aliquota": "5.00",
            "status_auditoria": "APROVADA"
        }"#;
        let inv: InvoiceSummary = serde_json::from_str(json).unwrap();
        assert_eq!(inv.id.as_deref(), Some("42"));
        assert_eq!(inv.number.as_deref(), Some("1234"));
        assert_eq!(inv.gross_value, Some(dec!(1234.5)));
        assert_eq!(inv.tax_value, None);
        assert_eq!(inv.tax_rate, Some(dec!(5.00)));
        assert!(inv.is_approved());
        assert_eq!(inv.issue_date_parsed(), NaiveDate::from_ymd_opt(2025, 1, 17));
    }

    #[test]
    fn invoice_accepts_legacy_aliases() {
        let json = r#"{"codigo_servico_utilizado": "08.02", "nome_tomador": "Cliente SA"}"#;
        let inv: InvoiceSummary = serde_json::from_str(json).unwrap();
        assert_eq!(inv.service_code.as_deref(), Some("08.02"));
        assert_eq!(inv.recipient_name.as_deref(), Some("Cliente SA"));
    }

    #[test]
    fn empty_money_string_is_absent() {
        let inv: InvoiceSummary = serde_json::from_str(r#"{"valor_deducoes": ""}"#).unwrap();
        assert_eq!(inv.deductions, None);
    }

    #[test]
    fn garbage_money_is_rejected() {
        assert!(serde_json::from_str::<InvoiceSummary>(r#"{"valor_total": "abc"}"#).is_err());
    }

    #[test]
    fn issue_date_with_offset() {
        let inv = InvoiceSummary {
            issue_date: Some("2025-01-17T15:04:03-03:00".into()),
            ..Default::default()
        };
        assert_eq!(inv.issue_date_parsed(), NaiveDate::from_ymd_opt(2025, 1, 17));
    }

    #[test]
    fn issue_date_unparseable() {
        let inv = InvoiceSummary {
            issue_date: Some("ontem".into()),
            ..Default::default()
        };
        assert_eq!(inv.issue_date_parsed(), None);
    }

    #[test]
    fn audit_status_roundtrips_unknown_codes() {
        let status: AuditStatus = serde_json::from_str(r#""PENDENTE""#).unwrap();
        assert_eq!(status, AuditStatus::Other("PENDENTE".into()));
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""PENDENTE""#);
    }

    #[test]
    fn activity_entry_wire_names() {
        let entry = ActivityCodeEntry::suggested("6201500", "Desenvolvimento de software");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["cnae_codigo"], "6201500");
        assert_eq!(json["codigo_servico_municipal"], "");
    }
}
