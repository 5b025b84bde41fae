//! CNPJ masking and validation.
//!
//! The display form is `AA.AAA.AAA/AAAA-AA`. Masking is applied progressively
//! while the operator types, so partial inputs get partial punctuation.

use serde::{Deserialize, Serialize};

use super::error::LocalValidationError;

/// Number of digits in a CNPJ.
pub const CNPJ_DIGITS: usize = 14;

/// Number of digits in a CPF.
pub const CPF_DIGITS: usize = 11;

/// A validated CNPJ in canonical (digits-only) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxIdentifier(String);

impl TaxIdentifier {
    /// Parse any masked or unmasked input into a canonical CNPJ.
    pub fn parse(input: &str) -> Result<Self, LocalValidationError> {
        validate_cnpj(input).map(Self)
    }

    /// The 14 digits, as sent to services.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The punctuated display form.
    pub fn masked(&self) -> String {
        mask(&self.0)
    }
}

impl std::fmt::Display for TaxIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}

impl TryFrom<String> for TaxIdentifier {
    type Error = LocalValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaxIdentifier> for String {
    fn from(id: TaxIdentifier) -> Self {
        id.0
    }
}

/// Strip everything but ASCII digits.
pub fn unmask(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Apply CNPJ punctuation to whatever digits `input` contains.
///
/// ```
/// use nfse_audit::core::mask;
///
/// assert_eq!(mask("12345678000195"), "12.345.678/0001-95");
/// assert_eq!(mask("12345"), "12.345");
/// assert_eq!(mask("12.345.678/0001-9"), "12.345.678/0001-9");
/// ```
pub fn mask(input: &str) -> String {
    let digits = unmask(input);
    let d = digits.as_str();
    match d.len() {
        0..=2 => d.to_string(),
        3..=5 => format!("{}.{}", &d[..2], &d[2..]),
        6..=8 => format!("{}.{}.{}", &d[..2], &d[2..5], &d[5..]),
        9..=12 => format!("{}.{}.{}/{}", &d[..2], &d[2..5], &d[5..8], &d[8..]),
        _ => format!(
            "{}.{}.{}/{}-{}",
            &d[..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..d.len().min(CNPJ_DIGITS)]
        ),
    }
}

/// Validate a CNPJ by digit count and return its canonical form.
///
/// Check digits are not verified; the registry service is the authority on
/// whether the number exists.
pub fn validate_cnpj(input: &str) -> Result<String, LocalValidationError> {
    let digits = unmask(input);
    if digits.len() != CNPJ_DIGITS {
        return Err(LocalValidationError::invalid_identifier("cnpj", digits.len()));
    }
    Ok(digits)
}

/// Format a CPF or CNPJ for display, passing anything else through untouched.
pub fn format_document_id(input: &str) -> String {
    let digits = unmask(input);
    match digits.len() {
        CNPJ_DIGITS => mask(&digits),
        CPF_DIGITS => format!(
            "{}.{}.{}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..]
        ),
        _ => input.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progressive_grouping() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("12"), "12");
        assert_eq!(mask("123"), "12.3");
        assert_eq!(mask("123456"), "12.345.6");
        assert_eq!(mask("123456789"), "12.345.678/9");
        assert_eq!(mask("1234567800019"), "12.345.678/0001-9");
        assert_eq!(mask("12345678000195"), "12.345.678/0001-95");
    }

    #[test]
    fn excess_digits_truncated() {
        assert_eq!(mask("1234567800019599"), "12.345.678/0001-95");
    }

    #[test]
    fn mask_ignores_existing_punctuation() {
        assert_eq!(mask("12.345.678/0001-95"), "12.345.678/0001-95");
        assert_eq!(mask("abc12x34"), "12.34");
    }

    #[test]
    fn unmask_strips_everything_else() {
        assert_eq!(unmask("12.345.678/0001-95"), "12345678000195");
        assert_eq!(unmask(" a-b "), "");
    }

    #[test]
    fn validate_rejects_wrong_length() {
        let err = validate_cnpj("12.345.678/0001-9").unwrap_err();
        assert_eq!(err.kind, super::super::error::ValidationKind::InvalidIdentifier);
        assert!(validate_cnpj("123456780001950").is_err());
        assert_eq!(validate_cnpj("12.345.678/0001-95").unwrap(), "12345678000195");
    }

    #[test]
    fn tax_identifier_serde_uses_canonical_form() {
        let id = TaxIdentifier::parse("12.345.678/0001-95").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""12345678000195""#);
        assert_eq!(id.to_string(), "12.345.678/0001-95");
        assert!(serde_json::from_str::<TaxIdentifier>(r#""123""#).is_err());
    }

    #[test]
    fn document_id_formats_cpf_and_cnpj() {
        assert_eq!(format_document_id("12345678901"), "123.456.789-01");
        assert_eq!(format_document_id("12345678000195"), "12.345.678/0001-95");
        assert_eq!(format_document_id(" EXTERIOR "), "EXTERIOR");
    }
}
