use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{
    ActivityCodeEntry, LocalValidationError, TaxIdentifier, ValidationKind, mask,
};

use super::populate::populate_from_lookup;
use super::snapshot::RegistrySnapshot;

/// Tax regime options offered on the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRegime {
    #[serde(rename = "MEI")]
    Mei,
    #[serde(rename = "Simples Nacional")]
    SimplesNacional,
    #[serde(rename = "Lucro Presumido")]
    LucroPresumido,
}

/// Immutable registration payload handed off when the form is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRegistration {
    pub cnpj: TaxIdentifier,
    pub razao_social: String,
    pub nome_fantasia: Option<String>,
    pub logradouro: Option<String>,
    pub bairro: Option<String>,
    pub municipio: Option<String>,
    pub uf: Option<String>,
    pub regime_tributario: TaxRegime,
    pub data_abertura: Option<NaiveDate>,
    pub cnaes_mapeados: Vec<ActivityCodeEntry>,
}

/// In-progress registration form state.
///
/// ```
/// use nfse_audit::registry::*;
///
/// let mut draft = RegistrationDraft::default();
/// draft.set_cnpj_input("12345678000195");
/// assert_eq!(draft.cnpj_input(), "12.345.678/0001-95");
/// assert!(draft.lookup_target().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistrationDraft {
    cnpj_input: String,
    legal_name: String,
    trade_name: Option<String>,
    street: Option<String>,
    district: Option<String>,
    city: Option<String>,
    state: Option<String>,
    regime: Option<TaxRegime>,
    opening_date: Option<NaiveDate>,
    activities: Vec<ActivityCodeEntry>,
}

impl RegistrationDraft {
    /// Store the CNPJ as typed, masked for display.
    pub fn set_cnpj_input(&mut self, input: &str) {
        self.cnpj_input = mask(input);
    }

    pub fn cnpj_input(&self) -> &str {
        &self.cnpj_input
    }

    /// The CNPJ to look up. Fails locally when it does not have 14 digits.
    pub fn lookup_target(&self) -> Result<TaxIdentifier, LocalValidationError> {
        TaxIdentifier::parse(&self.cnpj_input)
    }

    /// Fill the form from a registry lookup, replacing the activity list.
    pub fn apply_lookup(&mut self, snapshot: &RegistrySnapshot) {
        self.legal_name = snapshot.razao_social.clone().unwrap_or_default();
        self.trade_name = snapshot.nome_fantasia.clone();
        self.street = snapshot.logradouro.clone();
        self.district = snapshot.bairro.clone();
        self.city = snapshot.municipio.clone();
        self.state = snapshot.uf.clone();
        self.opening_date = snapshot
            .data_abertura
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok());
        self.activities = populate_from_lookup(snapshot);
    }

    pub fn set_legal_name(&mut self, name: impl Into<String>) {
        self.legal_name = name.into();
    }

    pub fn set_regime(&mut self, regime: TaxRegime) {
        self.regime = Some(regime);
    }

    pub fn activities(&self) -> &[ActivityCodeEntry] {
        &self.activities
    }

    /// Set the municipal service code of one activity row.
    /// Returns `false` when `index` is out of range.
    pub fn set_service_code(&mut self, index: usize, code: impl Into<String>) -> bool {
        match self.activities.get_mut(index) {
            Some(entry) => {
                entry.service_code = code.into();
                true
            }
            None => false,
        }
    }

    pub fn add_activity(&mut self, entry: ActivityCodeEntry) {
        self.activities.push(entry);
    }

    pub fn remove_activity(&mut self, index: usize) -> Option<ActivityCodeEntry> {
        (index < self.activities.len()).then(|| self.activities.remove(index))
    }

    /// Validate the form and produce the registration payload.
    pub fn snapshot(&self) -> Result<CompanyRegistration, LocalValidationError> {
        let cnpj = self.lookup_target()?;
        if self.legal_name.trim().is_empty() {
            return Err(LocalValidationError::new(
                ValidationKind::MissingField,
                "razao_social",
                "legal name is required",
            ));
        }
        let regime = self.regime.ok_or_else(|| {
            LocalValidationError::new(
                ValidationKind::MissingField,
                "regime_tributario",
                "tax regime is required",
            )
        })?;

        Ok(CompanyRegistration {
            cnpj,
            razao_social: self.legal_name.trim().to_string(),
            nome_fantasia: self.trade_name.clone(),
            logradouro: self.street.clone(),
            bairro: self.district.clone(),
            municipio: self.city.clone(),
            uf: self.state.clone(),
            regime_tributario: regime,
            data_abertura: self.opening_date,
            cnaes_mapeados: self.activities.clone(),
        })
    }
}
