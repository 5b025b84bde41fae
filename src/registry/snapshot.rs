use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::lenient;

/// Taxpayer registry data for one CNPJ, as returned by `GET /registry/{cnpj}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySnapshot {
    #[serde(deserialize_with = "lenient::opt_string")]
    pub cnpj: Option<String>,
    /// Legal name (razão social).
    #[serde(deserialize_with = "lenient::opt_string")]
    pub razao_social: Option<String>,
    /// Trade name (nome fantasia).
    #[serde(deserialize_with = "lenient::opt_string")]
    pub nome_fantasia: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub logradouro: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub bairro: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub municipio: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub uf: Option<String>,
    /// Registration status (e.g. "ATIVA").
    #[serde(
        alias = "descricao_situacao_cadastral",
        deserialize_with = "lenient::opt_string"
    )]
    pub situacao_cadastral: Option<String>,
    /// Opening date, ISO 8601.
    #[serde(
        alias = "data_inicio_atividade",
        deserialize_with = "lenient::opt_string"
    )]
    pub data_abertura: Option<String>,
    #[serde(deserialize_with = "lenient::opt_decimal")]
    pub capital_social: Option<Decimal>,
    /// Primary CNAE.
    #[serde(alias = "cnae_fiscal_principal")]
    pub cnae_principal: Option<RegistryActivity>,
    /// Secondary CNAEs, in registry order.
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub cnaes_secundarios: Vec<RegistryActivity>,
    /// Partners and administrators (QSA).
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub qsa: Vec<Partner>,
}

/// A CNAE as reported by the registry.
///
/// Accepts `{"codigo": 6201500, "descricao": "..."}`, the `code`/`text`
/// variant, or a bare code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ActivityRepr")]
pub struct RegistryActivity {
    pub codigo: Option<String>,
    pub descricao: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ActivityRepr {
    Full {
        #[serde(default, alias = "code", deserialize_with = "lenient::opt_string")]
        codigo: Option<String>,
        #[serde(default, alias = "text", deserialize_with = "lenient::opt_string")]
        descricao: Option<String>,
    },
    Bare(Value),
}

impl From<ActivityRepr> for RegistryActivity {
    fn from(repr: ActivityRepr) -> Self {
        match repr {
            ActivityRepr::Full { codigo, descricao } => Self { codigo, descricao },
            ActivityRepr::Bare(value) => Self {
                codigo: lenient::scalar_to_string(&value),
                descricao: None,
            },
        }
    }
}

/// A partner entry from the QSA.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Partner {
    #[serde(alias = "nome_socio", deserialize_with = "lenient::opt_string")]
    pub nome: Option<String>,
    #[serde(alias = "qualificacao_socio", deserialize_with = "lenient::opt_string")]
    pub qualificacao: Option<String>,
    /// Partner CPF/CNPJ, usually partially masked by the registry.
    #[serde(alias = "cpf_cnpj_socio", deserialize_with = "lenient::opt_string")]
    pub cpf_cnpj: Option<String>,
}
