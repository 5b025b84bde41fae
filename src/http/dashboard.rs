use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::lenient;

/// Revenue ceiling usage, as classified by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevenueStatus {
    /// Below 80% of the ceiling.
    #[serde(rename = "OK")]
    Ok,
    /// At or above 80%.
    #[serde(rename = "ALERTA")]
    Warning,
    /// Ceiling exceeded.
    #[serde(rename = "ESTOUROU")]
    Exceeded,
    #[serde(other)]
    Unknown,
}

/// Annual revenue against the regime's ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueMetrics {
    #[serde(rename = "faturamento_atual", deserialize_with = "lenient::opt_decimal", default)]
    pub current_revenue: Option<Decimal>,
    #[serde(rename = "limite", deserialize_with = "lenient::opt_decimal", default)]
    pub ceiling: Option<Decimal>,
    /// Percent of the ceiling used.
    #[serde(rename = "percentual_uso", deserialize_with = "lenient::opt_decimal", default)]
    pub usage_percent: Option<Decimal>,
    pub status: RevenueStatus,
    #[serde(rename = "margem_disponivel", deserialize_with = "lenient::opt_decimal", default)]
    pub available_margin: Option<Decimal>,
    #[serde(rename = "regime_tributario", deserialize_with = "lenient::opt_string", default)]
    pub tax_regime: Option<String>,
    #[serde(rename = "razao_social", deserialize_with = "lenient::opt_string", default)]
    pub legal_name: Option<String>,
}

/// Estimated tax for the current month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxEstimate {
    /// `MM/YYYY`.
    #[serde(rename = "mes_referencia", deserialize_with = "lenient::opt_string", default)]
    pub reference_month: Option<String>,
    #[serde(rename = "valor_total_mes", deserialize_with = "lenient::opt_decimal", default)]
    pub month_total: Option<Decimal>,
    #[serde(rename = "imposto_estimado_mes", deserialize_with = "lenient::opt_decimal", default)]
    pub estimated_tax: Option<Decimal>,
    /// Rate in percent.
    #[serde(rename = "aliquota_aplicada", deserialize_with = "lenient::opt_decimal", default)]
    pub applied_rate: Option<Decimal>,
    /// Description of how the basis was chosen.
    #[serde(rename = "base_calculo", deserialize_with = "lenient::opt_string", default)]
    pub basis: Option<String>,
}
