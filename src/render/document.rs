use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ImportError, InvoiceSummary, format_brl, format_document_id, format_percent};

use super::layout::{Layout, Rgb, TextStyle};

/// Default statutory note printed when the invoice carries no additional information.
pub const DEFAULT_DISCLAIMER: &str = "Documento emitido por ME ou EPP optante pelo Simples Nacional. \
Não gera direito a crédito fiscal de IPI.";

/// Banner title on every rendered document.
pub const DOCUMENT_TITLE: &str = "NOTA FISCAL DE SERVIÇOS ELETRÔNICA - NFS-e";

const BANNER_BLUE: Rgb = Rgb::hex(0x1e40af);
const HIGHLIGHT: Rgb = Rgb::hex(0xdbeafe);
const KEY_STRIP: Rgb = Rgb::hex(0xf3f4f6);
const FOOTER_GRAY: Rgb = Rgb::hex(0x6b7280);
const LABEL_WIDTH: f32 = 150.0;

/// Knobs for the rendered document that are not part of the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Attribution printed in the footer.
    pub generator: String,
    /// Shown for absent non-money fields.
    pub placeholder: String,
    /// Printed when the invoice has no additional information.
    pub disclaimer: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            generator: "Fiscal Fácil - Sistema de Auditoria Fiscal".into(),
            placeholder: "N/A".into(),
            disclaimer: DEFAULT_DISCLAIMER.into(),
        }
    }
}

/// A rendered PDF and the file name to offer for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Render an invoice with default options, stamped with the local time.
pub fn render(invoice: &InvoiceSummary) -> Result<RenderedDocument, ImportError> {
    render_at(invoice, Local::now().naive_local(), &RenderOptions::default())
}

/// Render an invoice stamped with `generated_at`.
///
/// The output is a function of its arguments only: the same invoice, timestamp
/// and options always produce the same bytes.
pub fn render_at(
    invoice: &InvoiceSummary,
    generated_at: NaiveDateTime,
    options: &RenderOptions,
) -> Result<RenderedDocument, ImportError> {
    let text = |value: &Option<String>| -> String {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map_or_else(|| options.placeholder.clone(), str::to_string)
    };
    let id = |value: &Option<String>| -> String {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map_or_else(|| options.placeholder.clone(), format_document_id)
    };
    let issue_date = invoice
        .issue_date_parsed()
        .map_or_else(|| options.placeholder.clone(), |d| d.format("%d/%m/%Y").to_string());

    let mut layout = Layout::new();

    // Header
    layout.banner(
        &[
            (
                DOCUMENT_TITLE.to_string(),
                TextStyle::bold(14.0).with_color(Rgb::WHITE),
            ),
            (
                format!("Número: {}    Emissão: {issue_date}", text(&invoice.number)),
                TextStyle::regular(10.0).with_color(Rgb::WHITE),
            ),
        ],
        BANNER_BLUE,
    );

    let body = TextStyle::regular(9.0);
    let heading = TextStyle::bold(11.0).with_color(BANNER_BLUE);

    layout.spacer(12.0);
    layout.paragraph("PRESTADOR DE SERVIÇOS", heading);
    layout.spacer(4.0);
    layout.table(
        &[
            ("CNPJ", id(&invoice.provider_tax_id)),
            (
                "Inscrição Municipal",
                text(&invoice.provider_municipal_registration),
            ),
        ],
        LABEL_WIDTH,
        body,
    );

    layout.spacer(12.0);
    layout.paragraph("TOMADOR DE SERVIÇOS", heading);
    layout.spacer(4.0);
    layout.table(
        &[
            ("CPF/CNPJ", id(&invoice.recipient_tax_id)),
            ("Razão Social", text(&invoice.recipient_name)),
        ],
        LABEL_WIDTH,
        body,
    );

    layout.spacer(12.0);
    layout.paragraph("DISCRIMINAÇÃO DOS SERVIÇOS E VALORES", heading);
    layout.spacer(4.0);
    layout.table(
        &[
            ("Código do Serviço", text(&invoice.service_code)),
            ("Descrição", text(&invoice.service_description)),
            ("Valor dos Serviços", format_brl(invoice.gross_value)),
            ("Base de Cálculo", format_brl(invoice.tax_base)),
            (
                "Alíquota ISS",
                invoice
                    .tax_rate
                    .map_or_else(|| options.placeholder.clone(), format_percent),
            ),
            ("Valor do ISS", format_brl(invoice.tax_value)),
            ("Deduções", format_brl(invoice.deductions)),
        ],
        LABEL_WIDTH,
        body,
    );

    layout.spacer(12.0);
    layout.banner(
        &[(
            format!("VALOR LÍQUIDO DA NOTA: {}", format_brl(invoice.gross_value)),
            TextStyle::bold(12.0).with_color(BANNER_BLUE),
        )],
        HIGHLIGHT,
    );

    layout.spacer(12.0);
    layout.paragraph("INFORMAÇÕES ADICIONAIS", heading);
    layout.spacer(4.0);
    let info = invoice
        .additional_info
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(options.disclaimer.as_str());
    layout.paragraph(info, body);

    if let Some(key) = invoice
        .verification_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        layout.spacer(12.0);
        layout.banner(
            &[(
                format!("CHAVE DE VERIFICAÇÃO: {key}"),
                TextStyle::bold(9.0),
            )],
            KEY_STRIP,
        );
    }

    // Footer
    layout.spacer(20.0);
    layout.rule();
    layout.spacer(4.0);
    layout.centered(
        &format!(
            "Documento gerado por {} em {}",
            options.generator,
            generated_at.format("%d/%m/%Y %H:%M:%S")
        ),
        TextStyle::regular(8.0).with_color(FOOTER_GRAY),
    );

    let pages = layout.page_count();
    let title = format!("NFS-e {}", text(&invoice.number));
    let bytes = layout.finish(
        &title,
        &generated_at.format("D:%Y%m%d%H%M%S").to_string(),
    )?;
    let file_name = suggested_file_name(invoice);
    debug!(file_name = %file_name, pages, size = bytes.len(), "rendered invoice document");

    Ok(RenderedDocument { bytes, file_name })
}

/// `NFSe_<number>_<YYYYMMDD>.pdf`, with `sem-numero` / `sem-data` standing in
/// for an absent number or unparseable date. Characters outside
/// `[A-Za-z0-9-]` in the number become `-`.
pub fn suggested_file_name(invoice: &InvoiceSummary) -> String {
    let number = invoice
        .number
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(|n| {
            n.chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
                .collect::<String>()
        })
        .unwrap_or_else(|| "sem-numero".to_string());
    let date = invoice
        .issue_date_parsed()
        .map_or_else(|| "sem-data".to_string(), |d| d.format("%Y%m%d").to_string());
    format!("NFSe_{number}_{date}.pdf")
}
