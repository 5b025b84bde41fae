use std::env;
use std::fs;

use nfse_audit::core::*;
use nfse_audit::render::*;
use rust_decimal_macros::dec;

fn main() {
    let invoice = InvoiceSummary {
        number: Some("2024000123".into()),
        issue_date: Some("2024-06-15T10:00:00".into()),
        provider_tax_id: Some("12345678000195".into()),
        provider_municipal_registration: Some("123456".into()),
        recipient_tax_id: Some("12345678909".into()),
        recipient_name: Some("Cliente Exemplo".into()),
        service_code: Some("01.07".into()),
        service_description: Some("Suporte técnico, manutenção e outros serviços em TI".into()),
        gross_value: Some(dec!(15432.10)),
        tax_base: Some(dec!(15432.10)),
        tax_rate: Some(dec!(2)),
        tax_value: Some(dec!(308.64)),
        deductions: Some(dec!(0)),
        verification_key: Some("A1B2-C3D4-E5F6".into()),
        ..Default::default()
    };

    let options = RenderOptions {
        generator: "Escritório Contábil Exemplo".into(),
        ..Default::default()
    };
    let now = chrono::Local::now().naive_local();
    let doc = render_at(&invoice, now, &options).expect("invoice renders");

    let dir = env::args().nth(1).unwrap_or_else(|| ".".into());
    let path = std::path::Path::new(&dir).join(&doc.file_name);
    fs::write(&path, &doc.bytes).expect("write PDF");

    println!("Wrote {} ({} bytes)", path.display(), doc.bytes.len());
    println!("Gross: {}", format_brl(invoice.gross_value));
    println!("Recipient: {}", format_document_id(invoice.recipient_tax_id.as_deref().unwrap_or("")));
}
