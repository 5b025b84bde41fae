use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use nfse_audit::core::*;
use nfse_audit::import::{BatchItem, BatchResponse, TransportOutcome, reconcile};
use nfse_audit::render::{RenderOptions, render_at};

fn invoice(additional_info: Option<String>) -> InvoiceSummary {
    InvoiceSummary {
        number: Some("2024000123".into()),
        issue_date: Some("2024-06-15T10:00:00".into()),
        provider_tax_id: Some("12345678000195".into()),
        provider_municipal_registration: Some("123456".into()),
        recipient_tax_id: Some("98765432000110".into()),
        recipient_name: Some("Cliente Exemplo LTDA".into()),
        service_code: Some("01.07".into()),
        service_description: Some("Suporte técnico, manutenção e outros serviços em TI".into()),
        gross_value: Some(dec!(15432.10)),
        tax_base: Some(dec!(15432.10)),
        tax_rate: Some(dec!(2)),
        tax_value: Some(dec!(308.64)),
        deductions: Some(dec!(0)),
        verification_key: Some("A1B2-C3D4-E5F6".into()),
        additional_info,
        ..Default::default()
    }
}

fn batch_of(n: usize) -> BatchResponse {
    let results: Vec<BatchItem> = (0..n)
        .map(|i| BatchItem {
            file_name: format!("nota-{i:03}.xml"),
            succeeded: true,
            invoice: Some(invoice(None)),
            error: None,
        })
        .collect();
    BatchResponse {
        total: n,
        succeeded: n,
        failed: 0,
        results,
    }
}

fn bench_render_one_page(c: &mut Criterion) {
    let inv = invoice(None);
    let at = NaiveDate::from_ymd_opt(2024, 6, 16)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let options = RenderOptions::default();
    c.bench_function("render_one_page", |b| {
        b.iter(|| black_box(render_at(black_box(&inv), at, &options)));
    });
}

fn bench_render_multi_page(c: &mut Criterion) {
    let inv = invoice(Some(
        "Serviços prestados conforme contrato de manutenção. ".repeat(300),
    ));
    let at = NaiveDate::from_ymd_opt(2024, 6, 16)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let options = RenderOptions::default();
    c.bench_function("render_multi_page", |b| {
        b.iter(|| black_box(render_at(black_box(&inv), at, &options)));
    });
}

fn bench_reconcile_100(c: &mut Criterion) {
    let response = batch_of(100);
    c.bench_function("reconcile_100_items", |b| {
        b.iter(|| {
            black_box(reconcile(
                TransportOutcome::Batch(black_box(response.clone())),
                100,
            ))
        });
    });
}

fn bench_normalize(c: &mut Criterion) {
    let failure = RemoteFailure::response(
        422,
        r#"{"detail":[{"loc":["body","cnpj"],"msg":"field required"},{"loc":["body","files",3],"msg":"invalid"}]}"#,
    );
    c.bench_function("normalize_detail_list", |b| {
        b.iter(|| black_box(normalize(black_box(&failure))));
    });
}

criterion_group!(
    benches,
    bench_render_one_page,
    bench_render_multi_page,
    bench_reconcile_100,
    bench_normalize
);
criterion_main!(benches);
