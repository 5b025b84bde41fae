#![cfg(feature = "core")]

use nfse_audit::core::*;
use rust_decimal_macros::dec;

// --- CNPJ masking ---

#[test]
fn mask_full_cnpj() {
    assert_eq!(mask("12345678000195"), "12.345.678/0001-95");
    assert_eq!(unmask("12.345.678/0001-95"), "12345678000195");
}

#[test]
fn mask_while_typing() {
    let typed = "12345678000195";
    let steps: Vec<String> = (0..=typed.len()).map(|n| mask(&typed[..n])).collect();
    assert_eq!(steps[2], "12");
    assert_eq!(steps[3], "12.3");
    assert_eq!(steps[5], "12.345");
    assert_eq!(steps[6], "12.345.6");
    assert_eq!(steps[8], "12.345.678");
    assert_eq!(steps[9], "12.345.678/0");
    assert_eq!(steps[12], "12.345.678/0001");
    assert_eq!(steps[13], "12.345.678/0001-9");
}

#[test]
fn mask_drops_digits_beyond_fourteen() {
    assert_eq!(mask("123456780001959999"), "12.345.678/0001-95");
}

#[test]
fn mask_ignores_punctuation_and_letters() {
    assert_eq!(mask("12a.345-678/0001x95"), "12.345.678/0001-95");
    assert_eq!(mask("abc"), "");
}

#[test]
fn validate_requires_fourteen_digits() {
    assert_eq!(validate_cnpj("12.345.678/0001-95").unwrap(), "12345678000195");

    let err = validate_cnpj("12.345.678/0001").unwrap_err();
    assert_eq!(err.kind, ValidationKind::InvalidIdentifier);
    assert_eq!(err.field, "cnpj");
    assert!(err.message.contains("12"));

    assert!(validate_cnpj("123456780001951").is_err());
}

#[test]
fn tax_identifier_serializes_canonical() {
    let id = TaxIdentifier::parse("12.345.678/0001-95").unwrap();
    assert_eq!(id.as_str(), "12345678000195");
    assert_eq!(id.to_string(), "12.345.678/0001-95");
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""12345678000195""#);

    let back: TaxIdentifier = serde_json::from_str(r#""12.345.678/0001-95""#).unwrap();
    assert_eq!(back, id);
    assert!(serde_json::from_str::<TaxIdentifier>(r#""123""#).is_err());
}

#[test]
fn document_id_formats_cpf_and_cnpj() {
    assert_eq!(format_document_id("12345678909"), "123.456.789-09");
    assert_eq!(format_document_id("12345678000195"), "12.345.678/0001-95");
    assert_eq!(format_document_id(" EXTERIOR "), "EXTERIOR");
}

// --- Money ---

#[test]
fn money_formatting() {
    assert_eq!(format_brl(Some(dec!(1234.5))), "R$ 1.234,50");
    assert_eq!(format_brl(None), "R$ 0,00");
    assert_eq!(format_brl(Some(dec!(0.005))), "R$ 0,01");
    assert_eq!(format_brl(Some(dec!(1234567.891))), "R$ 1.234.567,89");
    assert_eq!(format_brl(Some(dec!(-10))), "-R$ 10,00");
    assert_eq!(format_brl(Some(dec!(-0.001))), "R$ 0,00");
    assert_eq!(format_percent(dec!(5)), "5,00%");
    assert_eq!(format_percent(dec!(2.015)), "2,02%");
}

#[test]
fn invoice_money_from_service_json() {
    let inv: InvoiceSummary =
        serde_json::from_str(r#"{"valor_total": 1234.5, "valor_iss": null}"#).unwrap();
    assert_eq!(format_brl(inv.gross_value), "R$ 1.234,50");
    assert_eq!(format_brl(inv.tax_value), "R$ 0,00");
}

// --- Error normalization ---

#[test]
fn normalize_validation_list() {
    let failure = RemoteFailure::response(
        422,
        r#"{"detail": [{"loc": ["body", "cnpj"], "msg": "field required"}]}"#,
    );
    assert_eq!(normalize(&failure), "body.cnpj: field required");
}

#[test]
fn normalize_empty_location_omits_prefix() {
    let failure = RemoteFailure::response(422, r#"{"detail": [{"loc": [], "msg": "bad"}]}"#);
    assert_eq!(normalize(&failure), "bad");
}

#[test]
fn normalize_without_response() {
    let failure = RemoteFailure::transport("error sending request: connection refused");
    assert_eq!(
        normalize(&failure),
        "error sending request: connection refused"
    );
}

#[test]
fn normalize_string_detail() {
    let failure = RemoteFailure::response(
        400,
        r#"{"detail": "Prestador da nota não corresponde à empresa"}"#,
    );
    assert_eq!(
        normalize(&failure),
        "Prestador da nota não corresponde à empresa"
    );
}

#[test]
fn normalize_object_detail_and_bare_body() {
    assert_eq!(
        normalize(&RemoteFailure::response(500, r#"{"detail": {"a": [1, 2]}}"#)),
        r#"{"a":[1,2]}"#
    );
    assert_eq!(
        normalize(&RemoteFailure::response(500, r#"{"message": "x"}"#)),
        r#"{"message":"x"}"#
    );
}

#[test]
fn remote_failure_into_import_error() {
    let err: ImportError = RemoteFailure::response(409, r#""duplicada""#).into();
    assert_eq!(err.to_string(), "duplicada");
    assert!(!err.is_defect());
}

// --- Invoice record ---

#[test]
fn audit_status_codes() {
    let inv: InvoiceSummary =
        serde_json::from_str(r#"{"status_auditoria": "ERRO_CNAE", "mensagem_erro": "CNAE 0107"}"#)
            .unwrap();
    assert_eq!(inv.audit_status, Some(AuditStatus::ServiceCodeNotAllowed));
    assert!(!inv.is_approved());

    let other: AuditStatus = serde_json::from_str(r#""PENDENTE""#).unwrap();
    assert_eq!(other, AuditStatus::Other("PENDENTE".into()));
    assert_eq!(serde_json::to_string(&other).unwrap(), r#""PENDENTE""#);
}

#[test]
fn issue_date_variants() {
    let with = |s: &str| InvoiceSummary {
        issue_date: Some(s.into()),
        ..Default::default()
    };
    let expected = chrono::NaiveDate::from_ymd_opt(2024, 3, 5);
    assert_eq!(with("2024-03-05").issue_date_parsed(), expected);
    assert_eq!(with("2024-03-05T23:10:00-03:00").issue_date_parsed(), expected);
    assert_eq!(with("2024-03-05 08:00:00").issue_date_parsed(), expected);
    assert_eq!(with("05/03/2024").issue_date_parsed(), None);
}

#[test]
fn activity_entry_wire_names() {
    let entry = ActivityCodeEntry {
        code: "6201500".into(),
        description: "Desenvolvimento de software".into(),
        service_code: "01.07".into(),
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["cnae_codigo"], "6201500");
    assert_eq!(json["descricao"], "Desenvolvimento de software");
    assert_eq!(json["codigo_servico_municipal"], "01.07");
}
