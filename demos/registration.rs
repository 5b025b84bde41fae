use nfse_audit::core::*;
use nfse_audit::registry::*;

fn main() {
    let mut draft = RegistrationDraft::default();
    draft.set_cnpj_input("12345678000195");
    println!("CNPJ as typed: {}", draft.cnpj_input());

    // Response of GET /registry/{cnpj}
    let snapshot: RegistrySnapshot = serde_json::from_str(
        r#"{
            "cnpj": "12345678000195",
            "razao_social": "Exemplo Tecnologia LTDA",
            "nome_fantasia": "Exemplo Tech",
            "municipio": "São Paulo",
            "uf": "SP",
            "data_abertura": "2015-03-10",
            "cnae_principal": {"codigo": 6201500, "descricao": "Desenvolvimento de programas de computador sob encomenda"},
            "cnaes_secundarios": [
                {"codigo": 6202300, "descricao": "Desenvolvimento e licenciamento de programas customizáveis"},
                {"codigo": 6204000, "descricao": "Consultoria em tecnologia da informação"}
            ]
        }"#,
    )
    .expect("registry snapshot parses");

    draft.apply_lookup(&snapshot);
    draft.set_regime(TaxRegime::SimplesNacional);
    draft.set_service_code(0, "01.01");
    draft.set_service_code(2, "01.06");

    for entry in draft.activities() {
        println!("  {} {} -> [{}]", entry.code, entry.description, entry.service_code);
    }

    match draft.snapshot() {
        Ok(registration) => println!(
            "\n{}",
            serde_json::to_string_pretty(&registration).expect("registration serializes")
        ),
        Err(e) => println!("Incomplete form: {e}"),
    }

    // Too few digits is caught before any lookup.
    match validate_cnpj("12.345.678/0001") {
        Ok(cnpj) => println!("Valid: {cnpj}"),
        Err(e) => println!("\nRejected: {e}"),
    }
}
