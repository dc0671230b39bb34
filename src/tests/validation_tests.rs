#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::validation::{validate_checker, validate_quote, Origin};

    #[test]
    fn test_checker_defaults_optional_fields() {
        let payload = validate_checker(&json!({
            "nombre": "Ana",
            "email": "ana@example.com",
            "origen": "Yiwu",
            "destino": "Rosario",
            "unknown": 42
        }))
        .unwrap();

        assert_eq!(payload.nombre, "Ana");
        assert_eq!(payload.telefono, "");
        assert_eq!(payload.producto_descripcion, "");
        assert_eq!(payload.producto_link, "");
        assert_eq!(payload.honeypot, "");
    }

    #[test]
    fn test_checker_issue_order_and_messages() {
        let issues = validate_checker(&json!({
            "nombre": 7,
            "email": "ana@",
            "telefono": null,
            "destino": ""
        }))
        .unwrap_err();

        assert_eq!(
            issues.messages(),
            vec![
                "Expected string, received number",
                "Invalid email",
                "Expected string, received null",
                "Required",
                "String must contain at least 1 character(s)",
            ]
        );
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["nombre", "email", "telefono", "origen", "destino"]);
    }

    #[test]
    fn test_checker_whitespace_counts_as_content() {
        let payload = validate_checker(&json!({
            "nombre": " ",
            "email": "ana@example.com",
            "origen": " ",
            "destino": " "
        }));
        assert!(payload.is_ok());
    }

    #[test]
    fn test_checker_rejects_non_object() {
        let issues = validate_checker(&json!("hola")).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues.first_message(), Some("Expected object, received string"));

        let issues = validate_checker(&json!(null)).unwrap_err();
        assert_eq!(issues.first_message(), Some("Expected object, received null"));
    }

    #[test]
    fn test_quote_accepts_camel_case_weight_and_string_numbers() {
        let request = validate_quote(&json!({
            "nombre": "Ana",
            "email": "ana@example.com",
            "telefono": "123",
            "productos": [{ "descripcion": "Lámpara", "link": "https://shop.example/l" }],
            "bultos": [{ "cantidad": "3", "ancho": "20", "alto": 20, "largo": 20, "pesoKg": 1.25 }],
            "valor_mercaderia_usd": "99.90"
        }))
        .unwrap();

        assert_eq!(request.origen, Origin::China);
        assert_eq!(request.bultos[0].cantidad, 3.0);
        assert_eq!(request.bultos[0].peso_kg, 1.25);
        assert_eq!(request.valor_mercaderia_usd, 99.9);
    }

    #[test]
    fn test_quote_package_labels() {
        let issues = validate_quote(&json!({
            "nombre": "Ana",
            "email": "ana@example.com",
            "telefono": "123",
            "productos": [{ "descripcion": "A", "link": "https://a.example" }],
            "bultos": [
                { "cantidad": 1, "ancho": 10, "alto": 10, "largo": 10, "peso_kg": 1 },
                { "cantidad": 0, "ancho": "x", "alto": -1, "largo": 10, "peso_kg": 0 }
            ],
            "valor_mercaderia_usd": 10
        }))
        .unwrap_err();

        assert_eq!(
            issues.messages(),
            vec![
                "Bulto 2: cantidad",
                "Bulto 2: ancho",
                "Bulto 2: alto",
                "Bulto 2: peso bruto por unidad",
            ]
        );
    }

    #[test]
    fn test_quote_unknown_origin() {
        let issues = validate_quote(&json!({
            "nombre": "Ana",
            "email": "ana@example.com",
            "telefono": "123",
            "origen": "Marte",
            "productos": [{ "descripcion": "A", "link": "https://a.example" }],
            "bultos": [{ "cantidad": 1, "ancho": 10, "alto": 10, "largo": 10, "peso_kg": 1 }],
            "valor_mercaderia_usd": 10
        }))
        .unwrap_err();

        assert_eq!(issues.messages(), vec!["País de origen"]);
    }

    #[test]
    fn test_quote_invalid_email_uses_field_label() {
        let issues = validate_quote(&json!({
            "nombre": "Ana",
            "email": "no-es-un-mail",
            "telefono": "123",
            "productos": [{ "descripcion": "A", "link": "https://a.example" }],
            "bultos": [{ "cantidad": 1, "ancho": 10, "alto": 10, "largo": 10, "peso_kg": 1 }],
            "valor_mercaderia_usd": 10
        }))
        .unwrap_err();

        assert_eq!(issues.first_message(), Some("Correo electrónico"));
        assert_eq!(issues.len(), 1);
    }
}
