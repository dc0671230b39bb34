use serde::Serialize;
use serde_json::{Map, Value};

use super::{coerce_number, expect_object, is_email, is_positive, Issues};
use crate::freight;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    China,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub descripcion: String,
    pub link: String,
}

/// One line of packages: `cantidad` identical boxes of the given size (cm) and weight (kg).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Package {
    pub cantidad: f64,
    pub ancho: f64,
    pub alto: f64,
    pub largo: f64,
    #[serde(rename = "pesoKg")]
    pub peso_kg: f64,
}

/// A complete courier quote request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub nombre: String,
    pub email: String,
    pub telefono: String,
    pub origen: Origin,
    pub productos: Vec<Product>,
    pub bultos: Vec<Package>,
    pub valor_mercaderia_usd: f64,
}

fn text<'a>(map: &'a Map<String, Value>, key: &str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or("")
}

fn items<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    map.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

fn peso(value: &Value) -> Option<&Value> {
    value.get("peso_kg").or_else(|| value.get("pesoKg"))
}

fn package(value: &Value) -> Package {
    let n = |key: &str| coerce_number(value.get(key));
    Package {
        cantidad: n("cantidad"),
        ancho: n("ancho"),
        alto: n("alto"),
        largo: n("largo"),
        peso_kg: coerce_number(peso(value)),
    }
}

/// Validate a quote body.
///
/// Every missing or non-positive field is reported under the label the form shows
/// next to it, in on-screen order, so the client can list them all at once.
pub fn validate_quote(body: &Value) -> Result<QuoteRequest, Issues> {
    let map = expect_object(body)?;
    let mut issues = Issues::new();

    let nombre = text(map, "nombre");
    let email = text(map, "email");
    let telefono = text(map, "telefono");
    if nombre.trim().is_empty() {
        issues.push("nombre", "Nombre");
    }
    if !is_email(email.trim()) {
        issues.push("email", "Correo electrónico");
    }
    if telefono.trim().is_empty() {
        issues.push("telefono", "Teléfono");
    }

    let origen = match map.get("origen").and_then(Value::as_str).unwrap_or("China") {
        "China" => Origin::China,
        "Otro" => {
            let country = text(map, "otro_pais");
            if country.trim().is_empty() {
                issues.push("otro_pais", "País de origen");
            }
            Origin::Other(country.to_string())
        }
        _ => {
            issues.push("origen", "País de origen");
            Origin::Other(String::new())
        }
    };

    let raw_products = items(map, "productos");
    if raw_products.is_empty() {
        issues.push("productos", "Productos");
    }
    let mut productos = Vec::with_capacity(raw_products.len());
    for (i, raw) in raw_products.iter().enumerate() {
        let n = i + 1;
        let descripcion = raw.get("descripcion").and_then(Value::as_str).unwrap_or("");
        let link = raw.get("link").and_then(Value::as_str).unwrap_or("");
        if descripcion.trim().is_empty() {
            issues.push(format!("productos.{}.descripcion", i), format!("Producto {}: descripción", n));
        }
        if link.trim().is_empty() {
            issues.push(format!("productos.{}.link", i), format!("Producto {}: link", n));
        }
        productos.push(Product { descripcion: descripcion.to_string(), link: link.to_string() });
    }

    let raw_packages = items(map, "bultos");
    if raw_packages.is_empty() {
        issues.push("bultos", "Bultos");
    }
    // Required quantities must be numeric as a whole; totals use the lenient reading.
    for (i, raw) in raw_packages.iter().enumerate() {
        let n = i + 1;
        let checks = [
            ("cantidad", raw.get("cantidad"), "cantidad"),
            ("ancho", raw.get("ancho"), "ancho"),
            ("alto", raw.get("alto"), "alto"),
            ("largo", raw.get("largo"), "largo"),
            ("peso_kg", peso(raw), "peso bruto por unidad"),
        ];
        for (key, value, label) in checks {
            if !is_positive(value) {
                issues.push(format!("bultos.{}.{}", i, key), format!("Bulto {}: {}", n, label));
            }
        }
    }

    let bultos: Vec<Package> = raw_packages.iter().map(package).collect();
    let totales = freight::totals(&bultos);
    if totales.peso_bruto_kg <= 0.0 {
        issues.push("totales.peso_bruto_kg", "Peso bruto total");
    }
    if totales.peso_aplicable_kg <= 0.0 {
        issues.push("totales.peso_aplicable_kg", "Peso aplicable");
    }

    let valor_mercaderia_usd = coerce_number(map.get("valor_mercaderia_usd"));
    if !is_positive(map.get("valor_mercaderia_usd")) {
        issues.push("valor_mercaderia_usd", "Valor de la mercadería (USD)");
    }

    if !issues.is_empty() {
        return Err(issues);
    }

    Ok(QuoteRequest {
        nombre: nombre.to_string(),
        email: email.to_string(),
        telefono: telefono.to_string(),
        origen,
        productos,
        bultos,
        valor_mercaderia_usd,
    })
}
