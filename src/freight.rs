//! Courier weight arithmetic and the outbound quote document.

use serde::Serialize;

use crate::config::QuoteConfig;
use crate::validation::{Origin, Package, Product, QuoteRequest};

/// cm³ per chargeable kilogram.
pub const VOLUMETRIC_DIVISOR: f64 = 5000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub peso_bruto_kg: f64,
    pub peso_volumetrico_kg: f64,
    pub peso_aplicable_kg: f64,
}

/// Round half up to two decimals.
pub fn round2(n: f64) -> f64 {
    (n * 100.0 + 0.5).floor() / 100.0
}

/// Gross, volumetric and chargeable weight over all packages.
///
/// Negative quantities count as zero. The chargeable weight is the larger of the
/// two rounded totals.
pub fn totals(packages: &[Package]) -> Totals {
    let (bruto, vol) = packages.iter().fold((0.0, 0.0), |(bruto, vol), p| {
        let cantidad = p.cantidad.max(0.0);
        let unit_vol = p.ancho * p.alto * p.largo / VOLUMETRIC_DIVISOR;
        let unit_vol = if unit_vol.is_finite() { unit_vol } else { 0.0 };
        (bruto + cantidad * p.peso_kg, vol + cantidad * unit_vol)
    });
    let bruto = round2(bruto);
    let vol = round2(vol);
    Totals {
        peso_bruto_kg: bruto,
        peso_volumetrico_kg: vol,
        peso_aplicable_kg: round2(bruto.max(vol)),
    }
}

/// Drop a leading `Producto <n>:` label the form may have prefilled.
pub fn strip_product_label(descripcion: &str) -> &str {
    let Some(rest) = descripcion.strip_prefix("Producto ") else {
        return descripcion;
    };
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return descripcion;
    }
    match rest[digits..].strip_prefix(':') {
        Some(tail) => tail.trim_start(),
        None => descripcion,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Contact {
    pub nombre: String,
    pub email: String,
    pub telefono: String,
}

/// The document posted to the quote webhook (before `_meta` is attached).
#[derive(Debug, Clone, Serialize)]
pub struct QuoteDocument {
    pub timestamp: String,
    pub origen: String,
    pub contacto: Contact,
    pub pais_origen: String,
    pub pais_destino: String,
    pub productos: Vec<Product>,
    pub bultos: Vec<Package>,
    pub totales: Totals,
    pub valor_mercaderia_usd: f64,
}

impl QuoteDocument {
    pub fn build(request: QuoteRequest, cfg: &QuoteConfig) -> Self {
        let totales = totals(&request.bultos);
        let productos = request
            .productos
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let descripcion = match strip_product_label(p.descripcion.trim()) {
                    "" => format!("Producto {}", i + 1),
                    d => d.to_string(),
                };
                Product { descripcion, link: p.link.trim().to_string() }
            })
            .collect();
        let pais_origen = match request.origen {
            Origin::China => "China".to_string(),
            Origin::Other(country) => country.trim().to_string(),
        };

        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            origen: cfg.source_tag.clone(),
            contacto: Contact {
                nombre: request.nombre.trim().to_string(),
                email: request.email.trim().to_string(),
                telefono: request.telefono.trim().to_string(),
            },
            pais_origen,
            pais_destino: cfg.destination_country.clone(),
            productos,
            bultos: request.bultos,
            totales,
            valor_mercaderia_usd: request.valor_mercaderia_usd,
        }
    }
}
