#[cfg(test)]
mod tests {
    use crate::config::AppConfig;
    use crate::freight::{round2, strip_product_label, totals, QuoteDocument};
    use crate::validation::{Origin, Package, Product, QuoteRequest};

    fn package(cantidad: f64, ancho: f64, alto: f64, largo: f64, peso_kg: f64) -> Package {
        Package { cantidad, ancho, alto, largo, peso_kg }
    }

    #[test]
    fn test_round2_half_up() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(0.124), 0.12);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(12.0), 12.0);
    }

    #[test]
    fn test_volumetric_weight_wins_for_bulky_boxes() {
        let t = totals(&[package(1.0, 60.0, 50.0, 40.0, 5.0)]);
        assert_eq!(t.peso_bruto_kg, 5.0);
        assert_eq!(t.peso_volumetrico_kg, 24.0);
        assert_eq!(t.peso_aplicable_kg, 24.0);
    }

    #[test]
    fn test_gross_weight_wins_for_dense_boxes() {
        let t = totals(&[package(2.0, 10.0, 10.0, 10.0, 7.5), package(1.0, 20.0, 10.0, 10.0, 1.0)]);
        assert_eq!(t.peso_bruto_kg, 16.0);
        assert_eq!(t.peso_volumetrico_kg, 0.8);
        assert_eq!(t.peso_aplicable_kg, 16.0);
    }

    #[test]
    fn test_negative_quantity_counts_as_zero() {
        let t = totals(&[package(-3.0, 10.0, 10.0, 10.0, 2.0)]);
        assert_eq!(t.peso_bruto_kg, 0.0);
        assert_eq!(t.peso_aplicable_kg, 0.0);
        assert_eq!(totals(&[]).peso_aplicable_kg, 0.0);
    }

    #[test]
    fn test_strip_product_label() {
        assert_eq!(strip_product_label("Producto 1: Auriculares"), "Auriculares");
        assert_eq!(strip_product_label("Producto 12:Cables"), "Cables");
        assert_eq!(strip_product_label("Producto 3:   "), "");
        assert_eq!(strip_product_label("Producto: sin número"), "Producto: sin número");
        assert_eq!(strip_product_label("Producto 4 sin dos puntos"), "Producto 4 sin dos puntos");
        assert_eq!(strip_product_label("Teclado"), "Teclado");
    }

    #[test]
    fn test_document_build() {
        let cfg = AppConfig::default();
        let request = QuoteRequest {
            nombre: " Ana ".to_string(),
            email: "ana@example.com ".to_string(),
            telefono: "123".to_string(),
            origen: Origin::Other(" Vietnam ".to_string()),
            productos: vec![
                Product { descripcion: "Producto 1: Mouse".to_string(), link: " https://a.example ".to_string() },
                Product { descripcion: "  ".to_string(), link: "https://b.example".to_string() },
            ],
            bultos: vec![package(1.0, 10.0, 10.0, 10.0, 3.0)],
            valor_mercaderia_usd: 120.0,
        };

        let doc = QuoteDocument::build(request, &cfg.quote);

        assert_eq!(doc.origen, "courier-quote");
        assert_eq!(doc.pais_origen, "Vietnam");
        assert_eq!(doc.pais_destino, "Argentina");
        assert_eq!(doc.contacto.nombre, "Ana");
        assert_eq!(doc.contacto.email, "ana@example.com");
        assert_eq!(doc.productos[0].descripcion, "Mouse");
        assert_eq!(doc.productos[0].link, "https://a.example");
        assert_eq!(doc.productos[1].descripcion, "Producto 2");
        assert_eq!(doc.totales.peso_aplicable_kg, 3.0);
        assert!(chrono::DateTime::parse_from_rfc3339(&doc.timestamp).is_ok());
    }
}
