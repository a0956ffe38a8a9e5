use crate::catalog::OriginRow;
use crate::columns::{ColumnMap, Field};
use crate::price::normalize_price;
use crate::schema::{variant_columns, OutputRow, CODICE_ARTICOLO, VARIANT_SLOTS};

/// Path templates for the synthetic asset columns: `<prefix><sku>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub image_prefix: String,
    pub image_ext: String,
    pub sheet_prefix: String,
    pub sheet_ext: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            image_prefix: "singoli-componenti/images/".into(),
            image_ext: "png".into(),
            sheet_prefix: "singoli-componenti/pdf/".into(),
            sheet_ext: "pdf".into(),
        }
    }
}

impl AssetPaths {
    /// Image path for `sku`; empty when `sku` is empty.
    pub fn image(&self, sku: &str) -> String {
        template(&self.image_prefix, sku, &self.image_ext)
    }

    /// Technical sheet path for `sku`; empty when `sku` is empty.
    pub fn sheet(&self, sku: &str) -> String {
        template(&self.sheet_prefix, sku, &self.sheet_ext)
    }
}

fn template(prefix: &str, sku: &str, ext: &str) -> String {
    if sku.is_empty() {
        String::new()
    } else {
        format!("{prefix}{sku}.{ext}")
    }
}

/// Main-row fields copied verbatim (trimmed) into the output.
const MAIN_FIELDS: [(&str, Field); 6] = [
    ("Categoria", Field::Cat),
    ("Nome Articolo", Field::Title),
    ("Dimensione", Field::Dim),
    ("Per Vetro", Field::Glass),
    ("Materiale", Field::Mat),
    ("UM", Field::Um),
];

/// Build one output row from a product group, using the default asset paths.
///
/// Returns the row and how many variants beyond the fifth were dropped.
pub fn build_output_row(
    main: &OriginRow,
    variants: &[&OriginRow],
    columns: &ColumnMap,
) -> (OutputRow, usize) {
    build_output_row_with(main, variants, columns, &AssetPaths::default())
}

pub fn build_output_row_with(
    main: &OriginRow,
    variants: &[&OriginRow],
    columns: &ColumnMap,
    assets: &AssetPaths,
) -> (OutputRow, usize) {
    let mut row = OutputRow::empty();

    let codice = main.field(columns, Field::Sku);
    row.set(CODICE_ARTICOLO, codice);
    row.set("@image_01", assets.image(codice));
    row.set("@image_scheda", assets.sheet(codice));

    for (column, field) in MAIN_FIELDS {
        row.set(column, main.field(columns, field));
    }

    for (i, variant) in variants.iter().take(VARIANT_SLOTS).enumerate() {
        let [cod, price, fin, image] = variant_columns(i + 1);
        let sku = variant.field(columns, Field::Sku);
        row.set(&cod, sku);
        row.set(&price, normalize_price(variant.raw_field(columns, Field::Price)));
        row.set(&fin, variant.field(columns, Field::Fin));
        row.set(&image, assets.image(sku));
    }

    let overflow = variants.len().saturating_sub(VARIANT_SLOTS);
    if overflow > 0 {
        log::warn!("{codice}: {overflow} variant(s) beyond the first {VARIANT_SLOTS} dropped");
    }

    (row, overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::resolve_columns;

    const HEADERS: [&str; 10] = [
        "sku",
        "parent_sku",
        "post_title",
        "categoria",
        "regular_price",
        "meta:attribute_pa_finitura",
        "dimensione",
        "per vetro",
        "materiale",
        "um",
    ];

    fn columns() -> ColumnMap {
        let headers: Vec<String> = HEADERS.iter().map(|s| s.to_string()).collect();
        resolve_columns(&headers)
    }

    fn row(values: [&str; 10]) -> OriginRow {
        OriginRow::from_pairs(HEADERS.iter().copied().zip(values))
    }

    fn main_row() -> OriginRow {
        row(["PARENT1", "", " Titolo Parent 1 ", "Categoria A", "", "Finitura base", "L", "Si", "Acciaio", "PZ"])
    }

    fn variant(sku: &str, price: &str, fin: &str) -> OriginRow {
        row([sku, "PARENT1", "Variante", "Categoria A", price, fin, "L", "Si", "Acciaio", "PZ"])
    }

    #[test]
    fn main_fields_and_assets() {
        let main = main_row();
        let (out, overflow) = build_output_row(&main, &[], &columns());
        assert_eq!(overflow, 0);
        assert_eq!(out.codice_articolo(), "PARENT1");
        assert_eq!(out.get("Nome Articolo"), Some("Titolo Parent 1"));
        assert_eq!(out.get("Categoria"), Some("Categoria A"));
        assert_eq!(out.get("Dimensione"), Some("L"));
        assert_eq!(out.get("Per Vetro"), Some("Si"));
        assert_eq!(out.get("Materiale"), Some("Acciaio"));
        assert_eq!(out.get("UM"), Some("PZ"));
        assert_eq!(out.get("@image_01"), Some("singoli-componenti/images/PARENT1.png"));
        assert_eq!(out.get("@image_scheda"), Some("singoli-componenti/pdf/PARENT1.pdf"));
        assert_eq!(out.get("Prodotto"), Some(""));
        assert_eq!(out.get("Sottotitolo"), Some(""));
        assert_eq!(out.get("@image_SchedeTecniche"), Some(""));
        assert_eq!(out.get("cod1"), Some(""));
    }

    #[test]
    fn variant_slots() {
        let main = main_row();
        let v1 = variant("VAR1", "1234,56", "Finitura 1");
        let v2 = variant("VAR2", "1.234,56", " Finitura 2 ");
        let v3 = variant("VAR3", "n.d.", "Finitura 3");
        let (out, overflow) = build_output_row(&main, &[&v1, &v2, &v3], &columns());
        assert_eq!(overflow, 0);
        assert_eq!(out.get("cod1"), Some("VAR1"));
        assert_eq!(out.get("Prezzo_cod1"), Some("1234.56"));
        assert_eq!(out.get("fin1"), Some("Finitura 1"));
        assert_eq!(out.get("@image_fin1"), Some("singoli-componenti/images/VAR1.png"));
        assert_eq!(out.get("Prezzo_cod2"), Some("1234.56"));
        assert_eq!(out.get("fin2"), Some("Finitura 2"));
        assert_eq!(out.get("Prezzo_cod3"), Some(""));
        assert_eq!(out.get("cod4"), Some(""));
        assert_eq!(out.filled_slots(), 3);
    }

    #[test]
    fn overflow_counts_dropped_variants() {
        let main = main_row();
        let variants: Vec<OriginRow> = (1..=7).map(|i| variant(&format!("V{i}"), "10", "")).collect();
        let refs: Vec<&OriginRow> = variants.iter().collect();
        let (out, overflow) = build_output_row(&main, &refs, &columns());
        assert_eq!(overflow, 2);
        assert_eq!(out.get("cod5"), Some("V5"));
        assert_eq!(out.filled_slots(), 5);
        assert!(out.values().iter().all(|v| v != "V6" && v != "V7"));
    }

    #[test]
    fn empty_skus_leave_paths_empty() {
        let main = row(["", "", "T", "C", "", "", "", "", "", ""]);
        let v = variant("", "5", "F");
        let (out, _) = build_output_row(&main, &[&v], &columns());
        assert_eq!(out.get("@image_01"), Some(""));
        assert_eq!(out.get("@image_scheda"), Some(""));
        assert_eq!(out.get("@image_fin1"), Some(""));
        assert_eq!(out.get("Prezzo_cod1"), Some("5.00"));
    }

    #[test]
    fn unresolved_fields_are_empty() {
        let headers = vec!["sku".to_string(), "titolo".to_string(), "categoria".to_string()];
        let columns = resolve_columns(&headers);
        let main = OriginRow::from_pairs([("sku", "A1"), ("titolo", "T"), ("categoria", "C")]);
        let v = OriginRow::from_pairs([("sku", "A1-V1"), ("titolo", "T"), ("categoria", "C")]);
        let (out, _) = build_output_row(&main, &[&v], &columns);
        assert_eq!(out.get("Prezzo_cod1"), Some(""));
        assert_eq!(out.get("fin1"), Some(""));
        assert_eq!(out.get("UM"), Some(""));
    }

    #[test]
    fn custom_asset_paths() {
        let assets = AssetPaths {
            image_prefix: "img/".into(),
            image_ext: "webp".into(),
            sheet_prefix: "docs/".into(),
            sheet_ext: "pdf".into(),
        };
        let (out, _) = build_output_row_with(&main_row(), &[], &columns(), &assets);
        assert_eq!(out.get("@image_01"), Some("img/PARENT1.webp"));
        assert_eq!(out.get("@image_scheda"), Some("docs/PARENT1.pdf"));
    }
}
