use serde::Serialize;

// ---------------------------------------------------------------------------
// Semantic fields
// ---------------------------------------------------------------------------

/// Semantic fields the engine reads from an origin row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Sku,
    Parent,
    Title,
    Cat,
    Price,
    Fin,
    Um,
    Mat,
    Dim,
    Glass,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Sku,
        Field::Parent,
        Field::Title,
        Field::Cat,
        Field::Price,
        Field::Fin,
        Field::Um,
        Field::Mat,
        Field::Dim,
        Field::Glass,
    ];

    /// Fields without which no output row can be built.
    pub const REQUIRED: [Field; 3] = [Field::Sku, Field::Title, Field::Cat];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Sku => "sku",
            Self::Parent => "parent",
            Self::Title => "title",
            Self::Cat => "cat",
            Self::Price => "price",
            Self::Fin => "fin",
            Self::Um => "um",
            Self::Mat => "mat",
            Self::Dim => "dim",
            Self::Glass => "glass",
        }
    }

    /// Header name candidates, most specific first.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Self::Sku => &["sku"],
            Self::Parent => &["parent_sku", "parent sku", "parent"],
            Self::Title => &["post_title", "titolo"],
            Self::Cat => &["categoria", "product_cat"],
            Self::Price => &["regular_price", "price"],
            Self::Fin => &["meta:attribute_pa_finitura", "finitura"],
            Self::Um => &["um"],
            Self::Mat => &["materiale"],
            Self::Dim => &["dimensione", "size"],
            Self::Glass => &["per vetro", "vetro"],
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ---------------------------------------------------------------------------
// Column map
// ---------------------------------------------------------------------------

/// Semantic field → origin header name. Built once per load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub sku: Option<String>,
    pub parent: Option<String>,
    pub title: Option<String>,
    pub cat: Option<String>,
    pub price: Option<String>,
    pub fin: Option<String>,
    pub um: Option<String>,
    pub mat: Option<String>,
    pub dim: Option<String>,
    pub glass: Option<String>,
}

impl ColumnMap {
    pub fn get(&self, field: Field) -> Option<&str> {
        let slot = match field {
            Field::Sku => &self.sku,
            Field::Parent => &self.parent,
            Field::Title => &self.title,
            Field::Cat => &self.cat,
            Field::Price => &self.price,
            Field::Fin => &self.fin,
            Field::Um => &self.um,
            Field::Mat => &self.mat,
            Field::Dim => &self.dim,
            Field::Glass => &self.glass,
        };
        slot.as_deref()
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Sku => &mut self.sku,
            Field::Parent => &mut self.parent,
            Field::Title => &mut self.title,
            Field::Cat => &mut self.cat,
            Field::Price => &mut self.price,
            Field::Fin => &mut self.fin,
            Field::Um => &mut self.um,
            Field::Mat => &mut self.mat,
            Field::Dim => &mut self.dim,
            Field::Glass => &mut self.glass,
        }
    }

    /// Required fields that did not resolve, in declaration order.
    pub fn missing_required(&self) -> Vec<Field> {
        Field::REQUIRED
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Find the header matching the first candidate that matches anything.
///
/// Per candidate: exact (case-insensitive) match over all headers, then
/// substring containment over all headers. Within a pass the first header
/// in order wins.
fn find_column<'h>(headers: &'h [String], candidates: &[&str]) -> Option<&'h str> {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    for candidate in candidates {
        let needle = candidate.to_lowercase();
        if let Some(idx) = lowered.iter().position(|h| *h == needle) {
            return Some(&headers[idx]);
        }
        if let Some(idx) = lowered.iter().position(|h| h.contains(&needle)) {
            return Some(&headers[idx]);
        }
    }
    None
}

/// Map a free-form header list onto the engine's semantic fields.
///
/// Unmatched fields stay `None`; deciding whether that is fatal is up to the
/// caller.
pub fn resolve_columns(headers: &[String]) -> ColumnMap {
    let mut map = ColumnMap::default();
    for field in Field::ALL {
        let found = find_column(headers, field.candidates()).map(str::to_string);
        log::debug!("column {field} -> {found:?}");
        *map.slot_mut(field) = found;
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn woocommerce_export_headers() {
        let h = headers(&[
            "ID",
            "post_title",
            "SKU",
            "parent_sku",
            "regular_price",
            "product_cat",
            "meta:attribute_pa_finitura",
            "UM",
            "Materiale",
            "Dimensione",
            "Per Vetro",
        ]);
        let map = resolve_columns(&h);
        assert_eq!(map.sku.as_deref(), Some("SKU"));
        assert_eq!(map.parent.as_deref(), Some("parent_sku"));
        assert_eq!(map.title.as_deref(), Some("post_title"));
        assert_eq!(map.cat.as_deref(), Some("product_cat"));
        assert_eq!(map.price.as_deref(), Some("regular_price"));
        assert_eq!(map.fin.as_deref(), Some("meta:attribute_pa_finitura"));
        assert_eq!(map.um.as_deref(), Some("UM"));
        assert_eq!(map.mat.as_deref(), Some("Materiale"));
        assert_eq!(map.dim.as_deref(), Some("Dimensione"));
        assert_eq!(map.glass.as_deref(), Some("Per Vetro"));
        assert!(map.missing_required().is_empty());
    }

    #[test]
    fn exact_match_beats_earlier_substring_for_same_candidate() {
        // "parent_sku" appears in both; exact wins although the other comes first.
        let h = headers(&["meta:parent_sku_old", "parent_sku", "sku"]);
        let map = resolve_columns(&h);
        assert_eq!(map.parent.as_deref(), Some("parent_sku"));
        assert_eq!(map.sku.as_deref(), Some("sku"));
    }

    #[test]
    fn earlier_candidate_substring_beats_later_candidate_exact() {
        let h = headers(&["sku", "Parent", "meta:parent_sku"]);
        let map = resolve_columns(&h);
        assert_eq!(map.parent.as_deref(), Some("meta:parent_sku"));
    }

    #[test]
    fn substring_fallback() {
        let h = headers(&["Codice SKU", "Titolo prodotto", "Categoria principale", "Prezzo / price"]);
        let map = resolve_columns(&h);
        assert_eq!(map.sku.as_deref(), Some("Codice SKU"));
        assert_eq!(map.title.as_deref(), Some("Titolo prodotto"));
        assert_eq!(map.cat.as_deref(), Some("Categoria principale"));
        assert_eq!(map.price.as_deref(), Some("Prezzo / price"));
        assert_eq!(map.parent, None);
    }

    #[test]
    fn missing_required_in_order() {
        let map = resolve_columns(&headers(&["price", "finitura"]));
        assert_eq!(map.missing_required(), vec![Field::Sku, Field::Title, Field::Cat]);
        let map = resolve_columns(&headers(&["sku", "categoria"]));
        assert_eq!(map.missing_required(), vec![Field::Title]);
    }

    #[test]
    fn empty_header_list() {
        assert_eq!(resolve_columns(&[]), ColumnMap::default());
    }

    proptest! {
        #[test]
        fn header_order_does_not_change_choice(seed in any::<u64>(), upper in any::<bool>()) {
            let mut h = headers(&[
                "sku", "parent_sku", "post_title", "categoria", "regular_price",
                "finitura", "um", "materiale", "dimensione", "per vetro",
            ]);
            if upper {
                h = h.into_iter().map(|s| s.to_uppercase()).collect();
            }
            let baseline = resolve_columns(&h);

            // Deterministic Fisher-Yates driven by the seed.
            let mut state = seed;
            for i in (1..h.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                h.swap(i, j);
            }
            prop_assert_eq!(resolve_columns(&h), baseline);
        }
    }
}
