//! Session accumulator: the ordered output table built up by add operations.
//!
//! Each operation runs to completion against `&mut Session`; the catalog is
//! passed in read-only so one load can serve many sessions.

use crate::catalog::Catalog;
use crate::error::MapError;
use crate::group::{collect_group, find_main, MainLookup};
use crate::mapper::{build_output_row_with, AssetPaths};
use crate::schema::OutputRow;

/// A successful add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    /// `Codice Articolo` of the appended row.
    pub codice: String,
    /// Variants dropped beyond the fifth slot.
    pub overflow: usize,
}

impl Added {
    /// Non-fatal warning to surface alongside the success, if any.
    pub fn warning(&self) -> Option<String> {
        (self.overflow > 0).then(|| {
            format!(
                "variants beyond the first 5 ignored for {}: {} excluded",
                self.codice, self.overflow
            )
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    rows: Vec<OutputRow>,
    assets: AssetPaths,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(assets: AssetPaths) -> Self {
        Self { rows: Vec::new(), assets }
    }

    pub fn assets(&self) -> &AssetPaths {
        &self.assets
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, codice: &str) -> bool {
        self.rows.iter().any(|r| r.codice_articolo() == codice)
    }

    /// Locate the group for `code`, map it, and append it to the table.
    ///
    /// The table is untouched on every error, including `Duplicate`.
    pub fn add_by_code(&mut self, code: &str, catalog: &Catalog) -> Result<Added, MapError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(MapError::EmptyCode);
        }
        catalog.ensure_usable()?;

        let rows = catalog.rows();
        let columns = catalog.columns();
        let main_idx = match find_main(code, rows, columns) {
            MainLookup::Found(idx) => idx,
            MainLookup::NotFound => return Err(MapError::NotFound { code: code.into() }),
            MainLookup::Unanchored(_) => return Err(MapError::Unanchored { code: code.into() }),
        };

        let Some((main, variants)) = collect_group(main_idx, rows, columns) else {
            return Err(MapError::NotFound { code: code.into() });
        };
        let (row, overflow) = build_output_row_with(main, &variants, columns, &self.assets);

        let codice = row.codice_articolo().to_string();
        if codice.is_empty() {
            return Err(MapError::EmptyMainSku { code: code.into() });
        }
        if self.contains(&codice) {
            return Err(MapError::Duplicate { codice });
        }

        log::info!("added {codice} ({} variants) for code {code}", variants.len());
        self.rows.push(row);
        Ok(Added { codice, overflow })
    }

    /// Remove the row at `index` (0-based).
    pub fn remove(&mut self, index: usize) -> Result<OutputRow, MapError> {
        if index >= self.rows.len() {
            return Err(MapError::RowOutOfRange { index, len: self.rows.len() });
        }
        Ok(self.rows.remove(index))
    }

    /// Drop every row; returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let n = self.rows.len();
        self.rows.clear();
        n
    }

    /// Rows ready for export; `EmptyTable` when nothing was added.
    pub fn export_rows(&self) -> Result<&[OutputRow], MapError> {
        if self.rows.is_empty() {
            return Err(MapError::EmptyTable);
        }
        Ok(&self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OriginRow;

    fn catalog(rows: &[(&str, &str)]) -> Catalog {
        let headers = ["sku", "parent_sku", "post_title", "categoria"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = rows
            .iter()
            .map(|(sku, parent)| {
                OriginRow::from_pairs([
                    ("sku", *sku),
                    ("parent_sku", *parent),
                    ("post_title", "Titolo"),
                    ("categoria", "Cat"),
                ])
            })
            .collect();
        Catalog::new(headers, rows).unwrap()
    }

    #[test]
    fn empty_code_is_rejected() {
        let cat = catalog(&[("A1", "")]);
        let mut s = Session::new();
        assert_eq!(s.add_by_code("   ", &cat), Err(MapError::EmptyCode));
        assert!(s.is_empty());
    }

    #[test]
    fn variant_code_adds_parent_group() {
        let cat = catalog(&[("A1", ""), ("A1-V1", "A1"), ("B1", "")]);
        let mut s = Session::new();
        let added = s.add_by_code(" A1-V1 ", &cat).unwrap();
        assert_eq!(added, Added { codice: "A1".into(), overflow: 0 });
        assert!(added.warning().is_none());
        assert!(s.contains("A1"));
    }

    #[test]
    fn duplicate_leaves_table_unchanged() {
        let cat = catalog(&[("A1", ""), ("A1-V1", "A1")]);
        let mut s = Session::new();
        s.add_by_code("A1", &cat).unwrap();
        let err = s.add_by_code("A1-V1", &cat).unwrap_err();
        assert_eq!(err, MapError::Duplicate { codice: "A1".into() });
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn orphan_variant_is_reported() {
        let cat = catalog(&[("V1", "X"), ("B1", "")]);
        let mut s = Session::new();
        assert_eq!(
            s.add_by_code("V1", &cat),
            Err(MapError::Unanchored { code: "V1".into() })
        );
    }

    #[test]
    fn catalog_without_required_columns_blocks_adds() {
        let headers = vec!["sku".to_string()];
        let cat = Catalog::new(headers, vec![OriginRow::from_pairs([("sku", "A1")])]).unwrap();
        let mut s = Session::new();
        let err = s.add_by_code("A1", &cat).unwrap_err();
        assert!(err.is_session_fatal());
        assert!(s.is_empty());
    }

    #[test]
    fn overflow_warning_text() {
        let added = Added { codice: "A1".into(), overflow: 2 };
        assert_eq!(
            added.warning().as_deref(),
            Some("variants beyond the first 5 ignored for A1: 2 excluded")
        );
    }

    #[test]
    fn remove_and_clear() {
        let cat = catalog(&[("A1", ""), ("B1", ""), ("C1", "")]);
        let mut s = Session::new();
        for code in ["A1", "B1", "C1"] {
            s.add_by_code(code, &cat).unwrap();
        }
        let removed = s.remove(1).unwrap();
        assert_eq!(removed.codice_articolo(), "B1");
        assert_eq!(s.remove(5), Err(MapError::RowOutOfRange { index: 5, len: 2 }));
        assert_eq!(s.clear(), 2);
        assert_eq!(s.export_rows(), Err(MapError::EmptyTable));
    }
}
