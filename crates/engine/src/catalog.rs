use std::collections::HashMap;

use crate::columns::{resolve_columns, ColumnMap, Field};
use crate::error::MapError;

// ---------------------------------------------------------------------------
// Origin row
// ---------------------------------------------------------------------------

/// A single record from the origin export, keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginRow {
    pub fields: HashMap<String, String>,
}

impl OriginRow {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Build a row from `(header, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    /// Trimmed value of a semantic field; empty when unresolved or missing.
    pub fn field<'a>(&'a self, columns: &ColumnMap, field: Field) -> &'a str {
        columns
            .get(field)
            .and_then(|header| self.get(header))
            .map(str::trim)
            .unwrap_or("")
    }

    /// Raw (untrimmed) value of a semantic field, if present.
    pub fn raw_field<'a>(&'a self, columns: &ColumnMap, field: Field) -> Option<&'a str> {
        columns.get(field).and_then(|header| self.get(header))
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Loaded origin rows plus their resolved column map. Read-only once built.
///
/// Row order is the origin order; variant grouping depends on it, so rows
/// must not be reordered between load and use.
#[derive(Debug, Clone)]
pub struct Catalog {
    headers: Vec<String>,
    rows: Vec<OriginRow>,
    columns: ColumnMap,
}

impl Catalog {
    /// Drop blank rows, resolve columns, and reject unusable datasets.
    pub fn new(headers: Vec<String>, rows: Vec<OriginRow>) -> Result<Self, MapError> {
        let total = rows.len();
        let rows: Vec<OriginRow> = rows.into_iter().filter(|r| !r.is_blank()).collect();
        if rows.len() < total {
            log::debug!("discarded {} blank origin rows", total - rows.len());
        }
        if rows.is_empty() {
            return Err(MapError::NoRows);
        }

        let columns = resolve_columns(&headers);
        if columns.sku.is_none() {
            return Err(MapError::MissingSkuColumn);
        }

        Ok(Self { headers, rows, columns })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[OriginRow] {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn missing_required(&self) -> Vec<Field> {
        self.columns.missing_required()
    }

    /// `Err(MissingColumns)` when the catalog cannot produce output rows.
    pub fn ensure_usable(&self) -> Result<(), MapError> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MapError::MissingColumns(missing))
        }
    }
}
