use std::fmt;

use crate::columns::Field;

/// How a shell should present a [`MapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// Origin dataset has no rows left after discarding blank ones.
    NoRows,
    /// No header resolved to the `sku` field.
    MissingSkuColumn,
    /// Required fields (`sku`, `title`, `cat`) that did not resolve.
    MissingColumns(Vec<Field>),
    /// Requested code is empty after trimming.
    EmptyCode,
    /// No origin row carries the requested SKU.
    NotFound { code: String },
    /// The requested SKU is a variant with no main row before it.
    Unanchored { code: String },
    /// The main row located for the code has an empty SKU.
    EmptyMainSku { code: String },
    /// The derived `Codice Articolo` is already in the table.
    Duplicate { codice: String },
    /// Row index passed to `remove` does not exist.
    RowOutOfRange { index: usize, len: usize },
    /// Export requested with no accumulated rows.
    EmptyTable,
}

impl MapError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Duplicate { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether the condition blocks every further operation on the catalog.
    pub fn is_session_fatal(&self) -> bool {
        matches!(self, Self::NoRows | Self::MissingSkuColumn | Self::MissingColumns(_))
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRows => write!(f, "origin dataset is empty (no non-blank rows)"),
            Self::MissingSkuColumn => write!(f, "no SKU column found in the origin header"),
            Self::MissingColumns(fields) => {
                let names: Vec<&str> = fields.iter().map(|f| f.key()).collect();
                write!(f, "required columns missing from origin: {}", names.join(", "))
            }
            Self::EmptyCode => write!(f, "enter a non-empty code before adding"),
            Self::NotFound { code } => write!(f, "code '{code}' not found in origin"),
            Self::Unanchored { code } => {
                write!(f, "code '{code}' is a variant with no main row before it")
            }
            Self::EmptyMainSku { code } => {
                write!(f, "main row for code '{code}' has an empty SKU")
            }
            Self::Duplicate { codice } => write!(f, "code '{codice}' is already in the table"),
            Self::RowOutOfRange { index, len } => {
                write!(f, "row {index} out of range (table has {len} rows)")
            }
            Self::EmptyTable => write!(f, "table is empty: add at least one row before exporting"),
        }
    }
}

impl std::error::Error for MapError {}
