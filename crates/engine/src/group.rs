use crate::catalog::OriginRow;
use crate::columns::{ColumnMap, Field};

/// Parent values that mean "no parent".
const NULL_LIKE: [&str; 4] = ["", "nan", "none", "null"];

/// True when the row's parent reference is empty or a null marker.
///
/// An unresolved `parent` column makes every row a main row.
pub fn is_main_row(row: &OriginRow, columns: &ColumnMap) -> bool {
    let parent = row.field(columns, Field::Parent).to_lowercase();
    NULL_LIKE.contains(&parent.as_str())
}

/// Result of looking up the main row for a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainLookup {
    /// Index of the group's main row.
    Found(usize),
    /// No row carries the code.
    NotFound,
    /// The code matched a variant at this index with no main row above it.
    Unanchored(usize),
}

impl MainLookup {
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Found(idx) => Some(idx),
            Self::NotFound | Self::Unanchored(_) => None,
        }
    }
}

/// Find the main row for `code`, telling a missing code from an orphan variant.
///
/// The first row whose trimmed SKU equals the trimmed code is used, even if
/// the SKU repeats later.
pub fn find_main(code: &str, rows: &[OriginRow], columns: &ColumnMap) -> MainLookup {
    if columns.sku.is_none() {
        return MainLookup::NotFound;
    }
    let needle = code.trim();

    let Some(hit) = rows.iter().position(|r| r.field(columns, Field::Sku) == needle) else {
        return MainLookup::NotFound;
    };

    if is_main_row(&rows[hit], columns) {
        return MainLookup::Found(hit);
    }

    // Variant: walk back to the nearest main row.
    match rows[..hit].iter().rposition(|r| is_main_row(r, columns)) {
        Some(idx) => MainLookup::Found(idx),
        None => MainLookup::Unanchored(hit),
    }
}

/// Index of the main row of the group containing `code`, if any.
pub fn locate_main(code: &str, rows: &[OriginRow], columns: &ColumnMap) -> Option<usize> {
    find_main(code, rows, columns).index()
}

/// Main row at `start` plus the contiguous variant rows that follow it.
///
/// `None` when `start` is out of bounds.
pub fn collect_group<'r>(
    start: usize,
    rows: &'r [OriginRow],
    columns: &ColumnMap,
) -> Option<(&'r OriginRow, Vec<&'r OriginRow>)> {
    let (main, rest) = rows.get(start..)?.split_first()?;
    let variants = rest
        .iter()
        .take_while(|r| !is_main_row(r, columns))
        .collect();
    Some((main, variants))
}
