//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success                                                  |
//! | 1    | General error (unspecified)                              |
//! | 2    | CLI usage error (bad args)                               |
//! | 3    | A requested code could not be mapped                     |
//! | 4    | A requested code was already in the table (non-fatal)    |
//! | 5    | No origin source could be loaded                         |
//! | 6    | Origin is missing required columns                       |
//! | 7    | Export requested with no rows                            |
//! | 8    | Settings file unreadable or invalid                      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use skumap_engine::MapError;
use skumap_io::{ExportError, LoadError};

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Mapping (3-4)
// =============================================================================

/// At least one code was not found, had no main row, or mapped to an empty SKU.
pub const EXIT_NOT_FOUND: u8 = 3;

/// At least one code was skipped as a duplicate. Other rows were still exported.
pub const EXIT_DUPLICATE: u8 = 4;

// =============================================================================
// Origin / export (5-8)
// =============================================================================

/// Every configured origin source failed.
pub const EXIT_LOAD_FAILED: u8 = 5;

/// The loaded origin lacks `sku`, `title` or `cat`.
pub const EXIT_MISSING_COLUMNS: u8 = 6;

/// Nothing to export.
pub const EXIT_EMPTY_EXPORT: u8 = 7;

/// Settings file could not be read or failed validation.
pub const EXIT_CONFIG: u8 = 8;

/// Map an engine error to its exit code.
pub fn map_exit_code(err: &MapError) -> u8 {
    match err {
        MapError::NoRows | MapError::MissingSkuColumn | MapError::MissingColumns(_) => {
            EXIT_MISSING_COLUMNS
        }
        MapError::NotFound { .. } | MapError::Unanchored { .. } | MapError::EmptyMainSku { .. } => {
            EXIT_NOT_FOUND
        }
        MapError::Duplicate { .. } => EXIT_DUPLICATE,
        MapError::EmptyTable => EXIT_EMPTY_EXPORT,
        MapError::EmptyCode | MapError::RowOutOfRange { .. } => EXIT_USAGE,
    }
}

pub fn load_exit_code(err: &LoadError) -> u8 {
    match err {
        LoadError::Catalog(inner) if inner.is_session_fatal() => map_exit_code(inner),
        _ => EXIT_LOAD_FAILED,
    }
}

pub fn export_exit_code(err: &ExportError) -> u8 {
    match err {
        ExportError::Table(inner) => map_exit_code(inner),
        ExportError::Write(_) => EXIT_ERROR,
    }
}
