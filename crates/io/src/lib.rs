// File I/O: origin catalog loading and output table export

pub mod csv;
pub mod error;
pub mod export;
pub mod loader;

pub use error::{ExportError, LoadError};
pub use export::{empty_template, export_session, read_table, write_table};
pub use loader::{load_catalog, LoadOptions, LoadedCatalog, Source};

/// Delimiter of the origin export and of the output table.
pub const DEFAULT_DELIMITER: u8 = b';';
