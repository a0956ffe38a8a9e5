//! `skumap-engine`: catalog remapping engine.
//!
//! Pure engine crate: receives pre-loaded origin rows, returns rows in the
//! fixed output schema. No CLI or IO dependencies.

pub mod catalog;
pub mod columns;
pub mod error;
pub mod group;
pub mod mapper;
pub mod price;
pub mod schema;
pub mod session;

pub use catalog::{Catalog, OriginRow};
pub use columns::{resolve_columns, ColumnMap, Field};
pub use error::{MapError, Severity};
pub use group::{collect_group, locate_main};
pub use mapper::{build_output_row, AssetPaths};
pub use price::normalize_price;
pub use schema::{OutputRow, SCHEMA};
pub use session::{Added, Session};
