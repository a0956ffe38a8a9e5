//! Ordered multi-source origin loading.
//!
//! Sources are tried in order; the first one that yields a usable catalog
//! wins. A usable catalog has at least one non-blank row and a resolved
//! `sku` column.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use skumap_engine::Catalog;

use crate::csv::{decode_bytes, parse_origin, read_file_as_utf8, sniff_delimiter};
use crate::error::{Attempt, LoadError};

pub(crate) const USER_AGENT: &str = concat!("skumap/", env!("CARGO_PKG_VERSION"));

/// Where to read the origin export from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote { label: String, url: String },
}

impl Source {
    pub fn label(&self) -> String {
        match self {
            Self::Local(path) => format!("Local ({})", path.display()),
            Self::Remote { label, .. } => label.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field delimiter; `None` sniffs it from the content.
    pub delimiter: Option<u8>,
    pub fetch_timeout: Duration,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: Some(crate::DEFAULT_DELIMITER),
            fetch_timeout: Duration::from_secs(20),
        }
    }
}

/// A catalog together with where and when it was loaded.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub source_label: String,
    pub loaded_at: DateTime<Local>,
}

impl LoadedCatalog {
    pub fn loaded_at_display(&self) -> String {
        self.loaded_at.format("%d/%m/%Y %H:%M:%S").to_string()
    }
}

fn fetch_text(url: &str, timeout: Duration) -> Result<String, LoadError> {
    let http_err = |e: reqwest::Error| LoadError::Http { url: url.to_string(), message: e.to_string() };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(http_err)?;

    let response = client.get(url).send().map_err(http_err)?;
    let response = response.error_for_status().map_err(http_err)?;
    let bytes = response.bytes().map_err(http_err)?;
    Ok(decode_bytes(bytes.to_vec()))
}

/// Load and validate a single source.
pub fn load_source(source: &Source, options: &LoadOptions) -> Result<Catalog, LoadError> {
    let text = match source {
        Source::Local(path) => read_file_as_utf8(path)?,
        Source::Remote { url, .. } => fetch_text(url, options.fetch_timeout)?,
    };
    let delimiter = options.delimiter.unwrap_or_else(|| sniff_delimiter(&text));
    let table = parse_origin(&text, delimiter)?;
    Ok(Catalog::new(table.headers, table.rows)?)
}

/// Try each source in order and return the first usable catalog.
pub fn load_catalog(sources: &[Source], options: &LoadOptions) -> Result<LoadedCatalog, LoadError> {
    if sources.is_empty() {
        return Err(LoadError::NoSources);
    }

    let mut attempts = Vec::new();
    for source in sources {
        let label = source.label();
        match load_source(source, options) {
            Ok(catalog) => {
                log::info!("loaded {} origin rows from {label}", catalog.len());
                return Ok(LoadedCatalog {
                    catalog,
                    source_label: label,
                    loaded_at: Local::now(),
                });
            }
            Err(err) => {
                log::warn!("source {label} unusable: {err}");
                attempts.push(Attempt { label, reason: err.to_string() });
            }
        }
    }

    Err(LoadError::AllSourcesFailed(attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::fs;
    use tempfile::tempdir;

    const ORIGIN: &str = "\
sku;parent_sku;post_title;categoria;regular_price
A1;;Pinza;Morsetti;
A1-V1;A1;Pinza cromo;Morsetti;12,50
";

    #[test]
    fn empty_source_list() {
        assert!(matches!(
            load_catalog(&[], &LoadOptions::default()),
            Err(LoadError::NoSources)
        ));
    }

    #[test]
    fn local_source_loads() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("origin.csv");
        fs::write(&path, ORIGIN).unwrap();

        let loaded = load_catalog(&[Source::Local(path)], &LoadOptions::default()).unwrap();
        assert_eq!(loaded.catalog.len(), 2);
        assert!(loaded.source_label.starts_with("Local ("));
        assert_eq!(loaded.loaded_at_display().len(), "16/10/2026 10:00:00".len());
    }

    #[test]
    fn falls_back_past_unusable_sources() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.csv");
        let no_sku = dir.path().join("no_sku.csv");
        fs::write(&no_sku, "codice;titolo\nA1;T\n").unwrap();
        let blank = dir.path().join("blank.csv");
        fs::write(&blank, "sku;titolo\n;\n ; \n").unwrap();
        let good = dir.path().join("good.csv");
        fs::write(&good, ORIGIN).unwrap();

        let sources = vec![
            Source::Local(missing),
            Source::Local(no_sku),
            Source::Local(blank),
            Source::Local(good.clone()),
        ];
        let loaded = load_catalog(&sources, &LoadOptions::default()).unwrap();
        assert_eq!(loaded.source_label, Source::Local(good).label());
    }

    #[test]
    fn all_failures_are_reported_in_order() {
        let dir = tempdir().unwrap();
        let sources = vec![
            Source::Local(dir.path().join("a.csv")),
            Source::Local(dir.path().join("b.csv")),
        ];
        match load_catalog(&sources, &LoadOptions::default()) {
            Err(LoadError::AllSourcesFailed(attempts)) => {
                assert_eq!(attempts.len(), 2);
                assert!(attempts[0].label.contains("a.csv"));
                assert!(attempts[1].label.contains("b.csv"));
            }
            other => panic!("expected AllSourcesFailed, got {other:?}"),
        }
    }

    #[test]
    fn remote_fallback_after_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/down.csv");
            then.status(503);
        });
        let ok = server.mock(|when, then| {
            when.method(GET).path("/origin.csv");
            then.status(200).body(ORIGIN);
        });

        let sources = vec![
            Source::Remote { label: "HTTPS".into(), url: server.url("/down.csv") },
            Source::Remote { label: "Mirror".into(), url: server.url("/origin.csv") },
        ];
        let loaded = load_catalog(&sources, &LoadOptions::default()).unwrap();
        ok.assert();
        assert_eq!(loaded.source_label, "Mirror");
        assert_eq!(loaded.catalog.rows()[1].get("regular_price"), Some("12,50"));
    }

    #[test]
    fn sniffed_delimiter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("comma.csv");
        fs::write(&path, "sku,post_title,categoria\nA1,T,C\n").unwrap();
        let options = LoadOptions { delimiter: None, ..LoadOptions::default() };
        let catalog = load_source(&Source::Local(path), &options).unwrap();
        assert_eq!(catalog.headers().len(), 3);
    }
}
