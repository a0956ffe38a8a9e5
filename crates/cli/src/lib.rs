//! `skumap` command-line shell.
//!
//! The binary (`main.rs`) owns argument parsing and process exit; this
//! library holds the pieces worth testing without spawning a process: the
//! exit code registry, origin source selection and the interactive session.

pub mod exit_codes;
pub mod shell;

use std::path::PathBuf;
use std::time::Duration;

use skumap_config::{AssetSettings, SourceSettings};
use skumap_engine::AssetPaths;
use skumap_io::{LoadOptions, Source};

/// Sources to try, in order. Explicit `--source` paths replace the configured list.
pub fn origin_sources(settings: &SourceSettings, overrides: &[PathBuf]) -> Vec<Source> {
    if !overrides.is_empty() {
        return overrides.iter().cloned().map(Source::Local).collect();
    }

    let mut sources = Vec::with_capacity(settings.remote.len() + 1);
    if let Some(local) = &settings.local {
        sources.push(Source::Local(local.clone()));
    }
    for remote in &settings.remote {
        sources.push(Source::Remote { label: remote.label.clone(), url: remote.url.clone() });
    }
    sources
}

pub fn load_options(settings: &SourceSettings) -> LoadOptions {
    LoadOptions {
        delimiter: settings.delimiter_byte(),
        fetch_timeout: Duration::from_secs(settings.fetch_timeout_secs),
    }
}

pub fn asset_paths(settings: &AssetSettings) -> AssetPaths {
    AssetPaths {
        image_prefix: settings.image_prefix.clone(),
        image_ext: settings.image_ext.clone(),
        sheet_prefix: settings.sheet_prefix.clone(),
        sheet_ext: settings.sheet_ext.clone(),
    }
}
