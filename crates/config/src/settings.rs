// Mapper settings
// Loaded from ~/.config/skumap/settings.toml

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSource {
    pub label: String,
    pub url: String,
}

/// Where the origin export comes from, tried local first, then remotes in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Single character, or "auto" to sniff it from the file.
    pub delimiter: String,
    /// Local file, resolved against the working directory.
    pub local: Option<PathBuf>,
    pub fetch_timeout_secs: u64,
    pub remote: Vec<RemoteSource>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        let origin = "www.glasscom.it/Catalogo2026/origineCat2026.csv";
        Self {
            delimiter: ";".into(),
            local: Some(PathBuf::from("origineCat2026.csv")),
            fetch_timeout_secs: 20,
            remote: vec![
                RemoteSource { label: "HTTPS".into(), url: format!("https://{origin}") },
                RemoteSource { label: "HTTP".into(), url: format!("http://{origin}") },
                RemoteSource { label: "Mirror".into(), url: format!("https://r.jina.ai/https://{origin}") },
            ],
        }
    }
}

impl SourceSettings {
    /// Delimiter byte; `None` means sniff.
    pub fn delimiter_byte(&self) -> Option<u8> {
        if self.delimiter.eq_ignore_ascii_case("auto") {
            return None;
        }
        self.delimiter.as_bytes().first().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub image_prefix: String,
    pub image_ext: String,
    pub sheet_prefix: String,
    pub sheet_ext: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            image_prefix: "singoli-componenti/images/".into(),
            image_ext: "png".into(),
            sheet_prefix: "singoli-componenti/pdf/".into(),
            sheet_ext: "pdf".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub file_name: String,
    pub template_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_name: "modello_finale.csv".into(),
            template_name: "modello_vuoto.csv".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperSettings {
    pub source: SourceSettings,
    pub assets: AssetSettings,
    pub export: ExportSettings,
}

impl MapperSettings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skumap")
            .join("settings.toml")
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: MapperSettings =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.source.delimiter;
        if !d.eq_ignore_ascii_case("auto") && !(d.len() == 1 && d.is_ascii()) {
            return Err(ConfigError::Validation(format!(
                "delimiter must be a single ASCII character or \"auto\", got {d:?}"
            )));
        }

        for remote in &self.source.remote {
            if remote.url.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "remote source '{}' has an empty url",
                    remote.label
                )));
            }
        }

        if self.source.fetch_timeout_secs == 0 {
            return Err(ConfigError::Validation("fetch_timeout_secs must be > 0".into()));
        }

        Ok(())
    }

    /// Load from an explicit file. Errors are reported, not defaulted.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&contents)
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Write the default settings file (with comments) to `path`.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        fs::write(path, DEFAULT_FILE).map_err(|e| ConfigError::Io(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

const DEFAULT_FILE: &str = r#"# skumap settings

[source]
# Single character, or "auto" to detect it
delimiter = ";"
local = "origineCat2026.csv"
fetch_timeout_secs = 20

# Tried in order after the local file
[[source.remote]]
label = "HTTPS"
url = "https://www.glasscom.it/Catalogo2026/origineCat2026.csv"

[[source.remote]]
label = "HTTP"
url = "http://www.glasscom.it/Catalogo2026/origineCat2026.csv"

[[source.remote]]
label = "Mirror"
url = "https://r.jina.ai/https://www.glasscom.it/Catalogo2026/origineCat2026.csv"

[assets]
image_prefix = "singoli-componenti/images/"
image_ext = "png"
sheet_prefix = "singoli-componenti/pdf/"
sheet_ext = "pdf"

[export]
file_name = "modello_finale.csv"
template_name = "modello_vuoto.csv"
"#;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
