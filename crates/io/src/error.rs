use std::fmt;

use skumap_engine::MapError;

/// One failed source during a fallback load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub label: String,
    pub reason: String,
}

#[derive(Debug)]
pub enum LoadError {
    /// File read error.
    Io(String),
    /// HTTP fetch error (connect, timeout, non-2xx status).
    Http { url: String, message: String },
    /// Malformed delimited text.
    Parse(String),
    /// Input has no header line.
    MissingHeader,
    /// Rows parsed but the catalog is unusable (no rows, no SKU column).
    Catalog(MapError),
    /// No sources were configured.
    NoSources,
    /// Every source failed; one entry per attempt, in order.
    AllSourcesFailed(Vec<Attempt>),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Http { url, message } => write!(f, "fetch {url}: {message}"),
            Self::Parse(msg) => write!(f, "CSV parse error: {msg}"),
            Self::MissingHeader => write!(f, "empty dataset (no header line)"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::NoSources => write!(f, "no origin sources configured"),
            Self::AllSourcesFailed(attempts) => {
                write!(f, "cannot load the origin catalog")?;
                for a in attempts {
                    write!(f, "\n  {}: {}", a.label, a.reason)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl From<MapError> for LoadError {
    fn from(err: MapError) -> Self {
        Self::Catalog(err)
    }
}

#[derive(Debug)]
pub enum ExportError {
    /// The session table cannot be exported (empty).
    Table(MapError),
    /// Serialization failed.
    Write(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(err) => write!(f, "{err}"),
            Self::Write(msg) => write!(f, "cannot write table: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}
